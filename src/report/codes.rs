//! The fixed code tables the decoder recognizes. Process-wide constants
//! with no runtime state; safe to share across threads.

use crate::models::MeasurementCategory;

/// Concept-name code of the node that roots a category's real payload.
pub const IMAGE_MEASUREMENT: &str = "126010";

/// Concept-name code for an anatomical finding site.
pub const FINDING_SITE: &str = "363698007";

/// Concept-name code for an aortic diameter value.
pub const DIAMETER_VALUE: &str = "RID13432";

/// Site code that marks the end of the aorta measurement chain. Pure
/// bookkeeping, never a real site.
pub const AORTA_CHAIN_TERMINATOR: &str = "RID480";

/// Concept-name code for a tracking identifier (free-text key).
pub const TRACKING_IDENTIFIER: &str = "112039";

/// Concept-name code for a lesion's review status.
pub const REVIEW_STATUS: &str = "CHESTCT0907";

/// Tracking-identifier texts the coronary-calcium report uses.
pub const CARDIO_HEART_LABEL: &str = "Heart";
pub const CARDIO_CALCIUM_LABEL: &str = "Calcium score";

/// Resolve a leading concept-value code to a measurement category.
pub fn category_for_code(code: &str) -> Option<MeasurementCategory> {
    match code {
        "CHESTCT0203" => Some(MeasurementCategory::LungParenchyma),
        "CHESTCT0304" => Some(MeasurementCategory::CoronaryCalcium),
        "CHESTCT0410" => Some(MeasurementCategory::AorticDiameters),
        "CHESTCT0502" => Some(MeasurementCategory::SpineMeasurements),
        "CHESTCT0611" => Some(MeasurementCategory::PulmonaryDensities),
        "CHESTCT0999" => Some(MeasurementCategory::LungLesions),
        _ => None,
    }
}

/// Resolve an aortic finding-site code to its column name.
pub fn aorta_location(code: &str) -> Option<&'static str> {
    match code {
        "CHESTCT0408" => Some("max_ascending"),
        "CHESTCT0409" => Some("max_descending"),
        "C33557" => Some("sinus_of_valsalva"),
        "RID579" => Some("sinotubular_junction"),
        "CHESTCT0401" => Some("mid_ascending"),
        "CHESTCT0402" => Some("proximal_arch"),
        "CHESTCT0403" => Some("mid_arch"),
        "CHESTCT0404" => Some("proximal_descending"),
        "CHESTCT0405" => Some("mid_descending"),
        "CHESTCT0406" => Some("diaphragm_level"),
        "RID905" => Some("celiac_artery_origin"),
        _ => None,
    }
}

/// The five numeric measurement roles a lesion entry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LesionMetric {
    Max2dDiameterMm,
    Min2dDiameterMm,
    Mean2dDiameterMm,
    Max3dDiameterMm,
    VolumeMm3,
}

/// Resolve a lesion concept-name code to its numeric metric.
pub fn lesion_metric(code: &str) -> Option<LesionMetric> {
    match code {
        "CHESTCT0901" => Some(LesionMetric::Max2dDiameterMm),
        "CHESTCT0902" => Some(LesionMetric::Min2dDiameterMm),
        "CHESTCT0903" => Some(LesionMetric::Mean2dDiameterMm),
        "CHESTCT0904" => Some(LesionMetric::Max3dDiameterMm),
        "CHESTCT0905" => Some(LesionMetric::VolumeMm3),
        _ => None,
    }
}

/// Normalize a lesion review status: the two reviewer-confirmation variants
/// collapse to "accepted", anything else passes through verbatim.
pub fn normalize_review_status(raw: &str) -> String {
    match raw {
        "Measurement accepted" | "Measurement auto-confirmed" => "accepted".to_string(),
        other => other.to_string(),
    }
}
