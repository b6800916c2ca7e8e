use std::collections::BTreeMap;

use serde::Serialize;

use super::MeasurementCategory;

/// One extracted measurement category. Untagged so the JSON export reads
/// like the category's natural shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryMeasurements {
    /// Location name -> whole-millimeter diameter. Unknown site codes keep
    /// their synthesized "<code>, <label>" key.
    AorticDiameters(BTreeMap<String, i64>),
    CoronaryCalcium(CoronaryCalcium),
    LungLesions(LungLesions),
    LungParenchyma(Vec<LungRegionDensity>),
    PulmonaryDensities(Vec<LungRegionDensity>),
    SpineMeasurements(Vec<VertebraMeasurement>),
}

impl CategoryMeasurements {
    pub fn category(&self) -> MeasurementCategory {
        match self {
            Self::AorticDiameters(_) => MeasurementCategory::AorticDiameters,
            Self::CoronaryCalcium(_) => MeasurementCategory::CoronaryCalcium,
            Self::LungLesions(_) => MeasurementCategory::LungLesions,
            Self::LungParenchyma(_) => MeasurementCategory::LungParenchyma,
            Self::PulmonaryDensities(_) => MeasurementCategory::PulmonaryDensities,
            Self::SpineMeasurements(_) => MeasurementCategory::SpineMeasurements,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoronaryCalcium {
    pub heart_volume_cm3: Option<f64>,
    pub coronary_calcification_volume_mm3: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LungLesions {
    /// Total lesion entries seen, including entries that could not be keyed.
    pub lesion_count: i64,
    /// Tracking identifier -> measurements for the entries that could.
    pub lesions: BTreeMap<String, LesionMeasurements>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LesionMeasurements {
    pub location: Option<String>,
    pub review_status: Option<String>,
    pub max_2d_diameter_mm: Option<f64>,
    pub min_2d_diameter_mm: Option<f64>,
    pub mean_2d_diameter_mm: Option<f64>,
    pub max_3d_diameter_mm: Option<f64>,
    pub volume_mm3: Option<f64>,
}

/// One per-location lung density row. No decoder emits these yet; the type
/// matches the persisted layout so a future decoder plugs straight in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LungRegionDensity {
    pub location: String,
    pub opacity_score: Option<f64>,
    pub volume_cm3: Option<f64>,
    pub opacity_volume_cm3: Option<f64>,
    pub opacity_percent: Option<f64>,
    pub high_opacity_volume_cm3: Option<f64>,
    pub high_opacity_percent: Option<f64>,
    pub mean_hu: Option<f64>,
    pub mean_hu_opacity: Option<f64>,
    pub low_parenchyma_hu_percent: Option<f64>,
}

/// One vertebra measurement row. Same situation as [`LungRegionDensity`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VertebraMeasurement {
    pub vertebra: String,
    pub direction: String,
    pub length_mm: Option<f64>,
    pub status: Option<String>,
}
