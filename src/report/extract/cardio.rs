//! Coronary calcium / heart volume extraction. The holder's children are
//! sub-measures keyed by a free-text tracking identifier; only the two
//! known labels are mapped, anything else is tolerated silently since the
//! upstream pipeline adds extra sub-measures over time.

use crate::models::CoronaryCalcium;
use crate::report::codes;
use crate::report::{CodedNode, InstanceSkip};

enum CardioField {
    HeartVolume,
    CalciumVolume,
}

pub fn extract(holder: &CodedNode) -> Result<CoronaryCalcium, InstanceSkip> {
    let mut result = CoronaryCalcium::default();

    for measure in &holder.children {
        let mut field: Option<CardioField> = None;
        let mut value: Option<f64> = None;

        for node in &measure.children {
            if node.has_role(codes::TRACKING_IDENTIFIER) {
                field = match node.text_value.as_deref() {
                    Some(codes::CARDIO_HEART_LABEL) => Some(CardioField::HeartVolume),
                    Some(codes::CARDIO_CALCIUM_LABEL) => Some(CardioField::CalciumVolume),
                    _ => None,
                };
            }
            if value.is_none() {
                value = node.numeric_value;
            }
        }

        if let (Some(field), Some(value)) = (field, value) {
            match field {
                CardioField::HeartVolume => result.heart_volume_cm3 = Some(value),
                CardioField::CalciumVolume => {
                    result.coronary_calcification_volume_mm3 = Some(value)
                }
            }
        }
    }

    Ok(result)
}
