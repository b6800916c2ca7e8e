//! Lung lesion extraction. The holder's children are individual lesion
//! entries keyed by a free-text tracking identifier. `lesion_count` counts
//! every entry, parseable or not, so it can exceed the number of keyed
//! results.

use std::collections::BTreeMap;

use crate::models::{LesionMeasurements, LungLesions};
use crate::report::codes::{self, LesionMetric};
use crate::report::{CodedNode, InstanceSkip};

pub fn extract(holder: &CodedNode) -> Result<LungLesions, InstanceSkip> {
    let lesion_count = holder.children.len() as i64;
    let mut lesions = BTreeMap::new();

    for (index, entry) in holder.children.iter().enumerate() {
        if entry.children.is_empty() {
            tracing::warn!(index, "lesion entry has no content, skipping");
            continue;
        }

        let mut lesion_id: Option<String> = None;
        let mut lesion = LesionMeasurements::default();

        for node in &entry.children {
            match node.name_code.as_deref() {
                Some(codes::TRACKING_IDENTIFIER) => lesion_id = node.text_value.clone(),
                Some(codes::FINDING_SITE) => lesion.location = node.value_label.clone(),
                Some(codes::REVIEW_STATUS) => {
                    lesion.review_status = node
                        .text_value
                        .as_deref()
                        .map(codes::normalize_review_status);
                }
                Some(code) => {
                    if let (Some(metric), Some(value)) =
                        (codes::lesion_metric(code), node.numeric_value)
                    {
                        match metric {
                            LesionMetric::Max2dDiameterMm => lesion.max_2d_diameter_mm = Some(value),
                            LesionMetric::Min2dDiameterMm => lesion.min_2d_diameter_mm = Some(value),
                            LesionMetric::Mean2dDiameterMm => {
                                lesion.mean_2d_diameter_mm = Some(value)
                            }
                            LesionMetric::Max3dDiameterMm => lesion.max_3d_diameter_mm = Some(value),
                            LesionMetric::VolumeMm3 => lesion.volume_mm3 = Some(value),
                        }
                    }
                }
                None => {}
            }
        }

        // A lesion with no tracking identifier cannot be keyed; the entry
        // still counted toward lesion_count above.
        let Some(id) = lesion_id else {
            tracing::warn!(index, "lesion entry has no tracking identifier, skipping");
            continue;
        };
        lesions.insert(id, lesion);
    }

    Ok(LungLesions {
        lesion_count,
        lesions,
    })
}
