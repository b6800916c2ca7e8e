//! Per-series decode loop. The identity gate is fatal and runs first; after
//! that every instance is classified and extracted independently, and any
//! recoverable skip is logged without touching its siblings.

use std::collections::BTreeMap;

use super::{classify, extract, identity};
use super::{InstanceSkip, ReportInstance, SeriesError};
use crate::models::{CategoryMeasurements, MeasurementCategory, SeriesReport};

/// Decode one series' instances into a single sparse report.
pub fn decode_series(instances: &[ReportInstance]) -> Result<SeriesReport, SeriesError> {
    let identifiers = identity::validate_identifiers(instances)?;

    let mut categories: BTreeMap<MeasurementCategory, CategoryMeasurements> = BTreeMap::new();
    for instance in instances {
        match decode_instance(instance) {
            Ok((category, measurements)) => {
                if categories.insert(category, measurements).is_some() {
                    tracing::warn!(
                        source = %instance.source_name,
                        category = %category,
                        "duplicate category in series, keeping the later instance"
                    );
                }
            }
            Err(skip) => {
                tracing::warn!(
                    source = %instance.source_name,
                    reason = %skip,
                    "skipping report instance"
                );
            }
        }
    }

    Ok(SeriesReport {
        identifiers,
        categories,
    })
}

fn decode_instance(
    instance: &ReportInstance,
) -> Result<(MeasurementCategory, CategoryMeasurements), InstanceSkip> {
    let category = classify::classify_instance(&instance.content)?;
    let holder = classify::find_measurement_holder(&instance.content)?;
    let measurements = extract::extract_category(category, holder)?;
    Ok((category, measurements))
}
