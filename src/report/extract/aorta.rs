//! Aortic diameter extraction. The holder's children are individual
//! measures; each pairs a finding site with a diameter value. Diameters are
//! reported as whole millimeters, so fractional precision is discarded.

use std::collections::BTreeMap;

use crate::report::codes;
use crate::report::{CodedNode, InstanceSkip};

pub fn extract(holder: &CodedNode) -> Result<BTreeMap<String, i64>, InstanceSkip> {
    let mut diameters = BTreeMap::new();

    for measure in &holder.children {
        let mut site_location: Option<String> = None;
        let mut diameter: Option<i64> = None;

        for node in &measure.children {
            match node.name_code.as_deref() {
                Some(codes::FINDING_SITE) => {
                    let Some(site_code) = node.value_code.as_deref() else {
                        continue;
                    };
                    // End-of-chain marker, not a real site.
                    if site_code == codes::AORTA_CHAIN_TERMINATOR {
                        continue;
                    }
                    site_location = Some(match codes::aorta_location(site_code) {
                        Some(name) => name.to_string(),
                        None => format!(
                            "{}, {}",
                            site_code,
                            node.value_label.as_deref().unwrap_or_default()
                        ),
                    });
                }
                Some(codes::DIAMETER_VALUE) => {
                    if let Some(value) = node.numeric_value {
                        diameter = Some(value as i64);
                    }
                }
                _ => {}
            }
        }

        if let (Some(site), Some(mm)) = (site_location, diameter) {
            diameters.insert(site, mm);
        }
    }

    if diameters.is_empty() {
        return Err(InstanceSkip::NoAorticDiameters);
    }
    Ok(diameters)
}
