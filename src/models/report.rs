use std::collections::BTreeMap;

use serde::Serialize;

use super::{CategoryMeasurements, MeasurementCategory};

/// Patient/study identity of one series, taken from the reference instance
/// after cross-instance validation. `study_date` is already reformatted to
/// hyphenated ISO.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesIdentifiers {
    pub mrn: Option<String>,
    pub accession: Option<String>,
    pub series_uid: Option<String>,
    pub sex: Option<String>,
    pub study_date: Option<String>,
}

/// The decoded output for one series: identity plus whichever categories
/// were actually present and extractable. Sparse by design; an absent
/// category is not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesReport {
    #[serde(flatten)]
    pub identifiers: SeriesIdentifiers,
    pub categories: BTreeMap<MeasurementCategory, CategoryMeasurements>,
}

impl SeriesReport {
    pub fn get(&self, category: MeasurementCategory) -> Option<&CategoryMeasurements> {
        self.categories.get(&category)
    }

    pub fn has(&self, category: MeasurementCategory) -> bool {
        self.categories.contains_key(&category)
    }
}
