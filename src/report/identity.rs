//! Cross-instance identity validation. All report instances of one series
//! must agree on who and what they describe; the first instance is the
//! reference and the first conflict aborts the series.

use chrono::NaiveDate;

use super::{ReportInstance, SeriesError};
use crate::models::SeriesIdentifiers;

/// Validate identity agreement across the instances and return the
/// reference instance's identifiers. A field absent on a compared instance
/// is non-conflicting; a field absent on the reference cannot conflict
/// either.
pub fn validate_identifiers(instances: &[ReportInstance]) -> Result<SeriesIdentifiers, SeriesError> {
    let Some((reference, rest)) = instances.split_first() else {
        return Err(SeriesError::NoInstances);
    };
    let reference = &reference.identifiers;

    for instance in rest {
        let ids = &instance.identifiers;
        check_field("PatientID", reference.patient_id.as_deref(), ids.patient_id.as_deref())?;
        check_field(
            "AccessionNumber",
            reference.accession_number.as_deref(),
            ids.accession_number.as_deref(),
        )?;
        check_field(
            "SeriesInstanceUID",
            reference.series_uid.as_deref(),
            ids.series_uid.as_deref(),
        )?;
        check_field("PatientSex", reference.sex.as_deref(), ids.sex.as_deref())?;
        check_field("StudyDate", reference.study_date.as_deref(), ids.study_date.as_deref())?;
    }

    Ok(SeriesIdentifiers {
        mrn: reference.patient_id.clone(),
        accession: reference.accession_number.clone(),
        series_uid: reference.series_uid.clone(),
        sex: reference.sex.clone(),
        study_date: reference
            .study_date
            .as_deref()
            .map(format_study_date)
            .transpose()?,
    })
}

fn check_field(
    field: &'static str,
    expected: Option<&str>,
    observed: Option<&str>,
) -> Result<(), SeriesError> {
    match (expected, observed) {
        (Some(expected), Some(observed)) if expected != observed => {
            tracing::error!(field, expected, observed, "identity mismatch across report instances");
            Err(SeriesError::IdentityMismatch {
                field,
                expected: expected.to_string(),
                observed: observed.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Reformat an 8-digit calendar date (YYYYMMDD) to hyphenated ISO.
fn format_study_date(raw: &str) -> Result<String, SeriesError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y%m%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| SeriesError::InvalidStudyDate(raw.to_string()))
}
