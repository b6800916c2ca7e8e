//! Instance loading: turn a series directory of DICOM structured-report
//! files into coded-tree report instances. Files that cannot be parsed are
//! dropped with a diagnostic; only a series with zero readable instances is
//! a hard failure.

use std::fs;
use std::path::{Path, PathBuf};

use dicom::core::Tag;
use dicom::dictionary_std::tags;
use dicom::object::{open_file, InMemDicomObject};

use super::{CodedNode, InstanceIdentifiers, ReportInstance, SeriesError};

/// Load every readable report instance from a series directory, in file-name
/// order.
pub fn load_series(dir: &Path) -> Result<Vec<ReportInstance>, SeriesError> {
    if !dir.is_dir() {
        return Err(SeriesError::DirectoryMissing(dir.to_path_buf()));
    }

    let files = report_files(dir)?;
    if files.is_empty() {
        return Err(SeriesError::EmptySeries(dir.to_path_buf()));
    }

    let mut instances = Vec::with_capacity(files.len());
    for path in &files {
        match open_file(path) {
            Ok(obj) => instances.push(instance_from_object(&obj, path)),
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "failed to read report file");
            }
        }
    }

    if instances.is_empty() {
        tracing::error!(dir = %dir.display(), "no valid report files found");
        return Err(SeriesError::EmptySeries(dir.to_path_buf()));
    }
    Ok(instances)
}

/// Files to consider: prefer *.dcm, fall back to everything in the
/// directory when no .dcm files exist.
fn report_files(dir: &Path) -> Result<Vec<PathBuf>, SeriesError> {
    let mut all = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            all.push(path);
        }
    }

    let dcm: Vec<PathBuf> = all
        .iter()
        .filter(|p| {
            p.extension()
                .map(|e| e.eq_ignore_ascii_case("dcm"))
                .unwrap_or(false)
        })
        .cloned()
        .collect();
    let mut files = if dcm.is_empty() { all } else { dcm };
    files.sort();
    Ok(files)
}

fn instance_from_object(obj: &InMemDicomObject, path: &Path) -> ReportInstance {
    let identifiers = InstanceIdentifiers {
        patient_id: tag_str(obj, tags::PATIENT_ID),
        accession_number: tag_str(obj, tags::ACCESSION_NUMBER),
        series_uid: tag_str(obj, tags::SERIES_INSTANCE_UID),
        sex: tag_str(obj, tags::PATIENT_SEX),
        study_date: tag_str(obj, tags::STUDY_DATE),
    };

    let content: Vec<CodedNode> = seq_items(obj, tags::CONTENT_SEQUENCE)
        .map(|items| items.iter().map(coded_node).collect())
        .unwrap_or_default();
    if content.is_empty() {
        tracing::warn!(path = %path.display(), "report file has no content sequence");
    }

    ReportInstance {
        identifiers,
        content,
        source_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
    }
}

/// Flatten one content item (and, recursively, its children) into the
/// coded-tree model the extractors walk.
fn coded_node(item: &InMemDicomObject) -> CodedNode {
    let (name_code, _) = code_pair(item, tags::CONCEPT_NAME_CODE_SEQUENCE);
    let (value_code, value_label) = code_pair(item, tags::CONCEPT_CODE_SEQUENCE);

    let numeric_value = seq_items(item, tags::MEASURED_VALUE_SEQUENCE)
        .and_then(|items| items.first())
        .and_then(|measured| measured.element_opt(tags::NUMERIC_VALUE).ok().flatten())
        .and_then(|element| element.to_float64().ok());

    let children = seq_items(item, tags::CONTENT_SEQUENCE)
        .map(|items| items.iter().map(coded_node).collect())
        .unwrap_or_default();

    CodedNode {
        name_code,
        value_code,
        value_label,
        text_value: tag_str(item, tags::TEXT_VALUE),
        numeric_value,
        children,
    }
}

/// Code value + meaning from the first item of a code sequence.
fn code_pair(item: &InMemDicomObject, tag: Tag) -> (Option<String>, Option<String>) {
    match seq_items(item, tag).and_then(|items| items.first()) {
        Some(code_item) => (
            tag_str(code_item, tags::CODE_VALUE),
            tag_str(code_item, tags::CODE_MEANING),
        ),
        None => (None, None),
    }
}

fn seq_items<'a>(item: &'a InMemDicomObject, tag: Tag) -> Option<&'a [InMemDicomObject]> {
    item.element_opt(tag)
        .ok()
        .flatten()
        .and_then(|element| element.items())
}

fn tag_str(item: &InMemDicomObject, tag: Tag) -> Option<String> {
    item.element_opt(tag)
        .ok()
        .flatten()
        .and_then(|element| element.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
