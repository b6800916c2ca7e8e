use serde::Serialize;

/// One node of a structured report's content tree, already decoded from the
/// DICOM object model. A node either carries a scalar payload (text or
/// numeric) or children; which one is determined by its position in the
/// category-specific shape, never by a type tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodedNode {
    /// Concept-name code: what role this node plays (e.g. finding site).
    pub name_code: Option<String>,
    /// Concept-value code: what the node points at (e.g. an anatomical site).
    pub value_code: Option<String>,
    /// Human-readable meaning of `value_code`.
    pub value_label: Option<String>,
    pub text_value: Option<String>,
    /// First numeric measured value, if the node carries one.
    pub numeric_value: Option<f64>,
    pub children: Vec<CodedNode>,
}

impl CodedNode {
    /// Whether this node plays the given concept-name role.
    pub fn has_role(&self, code: &str) -> bool {
        self.name_code.as_deref() == Some(code)
    }
}

/// Identity fields read from one report file. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceIdentifiers {
    pub patient_id: Option<String>,
    pub accession_number: Option<String>,
    pub series_uid: Option<String>,
    pub sex: Option<String>,
    pub study_date: Option<String>,
}

/// One loaded report instance: identity plus the root content node list.
/// Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct ReportInstance {
    pub identifiers: InstanceIdentifiers,
    pub content: Vec<CodedNode>,
    /// File name the instance came from, for diagnostics.
    pub source_name: String,
}
