pub mod aggregate;
pub mod classify;
pub mod codes;
pub mod extract;
pub mod identity;
pub mod loader;
pub mod node;

pub use aggregate::decode_series;
pub use loader::load_series;
pub use node::{CodedNode, InstanceIdentifiers, ReportInstance};

use std::path::PathBuf;

use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::MeasurementCategory;

/// Fatal, per-series failures. Any of these aborts the series before (or
/// instead of) producing a report; the batch moves on to the next series.
#[derive(Error, Debug)]
pub enum SeriesError {
    #[error("series directory does not exist: {0}")]
    DirectoryMissing(PathBuf),

    #[error("no readable report instances in {0}")]
    EmptySeries(PathBuf),

    #[error("no report instances to decode")]
    NoInstances,

    #[error("mismatched {field}: expected '{expected}', got '{observed}'")]
    IdentityMismatch {
        field: &'static str,
        expected: String,
        observed: String,
    },

    #[error("study date '{0}' is not an 8-digit calendar date")]
    InvalidStudyDate(String),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recoverable, per-instance failures. The instance contributes nothing to
/// the series report; sibling instances are unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstanceSkip {
    #[error("no category code present on the leading content node")]
    MissingCategoryCode,

    #[error("unrecognized category code: {0}")]
    UnknownCategoryCode(String),

    #[error("no image measurement content found")]
    MissingMeasurementHolder,

    #[error("no aortic diameters found")]
    NoAorticDiameters,

    #[error("decoding for {0} is not yet supported")]
    NotYetSupported(MeasurementCategory),
}
