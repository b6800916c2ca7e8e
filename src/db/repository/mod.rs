pub mod series_report;

pub use series_report::*;
