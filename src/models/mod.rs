pub mod category;
pub mod measurements;
pub mod report;

pub use category::*;
pub use measurements::*;
pub use report::*;
