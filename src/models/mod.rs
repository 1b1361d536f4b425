pub mod document;
pub mod report;

pub use document::*;
pub use report::*;
