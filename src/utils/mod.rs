pub mod errors;
pub mod fs;

pub use errors::{ConvertError, ConvertResult, ExtractionKind};
