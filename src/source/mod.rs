pub mod json_source;
pub mod pdftotext;

use std::path::Path;

use anyhow::Result;

use crate::core::model::ReportDocument;

pub use json_source::{JsonSpanSource, SpanOrigin};
pub use pdftotext::PdfToTextSource;

/// Loads one report's text spans in the top-left page frame.
pub trait SpanSource {
    fn load(&self, path: &Path) -> Result<ReportDocument>;
}
