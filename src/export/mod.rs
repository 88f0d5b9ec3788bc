pub mod json_export;
pub mod rows;

use anyhow::Result;

use crate::pipeline::BatchOutcome;

pub use json_export::JsonExporter;
pub use rows::{CallRow, ErrorRow, ReportRow};

/// Hands a finished batch to a storage collaborator.
pub trait Exporter {
    fn export(&self, batch: &BatchOutcome) -> Result<()>;
}
