pub mod attribution;
pub mod core;
pub mod export;
pub mod layout;
pub mod metadata;
pub mod pipeline;
pub mod source;

pub use crate::core::config::{CrossFillPolicy, ExtractionConfig, TieBreakPolicy};
pub use crate::core::error::ExtractError;
pub use crate::core::model::{CallRecord, GameReport, ReportDocument, TeamAssignment, TextSpan};
pub use crate::pipeline::{BatchOutcome, DocumentOutcome, DocumentResult, ExtractionPipeline};
