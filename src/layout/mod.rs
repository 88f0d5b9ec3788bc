pub mod anchor;
pub mod columns;
pub mod profile;
pub mod row_filter;

pub use anchor::AnchorLocator;
pub use columns::{ColumnExtractor, RawRow};
pub use profile::{FieldBand, LayoutProfile, LayoutProfileId};
pub use row_filter::{CallDraft, RowFilter};
