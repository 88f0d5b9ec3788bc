use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::core::geometry::BBox;
use crate::core::model::{ReportDocument, TextSpan};
use crate::layout::profile::LayoutProfileId;
use crate::source::SpanSource;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpanOrigin {
    #[default]
    TopLeft,
    /// pdfminer-style coordinates, y grows upward.
    BottomLeft,
}

#[derive(Debug, Deserialize)]
struct RawSpan {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    text: String,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    page: usize,
    height: f32,
    #[serde(default)]
    spans: Vec<RawSpan>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    profile: Option<LayoutProfileId>,
    #[serde(default)]
    origin: SpanOrigin,
    pages: Vec<RawPage>,
}

/// Span dumps written by an external extractor as JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonSpanSource;

impl JsonSpanSource {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, raw: &str) -> Result<ReportDocument> {
        let doc: RawDocument =
            serde_json::from_str(raw).with_context(|| "failed to parse span document JSON")?;

        let mut spans = Vec::new();
        for page in doc.pages {
            for span in page.spans {
                let bbox = BBox::new(span.x0, span.y0, span.x1, span.y1);
                let bbox = match doc.origin {
                    SpanOrigin::TopLeft => bbox,
                    SpanOrigin::BottomLeft => bbox.flip_y(page.height),
                };
                spans.push(TextSpan::new(page.page, bbox, span.text));
            }
        }
        debug!(report = %doc.name, spans = spans.len(), "loaded span document");

        Ok(ReportDocument {
            name: doc.name,
            profile: doc.profile,
            spans,
        })
    }
}

impl SpanSource for JsonSpanSource {
    fn load(&self, path: &Path) -> Result<ReportDocument> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read span document {}", path.display()))?;
        self.parse(&raw)
            .with_context(|| format!("in span document {}", path.display()))
    }
}
