use std::collections::BTreeMap;

use crate::core::model::{Anchor, FieldName, TextSpan};
use crate::layout::profile::{FieldBand, LayoutProfile};

/// Spans whose tops differ by no more than this share a text line.
const LINE_TOLERANCE: f32 = 2.0;

/// Raw field text sliced out of the page for one anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub anchor: Anchor,
    pub fields: BTreeMap<FieldName, String>,
}

impl RawRow {
    pub fn get(&self, field: FieldName) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct ColumnExtractor<'a> {
    profile: &'a LayoutProfile,
}

impl<'a> ColumnExtractor<'a> {
    pub fn new(profile: &'a LayoutProfile) -> Self {
        Self { profile }
    }

    pub fn extract(&self, anchor: Anchor, spans: &[TextSpan]) -> RawRow {
        let (lo, hi) = self.profile.window(anchor.y0);
        let in_window: Vec<&TextSpan> = spans
            .iter()
            .filter(|s| s.page == anchor.page && s.bbox.intersects_y(lo, hi))
            .collect();

        let fields = self
            .profile
            .field_bands
            .iter()
            .map(|band| (band.field, slice_band(band, &in_window)))
            .collect();

        RawRow { anchor, fields }
    }
}

fn slice_band(band: &FieldBand, spans: &[&TextSpan]) -> String {
    let mut selected: Vec<&TextSpan> = spans
        .iter()
        .copied()
        .filter(|s| s.bbox.within_x(band.x_min, band.x_max))
        .collect();
    selected.sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));

    let mut lines: Vec<Vec<&TextSpan>> = Vec::new();
    for span in selected {
        match lines.last_mut() {
            Some(line) if (span.bbox.y0 - line[0].bbox.y0).abs() <= LINE_TOLERANCE => {
                line.push(span);
                continue;
            }
            _ => {}
        }
        lines.push(vec![span]);
    }
    for line in &mut lines {
        line.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    }

    lines
        .iter()
        .flatten()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
