use crate::core::model::{Anchor, TextSpan};

/// Finds candidate data rows by the marker token each row carries.
#[derive(Debug, Clone)]
pub struct AnchorLocator<'a> {
    marker: &'a str,
}

impl<'a> AnchorLocator<'a> {
    pub fn new(marker: &'a str) -> Self {
        Self { marker }
    }

    fn is_marker(&self, text: &str) -> bool {
        text.trim_start().starts_with(self.marker)
    }

    /// Anchors for one page, top to bottom. A page without rows yields none.
    pub fn locate(&self, page: usize, spans: &[TextSpan]) -> Vec<Anchor> {
        let mut hits: Vec<(f32, f32)> = spans
            .iter()
            .filter(|span| span.page == page && self.is_marker(&span.text))
            .map(|span| (span.bbox.y0, span.bbox.x0))
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        hits.into_iter().map(|(y0, _)| Anchor { page, y0 }).collect()
    }
}
