use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::core::geometry::BBox;
use crate::core::model::{ReportDocument, TextSpan};
use crate::source::SpanSource;

static BBOX_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)(?P<page><page\b[^>]*>)|<word\s+xMin="(?P<x0>[-\d.]+)"\s+yMin="(?P<y0>[-\d.]+)"\s+xMax="(?P<x1>[-\d.]+)"\s+yMax="(?P<y1>[-\d.]+)"\s*>(?P<text>.*?)</word>"#,
    )
    .expect("word box pattern")
});

/// Word boxes from poppler's `pdftotext -bbox`, already in the top-left frame.
#[derive(Debug, Clone)]
pub struct PdfToTextSource {
    pdftotext: PathBuf,
    pdfinfo: PathBuf,
}

impl Default for PdfToTextSource {
    fn default() -> Self {
        Self {
            pdftotext: PathBuf::from("pdftotext"),
            pdfinfo: PathBuf::from("pdfinfo"),
        }
    }
}

impl PdfToTextSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binaries(mut self, pdftotext: PathBuf, pdfinfo: PathBuf) -> Self {
        self.pdftotext = pdftotext;
        self.pdfinfo = pdfinfo;
        self
    }

    pub fn page_count(&self, pdf_path: &Path) -> Result<usize> {
        let output = Command::new(&self.pdfinfo)
            .arg(pdf_path)
            .output()
            .with_context(|| format!("failed to invoke pdfinfo on {}", pdf_path.display()))?;

        if !output.status.success() {
            anyhow::bail!("pdfinfo failed with status: {}", output.status);
        }
        parse_page_count(&String::from_utf8_lossy(&output.stdout))
            .with_context(|| format!("no page count for {}", pdf_path.display()))
    }

    fn word_boxes(&self, pdf_path: &Path) -> Result<String> {
        let output = Command::new(&self.pdftotext)
            .arg("-bbox")
            .arg(pdf_path)
            .arg("-")
            .output()
            .with_context(|| format!("failed to invoke pdftotext on {}", pdf_path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("pdftotext failed: {stderr}");
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl SpanSource for PdfToTextSource {
    fn load(&self, path: &Path) -> Result<ReportDocument> {
        let expected_pages = self.page_count(path)?;
        let (pages, spans) = parse_bbox_document(&self.word_boxes(path)?)?;
        if pages != expected_pages {
            warn!(
                path = %path.display(),
                pdfinfo = expected_pages,
                pdftotext = pages,
                "page count disagreement"
            );
        }
        debug!(path = %path.display(), pages, spans = spans.len(), "extracted word boxes");

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(ReportDocument {
            name,
            profile: None,
            spans,
        })
    }
}

pub(crate) fn parse_page_count(pdfinfo_stdout: &str) -> Result<usize> {
    for line in pdfinfo_stdout.lines() {
        if let Some(rest) = line.strip_prefix("Pages:") {
            let num_str = rest.trim();
            return num_str
                .parse()
                .with_context(|| {
                    format!("failed to parse page count from 'Pages:' line: {num_str}")
                });
        }
    }
    anyhow::bail!("pdfinfo output did not contain a 'Pages:' line")
}

/// Page count and spans from `-bbox` XHTML. Pages are numbered from 0.
pub(crate) fn parse_bbox_document(xhtml: &str) -> Result<(usize, Vec<TextSpan>)> {
    let mut pages = 0usize;
    let mut spans = Vec::new();

    for caps in BBOX_TOKEN.captures_iter(xhtml) {
        if caps.name("page").is_some() {
            pages += 1;
            continue;
        }
        if pages == 0 {
            anyhow::bail!("word box outside of any <page> element");
        }
        let coord = |name: &str| -> Result<f32> {
            let raw = caps.name(name).map(|m| m.as_str()).unwrap_or_default();
            raw.parse()
                .with_context(|| format!("bad {name} coordinate '{raw}'"))
        };
        let bbox = BBox::new(coord("x0")?, coord("y0")?, coord("x1")?, coord("y1")?);
        let text = caps.name("text").map(|m| m.as_str()).unwrap_or_default();
        spans.push(TextSpan::new(pages - 1, bbox, decode_entities(text)));
    }
    Ok((pages, spans))
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
