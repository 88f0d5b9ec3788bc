use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::attribution::{RosterIndex, StringSimilarity, TeamAttributor, WeightedRatio};
use crate::core::config::ExtractionConfig;
use crate::core::error::ExtractError;
use crate::core::model::{CallRecord, GameReport, ReportDocument};
use crate::layout::{AnchorLocator, ColumnExtractor, LayoutProfile, LayoutProfileId, RowFilter};
use crate::metadata::{GameMetadataResolver, ScheduleIndex, SeasonTable};
use crate::source::SpanSource;

/// Everything extracted from one report, with its recoverable issues.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DocumentResult {
    pub report: GameReport,
    pub profile: LayoutProfileId,
    pub calls: Vec<CallRecord>,
    pub errors: Vec<ExtractError>,
}

/// A document that could not be processed at all.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DocumentFailure {
    pub name: String,
    pub error: ExtractError,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Extracted(DocumentResult),
    Failed(DocumentFailure),
}

/// Per-document outcomes in input order.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BatchOutcome {
    pub documents: Vec<DocumentOutcome>,
}

impl BatchOutcome {
    pub fn extracted(&self) -> impl Iterator<Item = &DocumentResult> {
        self.documents.iter().filter_map(|d| match d {
            DocumentOutcome::Extracted(result) => Some(result),
            DocumentOutcome::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &DocumentFailure> {
        self.documents.iter().filter_map(|d| match d {
            DocumentOutcome::Failed(failure) => Some(failure),
            DocumentOutcome::Extracted(_) => None,
        })
    }
}

/// Runs locate, slice, filter, attribute and enrich over report documents.
///
/// Roster, season table and schedule are read-only snapshots shared by
/// every document of a batch.
pub struct ExtractionPipeline {
    config: ExtractionConfig,
    roster: RosterIndex,
    seasons: SeasonTable,
    schedule: ScheduleIndex,
    similarity: Box<dyn StringSimilarity>,
}

impl ExtractionPipeline {
    pub fn new(config: ExtractionConfig, roster: RosterIndex, schedule: ScheduleIndex) -> Self {
        Self {
            config,
            roster,
            seasons: SeasonTable::default(),
            schedule,
            similarity: Box::new(WeightedRatio),
        }
    }

    pub fn with_seasons(mut self, seasons: SeasonTable) -> Self {
        self.seasons = seasons;
        self
    }

    pub fn with_similarity(mut self, similarity: Box<dyn StringSimilarity>) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract one report. `Err` only for document-scoped fatal errors.
    pub fn process(&self, doc: &ReportDocument) -> Result<DocumentResult, ExtractError> {
        let unreadable = |reason: String| ExtractError::UnreadableDocument {
            name: doc.name.clone(),
            reason,
        };
        if doc.spans.is_empty() {
            return Err(unreadable("no text spans".to_string()));
        }
        if doc.spans.len() > self.config.max_spans_per_document {
            return Err(unreadable(format!(
                "{} spans exceeds the limit of {}",
                doc.spans.len(),
                self.config.max_spans_per_document
            )));
        }

        let mut errors = Vec::new();
        let resolver = GameMetadataResolver::new(&self.seasons, &self.schedule);
        let report = resolver.resolve_enriched(&doc.name, &mut errors)?;

        let profile_id = self
            .config
            .profile_override
            .or(doc.profile)
            .unwrap_or_else(|| LayoutProfileId::for_date(report.date));
        let profile = LayoutProfile::for_id(profile_id);
        profile.validate()?;

        let locator = AnchorLocator::new(&profile.anchor_marker);
        let extractor = ColumnExtractor::new(&profile);
        let filter = RowFilter::new();
        let attributor = TeamAttributor::new(&self.roster, self.similarity.as_ref(), &self.config);

        let pages: BTreeSet<usize> = doc.spans.iter().map(|s| s.page).collect();
        let mut calls = Vec::new();
        for page in pages {
            for anchor in locator.locate(page, &doc.spans) {
                let row = extractor.extract(anchor, &doc.spans);
                match filter.admit(&report.report_id, &row) {
                    Ok(Some(draft)) => {
                        calls.push(attributor.attribute_row(draft, &report, &mut errors));
                    }
                    Ok(None) => {
                        debug!(
                            report = %report.report_id,
                            page,
                            y0 = anchor.y0,
                            "skipping non-data row"
                        );
                    }
                    Err(err) => {
                        warn!(
                            report = %report.report_id,
                            page,
                            y0 = anchor.y0,
                            error = %err,
                            "dropping row"
                        );
                        errors.push(err);
                    }
                }
            }
        }
        calls.sort_by(|a, b| a.page.cmp(&b.page).then(a.y0.total_cmp(&b.y0)));

        let errors = dedup(errors);
        info!(
            report = %report.report_id,
            profile = profile_id.name(),
            calls = calls.len(),
            errors = errors.len(),
            "report extracted"
        );
        Ok(DocumentResult {
            report,
            profile: profile_id,
            calls,
            errors,
        })
    }

    /// Extract many reports in parallel. A failing or panicking document
    /// never affects the others.
    pub fn process_batch(&self, docs: &[ReportDocument]) -> BatchOutcome {
        let documents = docs
            .par_iter()
            .map(|doc| self.process_isolated(&doc.name, || Ok(doc), |doc| self.process(doc)))
            .collect();
        BatchOutcome { documents }
    }

    /// Load each path through `source`, then extract it.
    pub fn load_and_process<S>(&self, source: &S, paths: &[PathBuf]) -> BatchOutcome
    where
        S: SpanSource + Sync,
    {
        let documents = paths
            .par_iter()
            .map(|path| {
                let name = path.display().to_string();
                let load = || {
                    source.load(path).map_err(|err| ExtractError::UnreadableDocument {
                        name: name.clone(),
                        reason: format!("{err:#}"),
                    })
                };
                self.process_isolated(&name, load, |doc| self.process(&doc))
            })
            .collect();
        BatchOutcome { documents }
    }

    fn process_isolated<D, L, P>(&self, name: &str, load: L, run: P) -> DocumentOutcome
    where
        L: FnOnce() -> Result<D, ExtractError>,
        P: FnOnce(D) -> Result<DocumentResult, ExtractError>,
    {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| load().and_then(run)));
        let result = outcome.unwrap_or_else(|payload| {
            Err(ExtractError::UnreadableDocument {
                name: name.to_string(),
                reason: format!("extraction panicked: {}", panic_message(payload.as_ref())),
            })
        });
        match result {
            Ok(result) => DocumentOutcome::Extracted(result),
            Err(error) => {
                warn!(report = name, error = %error, "document failed");
                DocumentOutcome::Failed(DocumentFailure {
                    name: name.to_string(),
                    error,
                })
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Collapses repeats of document-level lookups (a missing roster repeats
/// once per row). Row-level issues stay itemized.
fn dedup(errors: Vec<ExtractError>) -> Vec<ExtractError> {
    let mut kept: Vec<ExtractError> = Vec::with_capacity(errors.len());
    for err in errors {
        let document_level = matches!(
            err,
            ExtractError::MissingRoster { .. } | ExtractError::MissingSchedule { .. }
        );
        if !(document_level && kept.contains(&err)) {
            kept.push(err);
        }
    }
    kept
}
