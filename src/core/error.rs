use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::core::model::TeamCode;

/// Everything that can go wrong while extracting one report.
///
/// Most variants are recoverable: the affected row or field degrades to an
/// explicit unknown and the error is collected alongside the results.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractError {
    #[error("layout mismatch in {report_id} at page {page}, y0 {y0:.1}: {reason}")]
    LayoutMismatch {
        report_id: String,
        page: usize,
        y0: f32,
        reason: String,
    },

    #[error("no confident team for '{name}' (best score {best_score})")]
    LowConfidenceMatch { name: String, best_score: u8 },

    #[error("'{name}' matches both teams equally (score {score})")]
    AmbiguousMatch { name: String, score: u8 },

    #[error("no roster for {team} in season {season}")]
    MissingRoster { season: String, team: TeamCode },

    #[error("no schedule entry for {away} @ {home} on {}", fmt_date(.date))]
    MissingSchedule {
        away: TeamCode,
        home: TeamCode,
        date: Option<NaiveDate>,
    },

    #[error("malformed report name '{name}': {reason}")]
    MalformedReportName { name: String, reason: String },

    #[error("invalid layout profile {profile}: {reason}")]
    InvalidProfile { profile: String, reason: String },

    #[error("unreadable document '{name}': {reason}")]
    UnreadableDocument { name: String, reason: String },
}

fn fmt_date(date: &Option<NaiveDate>) -> String {
    date.map(|d| d.to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

impl ExtractError {
    /// Fatal errors stop the current document; nothing stops a batch.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExtractError::MalformedReportName { .. }
                | ExtractError::InvalidProfile { .. }
                | ExtractError::UnreadableDocument { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_document_level_errors_are_fatal() {
        let miss = ExtractError::MissingSchedule {
            away: TeamCode::new("GSW"),
            home: TeamCode::new("CLE"),
            date: None,
        };
        assert!(!miss.is_fatal());
        assert!(miss.to_string().contains("unknown date"));

        let unreadable = ExtractError::UnreadableDocument {
            name: "x.pdf".into(),
            reason: "no spans".into(),
        };
        assert!(unreadable.is_fatal());
    }
}
