use chrono::NaiveDate;
use serde::Serialize;

use crate::core::error::ExtractError;
use crate::core::model::{CallRecord, Decision, GameReport, TeamAssignment, TeamSide};
use crate::pipeline::{BatchOutcome, DocumentOutcome};

pub const UNRESOLVED: &str = "UNRESOLVED";
pub const UNKNOWN: &str = "UNKNOWN";

/// Row of the `reports` table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportRow {
    pub report_id: String,
    pub away: String,
    pub home: String,
    pub date: Option<NaiveDate>,
    pub season: String,
    pub away_score: Option<u32>,
    pub home_score: Option<u32>,
    pub winner: String,
}

impl From<&GameReport> for ReportRow {
    fn from(report: &GameReport) -> Self {
        Self {
            report_id: report.report_id.clone(),
            away: report.away_team.to_string(),
            home: report.home_team.to_string(),
            date: report.date,
            season: report.season.label(),
            away_score: report.away_score(),
            home_score: report.home_score(),
            winner: report
                .winner()
                .map_or_else(|| UNKNOWN.to_string(), |t| t.to_string()),
        }
    }
}

/// Row of the `calls` table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CallRow {
    pub report_id: String,
    pub period: String,
    pub clock: String,
    pub call_type: String,
    pub committing_player: String,
    pub committing_team: String,
    pub disadvantaged_player: String,
    pub disadvantaged_team: String,
    /// Full `Kind-Side` label, empty unless the side is known.
    pub decision: String,
    pub decision_kind: String,
    /// `Home`, `Away`, `UNRESOLVED` when the committing side is unknown,
    /// or empty when the row has no decision.
    pub decision_side: String,
}

/// Team column text: the code, `UNRESOLVED`, or empty when nobody was named.
pub fn team_cell(assignment: &TeamAssignment) -> String {
    match assignment {
        TeamAssignment::Matched { team, .. } | TeamAssignment::CrossFilled { team } => {
            team.to_string()
        }
        TeamAssignment::Unresolved => UNRESOLVED.to_string(),
        TeamAssignment::NoPlayer => String::new(),
    }
}

fn decision_cells(decision: Option<Decision>) -> (String, String, String) {
    let Some(decision) = decision else {
        return Default::default();
    };
    let kind = decision.kind.as_str().to_string();
    match decision.side {
        Some(side) => {
            let side = match side {
                TeamSide::Home => "Home",
                TeamSide::Away => "Away",
            };
            (decision.to_string(), kind, side.to_string())
        }
        None => (String::new(), kind, UNRESOLVED.to_string()),
    }
}

impl From<&CallRecord> for CallRow {
    fn from(call: &CallRecord) -> Self {
        let (decision, decision_kind, decision_side) = decision_cells(call.decision);
        Self {
            report_id: call.report_id.clone(),
            period: call.period.to_string(),
            clock: call.clock.clone(),
            call_type: call.call_type.clone(),
            committing_player: call.committing_player.clone(),
            committing_team: team_cell(&call.committing_team),
            disadvantaged_player: call.disadvantaged_player.clone(),
            disadvantaged_team: team_cell(&call.disadvantaged_team),
            decision,
            decision_kind,
            decision_side,
        }
    }
}

/// One collected issue, tagged with the document it came from.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorRow {
    pub document: String,
    pub fatal: bool,
    pub message: String,
    #[serde(flatten)]
    pub detail: ExtractError,
}

impl ErrorRow {
    fn new(document: &str, error: &ExtractError) -> Self {
        Self {
            document: document.to_string(),
            fatal: error.is_fatal(),
            message: error.to_string(),
            detail: error.clone(),
        }
    }
}

pub fn report_rows(batch: &BatchOutcome) -> Vec<ReportRow> {
    batch.extracted().map(|r| ReportRow::from(&r.report)).collect()
}

pub fn call_rows(batch: &BatchOutcome) -> Vec<CallRow> {
    batch
        .extracted()
        .flat_map(|r| r.calls.iter().map(CallRow::from))
        .collect()
}

pub fn error_rows(batch: &BatchOutcome) -> Vec<ErrorRow> {
    let mut rows = Vec::new();
    for outcome in &batch.documents {
        match outcome {
            DocumentOutcome::Extracted(result) => rows.extend(
                result
                    .errors
                    .iter()
                    .map(|e| ErrorRow::new(&result.report.report_id, e)),
            ),
            DocumentOutcome::Failed(failure) => {
                rows.push(ErrorRow::new(&failure.name, &failure.error))
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{DecisionKind, Period, Season, TeamCode};
    use pretty_assertions::assert_eq;

    fn call(committing: TeamAssignment, disadvantaged: TeamAssignment) -> CallRecord {
        CallRecord {
            report_id: "L2M-CLE-GSW-06-02-16".to_string(),
            page: 0,
            y0: 100.0,
            period: Period::Overtime(1),
            clock: "0:04".to_string(),
            call_type: "Foul: Shooting".to_string(),
            committing_player: "Curry".to_string(),
            committing_team: committing,
            disadvantaged_player: String::new(),
            disadvantaged_team: disadvantaged,
            decision: Some(Decision {
                kind: DecisionKind::CorrectCall,
                side: Some(TeamSide::Home),
            }),
        }
    }

    #[test]
    fn call_row_renders_sentinels() {
        let row = CallRow::from(&call(TeamAssignment::Unresolved, TeamAssignment::NoPlayer));
        assert_eq!(row.committing_team, "UNRESOLVED");
        assert_eq!(row.disadvantaged_team, "");
        assert_eq!(row.period, "OT1");
        assert_eq!(row.decision, "CorrectCall-Home");
        assert_eq!(row.decision_kind, "CorrectCall");
        assert_eq!(row.decision_side, "Home");

        let row = CallRow::from(&call(
            TeamAssignment::Matched {
                team: TeamCode::new("GSW"),
                confidence: 95,
            },
            TeamAssignment::CrossFilled {
                team: TeamCode::new("CLE"),
            },
        ));
        assert_eq!(row.committing_team, "GSW");
        assert_eq!(row.disadvantaged_team, "CLE");
    }

    #[test]
    fn unknown_side_is_spelled_out_not_guessed() {
        let mut unsided = call(TeamAssignment::Unresolved, TeamAssignment::NoPlayer);
        unsided.decision = Some(Decision {
            kind: DecisionKind::IncorrectNonCall,
            side: None,
        });
        let row = CallRow::from(&unsided);
        assert_eq!(row.decision, "");
        assert_eq!(row.decision_kind, "IncorrectNonCall");
        assert_eq!(row.decision_side, "UNRESOLVED");

        unsided.decision = None;
        let row = CallRow::from(&unsided);
        assert_eq!(
            (row.decision, row.decision_kind, row.decision_side),
            (String::new(), String::new(), String::new())
        );
    }

    #[test]
    fn report_row_without_schedule_is_unknown() {
        let report = GameReport::new(
            "L2M-CLE-GSW-06-02-16".to_string(),
            TeamCode::new("CLE"),
            TeamCode::new("GSW"),
            NaiveDate::from_ymd_opt(2016, 6, 2),
            Season::Unknown,
        );
        let row = ReportRow::from(&report);
        assert_eq!(row.winner, "UNKNOWN");
        assert_eq!(row.season, "UNKNOWN");
        assert_eq!(row.away_score, None);
    }

    #[test]
    fn error_row_flattens_detail() -> anyhow::Result<()> {
        let row = ErrorRow::new(
            "L2M-CLE-GSW-06-02-16",
            &ExtractError::LowConfidenceMatch {
                name: "Xyz Unknown".to_string(),
                best_score: 31,
            },
        );
        let json = serde_json::to_value(&row)?;
        assert_eq!(json["kind"], "low_confidence_match");
        assert_eq!(json["best_score"], 31);
        assert_eq!(json["fatal"], false);
        Ok(())
    }
}
