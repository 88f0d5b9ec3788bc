use tracing::{debug, warn};

use crate::attribution::roster::RosterIndex;
use crate::attribution::similarity::{normalize_name, StringSimilarity};
use crate::core::confidence::meets_threshold;
use crate::core::config::{CrossFillPolicy, ExtractionConfig, TieBreakPolicy};
use crate::core::error::ExtractError;
use crate::core::model::{
    CallRecord, Decision, GameReport, MatchResult, TeamAssignment, TeamCode, TeamSide,
};
use crate::layout::row_filter::CallDraft;

/// Attribution for one name plus whatever went wrong getting there.
#[derive(Debug, Clone, PartialEq)]
pub struct SideOutcome {
    pub assignment: TeamAssignment,
    pub issues: Vec<ExtractError>,
}

impl SideOutcome {
    fn clean(assignment: TeamAssignment) -> Self {
        Self {
            assignment,
            issues: Vec::new(),
        }
    }

    fn unresolved(issues: Vec<ExtractError>) -> Self {
        Self {
            assignment: TeamAssignment::Unresolved,
            issues,
        }
    }
}

/// Names made only of punctuation or whitespace mean "no player".
pub fn is_blank(raw: &str) -> bool {
    normalize_name(raw).is_empty()
}

/// Decides which of a game's two teams a free-text player name belongs to.
pub struct TeamAttributor<'a> {
    roster: &'a RosterIndex,
    similarity: &'a dyn StringSimilarity,
    threshold: u8,
    tie_break: TieBreakPolicy,
    cross_fill: CrossFillPolicy,
}

impl<'a> TeamAttributor<'a> {
    pub fn new(
        roster: &'a RosterIndex,
        similarity: &'a dyn StringSimilarity,
        config: &ExtractionConfig,
    ) -> Self {
        Self {
            roster,
            similarity,
            threshold: config.confidence_threshold,
            tie_break: config.tie_break,
            cross_fill: config.cross_fill,
        }
    }

    /// Highest-scoring roster name for `team`; `Ok(None)` for an empty roster.
    pub fn best_match(
        &self,
        raw: &str,
        season: &str,
        team: &TeamCode,
    ) -> Result<Option<MatchResult>, ExtractError> {
        let players = self.roster.players(season, team)?;
        let mut best: Option<MatchResult> = None;
        for name in players {
            let confidence = self.similarity.score(raw, name);
            if best.as_ref().map_or(true, |b| confidence > b.confidence) {
                best = Some(MatchResult {
                    candidate_name: name.clone(),
                    team: team.clone(),
                    confidence,
                });
            }
        }
        Ok(best)
    }

    pub fn attribute(&self, raw: &str, report: &GameReport) -> SideOutcome {
        if is_blank(raw) {
            return SideOutcome::clean(TeamAssignment::NoPlayer);
        }

        let season = report.season.year().unwrap_or("UNKNOWN");
        let lookups = [
            self.best_match(raw, season, &report.away_team),
            self.best_match(raw, season, &report.home_team),
        ];

        let missing: Vec<ExtractError> = lookups
            .iter()
            .filter_map(|l| l.as_ref().err().cloned())
            .collect();
        if !missing.is_empty() {
            for err in &missing {
                warn!(report = %report.report_id, error = %err, "roster lookup failed");
            }
            return SideOutcome::unresolved(missing);
        }

        let score = |idx: usize| match &lookups[idx] {
            Ok(Some(m)) => m.confidence,
            _ => 0,
        };
        let (away, home) = (score(0), score(1));
        let best = away.max(home);

        if !meets_threshold(best, self.threshold) {
            debug!(name = raw, best, "no confident roster match");
            return SideOutcome::unresolved(vec![ExtractError::LowConfidenceMatch {
                name: raw.to_string(),
                best_score: best,
            }]);
        }

        let side = if away > home {
            TeamSide::Away
        } else if home > away {
            TeamSide::Home
        } else {
            match self.tie_break {
                TieBreakPolicy::PreferAway => TeamSide::Away,
                TieBreakPolicy::PreferHome => TeamSide::Home,
                TieBreakPolicy::Unresolved => {
                    debug!(name = raw, score = best, "name matches both rosters equally");
                    return SideOutcome::unresolved(vec![ExtractError::AmbiguousMatch {
                        name: raw.to_string(),
                        score: best,
                    }]);
                }
            }
        };

        SideOutcome::clean(TeamAssignment::Matched {
            team: report.team(side).clone(),
            confidence: best,
        })
    }

    /// Attribute both names of a row and finish it as a `CallRecord`.
    pub fn attribute_row(
        &self,
        draft: CallDraft,
        report: &GameReport,
        issues: &mut Vec<ExtractError>,
    ) -> CallRecord {
        let committing = self.attribute(&draft.committing_player, report);
        let disadvantaged = self.attribute(&draft.disadvantaged_player, report);
        issues.extend(committing.issues);
        issues.extend(disadvantaged.issues);

        let (committing_team, disadvantaged_team) =
            self.apply_cross_fill(committing.assignment, disadvantaged.assignment, report);

        let decision = draft.decision.map(|kind| Decision {
            kind,
            side: committing_team.team().and_then(|t| report.side_of(t)),
        });

        CallRecord {
            report_id: report.report_id.clone(),
            page: draft.page,
            y0: draft.y0,
            period: draft.period,
            clock: draft.clock,
            call_type: draft.call_type,
            committing_player: draft.committing_player,
            committing_team,
            disadvantaged_player: draft.disadvantaged_player,
            disadvantaged_team,
            decision,
        }
    }

    fn apply_cross_fill(
        &self,
        committing: TeamAssignment,
        disadvantaged: TeamAssignment,
        report: &GameReport,
    ) -> (TeamAssignment, TeamAssignment) {
        if self.cross_fill == CrossFillPolicy::Disabled {
            return (committing, disadvantaged);
        }
        let complement = |resolved: &TeamAssignment| match resolved {
            TeamAssignment::Matched { team, .. } => report.side_of(team).map(|side| {
                TeamAssignment::CrossFilled {
                    team: report.team(side.other()).clone(),
                }
            }),
            _ => None,
        };
        if committing.is_unresolved() {
            if let Some(filled) = complement(&disadvantaged) {
                return (filled, disadvantaged);
            }
        } else if disadvantaged.is_unresolved() {
            if let Some(filled) = complement(&committing) {
                return (committing, filled);
            }
        }
        (committing, disadvantaged)
    }
}
