pub mod report_name;
pub mod schedule;
pub mod season;
pub mod teams;

use tracing::{debug, warn};

use crate::core::error::ExtractError;
use crate::core::model::GameReport;

pub use report_name::{parse_report_name, ReportName};
pub use schedule::{ScheduleEntry, ScheduleIndex};
pub use season::{SeasonRange, SeasonTable};
pub use teams::{canonical_team, is_canonical};

/// Builds a `GameReport` from a report's published name and later joins
/// it with the schedule for the final score.
#[derive(Debug, Clone, Copy)]
pub struct GameMetadataResolver<'a> {
    seasons: &'a SeasonTable,
    schedule: &'a ScheduleIndex,
}

impl<'a> GameMetadataResolver<'a> {
    pub fn new(seasons: &'a SeasonTable, schedule: &'a ScheduleIndex) -> Self {
        Self { seasons, schedule }
    }

    /// Report with teams, date and season; score and winner start unknown.
    pub fn resolve(&self, name: &str) -> Result<GameReport, ExtractError> {
        let parsed = parse_report_name(name)?;
        for team in [&parsed.away, &parsed.home] {
            if !is_canonical(team) {
                warn!(
                    report = %parsed.report_id,
                    team = %team,
                    "team code outside the current franchise set"
                );
            }
        }
        let season = self.seasons.season_for(parsed.date);
        debug!(report = %parsed.report_id, season = %season.label(), "parsed report name");
        Ok(GameReport::new(
            parsed.report_id,
            parsed.away,
            parsed.home,
            parsed.date,
            season,
        ))
    }

    /// Fill score and winner from the schedule, or report the miss.
    pub fn enrich(&self, report: &mut GameReport) -> Result<(), ExtractError> {
        let missing = || ExtractError::MissingSchedule {
            away: report.away_team.clone(),
            home: report.home_team.clone(),
            date: report.date,
        };
        let score = report
            .date
            .and_then(|date| self.schedule.lookup(&report.away_team, &report.home_team, date))
            .ok_or_else(missing)?;

        if !report.apply_final_score(score) {
            debug!(report = %report.report_id, "final score already set");
        }
        Ok(())
    }

    /// `resolve` followed by `enrich`, collecting a schedule miss instead of
    /// failing.
    pub fn resolve_enriched(
        &self,
        name: &str,
        issues: &mut Vec<ExtractError>,
    ) -> Result<GameReport, ExtractError> {
        let mut report = self.resolve(name)?;
        if let Err(miss) = self.enrich(&mut report) {
            warn!(report = %report.report_id, error = %miss, "schedule join failed");
            issues.push(miss);
        }
        Ok(report)
    }
}
