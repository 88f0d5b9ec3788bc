use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::model::{FinalScore, TeamCode};
use crate::metadata::teams::canonical_team;

/// One completed game from the schedule collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    #[serde(alias = "awayTeam")]
    pub away_team: String,
    #[serde(alias = "homeTeam")]
    pub home_team: String,
    #[serde(alias = "awayScore")]
    pub away_score: u32,
    #[serde(alias = "homeScore")]
    pub home_score: u32,
}

type GameKey = (TeamCode, TeamCode, NaiveDate);

/// Read-only schedule snapshot keyed for an exact `(away, home, date)` join.
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    games: HashMap<GameKey, FinalScore>,
}

impl ScheduleIndex {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ScheduleEntry>,
    {
        let mut games = HashMap::new();
        for entry in entries {
            let key = (
                canonical_team(&entry.away_team),
                canonical_team(&entry.home_team),
                entry.date,
            );
            let Some(score) = FinalScore::new(entry.away_score, entry.home_score) else {
                warn!(
                    away = %key.0,
                    home = %key.1,
                    date = %key.2,
                    "skipping schedule row with tied score"
                );
                continue;
            };
            if let Some(previous) = games.insert(key.clone(), score) {
                if previous != score {
                    warn!(
                        away = %key.0,
                        home = %key.1,
                        date = %key.2,
                        "conflicting schedule rows, keeping the last"
                    );
                }
            }
        }
        debug!(games = games.len(), "schedule index built");
        Self { games }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read schedule {}", path.display()))?;
        let entries: Vec<ScheduleEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse schedule {}", path.display()))?;
        Ok(Self::from_entries(entries))
    }

    pub fn lookup(&self, away: &TeamCode, home: &TeamCode, date: NaiveDate) -> Option<FinalScore> {
        self.games.get(&(away.clone(), home.clone(), date)).copied()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
