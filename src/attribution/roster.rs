use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::core::error::ExtractError;
use crate::core::model::TeamCode;
use crate::metadata::teams::canonical_team;

/// One `(season, team, player)` triple from the roster collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterEntry {
    pub season: String,
    pub team: String,
    pub player: String,
}

/// Immutable `(season, team) -> players` snapshot, built once per batch.
#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    teams: BTreeMap<(String, TeamCode), BTreeSet<String>>,
}

#[derive(Debug, Default)]
pub struct RosterBuilder {
    teams: BTreeMap<(String, TeamCode), BTreeSet<String>>,
}

impl RosterBuilder {
    pub fn add(&mut self, season: &str, team: &str, player: &str) -> &mut Self {
        if let Some(name) = clean_player_name(player) {
            self.teams
                .entry((season.trim().to_string(), canonical_team(team)))
                .or_default()
                .insert(name);
        }
        self
    }

    pub fn build(self) -> RosterIndex {
        debug!(teams = self.teams.len(), "roster index built");
        RosterIndex { teams: self.teams }
    }
}

impl RosterIndex {
    pub fn builder() -> RosterBuilder {
        RosterBuilder::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = RosterEntry>,
    {
        let mut builder = Self::builder();
        for entry in entries {
            builder.add(&entry.season, &entry.team, &entry.player);
        }
        builder.build()
    }

    /// Nested `season -> team -> [player]` form.
    pub fn from_seasons(seasons: &BTreeMap<String, BTreeMap<String, Vec<String>>>) -> Self {
        let mut builder = Self::builder();
        for (season, teams) in seasons {
            for (team, players) in teams {
                for player in players {
                    builder.add(season, team, player);
                }
            }
        }
        builder.build()
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read roster {}", path.display()))?;
        let seasons: BTreeMap<String, BTreeMap<String, Vec<String>>> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse roster {}", path.display()))?;
        Ok(Self::from_seasons(&seasons))
    }

    /// Players of `team` in `season`; absence is reported, not assumed empty.
    pub fn players(
        &self,
        season: &str,
        team: &TeamCode,
    ) -> Result<&BTreeSet<String>, ExtractError> {
        self.teams
            .get(&(season.to_string(), team.clone()))
            .ok_or_else(|| ExtractError::MissingRoster {
                season: season.to_string(),
                team: team.clone(),
            })
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Drops the `\slug` suffix some roster exports append to names.
fn clean_player_name(raw: &str) -> Option<String> {
    let name = raw.split('\\').next().unwrap_or_default().trim();
    (!name.is_empty()).then(|| name.to_string())
}
