use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::model::{Season, SeasonPhase};

/// Calendar date for table constants; out-of-range input falls back to the epoch.
pub(crate) fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// `(start, end]`: the start day belongs to the previous range.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeasonRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub year: String,
    pub phase: SeasonPhase,
}

impl SeasonRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date > self.start && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonTable {
    ranges: Vec<SeasonRange>,
}

impl SeasonTable {
    pub fn new(mut ranges: Vec<SeasonRange>) -> Self {
        ranges.sort_by_key(|r| r.start);
        Self { ranges }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read season table {}", path.display()))?;
        let ranges: Vec<SeasonRange> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse season table {}", path.display()))?;
        Ok(Self::new(ranges))
    }

    /// Regular seasons and playoffs from 2014-15 through 2018-19.
    pub fn nba_default() -> Self {
        let seasons = [
            ("2014-15", (2014, 9, 1), (2015, 4, 15), (2015, 9, 1)),
            ("2015-16", (2015, 9, 1), (2016, 4, 13), (2016, 9, 1)),
            ("2016-17", (2016, 9, 1), (2017, 4, 13), (2017, 9, 1)),
            ("2017-18", (2017, 9, 1), (2018, 4, 11), (2018, 9, 1)),
            ("2018-19", (2018, 9, 1), (2019, 4, 10), (2019, 9, 1)),
        ];
        let mut ranges = Vec::with_capacity(seasons.len() * 2);
        for (year, (sy, sm, sd), (ry, rm, rd), (py, pm, pd)) in seasons {
            let regular_end = ymd(ry, rm, rd);
            ranges.push(SeasonRange {
                start: ymd(sy, sm, sd),
                end: regular_end,
                year: year.to_string(),
                phase: SeasonPhase::RegularSeason,
            });
            ranges.push(SeasonRange {
                start: regular_end,
                end: ymd(py, pm, pd),
                year: year.to_string(),
                phase: SeasonPhase::Playoffs,
            });
        }
        Self::new(ranges)
    }

    pub fn season_for(&self, date: Option<NaiveDate>) -> Season {
        date.and_then(|d| self.ranges.iter().find(|r| r.contains(d)))
            .map(|r| Season::Known {
                year: r.year.clone(),
                phase: r.phase,
            })
            .unwrap_or(Season::Unknown)
    }
}

impl Default for SeasonTable {
    fn default() -> Self {
        Self::nba_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn label(date: Option<NaiveDate>) -> String {
        SeasonTable::default().season_for(date).label()
    }

    #[test]
    fn playoff_boundary_is_exclusive_of_start() {
        assert_eq!(label(NaiveDate::from_ymd_opt(2017, 4, 14)), "2016-17 Playoffs");
        assert_eq!(label(NaiveDate::from_ymd_opt(2017, 4, 13)), "2016-17 Regular Season");
    }

    #[test]
    fn maps_regular_season_dates() {
        assert_eq!(label(NaiveDate::from_ymd_opt(2015, 1, 20)), "2014-15 Regular Season");
        assert_eq!(label(NaiveDate::from_ymd_opt(2016, 6, 2)), "2015-16 Playoffs");
    }

    #[test]
    fn dates_outside_the_table_are_unknown() {
        assert_eq!(label(NaiveDate::from_ymd_opt(2012, 1, 1)), "UNKNOWN");
        assert_eq!(label(NaiveDate::from_ymd_opt(2030, 1, 1)), "UNKNOWN");
        assert_eq!(label(None), "UNKNOWN");
    }

    #[test]
    fn custom_table_from_json() -> Result<()> {
        let mut path = std::env::temp_dir();
        path.push(format!("refreport-seasons-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"[{ "start": "2017-04-13", "end": "2017-06-30", "year": "2016-17", "phase": "Playoffs" }]"#,
        )?;
        let table = SeasonTable::from_json_file(&path)?;
        let season = table.season_for(NaiveDate::from_ymd_opt(2017, 4, 14));
        assert_eq!(season.label(), "2016-17 Playoffs");
        let _ = fs::remove_file(&path);
        Ok(())
    }
}
