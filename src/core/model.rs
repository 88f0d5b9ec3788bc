use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::geometry::BBox;

/// Canonical three-letter team code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamCode(String);

impl TeamCode {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextSpan {
    pub page: usize,
    pub bbox: BBox,
    pub text: String,
}

impl TextSpan {
    pub fn new(page: usize, bbox: BBox, text: impl Into<String>) -> Self {
        Self {
            page,
            bbox,
            text: text.into(),
        }
    }
}

/// One report's spans, as handed over by a span source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    /// File name or URL the report was published under.
    pub name: String,
    #[serde(default)]
    pub profile: Option<crate::layout::profile::LayoutProfileId>,
    pub spans: Vec<TextSpan>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Anchor {
    pub page: usize,
    pub y0: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Period,
    Clock,
    CallType,
    Committing,
    Disadvantaged,
    Decision,
}

impl FieldName {
    pub const ALL: [FieldName; 6] = [
        FieldName::Period,
        FieldName::Clock,
        FieldName::CallType,
        FieldName::Committing,
        FieldName::Disadvantaged,
        FieldName::Decision,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "number", rename_all = "lowercase")]
pub enum Period {
    Quarter(u8),
    Overtime(u8),
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Quarter(n) => write!(f, "Q{n}"),
            Period::Overtime(n) => write!(f, "OT{n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DecisionKind {
    CorrectCall,
    CorrectNonCall,
    IncorrectCall,
    IncorrectNonCall,
}

impl DecisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::CorrectCall => "CorrectCall",
            DecisionKind::CorrectNonCall => "CorrectNonCall",
            DecisionKind::IncorrectCall => "IncorrectCall",
            DecisionKind::IncorrectNonCall => "IncorrectNonCall",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Away,
    Home,
}

impl TeamSide {
    pub fn other(self) -> Self {
        match self {
            TeamSide::Away => TeamSide::Home,
            TeamSide::Home => TeamSide::Away,
        }
    }
}

/// Review outcome. `side` is the committing team's side and stays `None`
/// until that team is known.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decision {
    pub kind: DecisionKind,
    pub side: Option<TeamSide>,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            Some(TeamSide::Home) => write!(f, "{}-Home", self.kind.as_str()),
            Some(TeamSide::Away) => write!(f, "{}-Away", self.kind.as_str()),
            None => f.write_str(self.kind.as_str()),
        }
    }
}

/// How a player name was (or was not) tied to one of the two teams.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TeamAssignment {
    /// No player named on this side of the play.
    NoPlayer,
    Matched { team: TeamCode, confidence: u8 },
    /// Filled as the complement of the other side of the same row.
    CrossFilled { team: TeamCode },
    Unresolved,
}

impl TeamAssignment {
    pub fn team(&self) -> Option<&TeamCode> {
        match self {
            TeamAssignment::Matched { team, .. } | TeamAssignment::CrossFilled { team } => {
                Some(team)
            }
            TeamAssignment::NoPlayer | TeamAssignment::Unresolved => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, TeamAssignment::Unresolved)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallRecord {
    pub report_id: String,
    pub page: usize,
    pub y0: f32,
    pub period: Period,
    pub clock: String,
    pub call_type: String,
    pub committing_player: String,
    pub committing_team: TeamAssignment,
    pub disadvantaged_player: String,
    pub disadvantaged_team: TeamAssignment,
    pub decision: Option<Decision>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SeasonPhase {
    RegularSeason,
    Playoffs,
}

impl fmt::Display for SeasonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonPhase::RegularSeason => f.write_str("Regular Season"),
            SeasonPhase::Playoffs => f.write_str("Playoffs"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Season {
    /// `year` is the roster key, e.g. `2016-17`.
    Known { year: String, phase: SeasonPhase },
    Unknown,
}

impl Season {
    pub fn year(&self) -> Option<&str> {
        match self {
            Season::Known { year, .. } => Some(year),
            Season::Unknown => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Season::Known { year, phase } => format!("{year} {phase}"),
            Season::Unknown => "UNKNOWN".to_string(),
        }
    }
}

/// Final score of a completed game. Construction rejects ties.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinalScore {
    away: u32,
    home: u32,
}

impl FinalScore {
    pub fn new(away: u32, home: u32) -> Option<Self> {
        (away != home).then_some(Self { away, home })
    }

    pub fn away(&self) -> u32 {
        self.away
    }

    pub fn home(&self) -> u32 {
        self.home
    }

    pub fn winning_side(&self) -> TeamSide {
        if self.away > self.home {
            TeamSide::Away
        } else {
            TeamSide::Home
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameReport {
    pub report_id: String,
    pub away_team: TeamCode,
    pub home_team: TeamCode,
    pub date: Option<NaiveDate>,
    pub season: Season,
    score: Option<FinalScore>,
}

impl GameReport {
    pub fn new(
        report_id: String,
        away_team: TeamCode,
        home_team: TeamCode,
        date: Option<NaiveDate>,
        season: Season,
    ) -> Self {
        Self {
            report_id,
            away_team,
            home_team,
            date,
            season,
            score: None,
        }
    }

    pub fn team(&self, side: TeamSide) -> &TeamCode {
        match side {
            TeamSide::Away => &self.away_team,
            TeamSide::Home => &self.home_team,
        }
    }

    pub fn side_of(&self, team: &TeamCode) -> Option<TeamSide> {
        if *team == self.away_team {
            Some(TeamSide::Away)
        } else if *team == self.home_team {
            Some(TeamSide::Home)
        } else {
            None
        }
    }

    /// The single enrichment step. Returns false if a score was already set.
    pub fn apply_final_score(&mut self, score: FinalScore) -> bool {
        if self.score.is_some() {
            return false;
        }
        self.score = Some(score);
        true
    }

    pub fn away_score(&self) -> Option<u32> {
        self.score.map(|s| s.away())
    }

    pub fn home_score(&self) -> Option<u32> {
        self.score.map(|s| s.home())
    }

    pub fn winner(&self) -> Option<&TeamCode> {
        self.score.map(|s| self.team(s.winning_side()))
    }
}

/// Best roster candidate for a raw name on one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub candidate_name: String,
    pub team: TeamCode,
    pub confidence: u8,
}
