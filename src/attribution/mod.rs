pub mod resolve;
pub mod roster;
pub mod similarity;

pub use resolve::{SideOutcome, TeamAttributor};
pub use roster::{RosterEntry, RosterIndex};
pub use similarity::{JaroWinkler, Levenshtein, StringSimilarity, TokenSetRatio, WeightedRatio};
