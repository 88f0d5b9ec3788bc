use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::confidence::CONFIDENCE_THRESHOLD;
use crate::layout::profile::LayoutProfileId;

/// What to do when a name scores equally (above threshold) on both rosters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakPolicy {
    #[default]
    Unresolved,
    PreferAway,
    PreferHome,
}

/// Whether an unresolved side of a row may take the team opposite the
/// resolved side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrossFillPolicy {
    #[default]
    Disabled,
    Complement,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    pub confidence_threshold: u8,
    pub tie_break: TieBreakPolicy,
    pub cross_fill: CrossFillPolicy,
    /// Documents with more spans than this are rejected as unreadable.
    pub max_spans_per_document: usize,
    pub profile_override: Option<LayoutProfileId>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: CONFIDENCE_THRESHOLD,
            tie_break: TieBreakPolicy::default(),
            cross_fill: CrossFillPolicy::default(),
            max_spans_per_document: 50_000,
            profile_override: None,
        }
    }
}

impl ExtractionConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        if config.confidence_threshold > 100 {
            anyhow::bail!(
                "confidence_threshold must be within 0..=100, got {}",
                config.confidence_threshold
            );
        }
        Ok(config)
    }

    pub fn with_tie_break(mut self, tie_break: TieBreakPolicy) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_cross_fill(mut self, cross_fill: CrossFillPolicy) -> Self {
        self.cross_fill = cross_fill;
        self
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.confidence_threshold = threshold.min(100);
        self
    }

    pub fn with_profile_override(mut self, profile: LayoutProfileId) -> Self {
        self.profile_override = Some(profile);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() -> Result<()> {
        let config: ExtractionConfig =
            serde_json::from_str(r#"{ "cross_fill": "complement", "tie_break": "prefer_home" }"#)?;
        assert_eq!(config.cross_fill, CrossFillPolicy::Complement);
        assert_eq!(config.tie_break, TieBreakPolicy::PreferHome);
        assert_eq!(config.confidence_threshold, 50);
        assert_eq!(config.profile_override, None);
        Ok(())
    }

    #[test]
    fn reads_config_file() -> Result<()> {
        let mut path = std::env::temp_dir();
        path.push(format!("refreport-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "confidence_threshold": 80, "profile_override": "gen2017" }"#)?;

        let config = ExtractionConfig::from_json_file(&path)?;
        assert_eq!(config.confidence_threshold, 80);
        assert_eq!(config.profile_override, Some(LayoutProfileId::Gen2017));

        let _ = fs::remove_file(&path);
        Ok(())
    }

    #[test]
    fn rejects_out_of_range_threshold() -> Result<()> {
        let mut path = std::env::temp_dir();
        path.push(format!("refreport-config-bad-{}.json", std::process::id()));
        fs::write(&path, r#"{ "confidence_threshold": 120 }"#)?;
        assert!(ExtractionConfig::from_json_file(&path).is_err());
        let _ = fs::remove_file(&path);
        Ok(())
    }
}
