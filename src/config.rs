// Engine configuration: placeholder scores, tiebreak thresholds, projection
// and simulation parameters. Every field has a default, so an empty TOML
// document yields `EngineConfig::default()`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{
    EXHAUSTIVE_LIMIT, HOME_FIELD_POINTS, MARGIN_STDDEV, MAX_EXHAUSTIVE_LIMIT, MIN_COMMON_OPPONENTS,
    PLACEHOLDER_LOSS_SCORE, PLACEHOLDER_TIE_SCORE, PLACEHOLDER_WIN_SCORE, SIMULATIONS,
};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {source}")]
    Parse { source: toml::de::Error },

    #[error("validation error for field `{field}`: {message}")]
    Validation { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Scores credited to games decided only by a hypothetical selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderScores {
    pub winner: u16,
    pub loser: u16,
    pub tie: u16,
}

impl Default for PlaceholderScores {
    fn default() -> Self {
        PlaceholderScores {
            winner: PLACEHOLDER_WIN_SCORE,
            loser: PLACEHOLDER_LOSS_SCORE,
            tie: PLACEHOLDER_TIE_SCORE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiebreakConfig {
    /// Opponents every member of a tie group must share before the
    /// common-games step is consulted.
    pub min_common_opponents: usize,

    /// Reduce each division to its best club, using the division tie rules,
    /// before breaking a wildcard tie; one slot is filled at a time. This is
    /// the league rulebook procedure. With `false` the whole tied group goes
    /// straight through the wildcard cascade, so division record is never
    /// consulted for wildcard seeding.
    pub wildcard_division_prefilter: bool,
}

impl Default for TiebreakConfig {
    fn default() -> Self {
        TiebreakConfig {
            min_common_opponents: MIN_COMMON_OPPONENTS,
            wildcard_division_prefilter: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Largest number of undecided games enumerated exactly.
    /// Beyond this the projector falls back to win-percentage bounds.
    pub exhaustive_limit: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig {
            exhaustive_limit: EXHAUSTIVE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub simulations: usize,
    pub home_field_points: f64,
    pub margin_stddev: f64,
    /// Fixed seed for reproducible runs; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            simulations: SIMULATIONS,
            home_field_points: HOME_FIELD_POINTS,
            margin_stddev: MARGIN_STDDEV,
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub placeholder_scores: PlaceholderScores,
    pub tiebreak: TiebreakConfig,
    pub projection: ProjectionConfig,
    pub simulation: SimulationConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            toml::from_str(text).map_err(|source| ConfigError::Parse { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let scores = &self.placeholder_scores;
        if scores.winner <= scores.loser {
            return Err(validation(
                "placeholder_scores.winner",
                format!("must exceed loser score {}, got {}", scores.loser, scores.winner),
            ));
        }
        if self.tiebreak.min_common_opponents == 0 {
            return Err(validation("tiebreak.min_common_opponents", "must be at least 1"));
        }
        if self.projection.exhaustive_limit > MAX_EXHAUSTIVE_LIMIT {
            return Err(validation(
                "projection.exhaustive_limit",
                format!(
                    "must be at most {MAX_EXHAUSTIVE_LIMIT}, got {}",
                    self.projection.exhaustive_limit
                ),
            ));
        }
        if self.simulation.simulations == 0 {
            return Err(validation("simulation.simulations", "must be at least 1"));
        }
        let stddev = self.simulation.margin_stddev;
        if !stddev.is_finite() || stddev <= 0.0 {
            return Err(validation(
                "simulation.margin_stddev",
                format!("must be a positive number, got {stddev}"),
            ));
        }
        if !self.simulation.home_field_points.is_finite() {
            return Err(validation("simulation.home_field_points", "must be finite"));
        }
        Ok(())
    }
}

fn validation(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.placeholder_scores.winner, 24);
        assert_eq!(config.placeholder_scores.loser, 17);
        assert_eq!(config.placeholder_scores.tie, 20);
        assert_eq!(config.tiebreak.min_common_opponents, 4);
        assert!(config.tiebreak.wildcard_division_prefilter);
        assert_eq!(config.projection.exhaustive_limit, 6);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let text = r#"
            [tiebreak]
            wildcard_division_prefilter = false

            [simulation]
            simulations = 50
            seed = 7
        "#;
        let config = EngineConfig::from_toml_str(text).unwrap();
        assert!(!config.tiebreak.wildcard_division_prefilter);
        assert_eq!(config.tiebreak.min_common_opponents, 4);
        assert_eq!(config.simulation.simulations, 50);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.margin_stddev, MARGIN_STDDEV);
    }

    #[test]
    fn test_rejects_inverted_placeholder_scores() {
        let text = "[placeholder_scores]\nwinner = 10\nloser = 17\n";
        let err = EngineConfig::from_toml_str(text).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "placeholder_scores.winner"));
    }

    #[test]
    fn test_rejects_non_positive_stddev() {
        let text = "[simulation]\nmargin_stddev = 0.0\n";
        assert!(matches!(
            EngineConfig::from_toml_str(text),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn test_rejects_oversized_exhaustive_limit() {
        let text = "[projection]\nexhaustive_limit = 40\n";
        let err = EngineConfig::from_toml_str(text).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "projection.exhaustive_limit"));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            EngineConfig::from_toml_str("[tiebreak\n"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
