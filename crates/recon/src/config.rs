use serde::Deserialize;

use crate::error::ReconError;
use crate::matcher::{Ratio, Scorer, TokenSortRatio};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RollcallConfig {
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Thresholds + policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    /// Minimum similarity (0..=100) to accept a name match.
    #[serde(default = "default_match_threshold", rename = "match")]
    pub match_threshold: u8,
    /// Minimum attended minutes for `Successful`.
    #[serde(default = "default_duration_threshold", rename = "duration")]
    pub duration_threshold: f64,
    #[serde(default)]
    pub accumulation: Accumulation,
    #[serde(default)]
    pub scorer: ScorerKind,
}

fn default_match_threshold() -> u8 {
    55
}

fn default_duration_threshold() -> f64 {
    10.0
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            match_threshold: default_match_threshold(),
            duration_threshold: default_duration_threshold(),
            accumulation: Accumulation::default(),
            scorer: ScorerKind::default(),
        }
    }
}

/// How repeated matches of one roster name combine their durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Accumulation {
    /// Most recent record in input order wins.
    #[default]
    Last,
    Max,
    Sum,
}

impl Accumulation {
    pub fn combine(self, previous: Option<f64>, observed: f64) -> f64 {
        match (self, previous) {
            (_, None) | (Self::Last, Some(_)) => observed,
            (Self::Max, Some(prev)) => prev.max(observed),
            (Self::Sum, Some(prev)) => prev + observed,
        }
    }
}

impl std::fmt::Display for Accumulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Last => write!(f, "last"),
            Self::Max => write!(f, "max"),
            Self::Sum => write!(f, "sum"),
        }
    }
}

impl std::str::FromStr for Accumulation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last" => Ok(Self::Last),
            "max" => Ok(Self::Max),
            "sum" => Ok(Self::Sum),
            other => Err(format!("unknown accumulation '{other}' (expected last, max or sum)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    #[default]
    TokenSortRatio,
    Ratio,
}

impl ScorerKind {
    pub fn scorer(self) -> &'static dyn Scorer {
        match self {
            Self::TokenSortRatio => &TokenSortRatio,
            Self::Ratio => &Ratio,
        }
    }
}

impl std::fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenSortRatio => write!(f, "token_sort_ratio"),
            Self::Ratio => write!(f, "ratio"),
        }
    }
}

impl std::str::FromStr for ScorerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "token_sort_ratio" => Ok(Self::TokenSortRatio),
            "ratio" => Ok(Self::Ratio),
            other => Err(format!("unknown scorer '{other}' (expected token_sort_ratio or ratio)")),
        }
    }
}

/// Everything the reconciler needs at call time. Built from `ThresholdConfig`
/// or directly by library callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Policy {
    pub match_threshold: u8,
    pub duration_threshold: f64,
    pub accumulation: Accumulation,
    pub scorer: ScorerKind,
}

impl Policy {
    pub fn new(match_threshold: u8, duration_threshold: f64) -> Self {
        Self {
            match_threshold,
            duration_threshold,
            accumulation: Accumulation::Last,
            scorer: ScorerKind::TokenSortRatio,
        }
    }

    pub fn with_accumulation(mut self, accumulation: Accumulation) -> Self {
        self.accumulation = accumulation;
        self
    }

    pub fn with_scorer(mut self, scorer: ScorerKind) -> Self {
        self.scorer = scorer;
        self
    }
}

impl Default for Policy {
    fn default() -> Self {
        ThresholdConfig::default().policy()
    }
}

impl ThresholdConfig {
    pub fn policy(&self) -> Policy {
        Policy {
            match_threshold: self.match_threshold,
            duration_threshold: self.duration_threshold,
            accumulation: self.accumulation,
            scorer: self.scorer,
        }
    }
}

// ---------------------------------------------------------------------------
// Input columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub file: String,
    /// Metadata lines above the participant header row.
    pub skip_rows: usize,
    pub name_column: String,
    pub duration_column: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: "zoom_attendance.csv".into(),
            skip_rows: 3,
            name_column: "Name (original name)".into(),
            duration_column: "Total duration (minutes)".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RosterConfig {
    pub file: String,
    pub first_name_column: String,
    pub last_name_column: String,
    /// Source column overwritten with the final status.
    pub status_column: String,
    /// Header the status column is written back under.
    pub status_output_column: String,
    /// Derived canonical-name column appended to the written roster.
    pub full_name_column: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            file: "sabacloud_roster.csv".into(),
            first_name_column: "First Name".into(),
            last_name_column: "Last Name".into(),
            status_column: "Audience Subtype".into(),
            status_output_column: "Attendance Status".into(),
            full_name_column: "Full Name".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub roster: String,
    pub unmatched: String,
    pub json: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            roster: "updated_sabacloud_roster.csv".into(),
            unmatched: "unmatched_attendees.txt".into(),
            json: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl RollcallConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: RollcallConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn policy(&self) -> Policy {
        self.thresholds.policy()
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let t = &self.thresholds;
        if t.match_threshold > 100 {
            return Err(ReconError::ConfigValidation(format!(
                "match threshold must be 0..=100, got {}",
                t.match_threshold
            )));
        }
        if !t.duration_threshold.is_finite() || t.duration_threshold < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "duration threshold must be a non-negative number, got {}",
                t.duration_threshold
            )));
        }

        let columns = [
            ("session.name_column", &self.session.name_column),
            ("session.duration_column", &self.session.duration_column),
            ("roster.first_name_column", &self.roster.first_name_column),
            ("roster.last_name_column", &self.roster.last_name_column),
            ("roster.status_column", &self.roster.status_column),
            ("roster.status_output_column", &self.roster.status_output_column),
            ("roster.full_name_column", &self.roster.full_name_column),
        ];
        for (key, value) in columns {
            if value.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!("{key} must not be empty")));
            }
        }

        if self.roster.first_name_column == self.roster.last_name_column {
            return Err(ReconError::ConfigValidation(
                "roster first and last name columns must differ".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
