use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row of the meeting export: who joined and for how long.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionAttendance {
    pub display_name: String,
    pub duration_minutes: f64,
}

impl SessionAttendance {
    pub fn new(display_name: impl Into<String>, duration_minutes: f64) -> Self {
        Self {
            display_name: display_name.into(),
            duration_minutes: sanitize_duration(duration_minutes),
        }
    }
}

/// Durations are non-negative and finite; anything else counts as 0 minutes.
pub fn sanitize_duration(minutes: f64) -> f64 {
    if minutes.is_finite() && minutes >= 0.0 {
        minutes
    } else {
        0.0
    }
}

/// Parse a raw duration cell. Empty, unparseable, negative and non-finite
/// values all coerce to 0. The flag reports whether coercion happened on a
/// non-empty cell.
pub fn parse_duration(raw: Option<&str>) -> (f64, bool) {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return (0.0, false);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => (v, false),
        _ => (0.0, true),
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttendanceStatus {
    Unclassified,
    Successful,
    Unsuccessful,
    #[serde(rename = "No Show")]
    NoShow,
}

impl AttendanceStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Unclassified)
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unclassified => write!(f, "Unclassified"),
            Self::Successful => write!(f, "Successful"),
            Self::Unsuccessful => write!(f, "Unsuccessful"),
            Self::NoShow => write!(f, "No Show"),
        }
    }
}

/// One roster row. `canonical_name` is the join key and never changes after load.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub canonical_name: String,
    pub status: AttendanceStatus,
    /// Original cell values, aligned with `Roster::headers`.
    pub fields: Vec<String>,
}

impl RosterEntry {
    pub fn new(canonical_name: impl Into<String>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            status: AttendanceStatus::Unclassified,
            fields: Vec::new(),
        }
    }
}

/// Loaded roster: the original header row plus one entry per data row, in file order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub headers: Vec<String>,
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: Vec::new(),
            entries: names.into_iter().map(RosterEntry::new).collect(),
        }
    }

    /// Canonical names in roster order. Order is the matcher's tie-break order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.canonical_name.clone()).collect()
    }

    pub fn status_of(&self, canonical_name: &str) -> Option<AttendanceStatus> {
        self.entries
            .iter()
            .find(|e| e.canonical_name == canonical_name)
            .map(|e| e.status)
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Outcome of matching one session record against the roster.
#[derive(Debug, Clone, Serialize)]
pub struct MatchObservation {
    pub display_name: String,
    pub duration_minutes: f64,
    /// Roster name accepted for this record, if the best score met the threshold.
    pub matched_name: Option<String>,
    /// Best score seen, whether or not it was accepted. 0 for an empty roster.
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_candidate: Option<String>,
}

impl MatchObservation {
    pub fn is_matched(&self) -> bool {
        self.matched_name.is_some()
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct EntryResult {
    pub canonical_name: String,
    pub status: AttendanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub roster_entries: usize,
    pub successful: usize,
    pub unsuccessful: usize,
    pub no_show: usize,
    pub session_records: usize,
    pub matched_records: usize,
    pub unmatched_records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    pub match_threshold: u8,
    pub duration_threshold: f64,
    pub accumulation: String,
    pub scorer: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RollcallResult {
    pub meta: RunMeta,
    pub summary: RunSummary,
    pub entries: Vec<EntryResult>,
    pub observations: Vec<MatchObservation>,
    /// Unmatched display names, case-insensitive ascending.
    pub unmatched: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_coercion() {
        assert_eq!(parse_duration(Some("15")), (15.0, false));
        assert_eq!(parse_duration(Some(" 12.5 ")), (12.5, false));
        assert_eq!(parse_duration(Some("")), (0.0, false));
        assert_eq!(parse_duration(None), (0.0, false));
        assert_eq!(parse_duration(Some("n/a")), (0.0, true));
        assert_eq!(parse_duration(Some("-4")), (0.0, true));
        assert_eq!(parse_duration(Some("NaN")), (0.0, true));
    }

    #[test]
    fn session_record_sanitizes_duration() {
        assert_eq!(SessionAttendance::new("a", -3.0).duration_minutes, 0.0);
        assert_eq!(SessionAttendance::new("a", f64::INFINITY).duration_minutes, 0.0);
        assert_eq!(SessionAttendance::new("a", 7.0).duration_minutes, 7.0);
    }

    #[test]
    fn status_display_and_serialize() {
        assert_eq!(AttendanceStatus::NoShow.to_string(), "No Show");
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::NoShow).unwrap(),
            "\"No Show\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Successful).unwrap(),
            "\"Successful\""
        );
        assert!(!AttendanceStatus::Unclassified.is_terminal());
        assert!(AttendanceStatus::Unsuccessful.is_terminal());
    }

    #[test]
    fn roster_from_names_starts_unclassified() {
        let roster = Roster::from_names(["Ana Lopez", "Ben Cruz"]);
        assert_eq!(roster.names(), vec!["Ana Lopez", "Ben Cruz"]);
        assert_eq!(roster.status_of("Ben Cruz"), Some(AttendanceStatus::Unclassified));
        assert_eq!(roster.status_of("Nobody"), None);
    }
}
