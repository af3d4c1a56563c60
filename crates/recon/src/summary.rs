use crate::model::{AttendanceStatus, MatchObservation, RosterEntry, RunSummary};

/// Compute summary statistics from classified entries and match observations.
pub fn compute_summary(entries: &[RosterEntry], observations: &[MatchObservation]) -> RunSummary {
    let mut successful = 0;
    let mut unsuccessful = 0;
    let mut no_show = 0;

    for e in entries {
        match e.status {
            AttendanceStatus::Successful => successful += 1,
            AttendanceStatus::Unsuccessful => unsuccessful += 1,
            AttendanceStatus::NoShow => no_show += 1,
            AttendanceStatus::Unclassified => {}
        }
    }

    let matched_records = observations.iter().filter(|o| o.is_matched()).count();

    RunSummary {
        roster_entries: entries.len(),
        successful,
        unsuccessful,
        no_show,
        session_records: observations.len(),
        matched_records,
        unmatched_records: observations.len() - matched_records,
    }
}
