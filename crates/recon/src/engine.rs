use crate::config::Policy;
use crate::model::{EntryResult, Roster, RollcallResult, RunMeta, SessionAttendance};
use crate::observer::ReconcileObserver;
use crate::reconcile::{classify, reconcile};
use crate::report::sorted_unmatched;
use crate::summary::compute_summary;

/// Run one attendance reconciliation. Sets the final status on every roster
/// entry in place and returns the classified result + summary.
pub fn run(
    roster: &mut Roster,
    records: &[SessionAttendance],
    policy: &Policy,
    observer: &mut dyn ReconcileObserver,
) -> RollcallResult {
    let names = roster.names();
    let recon = reconcile(records, &names, policy, observer);

    classify(&mut roster.entries, &recon.duration_by_name, policy.duration_threshold);

    let summary = compute_summary(&roster.entries, &recon.observations);
    tracing::info!(
        roster = summary.roster_entries,
        successful = summary.successful,
        unsuccessful = summary.unsuccessful,
        no_show = summary.no_show,
        unmatched = summary.unmatched_records,
        "reconciliation complete"
    );

    let entries = roster
        .entries
        .iter()
        .map(|e| EntryResult {
            canonical_name: e.canonical_name.clone(),
            status: e.status,
            duration_minutes: recon.duration_by_name.get(&e.canonical_name).copied(),
        })
        .collect();

    RollcallResult {
        meta: RunMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            match_threshold: policy.match_threshold,
            duration_threshold: policy.duration_threshold,
            accumulation: policy.accumulation.to_string(),
            scorer: policy.scorer.to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        entries,
        unmatched: sorted_unmatched(&recon.unmatched),
        observations: recon.observations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttendanceStatus;
    use crate::observer::NoopObserver;

    fn roster() -> Roster {
        Roster::from_names(["Ana Lopez", "Ben Cruz"])
    }

    fn run_with(records: &[SessionAttendance]) -> (Roster, RollcallResult) {
        let mut roster = roster();
        let result = run(&mut roster, records, &Policy::new(55, 10.0), &mut NoopObserver);
        (roster, result)
    }

    #[test]
    fn lowercase_name_attends() {
        let (roster, result) = run_with(&[SessionAttendance::new("ana lopez", 15.0)]);
        assert_eq!(roster.status_of("Ana Lopez"), Some(AttendanceStatus::Successful));
        assert_eq!(roster.status_of("Ben Cruz"), Some(AttendanceStatus::NoShow));
        assert_eq!(result.summary.successful, 1);
        assert_eq!(result.summary.no_show, 1);
        assert_eq!(result.entries[0].duration_minutes, Some(15.0));
        assert_eq!(result.entries[1].duration_minutes, None);
    }

    #[test]
    fn swapped_name_short_stay() {
        let (roster, _) = run_with(&[SessionAttendance::new("Lopez Ana", 5.0)]);
        assert_eq!(roster.status_of("Ana Lopez"), Some(AttendanceStatus::Unsuccessful));
    }

    #[test]
    fn stranger_only() {
        let (roster, result) = run_with(&[SessionAttendance::new("Unknown Person", 20.0)]);
        assert_eq!(result.unmatched, vec!["Unknown Person"]);
        assert_eq!(roster.status_of("Ana Lopez"), Some(AttendanceStatus::NoShow));
        assert_eq!(roster.status_of("Ben Cruz"), Some(AttendanceStatus::NoShow));
    }

    #[test]
    fn later_record_overrides() {
        let (roster, _) = run_with(&[
            SessionAttendance::new("Ana Lopez", 3.0),
            SessionAttendance::new("Ana L.", 40.0),
        ]);
        assert_eq!(roster.status_of("Ana Lopez"), Some(AttendanceStatus::Successful));
    }

    #[test]
    fn meta_records_policy() {
        let (_, result) = run_with(&[]);
        assert_eq!(result.meta.match_threshold, 55);
        assert_eq!(result.meta.accumulation, "last");
        assert_eq!(result.meta.scorer, "token_sort_ratio");
        assert_eq!(result.summary.session_records, 0);
        assert_eq!(result.summary.no_show, 2);
    }

    #[test]
    fn unmatched_output_is_sorted() {
        let (_, result) = run_with(&[
            SessionAttendance::new("zoe zimmer", 1.0),
            SessionAttendance::new("Quinn Xu", 1.0),
            SessionAttendance::new("mo yates", 1.0),
        ]);
        assert_eq!(result.unmatched, vec!["mo yates", "Quinn Xu", "zoe zimmer"]);
        // Observations keep input order.
        assert_eq!(result.observations[0].display_name, "zoe zimmer");
    }
}
