use std::collections::HashMap;

use crate::config::{Accumulation, Policy};
use crate::matcher::{accepts, best_match, Scorer};
use crate::model::{AttendanceStatus, MatchObservation, RosterEntry, SessionAttendance};
use crate::observer::{RecordOutcome, ReconcileObserver};

/// Output of the matching pass.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Accumulated duration per matched roster name.
    pub duration_by_name: HashMap<String, f64>,
    /// Display names with no acceptable match, in input order.
    pub unmatched: Vec<String>,
    /// One observation per session record, in input order.
    pub observations: Vec<MatchObservation>,
}

/// Match every session record against the roster using the policy's scorer.
pub fn reconcile(
    records: &[SessionAttendance],
    roster_names: &[String],
    policy: &Policy,
    observer: &mut dyn ReconcileObserver,
) -> Reconciliation {
    reconcile_with_scorer(records, roster_names, policy, policy.scorer.scorer(), observer)
}

/// Same as `reconcile`, with a caller-supplied scorer in place of `policy.scorer`.
///
/// Records are processed strictly in input order; with `Accumulation::Last`
/// the final duration for a roster name is that of its last matching record.
pub fn reconcile_with_scorer<S>(
    records: &[SessionAttendance],
    roster_names: &[String],
    policy: &Policy,
    scorer: &S,
    observer: &mut dyn ReconcileObserver,
) -> Reconciliation
where
    S: Scorer + ?Sized,
{
    let mut out = Reconciliation::default();

    for record in records {
        let best = best_match(&record.display_name, roster_names, scorer);
        let score = best.as_ref().map_or(0.0, |m| m.score);
        let accepted = best
            .as_ref()
            .filter(|m| accepts(m.score, policy.match_threshold));

        match accepted {
            Some(m) => {
                let previous = out.duration_by_name.get(m.name).copied();
                let combined = policy.accumulation.combine(previous, record.duration_minutes);
                if previous.is_some() && policy.accumulation == Accumulation::Last {
                    tracing::debug!(
                        roster_name = %m.name,
                        previous = previous.unwrap_or_default(),
                        replacement = combined,
                        "duplicate match, keeping latest duration"
                    );
                }
                out.duration_by_name.insert(m.name.to_string(), combined);

                let outcome = if record.duration_minutes >= policy.duration_threshold {
                    RecordOutcome::Matched { roster_name: m.name, score }
                } else {
                    RecordOutcome::BelowDuration {
                        roster_name: m.name,
                        score,
                        duration_minutes: record.duration_minutes,
                    }
                };
                observer.on_record(record, &outcome);
            }
            None => {
                out.unmatched.push(record.display_name.clone());
                observer.on_record(record, &RecordOutcome::Unmatched { best_score: score });
            }
        }

        out.observations.push(MatchObservation {
            display_name: record.display_name.clone(),
            duration_minutes: record.duration_minutes,
            matched_name: accepted.map(|m| m.name.to_string()),
            score,
            best_candidate: best.map(|m| m.name.to_string()),
        });
    }

    out
}

/// Status for a roster name given its accumulated duration, if it was matched at all.
pub fn status_for(duration: Option<f64>, duration_threshold: f64) -> AttendanceStatus {
    match duration {
        None => AttendanceStatus::NoShow,
        Some(d) if d >= duration_threshold => AttendanceStatus::Successful,
        Some(_) => AttendanceStatus::Unsuccessful,
    }
}

/// Assign a terminal status to every roster entry. Total and idempotent.
pub fn classify(
    entries: &mut [RosterEntry],
    duration_by_name: &HashMap<String, f64>,
    duration_threshold: f64,
) {
    for entry in entries.iter_mut() {
        let duration = duration_by_name.get(&entry.canonical_name).copied();
        entry.status = status_for(duration, duration_threshold);
    }
}
