//! Per-record progress hooks. Purely diagnostic: observers never influence
//! matching or classification.

use crate::model::SessionAttendance;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome<'a> {
    /// Matched, and this record alone meets the duration threshold.
    Matched { roster_name: &'a str, score: f64 },
    /// Matched, but this record's duration is under the threshold.
    BelowDuration { roster_name: &'a str, score: f64, duration_minutes: f64 },
    /// No candidate reached the match threshold.
    Unmatched { best_score: f64 },
}

pub trait ReconcileObserver {
    fn on_record(&mut self, record: &SessionAttendance, outcome: &RecordOutcome<'_>);
}

impl<F> ReconcileObserver for F
where
    F: FnMut(&SessionAttendance, &RecordOutcome<'_>),
{
    fn on_record(&mut self, record: &SessionAttendance, outcome: &RecordOutcome<'_>) {
        self(record, outcome)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ReconcileObserver for NoopObserver {
    fn on_record(&mut self, _record: &SessionAttendance, _outcome: &RecordOutcome<'_>) {}
}

/// Emits one `tracing` event per record at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ReconcileObserver for TracingObserver {
    fn on_record(&mut self, record: &SessionAttendance, outcome: &RecordOutcome<'_>) {
        match outcome {
            RecordOutcome::Matched { roster_name, score } => tracing::debug!(
                attendee = %record.display_name,
                roster_name = %roster_name,
                score = *score,
                "matched"
            ),
            RecordOutcome::BelowDuration { roster_name, score, duration_minutes } => {
                tracing::debug!(
                    attendee = %record.display_name,
                    roster_name = %roster_name,
                    score = *score,
                    duration_minutes = *duration_minutes,
                    "matched below duration threshold"
                )
            }
            RecordOutcome::Unmatched { best_score } => tracing::debug!(
                attendee = %record.display_name,
                best_score = *best_score,
                "unmatched"
            ),
        }
    }
}
