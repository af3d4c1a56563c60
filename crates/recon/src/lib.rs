//! `rollcall-recon` — attendance reconciliation engine.
//!
//! Matches meeting-export display names against a roster with token-sort
//! fuzzy scoring, then classifies every roster entry as Successful,
//! Unsuccessful or No Show by attended duration. The core (`normalize`,
//! `matcher`, `reconcile`) is pure; `io` handles CSV text.

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod observer;
pub mod reconcile;
pub mod report;
pub mod summary;

pub use config::{Accumulation, Policy, RollcallConfig, ScorerKind};
pub use engine::run;
pub use error::ReconError;
pub use matcher::{match_one, Scorer};
pub use model::{AttendanceStatus, RollcallResult, Roster, RosterEntry, SessionAttendance};
pub use reconcile::{classify, reconcile};
