//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | Unmatched attendees found (only with --fail-on-unmatched) |
//! | 2    | Usage error (bad args)                                    |
//! | 3    | Invalid config (parse or validation failure)              |
//! | 4    | Runtime error (IO, malformed CSV, missing name/column)    |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Some session attendees matched no roster entry and
/// `--fail-on-unmatched` was given. Outputs are still written.
pub const EXIT_UNMATCHED: u8 = 1;

/// Usage error - bad arguments, conflicting options.
pub const EXIT_USAGE: u8 = 2;

/// Config file could not be parsed or failed validation.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Input could not be read or loaded, or output could not be written.
pub const EXIT_RUNTIME: u8 = 4;

use rollcall_recon::ReconError;

/// Map a library error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::MissingField { .. }
        | ReconError::MissingColumn { .. }
        | ReconError::Csv(_) => EXIT_RUNTIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_distinct_from_runtime() {
        assert_eq!(recon_exit_code(&ReconError::ConfigParse("x".into())), EXIT_INVALID_CONFIG);
        assert_eq!(
            recon_exit_code(&ReconError::MissingField { row: 1, field: "First Name".into() }),
            EXIT_RUNTIME
        );
        assert_eq!(recon_exit_code(&ReconError::Csv("bad quote".into())), EXIT_RUNTIME);
        assert_ne!(EXIT_UNMATCHED, EXIT_SUCCESS);
    }
}
