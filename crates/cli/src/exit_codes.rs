//! CLI Exit Code Registry
//!
//! Single source of truth for `midp` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | Usage error (bad args; clap also exits with 2)       |
//! | 3    | I/O error (unreadable input, unwritable output)      |
//! | 4    | Schema error (required columns missing)              |
//! | 5    | Duplicate keys in either input                       |
//! | 6    | Invalid configuration file                           |

use midp_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Input could not be read or output could not be written.
pub const EXIT_IO: u8 = 3;

/// A required column is missing from last month's snapshot or this
/// month's export.
pub const EXIT_SCHEMA: u8 = 4;

/// A key appears more than once in one of the inputs.
pub const EXIT_DUPLICATE_KEYS: u8 = 5;

/// Config file failed to parse or validate.
pub const EXIT_CONFIG: u8 = 6;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
        ReconError::Schema { .. } => EXIT_SCHEMA,
        ReconError::AmbiguousKey(_) => EXIT_DUPLICATE_KEYS,
        ReconError::RowWidth { .. } | ReconError::Csv(_) => EXIT_IO,
    }
}
