//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract. Scripts rely on them.
//!
//! | Code | Description                                             |
//! |------|---------------------------------------------------------|
//! | 0    | Success                                                 |
//! | 1    | General error (unspecified)                             |
//! | 2    | CLI usage error (bad args; emitted by clap)             |
//! | 3    | Configuration error (unsupported mode, invalid config)  |
//! | 4    | Input error (unreadable CSV, missing configured column) |
//! | 5    | Output error (cannot write annotated file or JSON)      |

use userlink_cluster::ClusterError;
use userlink_io::IoError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
/// clap exits with this code on its own; also used when the output would
/// overwrite the input.
pub const EXIT_USAGE: u8 = 2;

/// Unsupported match mode, unparsable or invalid config file.
pub const EXIT_CONFIG: u8 = 3;

/// Input cannot be read or parsed, or a configured column is missing.
pub const EXIT_INPUT: u8 = 4;

/// Output cannot be written.
pub const EXIT_OUTPUT: u8 = 5;

/// All engine errors are configuration errors.
pub fn cluster_exit_code(_err: &ClusterError) -> u8 {
    EXIT_CONFIG
}

pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Read { .. } | IoError::Csv(_) | IoError::MissingColumn(_) => EXIT_INPUT,
        IoError::DuplicateIdColumn(_) => EXIT_CONFIG,
        IoError::Write { .. } => EXIT_OUTPUT,
    }
}
