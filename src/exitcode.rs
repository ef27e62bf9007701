//! Standard exit codes (BSD sysexits.h compatible)

use std::process::ExitStatus;

/// Successful termination
pub const OK: i32 = 0;

/// Generic failure (child could not start, stream broke, koi itself failed)
pub const FAILURE: i32 = 1;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Added to the signal number when a child was killed by a signal
pub const SIGNAL_BASE: i32 = 128;

/// Exit code to mirror for a finished child.
///
/// A child killed by a signal maps to `128 + signal` on unix, to
/// [`FAILURE`] elsewhere.
pub fn from_status(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return SIGNAL_BASE + signal;
        }
    }
    FAILURE
}
