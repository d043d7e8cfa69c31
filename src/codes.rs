//! Derivation of an HTTP-style status code and a process exit code from a
//! fault's raw code.
//!
//! The policy is total over all integers: any raw code maps to a plausible
//! status and an exit code in the allowed band, with no panics and no error
//! path.

/// Exit code for a generic, unclassified error.
pub const EXIT_GENERIC: i32 = 1;

/// Lowest exit code in the auto-assigned band.
pub const EXIT_AUTO_MIN: i32 = 9;

/// Highest exit code in the auto-assigned band.
pub const EXIT_AUTO_MAX: i32 = 125;

/// Status code used when the raw code is not a plausible HTTP status.
pub const STATUS_FALLBACK: u16 = 500;

/// Derive `(status_code, exit_code)` from a fault's raw code.
///
/// The sign of the raw code is ignored. Raw codes inside the plausible HTTP
/// status range (100..=599) are passed through as the status with a generic
/// exit code; anything else falls back to status 500 with an exit code in
/// the auto-assigned band 9..=125, collapsing to the generic code when the
/// band is exceeded.
///
/// `0` is never returned for either value; it is reserved for clean
/// shutdown, which this facility never signals.
pub fn resolve(raw_code: i64) -> (u16, i32) {
    let n = raw_code.unsigned_abs();
    if (100..=599).contains(&n) {
        // Plausible HTTP status: pass through, no auto-assigned exit code.
        (n as u16, EXIT_GENERIC)
    } else {
        let auto = n.saturating_add(EXIT_AUTO_MIN as u64);
        let exit = if auto > EXIT_AUTO_MAX as u64 {
            EXIT_GENERIC
        } else {
            auto as i32
        };
        (STATUS_FALLBACK, exit)
    }
}
