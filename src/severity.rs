//! Severity classes for recoverable and fatal runtime errors.
//!
//! The host runtime reports errors with an integer severity. Severities form
//! a bitmask so that a single reporting mask can select which classes are
//! promoted to a diagnostic page and which are suppressed.

use bitflags::bitflags;

bitflags! {
    /// Bitmask of error severity classes.
    ///
    /// Unknown bits coming from the host are dropped by
    /// [`Severity::from_raw`]; a raw severity with no known bits set is
    /// treated as empty and therefore never passes a reporting mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Severity: u32 {
        /// Hard fatal error; execution cannot continue.
        const FATAL = 1;
        /// Non-fatal runtime warning.
        const WARNING = 1 << 1;
        /// Fatal error raised while parsing source.
        const PARSE = 1 << 2;
        /// Runtime notice.
        const NOTICE = 1 << 3;
        /// Fatal error raised during runtime startup.
        const CORE_FATAL = 1 << 4;
        /// Warning raised during runtime startup.
        const CORE_WARNING = 1 << 5;
        /// Fatal error raised while compiling.
        const COMPILE_FATAL = 1 << 6;
        /// Warning raised while compiling.
        const COMPILE_WARNING = 1 << 7;
        /// Fatal error raised by user code.
        const USER_FATAL = 1 << 8;
        /// Warning raised by user code.
        const USER_WARNING = 1 << 9;
        /// Notice raised by user code.
        const USER_NOTICE = 1 << 10;
        /// Fatal error the runtime was able to recover from.
        const RECOVERABLE = 1 << 11;
        /// Use of a deprecated construct.
        const DEPRECATED = 1 << 12;
    }
}

impl Severity {
    /// The severity classes that are only observable at process shutdown.
    ///
    /// A "last raw error" with any of these classes set means the process is
    /// dying from a fatal condition that normal error handling never saw.
    pub const fn fatal_classes() -> Self {
        Self::FATAL
            .union(Self::CORE_FATAL)
            .union(Self::COMPILE_FATAL)
            .union(Self::PARSE)
    }

    /// Convert a raw host-supplied severity integer, dropping unknown bits.
    pub fn from_raw(raw: i64) -> Self {
        Self::from_bits_truncate(raw as u32)
    }

    /// Whether this severity carries any fatal class.
    pub fn is_fatal(self) -> bool {
        self.intersects(Self::fatal_classes())
    }

    /// Human-readable name for the most significant class present.
    ///
    /// Used as the type name of a promoted fault. Combined severities take
    /// the label of their lowest set bit, matching the order in which the
    /// classes are declared.
    pub fn label(self) -> &'static str {
        if self.contains(Self::FATAL) {
            "Fatal Error"
        } else if self.contains(Self::WARNING) {
            "Warning"
        } else if self.contains(Self::PARSE) {
            "Parse Error"
        } else if self.contains(Self::NOTICE) {
            "Notice"
        } else if self.contains(Self::CORE_FATAL) {
            "Core Fatal Error"
        } else if self.contains(Self::CORE_WARNING) {
            "Core Warning"
        } else if self.contains(Self::COMPILE_FATAL) {
            "Compile Fatal Error"
        } else if self.contains(Self::COMPILE_WARNING) {
            "Compile Warning"
        } else if self.contains(Self::USER_FATAL) {
            "User Fatal Error"
        } else if self.contains(Self::USER_WARNING) {
            "User Warning"
        } else if self.contains(Self::USER_NOTICE) {
            "User Notice"
        } else if self.contains(Self::RECOVERABLE) {
            "Recoverable Error"
        } else if self.contains(Self::DEPRECATED) {
            "Deprecated"
        } else {
            "Unknown Error"
        }
    }
}
