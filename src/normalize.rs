//! Normalization of the three fault channels into the unified [`Fault`]
//! model.
//!
//! Recoverable errors pass through a reporting mask first: masked-out
//! severities are suppressed outright, everything else is promoted. The
//! suppressed/promoted split is an explicit discriminated result, consumed
//! by the one render+terminate path, rather than re-raising control flow.

use std::any::Any;
use std::panic::PanicHookInfo;

use crate::fault::{Fault, RawError};
use crate::severity::Severity;

/// Outcome of filtering a recoverable error against the reporting mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDisposition {
    /// The severity is masked out; nothing is rendered or surfaced.
    Suppressed,
    /// The error passed the filter and becomes a fault on the unified path.
    Promoted(Fault),
}

/// Converts host-channel inputs into [`Fault`] values.
#[derive(Debug, Clone)]
pub struct FaultNormalizer {
    mask: Severity,
}

impl FaultNormalizer {
    /// A normalizer filtering recoverable errors against `mask`.
    pub fn new(mask: Severity) -> Self {
        FaultNormalizer { mask }
    }

    /// Filter a recoverable error: masked-out severities are suppressed,
    /// the rest are promoted to faults.
    pub fn disposition(&self, raw: &RawError) -> ErrorDisposition {
        let severity = Severity::from_raw(raw.severity);
        if !self.mask.intersects(severity) {
            return ErrorDisposition::Suppressed;
        }
        ErrorDisposition::Promoted(promote(raw))
    }

    /// Convert the "last raw error" observed at process exit, if it belongs
    /// to one of the fatal classes. Non-fatal last errors were already
    /// handled (or are benign) and yield `None`.
    pub fn from_shutdown(&self, last: &RawError) -> Option<Fault> {
        if !Severity::from_raw(last.severity).is_fatal() {
            return None;
        }
        Some(promote(last))
    }

    /// Normalize an uncaught panic.
    ///
    /// The panic payload becomes the message when it is a string; the panic
    /// location becomes the fault's origin. Panics carry no host code, so
    /// `raw_code` stays 0 and the exit code lands in the auto-assigned band.
    pub fn from_panic(info: &PanicHookInfo<'_>) -> Fault {
        let mut fault = Fault::new("panic");
        if let Some(message) = panic_message(info.payload()) {
            fault = fault.with_message(message);
        }
        if let Some(location) = info.location() {
            fault = fault.at(location.file(), location.line());
        }
        fault
    }
}

fn promote(raw: &RawError) -> Fault {
    let label = Severity::from_raw(raw.severity).label();
    let mut fault = Fault::new(label)
        .with_message(raw.message.clone())
        .with_code(raw.severity);
    if let Some(file) = &raw.file {
        fault = fault.at(file.clone(), raw.line.unwrap_or(0));
    }
    fault
}

fn panic_message(payload: &dyn Any) -> Option<&str> {
    if let Some(message) = payload.downcast_ref::<&str>() {
        Some(message)
    } else {
        payload.downcast_ref::<String>().map(String::as_str)
    }
}
