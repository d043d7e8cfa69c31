//! Process-wide hook registration and the render+terminate path.
//!
//! The registry is built once at startup, registers its hooks once, and from
//! then on any captured fault is rendered to a single buffered page on
//! stdout followed by process termination. At most one page is ever rendered
//! per process lifetime.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::fault::{Fault, RawError};
use crate::frames::{NullParameterNameResolver, ParameterNameResolver};
use crate::normalize::{ErrorDisposition, FaultNormalizer};
use crate::page::{RenderedPage, render_page};
use crate::severity::Severity;

/// Configuration for a capture registry.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Severity classes promoted to a diagnostic page; everything else is
    /// suppressed silently.
    pub report_mask: Severity,
    /// Runtime version string shown in the page footer. Hosts pass their
    /// own version; the default is this crate's.
    pub runtime_version: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            report_mask: Severity::all(),
            runtime_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Owns the process-wide fault hooks and drives render+terminate.
///
/// Built once at startup and held by the hosting application, usually in an
/// `Arc` so the uncaught-panic hook can share it. [`register`] installs the
/// uncaught-panic hook natively; the recoverable-error and process-exit
/// channels are the [`handle_error`] and [`handle_shutdown`] entry points,
/// which the host wires into its own hook machinery.
///
/// [`register`]: FaultCaptureRegistry::register
/// [`handle_error`]: FaultCaptureRegistry::handle_error
/// [`handle_shutdown`]: FaultCaptureRegistry::handle_shutdown
pub struct FaultCaptureRegistry {
    registered: AtomicBool,
    normalizer: FaultNormalizer,
    runtime_version: String,
    resolver: Mutex<Box<dyn ParameterNameResolver + Send + Sync>>,
}

impl FaultCaptureRegistry {
    /// A registry with the given configuration and no introspection
    /// capability (argument labels degrade to positional).
    pub fn new(config: CaptureConfig) -> Arc<Self> {
        Arc::new(FaultCaptureRegistry {
            registered: AtomicBool::new(false),
            normalizer: FaultNormalizer::new(config.report_mask),
            runtime_version: config.runtime_version,
            resolver: Mutex::new(Box::new(NullParameterNameResolver)),
        })
    }

    /// Supply the host's parameter-name introspection capability.
    pub fn set_resolver(&self, resolver: Box<dyn ParameterNameResolver + Send + Sync>) {
        *self.resolver.lock() = resolver;
    }

    /// Whether `register` has already installed the hooks.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }

    /// Install the process-wide hooks. Safe to call more than once; only the
    /// first call installs anything.
    pub fn register(self: &Arc<Self>) {
        if !self.claim_registration() {
            log::warn!("fault capture hooks already registered, ignoring");
            return;
        }
        let registry = Arc::clone(self);
        std::panic::set_hook(Box::new(move |info| {
            registry.handle_fault(FaultNormalizer::from_panic(info));
        }));
    }

    /// Uncaught-exception channel, for hosts that deliver already-normalized
    /// faults. Renders the page and terminates; never returns.
    pub fn handle_fault(&self, fault: Fault) -> ! {
        self.dispatch(&fault)
    }

    /// Flip the one-shot registration guard; true exactly once per process.
    fn claim_registration(&self) -> bool {
        self.registered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Recoverable-error channel. A masked-out severity is a silent no-op;
    /// anything else is promoted and routed through render+terminate, never
    /// handled inline.
    pub fn handle_error(&self, raw: RawError) {
        match self.error_disposition(&raw) {
            ErrorDisposition::Suppressed => {
                log::trace!("suppressed error (severity {} masked out)", raw.severity);
            }
            ErrorDisposition::Promoted(fault) => self.dispatch(&fault),
        }
    }

    /// Filter a recoverable error against the reporting mask without acting
    /// on it. [`handle_error`](Self::handle_error) consumes this result.
    pub fn error_disposition(&self, raw: &RawError) -> ErrorDisposition {
        self.normalizer.disposition(raw)
    }

    /// Process-exit channel. Invoked by the host at termination with the
    /// last raw error it observed, if any; fatal classes are routed through
    /// render+terminate, everything else returns.
    pub fn handle_shutdown(&self, last: Option<RawError>) {
        if let Some(raw) = last
            && let Some(fault) = self.normalizer.from_shutdown(&raw)
        {
            self.dispatch(&fault);
        }
    }

    /// Compose the diagnostic page for a fault without terminating.
    pub fn capture(&self, fault: &Fault) -> RenderedPage {
        let resolver = self.resolver.lock();
        render_page(fault, &**resolver, &self.runtime_version)
    }

    /// Render, emit, terminate. The page is buffered and written in one
    /// piece so no partial output ever escapes.
    fn dispatch(&self, fault: &Fault) -> ! {
        let page = self.capture(fault);
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let _ = out.write_all(page.html.as_bytes());
        let _ = out.flush();
        std::process::exit(page.exit_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Arc<FaultCaptureRegistry> {
        FaultCaptureRegistry::new(CaptureConfig {
            report_mask: Severity::FATAL | Severity::WARNING,
            runtime_version: "9.9.9".to_string(),
        })
    }

    fn raw(severity: Severity) -> RawError {
        RawError {
            severity: severity.bits() as i64,
            message: "boom".to_string(),
            file: None,
            line: None,
        }
    }

    #[test]
    fn test_registration_guard_claims_once() {
        let registry = registry();
        assert!(!registry.is_registered());
        assert!(registry.claim_registration());
        assert!(registry.is_registered());
        assert!(!registry.claim_registration());
        assert!(registry.is_registered());
    }

    #[test]
    fn test_masked_severity_is_suppressed() {
        let registry = registry();
        assert_eq!(
            registry.error_disposition(&raw(Severity::NOTICE)),
            ErrorDisposition::Suppressed
        );
    }

    #[test]
    fn test_unmasked_severity_promotes_and_derives_exit_code() {
        let registry = registry();
        let ErrorDisposition::Promoted(fault) = registry.error_disposition(&raw(Severity::WARNING))
        else {
            panic!("expected promotion");
        };
        let page = registry.capture(&fault);
        // raw code 2 is outside the HTTP range: status 500, exit 2 + 9.
        assert_eq!(page.status, 500);
        assert_eq!(page.exit_code, 11);
        assert!(page.html.contains("Warning"));
    }

    #[test]
    fn test_capture_uses_configured_runtime_version() {
        let registry = registry();
        let page = registry.capture(&Fault::new("panic"));
        assert!(page.html.contains("runtime 9.9.9"));
    }

    #[test]
    fn test_default_config_reports_everything() {
        let config = CaptureConfig::default();
        assert_eq!(config.report_mask, Severity::all());
        assert_eq!(config.runtime_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_injected_resolver_labels_arguments() {
        use crate::fault::StackFrame;

        struct OneName;
        impl ParameterNameResolver for OneName {
            fn parameter_names(&self, _: Option<&str>, _: &str) -> Option<Vec<String>> {
                Some(vec!["payload".to_string()])
            }
        }

        let registry = registry();
        registry.set_resolver(Box::new(OneName));
        let fault = Fault::new("Fatal Error")
            .with_frames(vec![StackFrame::function("send").with_args(vec!["42".into()])]);
        let page = registry.capture(&fault);
        assert!(page.html.contains("<td class=\"name\">payload</td>"));
    }
}
