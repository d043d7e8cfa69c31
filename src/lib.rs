//! Process-wide fault capture with developer-facing HTML diagnostic pages.
//!
//! This crate intercepts the three fault channels of a hosted runtime —
//! uncaught panics, recoverable runtime errors, and fatal conditions only
//! visible at process exit — normalizes them into one [`Fault`] model, and
//! renders a single diagnostic HTML page: the fault, a highlighted source
//! excerpt around the failing line, and a formatted call stack with
//! per-frame arguments. Capture implies termination: the page is written to
//! stdout in one piece and the process exits with a code derived from the
//! fault.
//!
//! # Usage
//!
//! ```no_run
//! use fault_page::{CaptureConfig, FaultCaptureRegistry};
//!
//! let registry = FaultCaptureRegistry::new(CaptureConfig::default());
//! registry.register();
//! // Wire registry.handle_error / registry.handle_shutdown into the host
//! // runtime's recoverable-error and process-exit hooks.
//! ```

pub mod codes;
pub mod error;
pub mod excerpt;
pub mod fault;
pub mod frames;
pub mod highlight;
pub mod normalize;
pub mod page;
pub mod registry;
pub mod severity;

// Re-export main types for convenience
pub use error::CaptureError;
pub use fault::{CallType, Fault, RawError, StackFrame};
pub use normalize::{ErrorDisposition, FaultNormalizer};
pub use registry::{CaptureConfig, FaultCaptureRegistry};
pub use severity::Severity;
// Rendering pipeline
pub use codes::resolve;
pub use excerpt::{DEFAULT_WINDOW, render_excerpt};
pub use frames::{NullParameterNameResolver, ParameterNameResolver, render_frame};
pub use page::{RenderContext, RenderedPage, render_page};
