//! The unified fault model.
//!
//! Every capture channel (uncaught panic, promoted recoverable error, fatal
//! shutdown condition) normalizes into a [`Fault`]. Faults are immutable
//! value objects: once built, nothing in the pipeline mutates them.

use std::fmt;

/// How a method frame was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallType {
    /// Called on an instance.
    Instance,
    /// Called on the type itself.
    Static,
}

impl CallType {
    /// Separator rendered between the class and function names.
    pub fn symbol(self) -> &'static str {
        match self {
            CallType::Instance => ".",
            CallType::Static => "::",
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One frame of a captured call stack.
///
/// Fields are private so the frame invariant holds by construction: a class
/// name (and its call type) can only be attached together with a function
/// name, via [`StackFrame::method`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    file: Option<String>,
    line: Option<u32>,
    function: Option<String>,
    class: Option<(String, CallType)>,
    args: Vec<String>,
}

impl StackFrame {
    /// A runtime-internal frame with no call site and no callable.
    pub fn internal() -> Self {
        StackFrame {
            file: None,
            line: None,
            function: None,
            class: None,
            args: Vec::new(),
        }
    }

    /// A free-function frame.
    pub fn function(name: impl Into<String>) -> Self {
        StackFrame {
            function: Some(name.into()),
            ..Self::internal()
        }
    }

    /// A class/method frame.
    pub fn method(class: impl Into<String>, call_type: CallType, name: impl Into<String>) -> Self {
        StackFrame {
            function: Some(name.into()),
            class: Some((class.into(), call_type)),
            ..Self::internal()
        }
    }

    /// Attach the call-site location.
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Attach positional argument values, already converted to display
    /// strings by the host boundary.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Call-site file path, if the frame has one.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Call-site line number, if the frame has one.
    pub fn line(&self) -> Option<u32> {
        self.line
    }

    /// Function or method name.
    pub fn function_name(&self) -> Option<&str> {
        self.function.as_deref()
    }

    /// Class name, for method frames.
    pub fn class_name(&self) -> Option<&str> {
        self.class.as_ref().map(|(name, _)| name.as_str())
    }

    /// Call type, for method frames.
    pub fn call_type(&self) -> Option<CallType> {
        self.class.as_ref().map(|&(_, call_type)| call_type)
    }

    /// Positional argument display values.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Unified representation of any captured error.
///
/// `frames` is ordered outermost call first: `frames[0]` is the immediate
/// caller of the fault site. The order is established at normalization and
/// never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// Page title classification.
    pub title: String,
    /// Concrete fault kind, e.g. a severity label or `panic`.
    pub type_name: String,
    /// Human-readable description; `(null)` is substituted at render time
    /// when absent.
    pub message: Option<String>,
    /// Origin-specific severity or code.
    pub raw_code: i64,
    /// Origin file, when the fault has a source location.
    pub file: Option<String>,
    /// Origin line, when the fault has a source location.
    pub line: Option<u32>,
    /// Call chain from the fault site outward.
    pub frames: Vec<StackFrame>,
}

impl Fault {
    /// A fault with the given classification and no location or frames.
    pub fn new(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Fault {
            title: type_name.clone(),
            type_name,
            message: None,
            raw_code: 0,
            file: None,
            line: None,
            frames: Vec::new(),
        }
    }

    /// Set the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the raw code.
    pub fn with_code(mut self, raw_code: i64) -> Self {
        self.raw_code = raw_code;
        self
    }

    /// Set the origin location.
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Set the call chain, outermost call first.
    pub fn with_frames(mut self, frames: Vec<StackFrame>) -> Self {
        self.frames = frames;
        self
    }
}

/// Raw error shape received from the host runtime.
///
/// This is the wire form of both the recoverable-error channel and the
/// "last raw error" query answered at process exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawError {
    /// Host severity integer; interpreted via [`crate::Severity::from_raw`].
    pub severity: i64,
    /// Error message.
    pub message: String,
    /// File the error was raised in, when known.
    pub file: Option<String>,
    /// Line the error was raised on, when known.
    pub line: Option<u32>,
}
