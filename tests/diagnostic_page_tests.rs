//! End-to-end tests for the capture pipeline: raw fault in, complete
//! diagnostic page and derived codes out.

use std::io::Write;

use fault_page::{
    CallType, CaptureConfig, ErrorDisposition, Fault, FaultCaptureRegistry, RawError, Severity,
    StackFrame,
};
use tempfile::NamedTempFile;

fn registry() -> std::sync::Arc<FaultCaptureRegistry> {
    FaultCaptureRegistry::new(CaptureConfig {
        report_mask: Severity::all(),
        runtime_version: "host 8.1".to_string(),
    })
}

fn source_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// A bare fault with code 0, no location and no frames still renders a
/// complete page and derives exit code 9 (status 500).
#[test]
fn test_minimal_fault_renders_complete_page() {
    let fault = Fault::new("Fatal Error");
    let page = registry().capture(&fault);

    assert_eq!(page.status, 500);
    assert_eq!(page.exit_code, 9);
    assert!(page.html.contains("<p class=\"message\">(null)</p>"));
    assert!(!page.html.contains("class=\"excerpt\""));
    assert!(page.html.contains("<ol class=\"backtrace\"></ol>"));
    assert!(page.html.trim_end().ends_with("</html>"));
}

/// A promoted recoverable error flows through the same path as any fault
/// and carries its severity bits as the raw code.
#[test]
fn test_promoted_error_end_to_end() {
    let file = source_file("let retries = 0;\nlet total = count / retries;\nreturn total;\n");
    let registry = registry();
    let raw = RawError {
        severity: Severity::WARNING.bits() as i64,
        message: "division by zero".to_string(),
        file: Some(file.path().to_str().unwrap().to_string()),
        line: Some(2),
    };

    let ErrorDisposition::Promoted(fault) = registry.error_disposition(&raw) else {
        panic!("expected promotion");
    };
    let page = registry.capture(&fault);

    assert!(page.html.contains("Warning #2"));
    assert!(page.html.contains("division by zero"));
    assert!(page.html.contains("class=\"line highlight\""));
    assert_eq!(page.status, 500);
    assert_eq!(page.exit_code, 11);
}

/// Masked severities never produce a page.
#[test]
fn test_masked_error_is_a_no_op() {
    let registry = FaultCaptureRegistry::new(CaptureConfig {
        report_mask: Severity::fatal_classes(),
        runtime_version: "host 8.1".to_string(),
    });
    let raw = RawError {
        severity: Severity::DEPRECATED.bits() as i64,
        message: "old api".to_string(),
        file: None,
        line: None,
    };
    assert_eq!(registry.error_disposition(&raw), ErrorDisposition::Suppressed);
}

/// A full fault: location excerpt, mixed frame kinds, collapsible args.
#[test]
fn test_rich_fault_page_composition() {
    let file = source_file(
        "class Session {\n    fn open(path, mode) {\n        fail();\n    }\n}\nmain();\n",
    );
    let path = file.path().to_str().unwrap().to_string();

    let fault = Fault::new("Fatal Error")
        .with_message("could not open session")
        .with_code(503)
        .at(&path, 3)
        .with_frames(vec![
            StackFrame::method("Session", CallType::Instance, "open")
                .at(&path, 2)
                .with_args(vec!["\"/data/app.db\"".to_string(), "\"rw\"".to_string()]),
            StackFrame::function("main").at(&path, 6),
            StackFrame::internal(),
        ]);

    let page = registry().capture(&fault);

    // Plausible HTTP code passes through with the generic exit code.
    assert_eq!(page.status, 503);
    assert_eq!(page.exit_code, 1);

    assert!(page.html.contains("Fatal Error #503"));
    assert!(page.html.contains("could not open session"));
    assert!(page.html.contains("Session.open"));
    assert!(page.html.contains("main()"));
    assert!(page.html.contains("{internal code}"));
    // Method frame args are collapsible and escaped.
    assert!(page.html.contains("args0"));
    assert!(page.html.contains("&quot;/data/app.db&quot;"));
    // Fault excerpt plus the method frame's own excerpt.
    assert!(page.html.matches("class=\"excerpt\"").count() >= 2);
    assert!(page.html.trim_end().ends_with("</html>"));
}

/// Shutdown-channel faults convert only for fatal classes.
#[test]
fn test_shutdown_fatal_conversion() {
    use fault_page::FaultNormalizer;

    let normalizer = FaultNormalizer::new(Severity::all());
    let fatal = RawError {
        severity: Severity::COMPILE_FATAL.bits() as i64,
        message: "bad opcode".to_string(),
        file: None,
        line: None,
    };
    let benign = RawError {
        severity: Severity::USER_NOTICE.bits() as i64,
        message: "fyi".to_string(),
        file: None,
        line: None,
    };
    assert!(normalizer.from_shutdown(&fatal).is_some());
    assert!(normalizer.from_shutdown(&benign).is_none());
}

/// Two renders of the same fault differ only in page id and timestamp; the
/// frame content is stable.
#[test]
fn test_render_is_stable_modulo_page_id() {
    let fault = Fault::new("panic").with_message("boom");
    let registry = registry();
    let a = registry.capture(&fault);
    let b = registry.capture(&fault);
    assert_eq!(a.status, b.status);
    assert_eq!(a.exit_code, b.exit_code);
    assert!(a.html.contains("boom") && b.html.contains("boom"));
}
