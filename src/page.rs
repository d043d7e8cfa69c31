//! Composition of the full diagnostic HTML document.
//!
//! Rendering is a pure function of the fault plus a fresh [`RenderContext`];
//! everything is buffered into one string and the document is always
//! complete and self-closed, even when sub-renders degrade.

use chrono::Utc;
use uuid::Uuid;

use crate::codes::resolve;
use crate::excerpt::{DEFAULT_WINDOW, render_excerpt};
use crate::fault::Fault;
use crate::frames::{ParameterNameResolver, render_frame};
use crate::highlight::escape_html;

/// Inline stylesheet for the diagnostic page.
const STYLE: &str = "\
body{font-family:sans-serif;margin:2em;background:#fff;color:#111}\
h1{font-size:1.4em;border-bottom:2px solid #b00;padding-bottom:.3em}\
.message{font-size:1.1em}\
.excerpt{background:#f7f7f7;border:1px solid #ddd;margin:.8em 0;overflow-x:auto}\
.excerpt pre{margin:.4em}\
.lineno{color:#999}\
.line.highlight{background:#fdd;display:inline-block;width:100%}\
.hl{color:#111}.kw{color:#00759e}.str{color:#a11}.com{color:#690}.num{color:#905}\
.backtrace li{margin:.5em 0}\
.site{color:#555}\
.args table{border-collapse:collapse;margin:.4em 0}\
.args td{border:1px solid #ddd;padding:.2em .5em;vertical-align:top}\
.args td.name{font-weight:bold}\
footer{margin-top:2em;color:#888;font-size:.85em}";

/// Inline script backing the collapsible argument blocks.
const SCRIPT: &str = "\
function toggle(id){var e=document.getElementById(id);\
e.style.display=e.style.display=='none'?'block':'none';return false;}";

/// Ephemeral state for one page render.
///
/// The page id namespaces every collapsible block id so two concatenated
/// pages never collide. A context is created per render and dropped with it.
#[derive(Debug)]
pub struct RenderContext {
    page_id: String,
}

impl RenderContext {
    /// A context with a fresh unique page id.
    pub fn new() -> Self {
        RenderContext {
            page_id: Uuid::new_v4().simple().to_string(),
        }
    }

    /// Token namespacing this page's collapsible blocks.
    pub fn page_id(&self) -> &str {
        &self.page_id
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A fully composed diagnostic page plus its derived codes.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// The complete HTML document.
    pub html: String,
    /// HTTP-style status an embedder would answer with.
    pub status: u16,
    /// Process exit code for the terminate step.
    pub exit_code: i32,
}

/// Render the diagnostic document for `fault`.
///
/// `runtime_version` is the collaborator-supplied version string shown in
/// the footer.
pub fn render_page(
    fault: &Fault,
    resolver: &dyn ParameterNameResolver,
    runtime_version: &str,
) -> RenderedPage {
    let context = RenderContext::new();
    let (status, exit_code) = resolve(fault.raw_code);

    let title = if fault.raw_code != 0 {
        format!("{} #{}", fault.title, fault.raw_code)
    } else {
        fault.title.clone()
    };
    let title = escape_html(&title);

    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str(&format!("<style>{STYLE}</style>\n"));
    html.push_str(&format!("<script>{SCRIPT}</script>\n"));
    html.push_str("</head>\n<body>\n");

    html.push_str(&format!("<h1>{title}</h1>\n"));
    let message = fault.message.as_deref().unwrap_or("(null)");
    html.push_str(&format!(
        "<p class=\"message\">{}</p>\n",
        escape_html(message)
    ));

    if let Some(file) = &fault.file
        && let Some(fragment) = render_excerpt(file, fault.line.unwrap_or(1), DEFAULT_WINDOW)
    {
        html.push_str(&fragment);
        html.push('\n');
    }

    html.push_str("<h2>Backtrace</h2>\n<ol class=\"backtrace\">");
    for (index, frame) in fault.frames.iter().enumerate() {
        html.push_str(&render_frame(frame, resolver, context.page_id(), index));
        html.push('\n');
    }
    html.push_str("</ol>\n");

    html.push_str(&format!(
        "<footer>Rendered {} &middot; runtime {}</footer>\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        escape_html(runtime_version)
    ));
    html.push_str("</body>\n</html>\n");

    RenderedPage {
        html,
        status,
        exit_code,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use crate::fault::{CallType, StackFrame};
    use crate::frames::NullParameterNameResolver;

    use super::*;

    fn render(fault: &Fault) -> RenderedPage {
        render_page(fault, &NullParameterNameResolver, "1.2.3")
    }

    #[test]
    fn test_title_carries_code_suffix_when_nonzero() {
        let page = render(&Fault::new("Fatal Error").with_code(404));
        assert!(page.html.contains("<title>Fatal Error #404</title>"));
        assert!(page.html.contains("<h1>Fatal Error #404</h1>"));
    }

    #[test]
    fn test_title_has_no_suffix_for_code_zero() {
        let page = render(&Fault::new("panic"));
        assert!(page.html.contains("<title>panic</title>"));
    }

    #[test]
    fn test_missing_message_renders_null_placeholder() {
        let page = render(&Fault::new("Notice"));
        assert!(page.html.contains("<p class=\"message\">(null)</p>"));
    }

    #[test]
    fn test_codes_come_from_resolver() {
        let page = render(&Fault::new("Fatal Error"));
        assert_eq!(page.status, 500);
        assert_eq!(page.exit_code, 9);

        let page = render(&Fault::new("Not Found").with_code(404));
        assert_eq!(page.status, 404);
        assert_eq!(page.exit_code, 1);
    }

    #[test]
    fn test_document_is_complete_even_with_unreadable_source() {
        let fault = Fault::new("Warning").at("/no/such/file.src", 3);
        let page = render(&fault);
        assert!(!page.html.contains("class=\"excerpt\""));
        assert!(page.html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_readable_fault_location_gets_excerpt() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"one\ntwo\nthree\n").unwrap();
        file.flush().unwrap();
        let fault = Fault::new("Warning").at(file.path().to_str().unwrap(), 2);
        let page = render(&fault);
        assert!(page.html.contains("class=\"excerpt\""));
        assert!(page.html.contains("class=\"line highlight\""));
    }

    #[test]
    fn test_backtrace_preserves_frame_order() {
        let fault = Fault::new("Fatal Error").with_frames(vec![
            StackFrame::function("innermost"),
            StackFrame::method("App", CallType::Instance, "run"),
            StackFrame::internal(),
        ]);
        let page = render(&fault);
        let first = page.html.find("innermost").unwrap();
        let second = page.html.find("App.run").unwrap();
        let third = page.html.find("{internal code}").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_empty_backtrace_renders_empty_list() {
        let page = render(&Fault::new("panic"));
        assert!(page.html.contains("<ol class=\"backtrace\"></ol>"));
    }

    #[test]
    fn test_footer_shows_runtime_version() {
        let page = render(&Fault::new("panic"));
        assert!(page.html.contains("runtime 1.2.3"));
        assert!(page.html.contains("Rendered "));
    }

    #[test]
    fn test_page_ids_are_unique_per_render() {
        let fault = Fault::new("Fatal Error").with_frames(vec![
            StackFrame::function("f").with_args(vec!["1".into()]),
        ]);
        let a = render(&fault);
        let b = render(&fault);
        let id_of = |html: &str| {
            let start = html.find("id=\"").unwrap() + 4;
            html[start..start + html[start..].find('"').unwrap()].to_string()
        };
        assert_ne!(id_of(&a.html), id_of(&b.html));
    }

    #[test]
    fn test_render_context_ids_differ() {
        assert_ne!(RenderContext::new().page_id(), RenderContext::new().page_id());
    }
}
