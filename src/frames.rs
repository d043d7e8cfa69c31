//! Per-frame HTML rendering for the backtrace section.
//!
//! Each frame shows its call site, the qualified callable, and a collapsible
//! argument table. Argument labels come from an injected
//! [`ParameterNameResolver`]; when a callable cannot be resolved the labels
//! degrade to positional `#0`, `#1`, … without failing the page.

use crate::excerpt::{DEFAULT_WINDOW, render_excerpt};
use crate::fault::StackFrame;
use crate::highlight::escape_html;

/// Function names that represent include-style operations rather than calls.
const INCLUDE_OPS: &[&str] = &["include", "include_once", "require", "require_once"];

/// Sentinel substring marking anonymous/closure callables, which have no
/// declared parameter names to resolve.
const ANONYMOUS_SENTINEL: &str = "{closure}";

/// Call-site text for frames with no source location.
const INTERNAL_SITE: &str = "{internal code}";

/// Recovers declared parameter names for a resolvable callable.
///
/// Implementations answer `None` for callables they cannot resolve; the
/// formatter then falls back to positional labels. Hosts with runtime
/// introspection supply their own implementation; tests use a static map.
pub trait ParameterNameResolver {
    /// Ordered declared parameter names of `function` (optionally scoped to
    /// `class`), or `None` when the callable is unresolvable.
    fn parameter_names(&self, class: Option<&str>, function: &str) -> Option<Vec<String>>;
}

/// Resolver that never resolves anything; every argument gets a positional
/// label.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullParameterNameResolver;

impl ParameterNameResolver for NullParameterNameResolver {
    fn parameter_names(&self, _class: Option<&str>, _function: &str) -> Option<Vec<String>> {
        None
    }
}

fn is_anonymous(function: &str) -> bool {
    function.contains(ANONYMOUS_SENTINEL)
}

fn is_include_op(function: &str) -> bool {
    INCLUDE_OPS.contains(&function)
}

fn site_text(frame: &StackFrame) -> String {
    let readable = frame
        .file()
        .is_some_and(|file| std::fs::metadata(file).is_ok());
    match frame.file() {
        Some(file) if readable => match frame.function_name() {
            Some(op) if is_include_op(op) => {
                format!("{} {}", escape_html(op), escape_html(file))
            }
            _ => format!("{} : {}", escape_html(file), frame.line().unwrap_or(0)),
        },
        _ => INTERNAL_SITE.to_string(),
    }
}

fn qualifier_text(frame: &StackFrame) -> Option<String> {
    let function = frame.function_name()?;
    match (frame.class_name(), frame.call_type()) {
        (Some(class), Some(call_type)) => Some(format!(
            "{}{}{}",
            escape_html(class),
            call_type.symbol(),
            escape_html(function)
        )),
        _ => Some(escape_html(function)),
    }
}

fn argument_labels(frame: &StackFrame, resolver: &dyn ParameterNameResolver) -> Vec<String> {
    let resolved = match frame.function_name() {
        Some(function) if !is_anonymous(function) => {
            resolver.parameter_names(frame.class_name(), function)
        }
        _ => None,
    };
    if resolved.is_none() {
        log::debug!(
            "parameter names unresolvable for {:?}, using positional labels",
            frame.function_name()
        );
    }
    (0..frame.args().len())
        .map(|i| {
            resolved
                .as_ref()
                .and_then(|names| names.get(i).cloned())
                .unwrap_or_else(|| format!("#{i}"))
        })
        .collect()
}

/// Render one backtrace entry as an `<li>` fragment.
///
/// `page_id` namespaces the collapsible argument block id so fragments from
/// different pages never collide; `index` keeps ids unique across frames of
/// one page.
pub fn render_frame(
    frame: &StackFrame,
    resolver: &dyn ParameterNameResolver,
    page_id: &str,
    index: usize,
) -> String {
    let mut out = String::from("<li>");
    out.push_str(&format!("<span class=\"site\">{}</span> ", site_text(frame)));

    if let Some(qualifier) = qualifier_text(frame) {
        if frame.args().is_empty() {
            out.push_str(&format!("<span class=\"call\">{qualifier}()</span>"));
        } else {
            let block_id = format!("{page_id}args{index}");
            out.push_str(&format!(
                "<span class=\"call\">{qualifier}( <a href=\"#\" \
                 onclick=\"return toggle('{block_id}')\">&hellip;</a> )</span>"
            ));
            out.push_str(&format!(
                "<div id=\"{block_id}\" class=\"args\" style=\"display:none\"><table>"
            ));
            let labels = argument_labels(frame, resolver);
            for (label, value) in labels.iter().zip(frame.args()) {
                out.push_str(&format!(
                    "<tr><td class=\"name\">{}</td><td><pre>{}</pre></td></tr>",
                    escape_html(label),
                    escape_html(value)
                ));
            }
            out.push_str("</table></div>");
        }
    }

    append_method_excerpt(frame, &mut out);
    out.push_str("</li>");
    out
}

/// Method frames with a readable source file also get their own excerpt;
/// free functions and include frames do not, to bound the page size.
fn append_method_excerpt(frame: &StackFrame, out: &mut String) {
    if frame.class_name().is_none() {
        return;
    }
    if let (Some(file), Some(line)) = (frame.file(), frame.line())
        && let Some(fragment) = render_excerpt(file, line, DEFAULT_WINDOW)
    {
        out.push_str(&fragment);
    }
}
