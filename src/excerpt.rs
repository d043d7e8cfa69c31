//! Highlighted, line-numbered source excerpts around a failing line.
//!
//! The whole file is highlighted first and the window sliced out of the
//! highlighted stream, so coloring that depends on multi-line constructs
//! survives the cut. Slicing can strand open span tags inside the window;
//! a running counter re-balances the fragment by appending the closers the
//! window owes.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::CaptureError;
use crate::highlight::{SPAN_CLOSE, WRAPPER_OPEN, highlight};

/// Default number of source lines shown in an excerpt.
pub const DEFAULT_WINDOW: usize = 15;

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

/// Matches any single HTML tag, for extracting/stripping the target line's
/// markup.
fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("Failed to compile tag regex"))
}

fn read_source(path: &str) -> Result<String, CaptureError> {
    if path.is_empty() {
        return Err(CaptureError::NoSourcePath);
    }
    std::fs::read_to_string(path).map_err(|source| CaptureError::SourceRead {
        path: path.to_string(),
        source,
    })
}

/// Render a highlighted excerpt of `window` lines centered on `target_line`
/// (1-based).
///
/// Returns `None` when the path is empty or unreadable; the caller degrades
/// to "no excerpt" and the page is still produced.
pub fn render_excerpt(path: &str, target_line: u32, window: usize) -> Option<String> {
    let raw = match read_source(path) {
        Ok(source) => source,
        Err(err) => {
            log::debug!("source excerpt unavailable: {err}");
            return None;
        }
    };
    let source = raw.replace("\r\n", "\n").replace('\r', "\n");

    let highlighted = highlight(&source);
    let inner = highlighted
        .strip_prefix(WRAPPER_OPEN)
        .and_then(|s| s.strip_suffix(SPAN_CLOSE))
        .unwrap_or(&highlighted);

    let mut lines: Vec<&str> = inner.split('\n').collect();
    if source.ends_with('\n') {
        lines.pop();
    }

    let target = target_line.max(1) as usize;
    let start = target.saturating_sub(window.div_ceil(2)).min(lines.len());
    let shown = &lines[start..(start + window).min(lines.len())];
    let width = (start + shown.len()).max(1).to_string().len();

    let mut fragment = String::from("<div class=\"excerpt\"><pre>");
    fragment.push_str(WRAPPER_OPEN);

    // Owed closers for the window; seeded with the wrapper re-opened above.
    let mut spans: i32 = 1;
    for (i, line) in shown.iter().enumerate() {
        let number = start + i + 1;
        spans += line.matches("<span").count() as i32;
        spans -= line.matches(SPAN_CLOSE).count() as i32;

        if number == target {
            // Pull the tags out of the failing line so the highlight row is
            // plain text, then re-append them to keep the stream balanced.
            let tags: String = tag_regex()
                .find_iter(line)
                .map(|tag| tag.as_str())
                .collect();
            let text = tag_regex().replace_all(line, "");
            fragment.push_str(&format!(
                "<span class=\"line highlight\"><span class=\"lineno\">{number:0width$}</span> {text}</span>{tags}\n"
            ));
        } else {
            fragment.push_str(&format!(
                "<span class=\"lineno\">{number:0width$}</span> {line}\n"
            ));
        }
    }

    fragment.push_str(&SPAN_CLOSE.repeat(spans.max(0) as usize));
    fragment.push_str("</pre></div>");
    Some(fragment)
}
