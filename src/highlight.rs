//! Whole-file syntax highlighting into `<span>`-marked HTML.
//!
//! The excerpt renderer always highlights the complete file and slices the
//! result by line, so multi-line constructs (block comments, strings that
//! run across lines) keep their coloring inside any window. Span tags for
//! such constructs deliberately stay open across newlines; the excerpt
//! renderer is responsible for re-balancing whatever window it cuts out.

/// Opening tag of the wrapper span surrounding a whole highlighted file.
pub const WRAPPER_OPEN: &str = "<span class=\"hl\">";

/// Closing tag for any highlight span.
pub const SPAN_CLOSE: &str = "</span>";

/// Keywords shared by the C-family languages the host runtimes execute.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "break", "case", "catch", "class", "const", "continue", "default", "do",
    "else", "enum", "extends", "false", "final", "finally", "fn", "for", "function", "if", "impl",
    "import", "in", "interface", "let", "loop", "match", "new", "null", "private", "protected",
    "pub", "public", "return", "self", "static", "struct", "switch", "this", "throw", "trait",
    "true", "try", "use", "var", "while", "yield",
];

/// Escape a string for inclusion in HTML text or attribute context.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        push_escaped(&mut out, c);
    }
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

/// Highlight a whole source file into span-marked HTML.
///
/// The output is wrapped in [`WRAPPER_OPEN`]..[`SPAN_CLOSE`] and preserves
/// every newline of the input, so it can be split back into lines.
pub fn highlight(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len() * 2);
    out.push_str(WRAPPER_OPEN);

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            i = line_comment(&chars, i, &mut out);
        } else if c == '#' {
            i = line_comment(&chars, i, &mut out);
        } else if c == '/' && chars.get(i + 1) == Some(&'*') {
            i = block_comment(&chars, i, &mut out);
        } else if c == '"' || c == '\'' {
            i = string_literal(&chars, i, &mut out);
        } else if c.is_ascii_digit() {
            i = number(&chars, i, &mut out);
        } else if c == '_' || c.is_alphabetic() {
            i = word(&chars, i, &mut out);
        } else {
            push_escaped(&mut out, c);
            i += 1;
        }
    }

    out.push_str(SPAN_CLOSE);
    out
}

/// Comment running to end of line; the span closes before the newline.
fn line_comment(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push_str("<span class=\"com\">");
    let mut i = start;
    while i < chars.len() && chars[i] != '\n' {
        push_escaped(out, chars[i]);
        i += 1;
    }
    out.push_str(SPAN_CLOSE);
    i
}

/// `/* .. */` comment; may span lines, the span stays open across newlines.
fn block_comment(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push_str("<span class=\"com\">");
    let mut i = start;
    while i < chars.len() {
        if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
            out.push_str("*/");
            i += 2;
            break;
        }
        push_escaped(out, chars[i]);
        i += 1;
    }
    out.push_str(SPAN_CLOSE);
    i
}

/// Quoted string; backslash escapes, may span lines, unterminated strings
/// run to end of input.
fn string_literal(chars: &[char], start: usize, out: &mut String) -> usize {
    let quote = chars[start];
    out.push_str("<span class=\"str\">");
    push_escaped(out, quote);
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            push_escaped(out, c);
            if let Some(&next) = chars.get(i + 1) {
                push_escaped(out, next);
            }
            i += 2;
            continue;
        }
        push_escaped(out, c);
        i += 1;
        if c == quote {
            break;
        }
    }
    out.push_str(SPAN_CLOSE);
    i
}

fn number(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push_str("<span class=\"num\">");
    let mut i = start;
    while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '.')
    {
        push_escaped(out, chars[i]);
        i += 1;
    }
    out.push_str(SPAN_CLOSE);
    i
}

fn word(chars: &[char], start: usize, out: &mut String) -> usize {
    let mut i = start;
    let mut ident = String::new();
    while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
        ident.push(chars[i]);
        i += 1;
    }
    if KEYWORDS.contains(&ident.as_str()) {
        out.push_str("<span class=\"kw\">");
        out.push_str(&ident);
        out.push_str(SPAN_CLOSE);
    } else {
        out.push_str(&escape_html(&ident));
    }
    i
}
