//! Comment formatting for the `/* ... */` documentation blocks.
//!
//! Pure string helpers, no I/O.

use std::borrow::Cow;

/// Leading marker of every line inside a documentation block.
pub const COMMENT_MARKER: &str = " *";

/// Indent of slot annotations (`name : text`) after the marker.
pub const FIELD_INDENT: usize = 4;

const FIELD_SEPARATOR: &str = " : ";

/// Strip one pair of surrounding double quotes and unescape `\"` inside.
///
/// Text that is not wrapped in quotes is returned unchanged.
pub fn unquote(raw: &str) -> Cow<'_, str> {
    match raw
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => Cow::Owned(inner.replace("\\\"", "\"")),
        None => Cow::Borrowed(raw),
    }
}

/// Lines of an (already unquoted) description.
///
/// The text as a whole is trimmed, then each line loses trailing whitespace
/// only. Blank text yields no lines.
pub fn lines(text: &str) -> impl Iterator<Item = &str> {
    let text = text.trim();
    (!text.is_empty())
        .then_some(text)
        .into_iter()
        .flat_map(|t| t.split('\n'))
        .map(str::trim_end)
}

/// Append one comment line, dropping any trailing whitespace.
pub fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Append lines where the first continues the current text at `first_prefix`
/// and the rest start at column `marker + indent`.
fn push_continued<'a>(
    out: &mut String,
    first_prefix: &str,
    indent: usize,
    mut rest: impl Iterator<Item = &'a str>,
) {
    let first = rest.next().unwrap_or("");
    push_line(out, &format!("{first_prefix}{first}"));
    let pad = " ".repeat(indent);
    for line in rest {
        push_line(out, &format!("{COMMENT_MARKER}{pad}{line}"));
    }
}

/// Render a `name : text` annotation.
///
/// Continuation lines are padded so their text starts in the same column as
/// the first line's text.
pub fn push_field(out: &mut String, indent: usize, name: &str, description: &str) {
    let text = unquote(description);
    let prefix = format!(
        "{COMMENT_MARKER}{pad}{name}{FIELD_SEPARATOR}",
        pad = " ".repeat(indent)
    );
    push_continued(
        out,
        &prefix,
        indent + name.len() + FIELD_SEPARATOR.len(),
        lines(&text),
    );
}

/// Render free text under a section header, first line at `indent`,
/// continuation lines directly after the marker.
pub fn push_block(out: &mut String, indent: usize, text: &str) {
    let text = unquote(text);
    let prefix = format!("{COMMENT_MARKER}{}", " ".repeat(indent));
    push_continued(out, &prefix, 0, lines(&text));
}

/// Render free text with every line as ` * line`.
pub fn push_paragraph(out: &mut String, text: &str) {
    let text = unquote(text);
    for line in lines(&text) {
        push_line(out, &format!("{COMMENT_MARKER} {line}"));
    }
}
