//! Content-line folding (RFC 5545 §3.1) and TEXT value escaping.
//!
//! Widths are counted in characters, not UTF-8 octets. A chunk boundary
//! never falls inside a `char`.

/// RFC 5545 recommends 75 octets; we count characters.
pub const DEFAULT_FOLD_WIDTH: usize = 75;

/// Smallest width that still leaves room for one payload character after
/// the continuation space.
pub const MIN_FOLD_WIDTH: usize = 2;

/// Fold `text` into content lines of at most `width` characters.
///
/// `text` is first split on its own line breaks. Each resulting sub-line is
/// cut into a first chunk of `width` characters followed by chunks of
/// `width - 1` characters. Every emitted line except the very first one of
/// the whole fold is prefixed with a single space, including the first chunk
/// of a later sub-line.
pub fn fold(text: &str, width: usize) -> Vec<String> {
    let width = width.max(MIN_FOLD_WIDTH);
    let mut folded = Vec::new();

    for sub_line in text.split('\n') {
        let sub_line = sub_line.strip_suffix('\r').unwrap_or(sub_line);

        for chunk in chunks(sub_line, width) {
            if folded.is_empty() {
                folded.push(chunk.to_string());
            } else {
                folded.push(format!(" {chunk}"));
            }
        }
    }

    folded
}

/// Greedy split: `width` chars, then `width - 1` chars per chunk.
fn chunks(line: &str, width: usize) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = line;
    let mut budget = width;

    loop {
        match rest.char_indices().nth(budget) {
            Some((idx, _)) => {
                out.push(&rest[..idx]);
                rest = &rest[idx..];
                budget = width - 1;
            }
            None => {
                out.push(rest);
                break;
            }
        }
    }

    out
}

/// Remove every line break that is followed by a single blank (space or tab).
pub fn unfold(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        let is_break = match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                true
            }
            '\n' => true,
            _ => false,
        };

        if !is_break {
            out.push(c);
            continue;
        }

        if matches!(chars.peek(), Some(' ') | Some('\t')) {
            chars.next();
        } else {
            out.push_str(if c == '\r' { "\r\n" } else { "\n" });
        }
    }

    out
}

/// Whether a physical line continues the previous logical property.
pub fn is_continuation(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

/// The line terminator used by `raw`: CRLF if any line ends with it, LF otherwise.
pub fn line_ending(raw: &str) -> &'static str {
    if raw.contains("\r\n") { "\r\n" } else { "\n" }
}

/// Escape a TEXT property value.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }

    out
}

/// Undo [`escape_text`]. Unknown escapes are kept verbatim.
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(escaped @ ('\\' | ';' | ',')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
