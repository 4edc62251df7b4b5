//! Targeted DESCRIPTION splice over raw ICS text.
//!
//! The raw block is treated as an opaque sequence of physical lines. Only the
//! lines belonging to the first DESCRIPTION property are replaced; every other
//! byte, including line terminators, is copied through unchanged.

use super::fold::{escape_text, fold, is_continuation, line_ending};

pub const DESCRIPTION: &str = "DESCRIPTION";

/// Whether `line` starts the property `name`: the name followed directly by a
/// parameter delimiter (`;`) or the value delimiter (`:`). Case-sensitive.
pub fn introduces_property(line: &str, name: &str) -> bool {
    line.strip_prefix(name)
        .is_some_and(|rest| rest.starts_with(';') || rest.starts_with(':'))
}

/// Replace the DESCRIPTION block of `raw` with `narrative`, folded to `width`.
///
/// Returns `None` when `raw` has no DESCRIPTION line, in which case nothing
/// was rewritten.
pub fn replace_description(raw: &str, narrative: &str, width: usize) -> Option<String> {
    let lines: Vec<&str> = raw.split_inclusive('\n').collect();

    let start = lines
        .iter()
        .position(|line| introduces_property(line, DESCRIPTION))?;

    // The span ends at the first later line that does not begin with a blank
    let end = lines[start + 1..]
        .iter()
        .position(|line| !is_continuation(line))
        .map_or(lines.len(), |offset| start + 1 + offset);

    let eol = match terminator(lines[start]) {
        "" => line_ending(raw),
        eol => eol,
    };

    let property = format!("{DESCRIPTION}:{}", escape_text(narrative));
    let replacement = fold(&property, width).join(eol);

    let mut out = String::with_capacity(raw.len() + replacement.len());
    for line in &lines[..start] {
        out.push_str(line);
    }
    out.push_str(&replacement);
    out.push_str(terminator(lines[end - 1]));
    for line in &lines[end..] {
        out.push_str(line);
    }

    Some(out)
}

fn terminator(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}
