//! Greedy line breaking

use log::trace;

use crate::fixed::Fixed;
use crate::font::Face;

/// One line produced by [`wrap`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrappedLine {
    /// The text of the line, without leading or trailing whitespace.
    pub text: String,
    /// Sum of glyph advances and kerning up to the end of the line.
    pub width: Fixed,
}

/// Breaks `text` into lines no wider than `limit`.
///
/// Lines are filled greedily. A line that would overflow ends at the last whitespace run that
/// follows a visible character on it, and that whitespace is dropped; if there is no such run, the
/// line is broken right before the character that did not fit. Characters without a glyph in
/// `face` take up no space and do not take part in kerning.
///
/// Returns an empty vector for empty or blank text, and `None` if some character is wider than
/// `limit` on its own, since no line could then make progress.
pub fn wrap<F: Face + ?Sized>(face: &F, text: &str, limit: Fixed) -> Option<Vec<WrappedLine>> {
    let mut lines = Vec::new();
    let mut rest = text.trim();
    while !rest.is_empty() {
        let (line, width, remaining) = first_line(face, rest, limit);
        let line = line.trim_end();
        if line.is_empty() {
            trace!("{rest:?} cannot start a line within {limit}");
            return None;
        }
        lines.push(WrappedLine {
            text: line.to_owned(),
            width,
        });
        rest = remaining.trim_start();
    }
    trace!("wrapped {text:?} into {} lines at {}px", lines.len(), face.size());
    Some(lines)
}

/// Splits off the first line of `text`, which must not start with whitespace, returning the line,
/// its width and the remaining text.
fn first_line<'a, F: Face + ?Sized>(
    face: &F,
    text: &'a str,
    limit: Fixed,
) -> (&'a str, Fixed, &'a str) {
    let mut width = Fixed::ZERO;
    let mut last_break = None;
    let mut prev: Option<char> = None;
    for (i, c) in text.char_indices() {
        let Some(mut advance) = face.glyph_advance(c) else {
            continue;
        };
        if let Some(prev) = prev {
            advance += face.kern(prev, c);
        }
        if c.is_whitespace() && !prev.is_some_and(char::is_whitespace) {
            last_break = Some((i, width));
        }
        if width.saturating_add(advance) > limit {
            let (end, width) = last_break.unwrap_or((i, width));
            return (&text[..end], width, &text[end..]);
        }
        width += advance;
        prev = Some(c);
    }
    (text, width, "")
}
