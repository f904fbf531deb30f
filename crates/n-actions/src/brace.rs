//! Bracket matching for GotoMatchingBrace.
//!
//! The bracket inspected depends on [`BracketStyle`]: with `After` it is
//! the char just before the caret, with `Before` the char under it. The
//! caret lands on the same side of the partner, so pressing the key twice
//! returns to where it started.

use n_text::{BracketStyle, Document};

use crate::context::EditContext;

const PAIRS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

/// Offset of the bracket matching the one at `offset`, counting nesting
/// and searching across lines. `None` when the char is not a bracket or
/// has no partner.
#[must_use]
pub fn find_matching_bracket(doc: &Document, offset: usize) -> Option<usize> {
    let ch = doc.char_at(offset)?;
    PAIRS.iter().find_map(|&(open, close)| {
        if ch == open {
            find_closing(doc, offset, open, close)
        } else if ch == close {
            find_opening(doc, offset, open, close)
        } else {
            None
        }
    })
}

/// Search forward from the open bracket at `start` for its close.
fn find_closing(doc: &Document, start: usize, open: char, close: char) -> Option<usize> {
    let mut depth: usize = 0;
    for i in start + 1..doc.text_length() {
        match doc.char_at(i) {
            Some(ch) if ch == open => depth += 1,
            Some(ch) if ch == close => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

/// Search backward from the close bracket at `start` for its open.
fn find_opening(doc: &Document, start: usize, open: char, close: char) -> Option<usize> {
    let mut depth: usize = 0;
    for i in (0..start).rev() {
        match doc.char_at(i) {
            Some(ch) if ch == close => depth += 1,
            Some(ch) if ch == open => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

pub fn goto_matching_brace(cx: &mut EditContext<'_>) {
    let offset = cx.caret_offset();
    let style = cx.doc.properties().bracket_style;
    let near = match style {
        BracketStyle::After => offset.checked_sub(1),
        BracketStyle::Before => Some(offset),
    };
    let Some(partner) = near.and_then(|near| find_matching_bracket(cx.doc, near)) else {
        return;
    };
    let target = match style {
        BracketStyle::After => partner + 1,
        BracketStyle::Before => partner,
    };
    cx.place_caret_at_offset(target);
    cx.set_desired_column();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
