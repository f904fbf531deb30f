//! Word boundary scanner.
//!
//! Three offset-based scans over a [`Document`]:
//!
//! | Scan                   | Direction | Bounded by | Used by                 |
//! |------------------------|-----------|------------|-------------------------|
//! | [`prev_word_start`]    | backward  | line       | WordLeft, WordBackspace |
//! | [`next_word_start`]    | forward   | line       | DeleteWord              |
//! | [`scintilla_word_end`] | forward   | document   | WordRight               |
//!
//! A word is a run of chars of the same [`CharClass`]: letters, digits and
//! underscore form one class, other non-blank chars another, so
//! `hello.world` holds three words. Every scan returns its input unchanged
//! at offset 0 and at the end of the text.

use n_text::buffer::is_line_break;
use n_text::Document;

// ---------------------------------------------------------------------------
// Character classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Letters, digits, underscore.
    Word,
    /// Non-blank, non-word chars (operators, brackets, etc.).
    Punctuation,
    /// Whitespace within a line.
    Blank,
    /// Any line break char.
    Newline,
}

#[must_use]
pub fn classify(ch: char) -> CharClass {
    if is_line_break(ch) {
        CharClass::Newline
    } else if ch.is_whitespace() {
        CharClass::Blank
    } else if ch.is_alphanumeric() || ch == '_' {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

fn class_at(doc: &Document, offset: usize) -> Option<CharClass> {
    doc.char_at(offset).map(classify)
}

// ---------------------------------------------------------------------------
// Scans
// ---------------------------------------------------------------------------

/// Start of the word before `offset`, never leaving the line.
///
/// Walks back over the run of the char just before `offset`. If that run
/// was blank, keeps going over the run before it, so the caret lands on a
/// word start rather than at the end of the whitespace.
#[must_use]
pub fn prev_word_start(doc: &Document, offset: usize) -> usize {
    let offset = offset.min(doc.text_length());
    if offset == 0 {
        return 0;
    }
    let line_start = doc.segment_for_offset(offset).offset;
    let mut idx = offset;

    let run = |idx: &mut usize| -> Option<CharClass> {
        let class = class_at(doc, idx.checked_sub(1)?)?;
        while *idx > line_start && class_at(doc, *idx - 1) == Some(class) {
            *idx -= 1;
        }
        Some(class)
    };

    if run(&mut idx) == Some(CharClass::Blank) && idx > line_start {
        run(&mut idx);
    }
    idx
}

/// Start of the next word after `offset`, never leaving the line.
///
/// Skips the rest of the current run, then any blanks after it. At the end
/// of line content this returns `offset` itself.
#[must_use]
pub fn next_word_start(doc: &Document, offset: usize) -> usize {
    let offset = offset.min(doc.text_length());
    let seg = doc.segment_for_offset(offset);
    let end = seg.end_offset();
    let mut idx = offset;

    if let Some(class) = class_at(doc, idx) {
        while idx < end && class_at(doc, idx) == Some(class) {
            idx += 1;
        }
    }
    while idx < end && class_at(doc, idx) == Some(CharClass::Blank) {
        idx += 1;
    }
    idx
}

/// End of the word at `offset`, the way Scintilla-style editors move
/// word-right: skip the current run, then blanks, stopping in front of a
/// line break. Bounded only by the end of the document.
#[must_use]
pub fn scintilla_word_end(doc: &Document, offset: usize) -> usize {
    let len = doc.text_length();
    let mut idx = offset.min(len);
    let Some(class) = class_at(doc, idx) else {
        return idx;
    };
    if class == CharClass::Newline {
        return idx;
    }
    while idx < len && class_at(doc, idx) == Some(class) {
        idx += 1;
    }
    while idx < len && class_at(doc, idx) == Some(CharClass::Blank) {
        idx += 1;
    }
    idx
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
