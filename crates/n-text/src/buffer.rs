//! Text buffer — the line/offset model.
//!
//! A `Buffer` wraps a [`ropey::Rope`] and exposes the two coordinate systems
//! every edit action works in:
//!
//! - **Offsets**: absolute char indices into the whole text.
//! - **Positions**: `(line, col)` pairs, see [`Position`].
//!
//! Each line is described by a [`LineSegment`]: where it starts, how many
//! chars of content it has, and how long its terminator is. Segments tile
//! the text with no gaps, so `segment(n).next_offset() == segment(n + 1).offset`.
//!
//! The raw `insert`/`remove`/`replace` primitives here know nothing about
//! undo or read-only policy; [`Document`](crate::document::Document) layers
//! those on top.

use std::fmt;

use ropey::{Rope, RopeSlice};

use crate::position::Position;

// ---------------------------------------------------------------------------
// LineSegment
// ---------------------------------------------------------------------------

/// One line of the buffer: `offset` of its first char, `length` of its
/// content, `delimiter_length` of its terminator.
///
/// `delimiter_length` is 2 for `\r\n`, 1 for any single-char break and 0
/// only for the final line when the text does not end with a break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSegment {
    pub offset: usize,
    pub length: usize,
    pub delimiter_length: usize,
}

impl LineSegment {
    /// Content plus terminator.
    #[inline]
    #[must_use]
    pub const fn total_length(self) -> usize {
        self.length + self.delimiter_length
    }

    /// Offset just past the last content char (where the terminator starts).
    #[inline]
    #[must_use]
    pub const fn end_offset(self) -> usize {
        self.offset + self.length
    }

    /// Offset of the first char of the following line.
    #[inline]
    #[must_use]
    pub const fn next_offset(self) -> usize {
        self.offset + self.length + self.delimiter_length
    }
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// Rope-backed text storage.
///
/// An empty buffer has one (empty) line. A buffer ending in a line break has
/// a trailing empty line after it, so `"a\nb\n"` has three lines.
#[derive(Clone, Default)]
pub struct Buffer {
    rope: Rope,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    #[must_use]
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    // -- Text access --------------------------------------------------------

    /// The underlying rope.
    #[inline]
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Total char count.
    #[inline]
    #[must_use]
    pub fn text_length(&self) -> usize {
        self.rope.len_chars()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of lines, counting the empty line after a trailing break.
    #[inline]
    #[must_use]
    pub fn total_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// The whole text as a `String`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// The char at `offset`, or `None` at or past the end.
    #[must_use]
    pub fn char_at(&self, offset: usize) -> Option<char> {
        if offset < self.rope.len_chars() {
            Some(self.rope.char(offset))
        } else {
            None
        }
    }

    /// `length` chars starting at `offset`, clamped to the buffer.
    #[must_use]
    pub fn text(&self, offset: usize, length: usize) -> String {
        let (start, end) = self.clamp_span(offset, length);
        self.rope.slice(start..end).to_string()
    }

    // -- Line model ---------------------------------------------------------

    /// The segment for `line`, or `None` past the last line.
    #[must_use]
    pub fn line_segment(&self, line: usize) -> Option<LineSegment> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let slice = self.rope.line(line);
        let total = slice.len_chars();
        let delimiter_length = delimiter_len(slice);
        Some(LineSegment {
            offset: self.rope.line_to_char(line),
            length: total - delimiter_length,
            delimiter_length,
        })
    }

    /// The line containing `offset`. Offsets past the end map to the last
    /// line.
    #[must_use]
    pub fn line_for_offset(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }

    /// The segment of the line containing `offset`.
    #[must_use]
    pub fn segment_for_offset(&self, offset: usize) -> LineSegment {
        let line = self.line_for_offset(offset);
        self.line_segment(line).unwrap_or(LineSegment {
            offset: self.rope.len_chars(),
            length: 0,
            delimiter_length: 0,
        })
    }

    /// Content of `line` without its terminator.
    #[must_use]
    pub fn line_text(&self, line: usize) -> Option<String> {
        let seg = self.line_segment(line)?;
        Some(self.text(seg.offset, seg.length))
    }

    // -- Coordinate conversion ----------------------------------------------

    /// Convert an offset to a position. Offsets past the end clamp to the
    /// end of the buffer.
    #[must_use]
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        Position::new(line, offset - self.rope.line_to_char(line))
    }

    /// Convert a position to an offset.
    ///
    /// The line clamps to the last line and the column clamps to the line's
    /// content length, so a caret parked past the end of a line maps to the
    /// start of its terminator.
    #[must_use]
    pub fn position_to_offset(&self, pos: Position) -> usize {
        let last = self.rope.len_lines().saturating_sub(1);
        match self.line_segment(pos.line.min(last)) {
            Some(seg) => seg.offset + pos.col.min(seg.length),
            None => 0,
        }
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at `offset` (clamped). Returns the offset used.
    pub fn insert(&mut self, offset: usize, text: &str) -> usize {
        let offset = offset.min(self.rope.len_chars());
        self.rope.insert(offset, text);
        offset
    }

    /// Remove `length` chars at `offset` (clamped). Returns the removed text.
    pub fn remove(&mut self, offset: usize, length: usize) -> String {
        let (start, end) = self.clamp_span(offset, length);
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        removed
    }

    /// Replace `length` chars at `offset` with `text`. Returns the removed
    /// text.
    pub fn replace(&mut self, offset: usize, length: usize, text: &str) -> String {
        let (start, end) = self.clamp_span(offset, length);
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        self.rope.insert(start, text);
        removed
    }

    fn clamp_span(&self, offset: usize, length: usize) -> (usize, usize) {
        let total = self.rope.len_chars();
        let start = offset.min(total);
        let end = offset.saturating_add(length).min(total);
        (start, end)
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.total_lines())
            .field("chars", &self.text_length())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// True for every char ropey treats as a line break.
#[must_use]
pub const fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Length of the terminator at the end of a rope line.
fn delimiter_len(line: RopeSlice<'_>) -> usize {
    let total = line.len_chars();
    if total == 0 {
        return 0;
    }
    let last = line.char(total - 1);
    if last == '\n' && total >= 2 && line.char(total - 2) == '\r' {
        2
    } else if is_line_break(last) {
        1
    } else {
        0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(offset: usize, length: usize, delimiter_length: usize) -> LineSegment {
        LineSegment {
            offset,
            length,
            delimiter_length,
        }
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn empty_buffer_has_one_line() {
        let buf = Buffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.total_lines(), 1);
        assert_eq!(buf.line_segment(0), Some(seg(0, 0, 0)));
    }

    #[test]
    fn trailing_break_adds_empty_line() {
        let buf = Buffer::from_text("abc\ndef\n");
        assert_eq!(buf.total_lines(), 3);
        assert_eq!(buf.line_segment(2), Some(seg(8, 0, 0)));
    }

    // -- Line segments ------------------------------------------------------

    #[test]
    fn segments_tile_the_buffer() {
        let buf = Buffer::from_text("one\r\ntwo\rthree\nfour");
        let mut expected_offset = 0;
        for line in 0..buf.total_lines() {
            let s = buf.line_segment(line).unwrap();
            assert_eq!(s.offset, expected_offset, "gap before line {line}");
            expected_offset = s.next_offset();
        }
        assert_eq!(expected_offset, buf.text_length());
    }

    #[test]
    fn delimiter_lengths() {
        let buf = Buffer::from_text("a\r\nb\rc\nd");
        assert_eq!(buf.line_segment(0), Some(seg(0, 1, 2)));
        assert_eq!(buf.line_segment(1), Some(seg(3, 1, 1)));
        assert_eq!(buf.line_segment(2), Some(seg(5, 1, 1)));
        assert_eq!(buf.line_segment(3), Some(seg(7, 1, 0)));
    }

    #[test]
    fn unicode_line_separator_is_a_break() {
        let buf = Buffer::from_text("a\u{2028}b");
        assert_eq!(buf.total_lines(), 2);
        assert_eq!(buf.line_segment(0), Some(seg(0, 1, 1)));
    }

    #[test]
    fn segment_out_of_range() {
        let buf = Buffer::from_text("x");
        assert_eq!(buf.line_segment(1), None);
    }

    #[test]
    fn line_for_offset_clamps() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(buf.line_for_offset(0), 0);
        assert_eq!(buf.line_for_offset(2), 0);
        assert_eq!(buf.line_for_offset(3), 1);
        assert_eq!(buf.line_for_offset(500), 1);
        assert_eq!(buf.segment_for_offset(4), seg(3, 2, 0));
    }

    #[test]
    fn line_text_drops_terminator() {
        let buf = Buffer::from_text("first\r\nsecond");
        assert_eq!(buf.line_text(0).as_deref(), Some("first"));
        assert_eq!(buf.line_text(1).as_deref(), Some("second"));
        assert_eq!(buf.line_text(2), None);
    }

    // -- Coordinate conversion ----------------------------------------------

    #[test]
    fn offset_position_roundtrip() {
        let buf = Buffer::from_text("hello\nworld\n\nfoo");
        for offset in 0..=buf.text_length() {
            let pos = buf.offset_to_position(offset);
            assert_eq!(buf.position_to_offset(pos), offset, "offset {offset} -> {pos:?}");
        }
    }

    #[test]
    fn position_past_content_clamps_to_terminator() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(buf.position_to_offset(Position::new(0, 40)), 2);
        assert_eq!(buf.position_to_offset(Position::new(9, 1)), 4);
    }

    #[test]
    fn offset_past_end_clamps() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(buf.offset_to_position(99), Position::new(1, 2));
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn insert_remove_replace() {
        let mut buf = Buffer::from_text("hello world");
        buf.insert(5, ",");
        assert_eq!(buf.contents(), "hello, world");
        assert_eq!(buf.remove(0, 7), "hello, ");
        assert_eq!(buf.contents(), "world");
        assert_eq!(buf.replace(0, 1, "W"), "w");
        assert_eq!(buf.contents(), "World");
    }

    #[test]
    fn edits_clamp_out_of_range() {
        let mut buf = Buffer::from_text("abc");
        assert_eq!(buf.insert(10, "!"), 3);
        assert_eq!(buf.contents(), "abc!");
        assert_eq!(buf.remove(2, 100), "c!");
        assert_eq!(buf.contents(), "ab");
    }

    #[test]
    fn text_is_char_based() {
        let buf = Buffer::from_text("café\nbar");
        assert_eq!(buf.text(3, 2), "é\n");
        assert_eq!(buf.char_at(3), Some('é'));
        assert_eq!(buf.char_at(8), None);
    }
}
