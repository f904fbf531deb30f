//! Logical positions and ranges.
//!
//! A [`Position`] is a `(line, col)` pair, both 0-indexed. The column is a
//! char offset within the line, never a visual column: a tab is one column
//! here no matter how wide it renders. Conversion to and from absolute
//! offsets lives on [`Buffer`](crate::buffer::Buffer), which owns the line
//! table.

use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A logical position in a document: (line, column), both 0-indexed.
///
/// Ordered line first, then column, so positions sort in document order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// Line 0, column 0.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// The same line at a different column.
    #[inline]
    #[must_use]
    pub const fn with_col(self, col: usize) -> Self {
        Self {
            line: self.line,
            col,
        }
    }
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed, the way a status bar shows it.
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open span `[start, end)` between two positions, with
/// `start <= end`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Build a range from two positions in either order.
    #[must_use]
    pub fn ordered(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A zero-width range at `pos`.
    #[inline]
    #[must_use]
    pub const fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start.line == self.end.line && self.start.col == self.end.col
    }

    /// True when `start` and `end` sit on the same line.
    #[inline]
    #[must_use]
    pub const fn is_single_line(self) -> bool {
        self.start.line == self.end.line
    }

    /// True when `pos` lies inside `[start, end)`.
    #[must_use]
    pub fn contains(self, pos: Position) -> bool {
        self.start <= pos && pos < self.end
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Range({}:{}..{}:{})",
            self.start.line, self.start.col, self.end.line, self.end.col
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_sort_in_document_order() {
        let mut v = vec![
            Position::new(2, 0),
            Position::new(0, 7),
            Position::new(1, 3),
            Position::new(0, 2),
        ];
        v.sort();
        assert_eq!(
            v,
            [
                Position::new(0, 2),
                Position::new(0, 7),
                Position::new(1, 3),
                Position::new(2, 0),
            ]
        );
    }

    #[test]
    fn display_is_one_indexed() {
        assert_eq!(Position::new(0, 0).to_string(), "1:1");
        assert_eq!(Position::new(9, 4).to_string(), "10:5");
    }

    #[test]
    fn with_col_keeps_line() {
        assert_eq!(Position::new(3, 1).with_col(8), Position::new(3, 8));
    }

    #[test]
    fn ordered_swaps_backwards_input() {
        let r = Range::ordered(Position::new(4, 0), Position::new(1, 2));
        assert_eq!(r.start, Position::new(1, 2));
        assert_eq!(r.end, Position::new(4, 0));
        assert!(!r.is_single_line());
    }

    #[test]
    fn point_is_empty() {
        let r = Range::point(Position::new(2, 2));
        assert!(r.is_empty());
        assert!(r.is_single_line());
        assert!(!r.contains(Position::new(2, 2)));
    }

    #[test]
    fn contains_is_half_open() {
        let r = Range::ordered(Position::new(0, 2), Position::new(1, 0));
        assert!(r.contains(Position::new(0, 2)));
        assert!(r.contains(Position::new(0, 99)));
        assert!(!r.contains(Position::new(1, 0)));
        assert!(!r.contains(Position::new(0, 1)));
    }
}
