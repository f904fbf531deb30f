//! Caret — the insertion point, its desired column, and its edit mode.
//!
//! The caret is a plain value type: a logical [`Position`], the pixel x a
//! vertical move tries to return to, and whether typing inserts or
//! overwrites. It holds no reference to the document; placement that must
//! respect the text goes through [`Caret::validate`].
//!
//! | Mode        | Typing a char                      |
//! |-------------|------------------------------------|
//! | `Insert`    | inserts before the caret           |
//! | `Overwrite` | replaces the char under the caret  |

use std::fmt;

use crate::document::Document;
use crate::position::Position;

// ---------------------------------------------------------------------------
// CaretMode
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaretMode {
    #[default]
    Insert,
    Overwrite,
}

impl CaretMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Insert => Self::Overwrite,
            Self::Overwrite => Self::Insert,
        }
    }
}

impl fmt::Display for CaretMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => f.write_str("INS"),
            Self::Overwrite => f.write_str("OVR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Caret
// ---------------------------------------------------------------------------

/// The caret of one text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caret {
    position: Position,

    /// Pixel x that vertical moves aim for. Horizontal moves reset it.
    desired_x: i32,

    mode: CaretMode,
}

impl Caret {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position: Position::ZERO,
            desired_x: 0,
            mode: CaretMode::Insert,
        }
    }

    #[must_use]
    pub const fn at(position: Position) -> Self {
        Self {
            position,
            desired_x: 0,
            mode: CaretMode::Insert,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[inline]
    #[must_use]
    pub const fn line(&self) -> usize {
        self.position.line
    }

    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.position.col
    }

    #[inline]
    #[must_use]
    pub const fn desired_x(&self) -> i32 {
        self.desired_x
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> CaretMode {
        self.mode
    }

    /// The caret's offset in `doc`.
    #[must_use]
    pub fn offset(&self, doc: &Document) -> usize {
        doc.position_to_offset(self.position)
    }

    // -- Mutation -----------------------------------------------------------

    /// Move without validation. Callers that cannot guarantee a valid
    /// position should follow up with [`validate`](Self::validate).
    pub const fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub const fn set_desired_x(&mut self, x: i32) {
        self.desired_x = x;
    }

    pub const fn set_mode(&mut self, mode: CaretMode) {
        self.mode = mode;
    }

    pub const fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Clamp the caret into `doc`: the line to the last line, the column to
    /// the line's content length unless the document allows the caret past
    /// the end of a line.
    pub fn validate(&mut self, doc: &Document) {
        self.position = clamp(self.position, doc);
    }
}

/// `pos` clamped into `doc` the way [`Caret::validate`] clamps.
#[must_use]
pub fn clamp(pos: Position, doc: &Document) -> Position {
    let line = pos.line.min(doc.total_lines().saturating_sub(1));
    let len = doc.line_segment(line).map_or(0, |seg| seg.length);
    if doc.properties().allow_caret_beyond_eol {
        Position::new(line, pos.col)
    } else {
        Position::new(line, pos.col.min(len))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
