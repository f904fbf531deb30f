//! The action set and its single dispatch entry point.
//!
//! Every editing command is one [`EditAction`] variant. Callers build an
//! [`EditContext`] over their editor state and run
//! [`EditAction::execute`]; the returned [`Outcome`] says what changed.
//!
//! Unless an action asks to keep it, the selection is cleared once the
//! action has run. A kept selection is moved along with the text the
//! action inserted or removed around it.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::context::{EditContext, Outcome};
use crate::{brace, caret, comment, delete, indent, transpose};

// ---------------------------------------------------------------------------
// EditAction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditAction {
    /// One char left. With `collapse_to_edge`, a selection collapses to its
    /// start instead.
    CaretLeft { collapse_to_edge: bool },
    /// One char right. With `collapse_to_edge`, a selection collapses to
    /// its end instead.
    CaretRight { collapse_to_edge: bool },
    CaretUp,
    CaretDown,
    WordLeft,
    WordRight,
    Tab,
    ShiftTab,
    /// Line comments when the document declares a token, else block.
    ToggleComment,
    ToggleLineComment,
    ToggleBlockComment,
    Backspace,
    Delete,
    WordBackspace,
    DeleteWord,
    DeleteLine,
    MoveLineUp,
    MoveLineDown,
    DeleteToLineEnd,
    GotoMatchingBrace,
    /// Flip between insert and overwrite mode.
    ToggleEditMode,
    Undo,
    Redo,
}

impl EditAction {
    /// Every action, with the horizontal moves in their plain form.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CaretLeft { collapse_to_edge: false },
            Self::CaretRight { collapse_to_edge: false },
            Self::CaretUp,
            Self::CaretDown,
            Self::WordLeft,
            Self::WordRight,
            Self::Tab,
            Self::ShiftTab,
            Self::ToggleComment,
            Self::ToggleLineComment,
            Self::ToggleBlockComment,
            Self::Backspace,
            Self::Delete,
            Self::WordBackspace,
            Self::DeleteWord,
            Self::DeleteLine,
            Self::MoveLineUp,
            Self::MoveLineDown,
            Self::DeleteToLineEnd,
            Self::GotoMatchingBrace,
            Self::ToggleEditMode,
            Self::Undo,
            Self::Redo,
        ]
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CaretLeft { .. } => "CaretLeft",
            Self::CaretRight { .. } => "CaretRight",
            Self::CaretUp => "CaretUp",
            Self::CaretDown => "CaretDown",
            Self::WordLeft => "WordLeft",
            Self::WordRight => "WordRight",
            Self::Tab => "Tab",
            Self::ShiftTab => "ShiftTab",
            Self::ToggleComment => "ToggleComment",
            Self::ToggleLineComment => "ToggleLineComment",
            Self::ToggleBlockComment => "ToggleBlockComment",
            Self::Backspace => "Backspace",
            Self::Delete => "Delete",
            Self::WordBackspace => "WordBackspace",
            Self::DeleteWord => "DeleteWord",
            Self::DeleteLine => "DeleteLine",
            Self::MoveLineUp => "MoveLineUp",
            Self::MoveLineDown => "MoveLineDown",
            Self::DeleteToLineEnd => "DeleteToLineEnd",
            Self::GotoMatchingBrace => "GotoMatchingBrace",
            Self::ToggleEditMode => "ToggleEditMode",
            Self::Undo => "Undo",
            Self::Redo => "Redo",
        }
    }

    /// Run the action against `cx`.
    pub fn execute(self, cx: &mut EditContext<'_>) -> Outcome {
        let version = cx.doc.version();
        let caret_before = cx.caret.position();
        cx.keep_selection = false;
        cx.scroll_to_caret = false;
        debug!(action = %self, "dispatch");

        let anchors = cx
            .selections
            .iter()
            .map(|s| s.offset(cx.doc)..s.end_offset(cx.doc))
            .collect();
        cx.doc.track(anchors);

        match self {
            Self::CaretLeft { collapse_to_edge } => caret::caret_left(cx, collapse_to_edge),
            Self::CaretRight { collapse_to_edge } => caret::caret_right(cx, collapse_to_edge),
            Self::CaretUp => caret::caret_up(cx),
            Self::CaretDown => caret::caret_down(cx),
            Self::WordLeft => caret::word_left(cx),
            Self::WordRight => caret::word_right(cx),
            Self::Tab => indent::tab(cx),
            Self::ShiftTab => indent::shift_tab(cx),
            Self::ToggleComment => comment::toggle_comment(cx),
            Self::ToggleLineComment => comment::toggle_line_comment(cx),
            Self::ToggleBlockComment => comment::toggle_block_comment(cx),
            Self::Backspace => delete::backspace(cx),
            Self::Delete => delete::delete(cx),
            Self::WordBackspace => delete::word_backspace(cx),
            Self::DeleteWord => delete::delete_word(cx),
            Self::DeleteLine => delete::delete_line(cx),
            Self::MoveLineUp => transpose::move_line_up(cx),
            Self::MoveLineDown => transpose::move_line_down(cx),
            Self::DeleteToLineEnd => delete::delete_to_line_end(cx),
            Self::GotoMatchingBrace => brace::goto_matching_brace(cx),
            Self::ToggleEditMode => toggle_edit_mode(cx),
            Self::Undo => undo(cx),
            Self::Redo => redo(cx),
        }

        let anchors = cx.doc.take_tracked();
        if cx.keep_selection {
            cx.selections.reanchor(cx.doc, &anchors);
        } else {
            cx.selections.clear();
        }
        Outcome {
            modified: cx.doc.version() != version,
            caret_moved: cx.caret.position() != caret_before,
            keep_selection: cx.keep_selection,
            scroll_to_caret: cx.scroll_to_caret,
        }
    }
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Lookup by name
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown edit action: {0}")]
pub struct ParseActionError(pub String);

impl FromStr for EditAction {
    type Err = ParseActionError;

    /// Case-insensitive. The horizontal moves parse without
    /// collapse-to-edge.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::all()
            .iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Mode and history
// ---------------------------------------------------------------------------

fn toggle_edit_mode(cx: &mut EditContext<'_>) {
    if cx.doc.read_only() {
        debug!("edit mode locked by read-only document");
        return;
    }
    cx.caret.toggle_mode();
}

fn undo(cx: &mut EditContext<'_>) {
    if let Some(offset) = cx.doc.undo() {
        cx.place_caret_at_offset(offset);
        cx.set_desired_column();
    }
}

fn redo(cx: &mut EditContext<'_>) {
    if let Some(offset) = cx.doc.redo() {
        cx.place_caret_at_offset(offset);
        cx.set_desired_column();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
