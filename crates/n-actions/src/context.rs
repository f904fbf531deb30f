//! Edit context — everything one action may read or write.
//!
//! Actions never reach into shared state. The caller lends each one an
//! [`EditContext`] built from explicit borrows of the document, selection
//! set, fold set, caret and view, and gets an [`Outcome`] back.
//!
//! # Scopes
//!
//! Compound actions wrap their edits in scopes that close on drop, so every
//! exit path leaves the undo history and the update queue balanced:
//!
//! ```text
//! let mut cx = cx.undo_group();      // Document::start_undo_group
//! let mut cx = cx.update_batch();    // Document::begin_update
//! cx.doc.insert(offset, "\t");
//! // drop: end_update flushes one invalidation, then end_undo_group
//! ```
//!
//! A scope derefs to the context, so helpers like
//! [`place_caret`](EditContext::place_caret) stay available inside it.

use std::ops::{Deref, DerefMut};

use n_text::caret::clamp;
use n_text::{Caret, CaretMode, Document, FoldSet, Position, SelectionSet, UpdateRequest};
use tracing::debug;

use crate::view::TextView;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What an action did, for the caller's bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// The document text changed.
    pub modified: bool,
    /// The caret ended somewhere else.
    pub caret_moved: bool,
    /// The selection survives the action.
    pub keep_selection: bool,
    /// The caret should be scrolled into view.
    pub scroll_to_caret: bool,
}

// ---------------------------------------------------------------------------
// EditContext
// ---------------------------------------------------------------------------

/// Borrowed editor state for one action.
pub struct EditContext<'a> {
    pub doc: &'a mut Document,
    pub selections: &'a mut SelectionSet,
    pub folds: &'a FoldSet,
    pub caret: &'a mut Caret,
    pub view: &'a dyn TextView,
    pub(crate) keep_selection: bool,
    pub(crate) scroll_to_caret: bool,
}

impl std::fmt::Debug for EditContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditContext")
            .field("doc", &self.doc)
            .field("selections", &self.selections)
            .field("caret", &self.caret)
            .finish_non_exhaustive()
    }
}

impl<'a> EditContext<'a> {
    pub fn new(
        doc: &'a mut Document,
        selections: &'a mut SelectionSet,
        folds: &'a FoldSet,
        caret: &'a mut Caret,
        view: &'a dyn TextView,
    ) -> Self {
        Self {
            doc,
            selections,
            folds,
            caret,
            view,
            keep_selection: false,
            scroll_to_caret: false,
        }
    }

    // -- Scopes -------------------------------------------------------------

    /// Open an undo group that closes when the scope drops.
    pub fn undo_group(&mut self) -> Scope<'_, 'a> {
        self.doc.start_undo_group();
        Scope {
            cx: self,
            kind: ScopeKind::UndoGroup,
        }
    }

    /// Open an update batch that flushes when the scope drops.
    pub fn update_batch(&mut self) -> Scope<'_, 'a> {
        self.doc.begin_update();
        Scope {
            cx: self,
            kind: ScopeKind::UpdateBatch,
        }
    }

    // -- Caret --------------------------------------------------------------

    #[must_use]
    pub fn caret_offset(&self) -> usize {
        self.caret.offset(self.doc)
    }

    /// Move the caret to `pos`, clamped into the document.
    pub fn place_caret(&mut self, pos: Position) {
        self.caret.set_position(clamp(pos, self.doc));
    }

    pub fn place_caret_at_offset(&mut self, offset: usize) {
        let pos = self.doc.offset_to_position(offset);
        self.place_caret(pos);
    }

    /// Remember the caret's current pixel x for later vertical moves.
    pub fn set_desired_column(&mut self) {
        let pos = self.caret.position();
        let x = self.view.drawing_x(self.doc, self.folds, pos.line, pos.col);
        self.caret.set_desired_x(x + self.view.scroll_left());
    }

    /// Move the caret, on its current line, to the remembered pixel x.
    pub fn set_caret_to_desired_column(&mut self) {
        let x = self.caret.desired_x() - self.view.scroll_left();
        let pos = self
            .view
            .logical_column(self.doc, self.folds, self.caret.line(), x);
        self.place_caret(pos);
    }

    /// Visual (tab-expanded) column of the caret.
    #[must_use]
    pub fn caret_visual_column(&self) -> usize {
        crate::view::visual_column(self.doc, self.caret.position())
    }

    // -- Text at the caret --------------------------------------------------

    /// Delete every selection as one undo step and park the caret at the
    /// first selection's start. Returns false when there is nothing selected or the selection
    /// is read-only.
    pub fn delete_selection(&mut self) -> bool {
        if !self.selections.has_selection() {
            return false;
        }
        if self.selections.is_read_only(self.doc) {
            debug!("selection is read-only");
            return false;
        }
        let mut group = self.undo_group();
        let mut batch = group.update_batch();
        let cx = &mut *batch;
        let start = cx.selections.first().map(|s| s.start);
        cx.selections.remove_selected_text(cx.doc);
        if let Some(start) = start {
            cx.place_caret(start);
            cx.doc.request_update(UpdateRequest::PositionToEnd(start));
        }
        cx.scroll_to_caret = true;
        true
    }

    /// Type `text` at the caret: an active selection is replaced first, then
    /// the text goes in and the caret moves past it.
    pub fn insert_string_at_caret(&mut self, text: &str) {
        let mut cx = self.undo_group();
        if cx.selections.has_selection() && !cx.delete_selection() {
            return;
        }
        let offset = cx.caret_offset();
        if cx.doc.is_read_only(offset) {
            debug!(offset, "insert blocked by read-only region");
            return;
        }
        cx.doc.insert(offset, text);
        cx.place_caret_at_offset(offset + text.chars().count());
        cx.set_desired_column();
    }

    /// Overwrite the char under the caret with `ch` and step past it. At
    /// the end of line content there is nothing to overwrite, so `ch` is
    /// inserted.
    pub fn replace_char_at_caret(&mut self, ch: char) {
        let offset = self.caret_offset();
        let seg = self.doc.segment_for_offset(offset);
        if offset >= seg.end_offset() {
            self.insert_string_at_caret(ch.encode_utf8(&mut [0; 4]));
            return;
        }
        if self.doc.is_read_only(offset) {
            debug!(offset, "replace blocked by read-only region");
            return;
        }
        self.doc.replace(offset, 1, ch.encode_utf8(&mut [0; 4]));
        self.place_caret_at_offset(offset + 1);
        self.set_desired_column();
    }

    /// True in overwrite mode.
    #[must_use]
    pub fn is_overwrite(&self) -> bool {
        self.caret.mode() == CaretMode::Overwrite
    }

    /// Keep the selection alive after this action.
    pub const fn keep_selection(&mut self) {
        self.keep_selection = true;
    }
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    UndoGroup,
    UpdateBatch,
}

/// An open undo group or update batch over an [`EditContext`].
#[derive(Debug)]
pub struct Scope<'c, 'a> {
    cx: &'c mut EditContext<'a>,
    kind: ScopeKind,
}

impl<'a> Deref for Scope<'_, 'a> {
    type Target = EditContext<'a>;

    fn deref(&self) -> &EditContext<'a> {
        self.cx
    }
}

impl<'a> DerefMut for Scope<'_, 'a> {
    fn deref_mut(&mut self) -> &mut EditContext<'a> {
        self.cx
    }
}

impl Drop for Scope<'_, '_> {
    fn drop(&mut self) {
        match self.kind {
            ScopeKind::UndoGroup => self.cx.doc.end_undo_group(),
            ScopeKind::UpdateBatch => self.cx.doc.end_update(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use n_text::Selection;
    use pretty_assertions::assert_eq;

    // -- Scopes -------------------------------------------------------------

    #[test]
    fn scopes_close_on_drop() {
        let mut fx = Fixture::new("ab", Position::ZERO);
        {
            let mut cx = fx.cx();
            let mut group = cx.undo_group();
            let mut batch = group.update_batch();
            batch.doc.insert(0, "x");
            batch.doc.insert(0, "y");
            assert_eq!(batch.doc.history().depth(), 1);
            assert!(batch.doc.in_update());
        }
        assert_eq!(fx.doc.history().depth(), 0);
        assert!(!fx.doc.in_update());
        assert_eq!(fx.doc.history().undo_count(), 1);
    }

    // -- Caret --------------------------------------------------------------

    #[test]
    fn place_caret_clamps() {
        let mut fx = Fixture::new("abc\nd", Position::ZERO);
        fx.cx().place_caret(Position::new(0, 10));
        assert_eq!(fx.caret.position(), Position::new(0, 3));
    }

    #[test]
    fn desired_column_round_trip() {
        let mut fx = Fixture::new("abcdef\nab\nabcdef", Position::new(0, 5));
        let mut cx = fx.cx();
        cx.set_desired_column();
        assert_eq!(cx.caret.desired_x(), 50);
        cx.caret.set_position(Position::new(2, 0));
        cx.set_caret_to_desired_column();
        assert_eq!(cx.caret.position(), Position::new(2, 5));
    }

    // -- Text at the caret --------------------------------------------------

    #[test]
    fn insert_replaces_selection() {
        let mut fx = Fixture::new("hello world", Position::new(0, 11));
        fx.selections
            .add(Selection::new(Position::new(0, 0), Position::new(0, 5)));
        fx.cx().insert_string_at_caret("bye");
        assert_eq!(fx.doc.contents(), "bye world");
        assert_eq!(fx.caret.position(), Position::new(0, 3));
        assert!(!fx.selections.has_selection());
        assert!(fx.doc.undo().is_some());
        assert_eq!(fx.doc.contents(), "hello world");
    }

    #[test]
    fn insert_blocked_by_protected_region() {
        let mut fx = Fixture::new("abc", Position::new(0, 1));
        fx.doc.protect(0, 2);
        fx.cx().insert_string_at_caret("x");
        assert_eq!(fx.doc.contents(), "abc");
    }

    #[test]
    fn replace_char_overwrites_then_inserts_at_line_end() {
        let mut fx = Fixture::new("ab\n", Position::new(0, 1));
        let mut cx = fx.cx();
        cx.replace_char_at_caret('X');
        cx.replace_char_at_caret('Y');
        assert_eq!(fx.doc.contents(), "aXY\n");
        assert_eq!(fx.caret.position(), Position::new(0, 3));
    }

    #[test]
    fn delete_selection_moves_caret_to_start() {
        let mut fx = Fixture::new("one\ntwo", Position::new(1, 3));
        fx.selections
            .add(Selection::new(Position::new(0, 1), Position::new(1, 1)));
        assert!(fx.cx().delete_selection());
        assert_eq!(fx.doc.contents(), "owo");
        assert_eq!(fx.caret.position(), Position::new(0, 1));
    }

    #[test]
    fn delete_several_selections_undoes_at_once() {
        let mut fx = Fixture::new("one two three", Position::new(0, 13));
        fx.selections
            .add(Selection::new(Position::new(0, 0), Position::new(0, 3)));
        fx.selections
            .add(Selection::new(Position::new(0, 8), Position::new(0, 13)));
        assert!(fx.cx().delete_selection());
        assert_eq!(fx.doc.contents(), " two ");
        assert_eq!(fx.doc.history().undo_count(), 1);

        assert!(fx.doc.undo().is_some());
        assert_eq!(fx.doc.contents(), "one two three");
    }

    #[test]
    fn delete_read_only_selection_is_a_no_op() {
        let mut fx = Fixture::new("one", Position::ZERO);
        fx.selections.add(Selection {
            read_only: true,
            ..Selection::new(Position::new(0, 0), Position::new(0, 2))
        });
        assert!(!fx.cx().delete_selection());
        assert_eq!(fx.doc.contents(), "one");
    }
}
