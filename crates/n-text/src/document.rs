//! Document — the buffer plus everything an edit action may consult.
//!
//! A [`Document`] owns:
//!
//! - the [`Buffer`] (line/offset model and raw text),
//! - the undo [`History`], fed automatically by every mutation,
//! - read-only policy: a document-wide flag plus protected offset ranges
//!   that move with the text, including through undo and redo,
//! - tracked ranges: offsets a caller asked to follow across edits,
//! - [`Properties`] and the highlighting property map (comment tokens),
//! - the view-invalidation queue.
//!
//! # Scoped groups
//!
//! Undo groups and update batches are acquired through guards:
//!
//! ```text
//! let mut doc = document.undo_group();     // start_group()
//! let mut doc = doc.update_batch();        // begin_update()
//! doc.insert(0, "\t");
//! // drop: end_update() flushes one coalesced invalidation,
//! //       end_group() commits the undo group
//! ```
//!
//! Both guards deref to `Document`, and both release on every exit path,
//! so an early `return` can never leave a group half open.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut, Range};

use tracing::trace;

use crate::buffer::{Buffer, LineSegment};
use crate::history::{Edit, History};
use crate::options::Properties;
use crate::position::Position;

/// Highlighting property holding the line-comment token.
pub const LINE_COMMENT: &str = "LineComment";
/// Highlighting property holding the block-comment opening token.
pub const BLOCK_COMMENT_BEGIN: &str = "BlockCommentBegin";
/// Highlighting property holding the block-comment closing token.
pub const BLOCK_COMMENT_END: &str = "BlockCommentEnd";

// ---------------------------------------------------------------------------
// Invalidation
// ---------------------------------------------------------------------------

/// A request to redraw part of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateRequest {
    WholeArea,
    SingleLine(usize),
    /// Inclusive line range, in either order.
    LinesBetween(usize, usize),
    /// From a position to the end of its line.
    PositionToLineEnd(Position),
    /// From a position to the end of the document.
    PositionToEnd(Position),
}

impl UpdateRequest {
    const fn lines(self) -> (usize, Option<usize>) {
        match self {
            Self::WholeArea => (0, None),
            Self::SingleLine(line) => (line, Some(line)),
            Self::LinesBetween(a, b) => {
                if a <= b {
                    (a, Some(b))
                } else {
                    (b, Some(a))
                }
            }
            Self::PositionToLineEnd(pos) => (pos.line, Some(pos.line)),
            Self::PositionToEnd(pos) => (pos.line, None),
        }
    }
}

/// One coalesced redraw region: `first_line` through `last_line`, or
/// through the end of the document when `last_line` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invalidation {
    pub first_line: usize,
    pub last_line: Option<usize>,
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Text, history, policy and configuration for one open document.
#[derive(Debug, Default)]
pub struct Document {
    buffer: Buffer,
    history: History,
    read_only: bool,
    protected: Vec<Range<usize>>,
    tracked: Vec<Range<usize>>,
    properties: Properties,
    highlighting: HashMap<String, String>,
    queue: Vec<UpdateRequest>,
    invalidations: Vec<Invalidation>,
    update_depth: usize,
    version: u64,
}

impl Document {
    // -- Construction -------------------------------------------------------

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: Buffer::from_text(text),
            ..Self::default()
        }
    }

    // -- Line/offset model --------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    #[must_use]
    pub fn contents(&self) -> String {
        self.buffer.contents()
    }

    #[must_use]
    pub fn text_length(&self) -> usize {
        self.buffer.text_length()
    }

    #[must_use]
    pub fn total_lines(&self) -> usize {
        self.buffer.total_lines()
    }

    #[must_use]
    pub fn line_segment(&self, line: usize) -> Option<LineSegment> {
        self.buffer.line_segment(line)
    }

    #[must_use]
    pub fn line_for_offset(&self, offset: usize) -> usize {
        self.buffer.line_for_offset(offset)
    }

    #[must_use]
    pub fn segment_for_offset(&self, offset: usize) -> LineSegment {
        self.buffer.segment_for_offset(offset)
    }

    #[must_use]
    pub fn offset_to_position(&self, offset: usize) -> Position {
        self.buffer.offset_to_position(offset)
    }

    #[must_use]
    pub fn position_to_offset(&self, pos: Position) -> usize {
        self.buffer.position_to_offset(pos)
    }

    #[must_use]
    pub fn text(&self, offset: usize, length: usize) -> String {
        self.buffer.text(offset, length)
    }

    #[must_use]
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.buffer.char_at(offset)
    }

    #[must_use]
    pub fn line_text(&self, line: usize) -> Option<String> {
        self.buffer.line_text(line)
    }

    // -- Mutation -----------------------------------------------------------

    /// Insert `text` at `offset`, recording it for undo.
    pub fn insert(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let offset = self.buffer.insert(offset, text);
        self.apply_recorded(Edit::Insert {
            offset,
            text: text.to_string(),
        });
    }

    /// Remove `length` chars at `offset`, recording it for undo.
    pub fn remove(&mut self, offset: usize, length: usize) {
        if length == 0 || offset >= self.buffer.text_length() {
            return;
        }
        let text = self.buffer.remove(offset, length);
        self.apply_recorded(Edit::Remove { offset, text });
    }

    /// Replace `length` chars at `offset` with `text`, recording it for
    /// undo as a single edit.
    pub fn replace(&mut self, offset: usize, length: usize, text: &str) {
        let offset = offset.min(self.buffer.text_length());
        let removed = self.buffer.replace(offset, length, text);
        self.apply_recorded(Edit::Replace {
            offset,
            removed,
            inserted: text.to_string(),
        });
    }

    /// Bookkeeping for an edit already applied to the buffer.
    fn apply_recorded(&mut self, edit: Edit) {
        follow_edit(&mut self.protected, &mut self.tracked, &edit);
        self.history.record(edit);
        self.version += 1;
    }

    /// Incremented on every change to the text, including undo and redo.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    // -- Undo ---------------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    pub fn start_undo_group(&mut self) {
        self.history.start_group();
    }

    pub fn end_undo_group(&mut self) {
        self.history.end_group();
    }

    /// Open an undo group that closes when the guard drops.
    pub fn undo_group(&mut self) -> UndoGroup<'_> {
        self.history.start_group();
        UndoGroup { doc: self }
    }

    /// Undo one group. Returns the offset the caret belongs at.
    pub fn undo(&mut self) -> Option<usize> {
        let Self {
            buffer,
            history,
            protected,
            tracked,
            ..
        } = self;
        let caret = history.undo_with(buffer, |edit| follow_edit(protected, tracked, edit))?;
        self.version += 1;
        self.queue.push(UpdateRequest::WholeArea);
        self.commit_update();
        Some(caret)
    }

    /// Redo one group. Returns the offset the caret belongs at.
    pub fn redo(&mut self) -> Option<usize> {
        let Self {
            buffer,
            history,
            protected,
            tracked,
            ..
        } = self;
        let caret = history.redo_with(buffer, |edit| follow_edit(protected, tracked, edit))?;
        self.version += 1;
        self.queue.push(UpdateRequest::WholeArea);
        self.commit_update();
        Some(caret)
    }

    // -- Read-only policy ---------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn read_only(&self) -> bool {
        self.read_only
    }

    pub const fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Protect `length` chars at `offset` against edits by actions.
    pub fn protect(&mut self, offset: usize, length: usize) {
        if length > 0 {
            self.protected.push(offset..offset + length);
        }
    }

    /// The protected ranges, as they currently sit in the text.
    #[must_use]
    pub fn protected_regions(&self) -> &[Range<usize>] {
        &self.protected
    }

    /// True when the char at `offset` may not be edited.
    #[must_use]
    pub fn is_read_only(&self, offset: usize) -> bool {
        self.read_only || self.protected.iter().any(|r| r.contains(&offset))
    }

    /// True when any char of `[offset, offset + length)` may not be edited.
    /// A zero length checks the single offset.
    #[must_use]
    pub fn is_read_only_range(&self, offset: usize, length: usize) -> bool {
        if length == 0 {
            return self.is_read_only(offset);
        }
        let end = offset + length;
        self.read_only
            || self
                .protected
                .iter()
                .any(|r| r.start < end && offset < r.end)
    }

    // -- Tracked ranges -----------------------------------------------------

    /// Follow `ranges` through every later edit, undo and redo included,
    /// until [`take_tracked`](Self::take_tracked) hands them back. Replaces
    /// whatever was tracked before.
    ///
    /// Text inserted at a range's start lands before it; text inserted at
    /// its end lands after it. A range whose text is removed collapses to
    /// an empty range at the removal point.
    pub fn track(&mut self, ranges: Vec<Range<usize>>) {
        self.tracked = ranges;
    }

    /// The tracked ranges, as they now sit in the text, in the order given.
    pub fn take_tracked(&mut self) -> Vec<Range<usize>> {
        std::mem::take(&mut self.tracked)
    }

    // -- Configuration ------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }

    #[inline]
    pub const fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    /// A highlighting property such as [`LINE_COMMENT`].
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.highlighting.get(name).map(String::as_str)
    }

    pub fn set_property(&mut self, name: &str, value: &str) {
        self.highlighting.insert(name.to_string(), value.to_string());
    }

    pub fn clear_property(&mut self, name: &str) {
        self.highlighting.remove(name);
    }

    // -- View invalidation --------------------------------------------------

    /// Queue a redraw request. Nothing reaches the view until a commit.
    pub fn request_update(&mut self, request: UpdateRequest) {
        self.queue.push(request);
    }

    /// Drop queued requests that have not been committed.
    pub fn clear_update_queue(&mut self) {
        self.queue.clear();
    }

    /// Coalesce the queue into one [`Invalidation`].
    ///
    /// Inside an update batch the commit is deferred until the outermost
    /// batch closes.
    pub fn commit_update(&mut self) -> Option<Invalidation> {
        if self.update_depth > 0 || self.queue.is_empty() {
            return None;
        }
        let mut first = usize::MAX;
        let mut last = Some(0);
        for request in self.queue.drain(..) {
            let (a, b) = request.lines();
            first = first.min(a);
            last = match (last, b) {
                (Some(x), Some(y)) => Some(x.max(y)),
                _ => None,
            };
        }
        let region = Invalidation {
            first_line: first,
            last_line: last,
        };
        trace!(?region, "invalidation flushed");
        self.invalidations.push(region);
        Some(region)
    }

    /// Start batching: commits are deferred until the matching
    /// [`end_update`](Self::end_update).
    pub fn begin_update(&mut self) {
        self.update_depth += 1;
    }

    /// Close one batch level. Closing the outermost level flushes the
    /// queue.
    pub fn end_update(&mut self) {
        if self.update_depth == 0 {
            return;
        }
        self.update_depth -= 1;
        if self.update_depth == 0 {
            self.commit_update();
        }
    }

    /// Open an update batch that closes when the guard drops.
    pub fn update_batch(&mut self) -> UpdateBatch<'_> {
        self.begin_update();
        UpdateBatch { doc: self }
    }

    /// True while an update batch is open.
    #[must_use]
    pub const fn in_update(&self) -> bool {
        self.update_depth > 0
    }

    /// Hand the flushed regions to the renderer.
    pub fn take_invalidations(&mut self) -> Vec<Invalidation> {
        std::mem::take(&mut self.invalidations)
    }
}

// ---------------------------------------------------------------------------
// Range shifting
// ---------------------------------------------------------------------------

/// Move `protected` and `tracked` ranges over one applied edit. Protected
/// ranges whose text is gone are dropped.
fn follow_edit(protected: &mut Vec<Range<usize>>, tracked: &mut [Range<usize>], edit: &Edit) {
    let (offset, removed, inserted) = match edit {
        Edit::Insert { offset, text } => (*offset, 0, text.chars().count()),
        Edit::Remove { offset, text } => (*offset, text.chars().count(), 0),
        Edit::Replace {
            offset,
            removed,
            inserted,
        } => (*offset, removed.chars().count(), inserted.chars().count()),
    };
    for r in protected.iter_mut().chain(tracked.iter_mut()) {
        if removed > 0 {
            shift_for_remove(r, offset, removed);
        }
        if inserted > 0 {
            shift_for_insert(r, offset, inserted);
        }
    }
    protected.retain(|r| !r.is_empty());
}

const fn shift_for_insert(r: &mut Range<usize>, offset: usize, len: usize) {
    if r.start >= offset {
        r.start += len;
        r.end += len;
    } else if r.end > offset {
        r.end += len;
    }
}

fn shift_for_remove(r: &mut Range<usize>, offset: usize, len: usize) {
    let end = offset + len;
    let shrink = |x: usize| {
        if x <= offset {
            x
        } else if x >= end {
            x - len
        } else {
            offset
        }
    };
    *r = shrink(r.start)..shrink(r.end);
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

/// An open undo group. Dropping it closes the group.
#[derive(Debug)]
pub struct UndoGroup<'a> {
    doc: &'a mut Document,
}

impl Deref for UndoGroup<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        self.doc
    }
}

impl DerefMut for UndoGroup<'_> {
    fn deref_mut(&mut self) -> &mut Document {
        self.doc
    }
}

impl Drop for UndoGroup<'_> {
    fn drop(&mut self) {
        self.doc.history.end_group();
    }
}

/// An open update batch. Dropping it closes the batch.
#[derive(Debug)]
pub struct UpdateBatch<'a> {
    doc: &'a mut Document,
}

impl Deref for UpdateBatch<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        self.doc
    }
}

impl DerefMut for UpdateBatch<'_> {
    fn deref_mut(&mut self) -> &mut Document {
        self.doc
    }
}

impl Drop for UpdateBatch<'_> {
    fn drop(&mut self) {
        self.doc.end_update();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
