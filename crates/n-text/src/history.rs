//! Undo/redo history with nestable groups.
//!
//! Every buffer mutation made through a [`Document`](crate::document::Document)
//! is recorded here as a reversible [`Edit`]. Edits collect into undo groups,
//! the atomic unit of undo/redo:
//!
//! ```text
//! history.start_group();      // depth 1, group opens
//!   history.start_group();    // depth 2, same group
//!   history.record(edit);
//!   history.end_group();      // depth 1
//!   history.record(edit);
//! history.end_group();        // depth 0, group commits as one unit
//! ```
//!
//! An edit recorded while no group is open becomes a group of its own.
//! Empty groups are discarded. Any new edit clears the redo stack.

use tracing::{trace, warn};

use crate::buffer::Buffer;

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

/// A single reversible edit, in offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// `text` was inserted at `offset`.
    Insert { offset: usize, text: String },

    /// `text` was removed from `offset`.
    Remove { offset: usize, text: String },

    /// `removed` at `offset` was replaced by `inserted`.
    Replace {
        offset: usize,
        removed: String,
        inserted: String,
    },
}

impl Edit {
    /// The edit that reverts this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        match self {
            Self::Insert { offset, text } => Self::Remove {
                offset: *offset,
                text: text.clone(),
            },
            Self::Remove { offset, text } => Self::Insert {
                offset: *offset,
                text: text.clone(),
            },
            Self::Replace {
                offset,
                removed,
                inserted,
            } => Self::Replace {
                offset: *offset,
                removed: inserted.clone(),
                inserted: removed.clone(),
            },
        }
    }

    fn undo(&self, buf: &mut Buffer) -> usize {
        match self {
            Self::Insert { offset, text } => {
                buf.remove(*offset, text.chars().count());
                *offset
            }
            Self::Remove { offset, text } => {
                buf.insert(*offset, text);
                *offset + text.chars().count()
            }
            Self::Replace {
                offset,
                removed,
                inserted,
            } => {
                buf.replace(*offset, inserted.chars().count(), removed);
                *offset
            }
        }
    }

    fn redo(&self, buf: &mut Buffer) -> usize {
        match self {
            Self::Insert { offset, text } => {
                buf.insert(*offset, text);
                *offset + text.chars().count()
            }
            Self::Remove { offset, text } => {
                buf.remove(*offset, text.chars().count());
                *offset
            }
            Self::Replace {
                offset,
                removed,
                inserted,
            } => {
                buf.replace(*offset, removed.chars().count(), inserted);
                *offset + inserted.chars().count()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Undo and redo stacks of edit groups, plus the group being built.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Vec<Edit>>,
    redo_stack: Vec<Vec<Edit>>,
    pending: Vec<Edit>,
    depth: usize,
}

impl History {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pending: Vec::new(),
            depth: 0,
        }
    }

    /// Open a group, or nest inside the one already open.
    pub fn start_group(&mut self) {
        self.depth += 1;
        trace!(depth = self.depth, "undo group opened");
    }

    /// Close one nesting level. Closing the outermost level commits the
    /// pending edits as a single group.
    pub fn end_group(&mut self) {
        if self.depth == 0 {
            warn!("end_group called with no open undo group");
            return;
        }
        self.depth -= 1;
        trace!(depth = self.depth, "undo group closed");
        if self.depth == 0 {
            self.flush();
        }
    }

    /// Current nesting depth. Zero when no group is open.
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Record an edit that was just applied to the buffer.
    pub fn record(&mut self, edit: Edit) {
        self.redo_stack.clear();
        self.pending.push(edit);
        if self.depth == 0 {
            self.flush();
        }
    }

    /// Revert the most recent group. Returns the offset the caret should go
    /// to, or `None` when there is nothing to undo.
    pub fn undo(&mut self, buf: &mut Buffer) -> Option<usize> {
        self.undo_with(buf, |_| {})
    }

    /// [`undo`](Self::undo), reporting each edit as it is applied to the
    /// buffer, in application order.
    pub fn undo_with(
        &mut self,
        buf: &mut Buffer,
        mut applied: impl FnMut(&Edit),
    ) -> Option<usize> {
        self.flush();
        let group = self.undo_stack.pop()?;
        let mut caret = 0;
        for edit in group.iter().rev() {
            caret = edit.undo(buf);
            applied(&edit.inverse());
        }
        self.redo_stack.push(group);
        Some(caret)
    }

    /// Re-apply the most recently undone group.
    pub fn redo(&mut self, buf: &mut Buffer) -> Option<usize> {
        self.redo_with(buf, |_| {})
    }

    /// [`redo`](Self::redo), reporting each edit as it is applied.
    pub fn redo_with(
        &mut self,
        buf: &mut Buffer,
        mut applied: impl FnMut(&Edit),
    ) -> Option<usize> {
        let group = self.redo_stack.pop()?;
        let mut caret = 0;
        for edit in &group {
            caret = edit.redo(buf);
            applied(edit);
        }
        self.undo_stack.push(group);
        Some(caret)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || !self.pending.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of committed groups.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.undo_stack.push(std::mem::take(&mut self.pending));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
