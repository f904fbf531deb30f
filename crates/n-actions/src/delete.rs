//! Deletion — backspace, delete, word and line granularity.
//!
//! Every action here deletes the selection instead when one is present.
//! Without a selection, each removal is checked against the read-only
//! policy first; a blocked removal is a silent no-op.
//!
//! Removing a line terminator always removes the whole sequence, so a
//! `\r\n` never gets split.

use n_text::{Position, UpdateRequest};
use tracing::debug;

use crate::context::EditContext;
use crate::word;

// ---------------------------------------------------------------------------
// Char granularity
// ---------------------------------------------------------------------------

pub fn backspace(cx: &mut EditContext<'_>) {
    if cx.selections.has_selection() {
        cx.delete_selection();
        return;
    }
    let offset = cx.caret_offset();
    if offset == 0 {
        return;
    }
    let line = cx.doc.line_for_offset(offset);
    let Some(seg) = cx.doc.line_segment(line) else {
        return;
    };
    // At a line start the whole delimiter above goes.
    let merge = seg.offset == offset;
    let start = if merge {
        let Some(above) = cx.doc.line_segment(line - 1) else {
            return;
        };
        above.end_offset()
    } else {
        offset - 1
    };
    if cx.doc.is_read_only_range(start, offset - start) {
        debug!(offset, "backspace blocked by read-only region");
        return;
    }

    let mut batch = cx.update_batch();
    let cx = &mut *batch;
    cx.doc.remove(start, offset - start);
    cx.place_caret_at_offset(start);
    let caret = cx.caret.position();
    if merge {
        cx.doc
            .request_update(UpdateRequest::PositionToEnd(Position::new(caret.line, 0)));
    } else {
        cx.doc.request_update(UpdateRequest::PositionToLineEnd(caret));
    }
    cx.set_desired_column();
}

pub fn delete(cx: &mut EditContext<'_>) {
    if cx.selections.has_selection() {
        cx.delete_selection();
        return;
    }
    let offset = cx.caret_offset();
    if offset >= cx.doc.text_length() {
        return;
    }
    let line = cx.doc.line_for_offset(offset);
    let Some(seg) = cx.doc.line_segment(line) else {
        return;
    };
    // At a line end the whole delimiter goes.
    let merge = seg.end_offset() == offset;
    let end = if merge {
        let Some(next) = cx.doc.line_segment(line + 1) else {
            return;
        };
        next.offset
    } else {
        offset + 1
    };
    if cx.doc.is_read_only_range(offset, end - offset) {
        debug!(offset, "delete blocked by read-only region");
        return;
    }

    let mut batch = cx.update_batch();
    let cx = &mut *batch;
    cx.doc.remove(offset, end - offset);
    if merge {
        cx.doc
            .request_update(UpdateRequest::PositionToEnd(Position::new(line, 0)));
    } else {
        let caret = cx.caret.position();
        cx.doc.request_update(UpdateRequest::PositionToLineEnd(caret));
    }
}

// ---------------------------------------------------------------------------
// Word granularity
// ---------------------------------------------------------------------------

pub fn word_backspace(cx: &mut EditContext<'_>) {
    if cx.selections.has_selection() {
        cx.delete_selection();
        return;
    }

    let mut group = cx.undo_group();
    let cx = &mut *group;
    {
        let mut batch = cx.update_batch();
        let cx = &mut *batch;
        let line_start = cx.doc.segment_for_offset(cx.caret_offset()).offset;

        let offset = cx.caret_offset();
        if offset > line_start {
            let start = word::prev_word_start(cx.doc, offset);
            if start < offset && !cx.doc.is_read_only_range(start, offset - start) {
                cx.doc.remove(start, offset - start);
                cx.place_caret_at_offset(start);
            }
        }

        let offset = cx.caret_offset();
        let line = cx.doc.line_for_offset(offset);
        if offset == line_start && line > 0 {
            if let Some(above) = cx.doc.line_segment(line - 1) {
                let end = above.end_offset();
                if !cx.doc.is_read_only_range(end, offset - end) {
                    cx.doc.remove(end, offset - end);
                    cx.place_caret_at_offset(end);
                }
            }
        }
        cx.set_desired_column();
    }

    let line = cx.caret.line();
    cx.doc
        .request_update(UpdateRequest::PositionToEnd(Position::new(line, 0)));
    cx.doc.commit_update();
}

pub fn delete_word(cx: &mut EditContext<'_>) {
    if cx.selections.has_selection() {
        cx.delete_selection();
        return;
    }
    let offset = cx.caret_offset();
    let seg = cx.doc.segment_for_offset(offset);
    if offset == seg.end_offset() {
        delete(cx);
        return;
    }
    let next = word::next_word_start(cx.doc, offset);
    if next == offset || cx.doc.is_read_only_range(offset, next - offset) {
        return;
    }
    cx.doc.remove(offset, next - offset);

    let line = cx.caret.line();
    cx.doc
        .request_update(UpdateRequest::PositionToEnd(Position::new(line, 0)));
    cx.doc.commit_update();
}

// ---------------------------------------------------------------------------
// Line granularity
// ---------------------------------------------------------------------------

/// Remove the caret's line with its terminator.
///
/// A final line has no terminator of its own, so deleting it takes the one
/// before it; either way the document loses exactly one line.
pub fn delete_line(cx: &mut EditContext<'_>) {
    let line = cx.caret.line();
    let Some(seg) = cx.doc.line_segment(line) else {
        return;
    };
    let (offset, len) = if seg.delimiter_length == 0 && line > 0 {
        match cx.doc.line_segment(line - 1) {
            Some(above) => (above.end_offset(), seg.end_offset() - above.end_offset()),
            None => (seg.offset, seg.total_length()),
        }
    } else {
        (seg.offset, seg.total_length())
    };
    if len == 0 {
        return;
    }
    if cx.doc.is_read_only_range(offset, len) {
        debug!(line, "delete line blocked by read-only region");
        return;
    }

    cx.doc.remove(offset, len);
    let target = seg.offset.min(cx.doc.text_length());
    cx.place_caret_at_offset(target);
    cx.set_desired_column();
    let first = line.min(cx.doc.total_lines().saturating_sub(1));
    cx.doc
        .request_update(UpdateRequest::PositionToEnd(Position::new(first, 0)));
    cx.doc.commit_update();
}

/// Remove from the caret to the end of line content. All or nothing.
pub fn delete_to_line_end(cx: &mut EditContext<'_>) {
    let offset = cx.caret_offset();
    let line = cx.caret.line();
    let Some(seg) = cx.doc.line_segment(line) else {
        return;
    };
    let count = seg.end_offset().saturating_sub(offset);
    if count == 0 || cx.doc.is_read_only_range(offset, count) {
        return;
    }
    cx.doc.remove(offset, count);
    cx.doc.request_update(UpdateRequest::SingleLine(line));
    cx.doc.commit_update();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
