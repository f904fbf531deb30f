//! Indentation — Tab and Shift-Tab.
//!
//! With a selection spanning several lines, Tab and Shift-Tab work on whole
//! lines: every selected line gains or loses one indentation unit. A final
//! line whose selection ends at its very start is left alone, since none of
//! its text is selected.
//!
//! Without such a selection, Tab inserts at the caret and Shift-Tab only
//! moves the caret back to the previous indentation stop.

use n_text::{Position, Selection, UpdateRequest};
use tracing::debug;

use crate::context::EditContext;

// ---------------------------------------------------------------------------
// Indentation unit
// ---------------------------------------------------------------------------

/// One fixed indentation unit: a tab, or `indentsize` spaces.
#[must_use]
pub fn indentation_unit(cx: &EditContext<'_>) -> String {
    let props = cx.doc.properties();
    if props.convert_tabs_to_spaces {
        " ".repeat(props.indentation_size)
    } else {
        "\t".to_string()
    }
}

/// The unit that brings the caret to the next indentation stop: a tab, or
/// as many spaces as are left until the next multiple of `indentsize`.
#[must_use]
pub fn indentation_at_caret(cx: &EditContext<'_>) -> String {
    let props = cx.doc.properties();
    if props.convert_tabs_to_spaces {
        let size = props.indentation_size.max(1);
        let col = cx.caret_visual_column();
        " ".repeat(size - col % size)
    } else {
        "\t".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tab
// ---------------------------------------------------------------------------

pub fn tab(cx: &mut EditContext<'_>) {
    if cx.selections.is_read_only(cx.doc) {
        debug!("tab blocked by read-only selection");
        return;
    }
    let mut group = cx.undo_group();
    let cx = &mut *group;

    if !cx.selections.has_selection() {
        insert_tab_at_caret(cx);
        return;
    }

    let selections: Vec<Selection> = cx.selections.iter().copied().collect();
    for sel in selections {
        if sel.start.line == sel.end.line {
            insert_tab_at_caret(cx);
            break;
        }
        let mut batch = cx.update_batch();
        indent_lines(&mut batch, sel);
        batch
            .doc
            .request_update(UpdateRequest::LinesBetween(sel.start.line, sel.end.line));
    }
    cx.doc.commit_update();
    cx.keep_selection();
}

fn indent_lines(cx: &mut EditContext<'_>, sel: Selection) {
    let unit = indentation_unit(cx);
    for line in (sel.start.line..=sel.end.line).rev() {
        if line == sel.end.line && sel.end.col == 0 {
            continue;
        }
        let Some(seg) = cx.doc.line_segment(line) else {
            continue;
        };
        if cx.doc.is_read_only(seg.offset) {
            continue;
        }
        cx.doc.insert(seg.offset, &unit);
    }
}

fn insert_tab_at_caret(cx: &mut EditContext<'_>) {
    let unit = indentation_at_caret(cx);
    if cx.is_overwrite() {
        let mut chars = unit.chars();
        if let Some(first) = chars.next() {
            cx.replace_char_at_caret(first);
        }
        let rest = chars.as_str();
        if !rest.is_empty() {
            cx.insert_string_at_caret(rest);
        }
    } else {
        cx.insert_string_at_caret(&unit);
    }
    cx.set_desired_column();
}

// ---------------------------------------------------------------------------
// Shift-Tab
// ---------------------------------------------------------------------------

pub fn shift_tab(cx: &mut EditContext<'_>) {
    if !cx.selections.has_selection() {
        move_to_previous_stop(cx);
        return;
    }
    if cx.selections.is_read_only(cx.doc) {
        debug!("shift-tab blocked by read-only selection");
        return;
    }

    let mut group = cx.undo_group();
    let cx = &mut *group;
    let selections: Vec<Selection> = cx.selections.iter().copied().collect();
    for sel in selections {
        let mut batch = cx.update_batch();
        dedent_lines(&mut batch, sel);
        batch.doc.clear_update_queue();
        batch
            .doc
            .request_update(UpdateRequest::LinesBetween(sel.start.line, sel.end.line));
    }
    cx.keep_selection();
}

fn dedent_lines(cx: &mut EditContext<'_>, sel: Selection) {
    let end_offset = sel.end_offset(cx.doc);
    for line in (sel.start.line..=sel.end.line).rev() {
        let Some(seg) = cx.doc.line_segment(line) else {
            continue;
        };
        if line == sel.end.line && seg.offset == end_offset {
            continue;
        }
        let count = leading_indent_len(cx, seg.offset, seg.length);
        if count == 0 || cx.doc.is_read_only_range(seg.offset, count) {
            continue;
        }
        cx.doc.remove(seg.offset, count);
    }
}

/// How many chars one dedent removes from a line starting at `offset`.
fn leading_indent_len(cx: &EditContext<'_>, offset: usize, length: usize) -> usize {
    match cx.doc.char_at(offset) {
        _ if length == 0 => 0,
        Some('\t') => 1,
        Some(' ') => {
            let size = cx.doc.properties().indentation_size;
            let spaces = (0..length)
                .take_while(|&i| cx.doc.char_at(offset + i) == Some(' '))
                .count();
            if spaces >= size {
                size
            } else if spaces < length && cx.doc.char_at(offset + spaces) == Some('\t') {
                spaces + 1
            } else {
                spaces
            }
        }
        _ => 0,
    }
}

fn move_to_previous_stop(cx: &mut EditContext<'_>) {
    let pos = cx.caret.position();
    let size = cx.doc.properties().indentation_size.max(1);
    let rem = pos.col % size;
    let col = if rem == 0 {
        pos.col.saturating_sub(size)
    } else {
        pos.col - rem
    };
    cx.place_caret(Position::new(pos.line, col));
    cx.set_desired_column();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
