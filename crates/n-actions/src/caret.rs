//! Caret navigation — horizontal, vertical and word motion.
//!
//! Horizontal motion treats a collapsed fold as one unit: a caret sitting
//! exactly at a folded region's edge jumps to the other edge in one step.
//! When several folded regions share that edge the one starting earliest
//! wins, which makes nested folds jump outward.
//!
//! Vertical motion goes through the [`TextView`](crate::view::TextView)
//! pixel mapping so that hidden lines are skipped and the caret keeps its
//! desired column across short lines.

use n_text::Position;

use crate::context::EditContext;
use crate::word;

// ---------------------------------------------------------------------------
// Horizontal
// ---------------------------------------------------------------------------

/// Which edge of the selection a collapsing move lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

/// With a selection present, park the caret on its first range's `edge`.
/// Returns true when the move was consumed.
fn collapse_to_edge(cx: &mut EditContext<'_>, edge: Edge) -> bool {
    let Some(first) = cx.selections.first().copied() else {
        return false;
    };
    let target = match edge {
        Edge::Start => first.start,
        Edge::End => first.end,
    };
    cx.place_caret(target);
    cx.set_desired_column();
    true
}

pub fn caret_left(cx: &mut EditContext<'_>, collapse: bool) {
    if collapse && collapse_to_edge(cx, Edge::Start) {
        return;
    }
    let pos = cx.caret.position();
    let target = step_left(cx, pos);
    cx.place_caret(target);
    cx.set_desired_column();
}

fn step_left(cx: &EditContext<'_>, pos: Position) -> Position {
    if let Some(fold) = cx.folds.folded_with_end(pos.line).find(|m| m.end.col == pos.col) {
        return fold.start;
    }
    if pos.col > 0 {
        pos.with_col(pos.col - 1)
    } else if pos.line > 0 {
        let above = cx.doc.line_segment(pos.line - 1).map_or(0, |s| s.length);
        Position::new(pos.line - 1, above)
    } else {
        pos
    }
}

pub fn caret_right(cx: &mut EditContext<'_>, collapse: bool) {
    if collapse && collapse_to_edge(cx, Edge::End) {
        return;
    }
    let pos = cx.caret.position();
    if let Some(fold) = cx
        .folds
        .folded_with_start(pos.line)
        .find(|m| m.start.col == pos.col)
    {
        let end = fold.end;
        cx.place_caret(end);
        cx.set_desired_column();
        return;
    }

    let len = cx.doc.line_segment(pos.line).map_or(0, |s| s.length);
    let target = if pos.col < len || cx.doc.properties().allow_caret_beyond_eol {
        pos.with_col(pos.col + 1)
    } else if pos.line + 1 < cx.doc.total_lines() {
        Position::new(pos.line + 1, 0)
    } else {
        pos
    };
    cx.place_caret(target);
    cx.set_desired_column();
}

// ---------------------------------------------------------------------------
// Vertical
// ---------------------------------------------------------------------------

pub fn caret_up(cx: &mut EditContext<'_>) {
    let pos = cx.caret.position();
    let visual = cx.view.visual_line(cx.doc, cx.folds, pos.line);
    if visual == 0 {
        return;
    }
    move_to_visual_line(cx, pos, visual - 1);
}

pub fn caret_down(cx: &mut EditContext<'_>) {
    let pos = cx.caret.position();
    let visual = cx.view.visual_line(cx.doc, cx.folds, pos.line);
    let last_line = cx.doc.total_lines().saturating_sub(1);
    let last_visual = cx.view.visual_line(cx.doc, cx.folds, last_line);
    if visual >= last_visual {
        return;
    }
    move_to_visual_line(cx, pos, visual + 1);
}

fn move_to_visual_line(cx: &mut EditContext<'_>, from: Position, visual: usize) {
    let view = cx.view;
    let x = view.drawing_x(cx.doc, cx.folds, from.line, from.col);
    let row = i32::try_from(visual).unwrap_or(i32::MAX);
    let y = view
        .drawing_top()
        .saturating_add(row.saturating_mul(view.line_height()))
        .saturating_sub(view.scroll_top());
    let target = view.logical_position(cx.doc, cx.folds, x, y);
    cx.place_caret(target);
    cx.set_caret_to_desired_column();
}

// ---------------------------------------------------------------------------
// Word
// ---------------------------------------------------------------------------

pub fn word_right(cx: &mut EditContext<'_>) {
    let old = cx.caret.position();
    let len = cx.doc.line_segment(old.line).map_or(0, |s| s.length);
    let mut target = if old.col >= len {
        if old.line + 1 < cx.doc.total_lines() {
            Position::new(old.line + 1, 0)
        } else {
            old
        }
    } else {
        let end = word::scintilla_word_end(cx.doc, cx.caret_offset());
        cx.doc.offset_to_position(end)
    };

    if let Some(fold) = cx.folds.containing(target).find(|m| m.folded) {
        target = if old == fold.start { fold.end } else { fold.start };
    }
    cx.place_caret(target);
    cx.set_desired_column();
}

pub fn word_left(cx: &mut EditContext<'_>) {
    let old = cx.caret.position();
    if old.col == 0 {
        caret_left(cx, false);
        return;
    }
    let start = word::prev_word_start(cx.doc, cx.caret_offset());
    let mut target = cx.doc.offset_to_position(start);

    if let Some(fold) = cx.folds.containing(target).find(|m| m.folded) {
        target = if old == fold.end { fold.start } else { fold.end };
    }
    cx.place_caret(target);
    cx.set_desired_column();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
