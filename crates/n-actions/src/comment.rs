//! Comment toggling — line comments and block comments.
//!
//! The comment tokens come from the document's highlighting properties
//! ([`LINE_COMMENT`], [`BLOCK_COMMENT_BEGIN`], [`BLOCK_COMMENT_END`]). A
//! document without them has nothing to toggle.
//!
//! # Line comments
//!
//! All affected lines share one decision. If any of them, ignoring
//! surrounding whitespace, does not start with the token, every line gets
//! commented; only when all of them already start with it are they all
//! uncommented. Commenting inserts the token at column 0; uncommenting
//! removes its first occurrence on the line.
//!
//! # Block comments
//!
//! The span under consideration runs from the first selection's start to
//! the last selection's end (or is the caret offset). An existing comment
//! region is looked for inside the span first, then around it:
//!
//! ```text
//!   start token:  inside the span ─▶ else nearest one before the span end
//!                                    that is not closed before the span
//!   end token:    inside the span, after the start ─▶ else first one from
//!                                    just before the span start onward
//! ```
//!
//! A found region is removed (end token first, so the start offset stays
//! valid); otherwise the selection gets wrapped (end token first, for the
//! same reason).

use n_text::document::{BLOCK_COMMENT_BEGIN, BLOCK_COMMENT_END, LINE_COMMENT};
use n_text::{Document, Position, Selection, UpdateRequest};
use tracing::debug;

use crate::context::EditContext;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Toggle a line comment when the document has a line-comment token,
/// otherwise a block comment.
pub fn toggle_comment(cx: &mut EditContext<'_>) {
    if cx.doc.read_only() {
        return;
    }
    if cx.doc.property(LINE_COMMENT).is_some() {
        toggle_line_comment(cx);
    } else if cx.doc.property(BLOCK_COMMENT_BEGIN).is_some() {
        toggle_block_comment(cx);
    }
}

// ---------------------------------------------------------------------------
// Line comments
// ---------------------------------------------------------------------------

/// The lines one selection affects, with the last line dropped when the
/// selection ends exactly at its start.
fn affected_lines(doc: &Document, sel: &Selection) -> Option<(usize, usize)> {
    let (first, mut last) = (sel.start.line, sel.end.line);
    let end_offset = sel.end_offset(doc);
    if doc.line_segment(last).is_some_and(|seg| seg.offset == end_offset) {
        if last == first {
            return None;
        }
        last -= 1;
    }
    Some((first, last))
}

fn line_is_commented(doc: &Document, line: usize, token: &str) -> bool {
    doc.line_text(line)
        .is_some_and(|text| text.trim().starts_with(token))
}

pub fn toggle_line_comment(cx: &mut EditContext<'_>) {
    if cx.doc.read_only() {
        return;
    }
    let Some(token) = cx
        .doc
        .property(LINE_COMMENT)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
    else {
        return;
    };

    let mut group = cx.undo_group();
    let cx = &mut *group;

    if !cx.selections.has_selection() {
        let line = cx.caret.line();
        let mut batch = cx.update_batch();
        if line_is_commented(batch.doc, line, &token) {
            uncomment_lines(batch.doc, &token, line, line);
        } else {
            comment_lines(batch.doc, &token, line, line);
        }
        batch.doc.clear_update_queue();
        batch.doc.request_update(UpdateRequest::SingleLine(line));
        return;
    }

    let ranges: Vec<(usize, usize)> = cx
        .selections
        .iter()
        .filter_map(|sel| affected_lines(cx.doc, sel))
        .collect();
    let comment = ranges
        .iter()
        .any(|&(first, last)| (first..=last).any(|l| !line_is_commented(cx.doc, l, &token)));

    for (first, last) in ranges {
        let mut batch = cx.update_batch();
        if comment {
            comment_lines(batch.doc, &token, first, last);
        } else {
            uncomment_lines(batch.doc, &token, first, last);
        }
        batch.doc.clear_update_queue();
        batch
            .doc
            .request_update(UpdateRequest::LinesBetween(first, last));
    }
    cx.doc.commit_update();
    cx.keep_selection();
}

fn comment_lines(doc: &mut Document, token: &str, first: usize, last: usize) {
    for line in (first..=last).rev() {
        let Some(seg) = doc.line_segment(line) else {
            continue;
        };
        if doc.is_read_only(seg.offset) {
            continue;
        }
        doc.insert(seg.offset, token);
    }
}

fn uncomment_lines(doc: &mut Document, token: &str, first: usize, last: usize) {
    let token_len = token.chars().count();
    for line in (first..=last).rev() {
        let (Some(seg), Some(text)) = (doc.line_segment(line), doc.line_text(line)) else {
            continue;
        };
        if !text.trim().starts_with(token) {
            continue;
        }
        let Some(byte_idx) = text.find(token) else {
            continue;
        };
        let offset = seg.offset + text[..byte_idx].chars().count();
        if doc.is_read_only_range(offset, token_len) {
            continue;
        }
        doc.remove(offset, token_len);
    }
}

// ---------------------------------------------------------------------------
// Block comments
// ---------------------------------------------------------------------------

/// A matched pair of block-comment tokens. `end_offset` is where the end
/// token starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockCommentRegion {
    pub comment_start: String,
    pub comment_end: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

pub fn toggle_block_comment(cx: &mut EditContext<'_>) {
    if cx.doc.read_only() {
        return;
    }
    let (Some(begin), Some(end)) = (
        cx.doc.property(BLOCK_COMMENT_BEGIN).map(str::to_string),
        cx.doc.property(BLOCK_COMMENT_END).map(str::to_string),
    ) else {
        return;
    };
    if begin.is_empty() || end.is_empty() {
        return;
    }

    let (span_start, span_end) = match (cx.selections.first(), cx.selections.last()) {
        (Some(first), Some(last)) => (first.offset(cx.doc), last.end_offset(cx.doc)),
        _ => {
            let offset = cx.caret_offset();
            (offset, offset)
        }
    };

    let region = find_selected_comment_region(cx.doc, &begin, &end, span_start, span_end);
    {
        let mut group = cx.undo_group();
        let cx = &mut *group;
        match &region {
            Some(region) => remove_block_comment(cx.doc, region),
            None if cx.selections.has_selection() => {
                if cx.doc.is_read_only(span_start) || cx.doc.is_read_only(span_end) {
                    debug!("block comment blocked by read-only region");
                } else {
                    cx.doc.insert(span_end, &end);
                    cx.doc.insert(span_start, &begin);
                }
            }
            None => {}
        }
    }

    let line = cx.doc.line_for_offset(span_start);
    cx.doc
        .request_update(UpdateRequest::PositionToEnd(Position::new(line, 0)));
    cx.doc.commit_update();
    let caret = cx.caret.position();
    cx.place_caret(caret);
    cx.keep_selection();
}

fn remove_block_comment(doc: &mut Document, region: &BlockCommentRegion) {
    let begin_len = region.comment_start.chars().count();
    let end_len = region.comment_end.chars().count();
    if doc.is_read_only_range(region.end_offset, end_len)
        || doc.is_read_only_range(region.start_offset, begin_len)
    {
        debug!("block comment removal blocked by read-only region");
        return;
    }
    doc.remove(region.end_offset, end_len);
    doc.remove(region.start_offset, begin_len);
}

/// Find the block-comment region enclosing or overlapping
/// `[span_start, span_end)`.
#[must_use]
pub fn find_selected_comment_region(
    doc: &Document,
    comment_start: &str,
    comment_end: &str,
    span_start: usize,
    span_end: usize,
) -> Option<BlockCommentRegion> {
    let len = doc.text_length();
    if len == 0 {
        return None;
    }
    let text: Vec<char> = doc.text(0, len).chars().collect();
    let begin: Vec<char> = comment_start.chars().collect();
    let end: Vec<char> = comment_end.chars().collect();
    let s = span_start.min(len);
    let e = span_end.clamp(s, len);
    let selected = &text[s..e];

    let mut start_offset = find(selected, &begin, 0).map(|i| i + s);
    let mut end_offset = match start_offset {
        Some(st) => find(selected, &end, st + begin.len() - s),
        None => find(selected, &end, 0),
    }
    .map(|i| i + s);

    if start_offset.is_none() {
        let limit = (e + begin.len()).saturating_sub(1).min(len);
        start_offset = rfind(&text[..limit], &begin);
        if let Some(c) = start_offset {
            // A start token already closed before the span does not count.
            if c < s && find(&text[c..s], &end, 0).is_some_and(|i| i > 0) {
                start_offset = None;
            }
        }
    }

    if end_offset.is_none() {
        let from = (s + 1).checked_sub(end.len()).unwrap_or(s);
        end_offset = find(&text[from..], &end, 0).map(|i| i + from);
    }

    let (start_offset, end_offset) = (start_offset?, end_offset?);
    if end_offset < start_offset + begin.len() {
        return None;
    }
    Some(BlockCommentRegion {
        comment_start: comment_start.to_string(),
        comment_end: comment_end.to_string(),
        start_offset,
        end_offset,
    })
}

/// First index `>= from` where `needle` occurs in `hay`.
fn find(hay: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }
    (from..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()] == *needle)
}

/// Last index where `needle` occurs in `hay`.
fn rfind(hay: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }
    (0..=hay.len() - needle.len())
        .rev()
        .find(|&i| hay[i..i + needle.len()] == *needle)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
