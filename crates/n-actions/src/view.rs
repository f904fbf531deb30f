//! View — the pixel mapping vertical caret moves depend on.
//!
//! Actions never lay out text themselves. Vertical motion and the desired
//! column go through a [`TextView`], which maps logical positions to pixel
//! coordinates and back:
//!
//! ```text
//!            drawing_x(line, col)
//! Position ─────────────────────────▶ pixel x
//!    ▲                                   │
//!    └──── logical_position(x, y) ◀──────┘
//! ```
//!
//! Visual lines count only lines not hidden inside a collapsed fold, so
//! moving down from a folded start line lands on the first line after the
//! fold.
//!
//! [`MonospaceView`] is the reference mapping: fixed-size cells, tabs
//! expanded to the document's tab width, wide chars taking two cells.

use n_text::{Document, FoldSet, Position};
use unicode_width::UnicodeWidthChar;

// ---------------------------------------------------------------------------
// TextView
// ---------------------------------------------------------------------------

/// Pixel mapping for one text area.
pub trait TextView {
    /// Index of `line` among the visible lines.
    fn visual_line(&self, doc: &Document, folds: &FoldSet, line: usize) -> usize;

    /// Pixel x of the left edge of `col` on `line`, relative to the
    /// viewport.
    fn drawing_x(&self, doc: &Document, folds: &FoldSet, line: usize, col: usize) -> i32;

    /// The logical position under a viewport pixel.
    fn logical_position(&self, doc: &Document, folds: &FoldSet, x: i32, y: i32) -> Position;

    /// The position on `line` nearest to viewport pixel `x`.
    fn logical_column(&self, doc: &Document, folds: &FoldSet, line: usize, x: i32) -> Position;

    /// Height of one visual line in pixels.
    fn line_height(&self) -> i32;

    /// Top of the text drawing area in pixels.
    fn drawing_top(&self) -> i32;

    /// Vertical scroll offset in pixels.
    fn scroll_top(&self) -> i32;

    /// Horizontal scroll offset in pixels.
    fn scroll_left(&self) -> i32;
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Convert a char column to a display column.
///
/// Expands tabs to the next tab stop and counts wide chars as two cells.
/// Stops at `char_col`, at a line break, or when the chars run out.
#[must_use]
pub fn display_col<I: Iterator<Item = char>>(
    chars: I,
    char_col: usize,
    tab_width: usize,
) -> usize {
    let tab_w = tab_width.max(1);
    let mut col = 0;
    for (i, ch) in chars.enumerate() {
        if i >= char_col || n_text::buffer::is_line_break(ch) {
            break;
        }
        col = advance(col, ch, tab_w);
    }
    col
}

fn advance(col: usize, ch: char, tab_w: usize) -> usize {
    if ch == '\t' {
        (col / tab_w + 1) * tab_w
    } else {
        col + ch.width().unwrap_or(0)
    }
}

/// Visual (tab-expanded) column of `pos` in `doc`.
#[must_use]
pub fn visual_column(doc: &Document, pos: Position) -> usize {
    let text = doc.line_text(pos.line).unwrap_or_default();
    let len = text.chars().count();
    let tab_w = doc.properties().tab_width;
    let base = display_col(text.chars(), pos.col, tab_w);
    // Columns parked past the content are one cell each.
    base + pos.col.saturating_sub(len)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn to_px(cells: usize) -> i32 {
    cells as i32
}

#[allow(clippy::cast_sign_loss)]
const fn to_cells(px: i32) -> usize {
    if px < 0 { 0 } else { px as usize }
}

// ---------------------------------------------------------------------------
// MonospaceView
// ---------------------------------------------------------------------------

/// A grid of fixed-size cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceView {
    pub char_width: i32,
    pub line_height: i32,
    pub drawing_top: i32,
    pub scroll_top: i32,
    pub scroll_left: i32,
}

impl Default for MonospaceView {
    fn default() -> Self {
        Self::new(8, 16)
    }
}

impl MonospaceView {
    #[must_use]
    pub const fn new(char_width: i32, line_height: i32) -> Self {
        Self {
            char_width: if char_width < 1 { 1 } else { char_width },
            line_height: if line_height < 1 { 1 } else { line_height },
            drawing_top: 0,
            scroll_top: 0,
            scroll_left: 0,
        }
    }

    /// The logical line shown at visual row `visual`, clamped to the last
    /// visible line.
    fn line_for_visual(doc: &Document, folds: &FoldSet, visual: usize) -> usize {
        let mut seen = 0;
        let mut last_visible = 0;
        for line in 0..doc.total_lines() {
            if folds.is_line_hidden(line) {
                continue;
            }
            if seen == visual {
                return line;
            }
            seen += 1;
            last_visible = line;
        }
        last_visible
    }
}

impl TextView for MonospaceView {
    fn visual_line(&self, doc: &Document, folds: &FoldSet, line: usize) -> usize {
        let line = line.min(doc.total_lines());
        (0..line).filter(|&l| !folds.is_line_hidden(l)).count()
    }

    fn drawing_x(&self, doc: &Document, _folds: &FoldSet, line: usize, col: usize) -> i32 {
        let cells = visual_column(doc, Position::new(line, col));
        to_px(cells) * self.char_width - self.scroll_left
    }

    fn logical_position(&self, doc: &Document, folds: &FoldSet, x: i32, y: i32) -> Position {
        let row = to_cells((y - self.drawing_top + self.scroll_top) / self.line_height);
        let line = Self::line_for_visual(doc, folds, row);
        self.logical_column(doc, folds, line, x)
    }

    fn logical_column(&self, doc: &Document, _folds: &FoldSet, line: usize, x: i32) -> Position {
        let target = x + self.scroll_left;
        let text = doc.line_text(line).unwrap_or_default();
        let tab_w = doc.properties().tab_width.max(1);

        let mut cells = 0;
        let mut col = 0;
        for ch in text.chars() {
            let next = advance(cells, ch, tab_w);
            let left = to_px(cells) * self.char_width;
            let right = to_px(next) * self.char_width;
            // Nearest char boundary wins.
            if target < (left + right) / 2 {
                return Position::new(line, col);
            }
            cells = next;
            col += 1;
        }

        if doc.properties().allow_caret_beyond_eol {
            let end = to_px(cells) * self.char_width;
            let extra = (target - end + self.char_width / 2) / self.char_width;
            col += to_cells(extra);
        }
        Position::new(line, col)
    }

    fn line_height(&self) -> i32 {
        self.line_height
    }

    fn drawing_top(&self) -> i32 {
        self.drawing_top
    }

    fn scroll_top(&self) -> i32 {
        self.scroll_top
    }

    fn scroll_left(&self) -> i32 {
        self.scroll_left
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
