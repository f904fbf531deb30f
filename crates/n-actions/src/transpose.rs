//! Line transposition — swap a line with its neighbour.
//!
//! The swap is a single replace over both lines, so it undoes in one step.
//! When the lower line is the last one and has no terminator, the upper
//! line's terminator moves between the two so the new last line stays
//! unterminated:
//!
//! ```text
//! "x\ny"  --swap 0-->  "y\nx"
//! ```

use n_text::{Document, Position, UpdateRequest};
use thiserror::Error;
use tracing::{debug, warn};

use crate::context::EditContext;

/// Why two lines could not be swapped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransposeError {
    #[error("document is read-only")]
    ReadOnly,

    #[error("no line after line {0}")]
    OutOfRange(usize),

    #[error("lines {0} and {1} overlap a read-only region")]
    RegionReadOnly(usize, usize),

    #[error("line {0} has no terminator")]
    MissingTerminator(usize),
}

/// Swap `first` with the line after it.
///
/// # Errors
///
/// Fails without touching the document when it is read-only, when either
/// line does not exist, or when the two lines overlap a protected region.
pub fn switch_lines(doc: &mut Document, first: usize) -> Result<(), TransposeError> {
    if doc.read_only() {
        return Err(TransposeError::ReadOnly);
    }
    let second = first + 1;
    let (Some(upper), Some(lower)) = (doc.line_segment(first), doc.line_segment(second)) else {
        return Err(TransposeError::OutOfRange(first));
    };
    let offset = upper.offset;
    let length = lower.offset + lower.total_length() - offset;
    if doc.is_read_only_range(offset, length) {
        return Err(TransposeError::RegionReadOnly(first, second));
    }

    let lower_text = doc.text(lower.offset, lower.total_length());
    let replacement = if lower.delimiter_length > 0 {
        lower_text + &doc.text(upper.offset, upper.total_length())
    } else {
        if upper.delimiter_length == 0 {
            return Err(TransposeError::MissingTerminator(first));
        }
        let content = doc.text(upper.offset, upper.length);
        let delimiter = doc.text(upper.end_offset(), upper.delimiter_length);
        lower_text + &delimiter + &content
    };

    doc.replace(offset, length, &replacement);
    doc.request_update(UpdateRequest::PositionToEnd(Position::new(first, 0)));
    doc.commit_update();
    Ok(())
}

/// [`switch_lines`] as a convenience: failures are logged and reported as
/// `false`.
pub fn try_switch_lines(doc: &mut Document, first: usize) -> bool {
    match switch_lines(doc, first) {
        Ok(()) => true,
        Err(err) => {
            warn!(first, %err, "line transposition failed");
            false
        }
    }
}

pub fn move_line_up(cx: &mut EditContext<'_>) {
    let pos = cx.caret.position();
    if pos.line == 0 {
        return;
    }
    if cx.doc.read_only() {
        debug!("move line blocked by read-only document");
        return;
    }
    if try_switch_lines(cx.doc, pos.line - 1) {
        cx.place_caret(Position::new(pos.line - 1, pos.col));
    }
}

pub fn move_line_down(cx: &mut EditContext<'_>) {
    let pos = cx.caret.position();
    if pos.line + 1 >= cx.doc.total_lines() {
        return;
    }
    if cx.doc.read_only() {
        debug!("move line blocked by read-only document");
        return;
    }
    if try_switch_lines(cx.doc, pos.line) {
        cx.place_caret(Position::new(pos.line + 1, pos.col));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use pretty_assertions::assert_eq;

    fn p(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    // -- switch_lines -------------------------------------------------------

    #[test]
    fn swaps_terminated_lines() {
        let mut doc = Document::from_text("a\nb\nc\n");
        assert_eq!(switch_lines(&mut doc, 1), Ok(()));
        assert_eq!(doc.contents(), "a\nc\nb\n");
        assert_eq!(doc.history().undo_count(), 1);
    }

    #[test]
    fn relocates_terminator_before_unterminated_last_line() {
        let mut doc = Document::from_text("x\ny");
        assert_eq!(switch_lines(&mut doc, 0), Ok(()));
        assert_eq!(doc.contents(), "y\nx");
    }

    #[test]
    fn keeps_crlf_terminators() {
        let mut doc = Document::from_text("x\r\ny");
        assert_eq!(switch_lines(&mut doc, 0), Ok(()));
        assert_eq!(doc.contents(), "y\r\nx");
    }

    #[test]
    fn errors_leave_document_untouched() {
        let mut doc = Document::from_text("a\nb");
        assert_eq!(switch_lines(&mut doc, 1), Err(TransposeError::OutOfRange(1)));

        doc.protect(2, 1);
        assert_eq!(
            switch_lines(&mut doc, 0),
            Err(TransposeError::RegionReadOnly(0, 1))
        );

        doc.set_read_only(true);
        assert_eq!(switch_lines(&mut doc, 0), Err(TransposeError::ReadOnly));
        assert!(!try_switch_lines(&mut doc, 0));
        assert_eq!(doc.contents(), "a\nb");
    }

    // -- Actions ------------------------------------------------------------

    #[test]
    fn move_down_then_up_follows_the_line() {
        let mut fx = Fixture::new("one\ntwo\nthree\n", p(0, 2));
        move_line_down(&mut fx.cx());
        assert_eq!(fx.doc.contents(), "two\none\nthree\n");
        assert_eq!(fx.caret.position(), p(1, 2));

        move_line_up(&mut fx.cx());
        assert_eq!(fx.doc.contents(), "one\ntwo\nthree\n");
        assert_eq!(fx.caret.position(), p(0, 2));
    }

    #[test]
    fn move_at_edges_is_a_no_op() {
        let mut fx = Fixture::new("a\nb", p(0, 0));
        move_line_up(&mut fx.cx());
        fx.caret.set_position(p(1, 0));
        move_line_down(&mut fx.cx());
        assert_eq!(fx.doc.contents(), "a\nb");
        assert!(!fx.doc.history().can_undo());
    }

    #[test]
    fn move_down_onto_last_line_does_not_panic() {
        let mut fx = Fixture::new("x\ny", p(0, 1));
        move_line_down(&mut fx.cx());
        assert_eq!(fx.doc.contents(), "y\nx");
        assert_eq!(fx.caret.position(), p(1, 1));
        move_line_up(&mut fx.cx());
        assert_eq!(fx.doc.total_lines(), 2);
    }
}
