//! End-to-end behaviour of the action set, driven through `EditAction`.

use n_actions::{EditAction, EditContext, MonospaceView, Outcome};
use n_text::document::{BLOCK_COMMENT_BEGIN, BLOCK_COMMENT_END, LINE_COMMENT};
use n_text::{Caret, Document, FoldMarker, FoldSet, Position, Selection, SelectionSet};
use pretty_assertions::assert_eq;

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Editor {
    doc: Document,
    selections: SelectionSet,
    folds: FoldSet,
    caret: Caret,
    view: MonospaceView,
}

impl Editor {
    fn new(text: &str, line: usize, col: usize) -> Self {
        Self {
            doc: Document::from_text(text),
            selections: SelectionSet::new(),
            folds: FoldSet::new(),
            caret: Caret::at(Position::new(line, col)),
            view: MonospaceView::default(),
        }
    }

    fn run(&mut self, action: EditAction) -> Outcome {
        let mut cx = EditContext::new(
            &mut self.doc,
            &mut self.selections,
            &self.folds,
            &mut self.caret,
            &self.view,
        );
        action.execute(&mut cx)
    }

    fn select(&mut self, a: (usize, usize), b: (usize, usize)) {
        self.selections.add(Selection::new(
            Position::new(a.0, a.1),
            Position::new(b.0, b.1),
        ));
    }

    fn text(&self) -> String {
        self.doc.contents()
    }

    fn caret(&self) -> (usize, usize) {
        let pos = self.caret.position();
        (pos.line, pos.col)
    }
}

// -- Deletion ---------------------------------------------------------------

#[test]
fn backspace_at_line_start_joins_lines() {
    let mut ed = Editor::new("abc\ndef\n", 1, 0);
    let out = ed.run(EditAction::Backspace);
    assert_eq!(ed.text(), "abcdef\n");
    assert_eq!(ed.caret.offset(&ed.doc), 3);
    assert!(out.modified);
}

#[test]
fn delete_line_drops_exactly_one_line() {
    for (text, line) in [("a\nb\nc\n", 0), ("a\nb\nc\n", 1), ("a\nb\nc", 2), ("a\nb", 1)] {
        let mut ed = Editor::new(text, line, 0);
        let before = ed.doc.total_lines();
        ed.run(EditAction::DeleteLine);
        assert_eq!(ed.doc.total_lines(), before - 1, "{text:?} line {line}");
    }
}

#[test]
fn word_backspace_is_one_undo_step() {
    let mut ed = Editor::new("one\n  two", 1, 2);
    ed.run(EditAction::WordBackspace);
    assert_eq!(ed.text(), "onetwo");
    ed.run(EditAction::Undo);
    assert_eq!(ed.text(), "one\n  two");
}

#[test]
fn backspace_over_several_selections_undoes_at_once() {
    let mut ed = Editor::new("one two three", 0, 13);
    ed.select((0, 0), (0, 3));
    ed.select((0, 8), (0, 13));
    ed.run(EditAction::Backspace);
    assert_eq!(ed.text(), " two ");
    ed.run(EditAction::Undo);
    assert_eq!(ed.text(), "one two three");
}

#[test]
fn protected_region_blocks_every_deletion() {
    let text = "keep\nthis";
    for action in [
        EditAction::Backspace,
        EditAction::Delete,
        EditAction::WordBackspace,
        EditAction::DeleteWord,
        EditAction::DeleteLine,
        EditAction::DeleteToLineEnd,
    ] {
        let mut ed = Editor::new(text, 0, 2);
        ed.doc.protect(0, 4);
        let out = ed.run(action);
        assert_eq!(ed.text(), text, "{action}");
        assert!(!out.modified, "{action}");
    }
}

#[test]
fn read_only_document_rejects_edits() {
    let text = "a\nb\nc";
    for action in [
        EditAction::Tab,
        EditAction::Backspace,
        EditAction::DeleteLine,
        EditAction::MoveLineDown,
        EditAction::ToggleComment,
    ] {
        let mut ed = Editor::new(text, 1, 1);
        ed.doc.set_property(LINE_COMMENT, "//");
        ed.doc.set_read_only(true);
        ed.run(action);
        assert_eq!(ed.text(), text, "{action}");
    }
}

// -- Indentation ------------------------------------------------------------

#[test]
fn tab_with_spaces_fills_to_indent_size() {
    let mut ed = Editor::new("x", 0, 0);
    let props = ed.doc.properties_mut();
    props.convert_tabs_to_spaces = true;
    props.indentation_size = 4;
    ed.run(EditAction::Tab);
    assert_eq!(ed.text(), "    x");
    assert_eq!(ed.caret(), (0, 4));
}

#[test]
fn shift_tab_on_flush_lines_is_a_no_op() {
    let mut ed = Editor::new("a\nb\n", 0, 0);
    ed.select((0, 0), (1, 1));
    let out = ed.run(EditAction::ShiftTab);
    assert_eq!(ed.text(), "a\nb\n");
    assert!(!out.modified);
    assert!(out.keep_selection);
}

#[test]
fn block_indent_round_trips_and_keeps_selection() {
    let text = "fn f() {\nlet a;\nlet b;\n}\n";
    let mut ed = Editor::new(text, 1, 0);
    ed.select((1, 0), (3, 0));
    ed.run(EditAction::Tab);
    assert_eq!(ed.text(), "fn f() {\n\tlet a;\n\tlet b;\n}\n");
    assert!(ed.selections.has_selection());

    ed.run(EditAction::ShiftTab);
    assert_eq!(ed.text(), text);
}

// -- Comments ---------------------------------------------------------------

#[test]
fn line_comment_toggle_restores_text() {
    let text = "a\n  b\nc\n";
    let mut ed = Editor::new(text, 0, 0);
    ed.doc.set_property(LINE_COMMENT, "#");
    ed.select((0, 0), (2, 1));

    ed.run(EditAction::ToggleComment);
    assert_eq!(ed.text(), "#a\n#  b\n#c\n");
    ed.run(EditAction::ToggleComment);
    assert_eq!(ed.text(), text);
}

#[test]
fn block_comment_toggle_restores_text() {
    let text = "call(a, b);";
    let mut ed = Editor::new(text, 0, 9);
    ed.doc.set_property(BLOCK_COMMENT_BEGIN, "/*");
    ed.doc.set_property(BLOCK_COMMENT_END, "*/");
    ed.select((0, 5), (0, 9));

    ed.run(EditAction::ToggleComment);
    assert_eq!(ed.text(), "call(/*a, b*/);");
    ed.run(EditAction::ToggleBlockComment);
    assert_eq!(ed.text(), text);
}

#[test]
fn block_comment_wraps_selection_kept_after_indent() {
    let mut ed = Editor::new("ab\ncd", 1, 1);
    ed.doc.set_property(BLOCK_COMMENT_BEGIN, "/*");
    ed.doc.set_property(BLOCK_COMMENT_END, "*/");
    ed.select((0, 1), (1, 1));

    ed.run(EditAction::Tab);
    assert_eq!(ed.text(), "\tab\n\tcd");
    ed.run(EditAction::ToggleBlockComment);
    assert_eq!(ed.text(), "\ta/*b\n\tc*/d");
}

#[test]
fn comment_toggle_undoes_in_one_step() {
    let text = "a\nb\nc";
    let mut ed = Editor::new(text, 0, 0);
    ed.doc.set_property(LINE_COMMENT, "//");
    ed.select((0, 0), (2, 1));
    ed.run(EditAction::ToggleLineComment);
    assert_eq!(ed.doc.history().undo_count(), 1);
    ed.run(EditAction::Undo);
    assert_eq!(ed.text(), text);
}

// -- Line transposition -----------------------------------------------------

#[test]
fn move_line_down_relocates_terminator() {
    let mut ed = Editor::new("x\ny", 0, 0);
    ed.run(EditAction::MoveLineDown);
    assert_eq!(ed.text(), "y\nx");
    assert_eq!(ed.caret(), (1, 0));

    ed.run(EditAction::MoveLineUp);
    assert_eq!(ed.doc.total_lines(), 2);
}

// -- Caret navigation -------------------------------------------------------

#[test]
fn caret_moves_stay_inside_the_document() {
    let text = "ab\n\ncdef";
    let moves = [
        EditAction::CaretLeft { collapse_to_edge: false },
        EditAction::CaretRight { collapse_to_edge: false },
        EditAction::CaretUp,
        EditAction::CaretDown,
        EditAction::WordLeft,
        EditAction::WordRight,
    ];
    for start in [(0, 0), (1, 0), (2, 4)] {
        for action in moves {
            let mut ed = Editor::new(text, start.0, start.1);
            for _ in 0..5 {
                let out = ed.run(action);
                assert!(!out.modified);
                let pos = ed.caret.position();
                assert!(pos.line < ed.doc.total_lines(), "{action} from {start:?}");
                let len = ed.doc.line_segment(pos.line).map_or(0, |s| s.length);
                assert!(pos.col <= len, "{action} from {start:?}");
            }
        }
    }
}

#[test]
fn collapse_to_edge_consumes_the_move() {
    let mut ed = Editor::new("hello world", 0, 8);
    ed.select((0, 2), (0, 8));
    ed.run(EditAction::CaretLeft { collapse_to_edge: true });
    assert_eq!(ed.caret(), (0, 2));
    assert!(!ed.selections.has_selection());
}

#[test]
fn folded_region_is_one_step() {
    let mut ed = Editor::new("if x {\n  a\n  b\n}\nend", 0, 5);
    ed.folds
        .add(FoldMarker::collapsed(Position::new(0, 5), Position::new(3, 1)));

    ed.run(EditAction::CaretRight { collapse_to_edge: false });
    assert_eq!(ed.caret(), (3, 1));
    ed.run(EditAction::CaretLeft { collapse_to_edge: false });
    assert_eq!(ed.caret(), (0, 5));

    ed.run(EditAction::CaretDown);
    assert_eq!(ed.caret().0, 4);
}

#[test]
fn vertical_moves_restore_desired_column() {
    let mut ed = Editor::new("abcdef\nab\nabcdef", 0, 0);
    for _ in 0..5 {
        ed.run(EditAction::CaretRight { collapse_to_edge: false });
    }
    ed.run(EditAction::CaretDown);
    assert_eq!(ed.caret(), (1, 2));
    ed.run(EditAction::CaretDown);
    assert_eq!(ed.caret(), (2, 5));
}

#[test]
fn goto_matching_brace_crosses_lines() {
    let mut ed = Editor::new("{\n  [x]\n}", 0, 1);
    ed.run(EditAction::GotoMatchingBrace);
    assert_eq!(ed.caret(), (2, 1));
}

// -- History ----------------------------------------------------------------

#[test]
fn undo_redo_cycle() {
    let mut ed = Editor::new("one two", 0, 7);
    ed.run(EditAction::WordBackspace);
    ed.run(EditAction::Backspace);
    assert_eq!(ed.text(), "one");

    ed.run(EditAction::Undo);
    assert_eq!(ed.text(), "one ");
    ed.run(EditAction::Undo);
    assert_eq!(ed.text(), "one two");

    let out = ed.run(EditAction::Redo);
    assert!(out.modified);
    assert_eq!(ed.text(), "one ");
}

#[test]
fn undo_restores_protected_region() {
    let mut ed = Editor::new("abc", 0, 0);
    ed.doc.protect(1, 1);
    ed.run(EditAction::Tab);
    assert_eq!(ed.doc.protected_regions(), &[2..3]);
    ed.run(EditAction::Undo);
    assert_eq!(ed.text(), "abc");
    assert_eq!(ed.doc.protected_regions(), &[1..2]);

    ed.caret.set_position(Position::new(0, 2));
    ed.run(EditAction::Backspace);
    assert_eq!(ed.text(), "abc");
}

#[test]
fn every_action_leaves_history_balanced() {
    for action in EditAction::all() {
        let mut ed = Editor::new("  a{b}\n\tc\n", 1, 1);
        ed.doc.set_property(LINE_COMMENT, "//");
        ed.select((0, 1), (1, 1));
        ed.run(*action);
        assert_eq!(ed.doc.history().depth(), 0, "{action}");
        assert!(!ed.doc.in_update(), "{action}");
    }
}

// -- Names ------------------------------------------------------------------

#[test]
fn actions_parse_from_names() {
    let action: EditAction = "MoveLineDown".parse().unwrap();
    assert_eq!(action, EditAction::MoveLineDown);
    assert_eq!(
        "caretleft".parse::<EditAction>().unwrap(),
        EditAction::CaretLeft { collapse_to_edge: false }
    );
    assert!("Nope".parse::<EditAction>().is_err());
}
