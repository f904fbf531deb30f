//! Shared fixture for unit tests.

use n_text::{Caret, Document, FoldSet, Position, SelectionSet};

use crate::context::EditContext;
use crate::view::MonospaceView;

/// Owned editor state that lends out an [`EditContext`].
pub struct Fixture {
    pub doc: Document,
    pub selections: SelectionSet,
    pub folds: FoldSet,
    pub caret: Caret,
    pub view: MonospaceView,
}

impl Fixture {
    pub fn new(text: &str, caret: Position) -> Self {
        Self {
            doc: Document::from_text(text),
            selections: SelectionSet::new(),
            folds: FoldSet::new(),
            caret: Caret::at(caret),
            view: MonospaceView::new(10, 20),
        }
    }

    pub fn cx(&mut self) -> EditContext<'_> {
        EditContext::new(
            &mut self.doc,
            &mut self.selections,
            &self.folds,
            &mut self.caret,
            &self.view,
        )
    }
}
