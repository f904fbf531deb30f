//! Selection state — an ordered set of disjoint ranges.
//!
//! Every [`Selection`] is stored with `start <= end`. [`SelectionSet`] keeps
//! them sorted by start and merges any range that overlaps or touches one
//! already present, so the set never holds two ranges covering the same
//! char.

use crate::document::Document;
use crate::position::{Position, Range};

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// One selected range of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
    pub read_only: bool,
}

impl Selection {
    /// A selection between two positions, in either order.
    #[must_use]
    pub fn new(a: Position, b: Position) -> Self {
        let range = Range::ordered(a, b);
        Self {
            start: range.start,
            end: range.end,
            read_only: false,
        }
    }

    #[must_use]
    pub const fn range(&self) -> Range {
        Range {
            start: self.start,
            end: self.end,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn offset(&self, doc: &Document) -> usize {
        doc.position_to_offset(self.start)
    }

    #[must_use]
    pub fn end_offset(&self, doc: &Document) -> usize {
        doc.position_to_offset(self.end)
    }

    /// Length in chars.
    #[must_use]
    pub fn length(&self, doc: &Document) -> usize {
        self.end_offset(doc).saturating_sub(self.offset(doc))
    }

    /// True when the selection may not be edited: its own flag, the document
    /// flag, or an overlapping protected region.
    #[must_use]
    pub fn is_read_only(&self, doc: &Document) -> bool {
        self.read_only || doc.is_read_only_range(self.offset(doc), self.length(doc))
    }
}

// ---------------------------------------------------------------------------
// SelectionSet
// ---------------------------------------------------------------------------

/// All selections of a text area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ranges: Vec<Selection>,
}

impl SelectionSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// A set holding one selection between `a` and `b`.
    #[must_use]
    pub fn single(a: Position, b: Position) -> Self {
        let mut set = Self::new();
        set.add(Selection::new(a, b));
        set
    }

    /// Add a selection, merging with every range it overlaps or touches.
    /// Empty selections are ignored.
    pub fn add(&mut self, sel: Selection) {
        if sel.is_empty() {
            return;
        }
        let mut merged = sel;
        self.ranges.retain(|r| {
            let touches = r.start <= merged.end && merged.start <= r.end;
            if touches {
                merged.start = merged.start.min(r.start);
                merged.end = merged.end.max(r.end);
                merged.read_only |= r.read_only;
            }
            !touches
        });
        let idx = self.ranges.partition_point(|r| r.start < merged.start);
        self.ranges.insert(idx, merged);
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        !self.ranges.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Selection> {
        self.ranges.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Selection> {
        self.ranges.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Selection> {
        self.ranges.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// True when any selection is read-only.
    #[must_use]
    pub fn is_read_only(&self, doc: &Document) -> bool {
        self.ranges.iter().any(|s| s.is_read_only(doc))
    }

    /// Remove every selected range from the document, last to first so
    /// earlier offsets stay valid, then clear the set.
    pub fn remove_selected_text(&mut self, doc: &mut Document) {
        for sel in self.ranges.iter().rev() {
            let offset = sel.offset(doc);
            let len = sel.length(doc);
            doc.remove(offset, len);
        }
        self.clear();
    }

    /// Move every selection onto the char range at the same index of
    /// `ranges`, keeping its read-only flag. Ranges that collapsed to empty
    /// drop their selection; ranges that now touch merge.
    pub fn reanchor(&mut self, doc: &Document, ranges: &[std::ops::Range<usize>]) {
        let old = std::mem::take(&mut self.ranges);
        for (sel, r) in old.iter().zip(ranges) {
            let start = doc.offset_to_position(r.start);
            let end = doc.offset_to_position(r.end);
            self.add(Selection {
                read_only: sel.read_only,
                ..Selection::new(start, end)
            });
        }
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a Selection;
    type IntoIter = std::slice::Iter<'a, Selection>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn p(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    // -- Ordering -----------------------------------------------------------

    #[test]
    fn new_orders_endpoints() {
        let s = Selection::new(p(2, 0), p(0, 3));
        assert_eq!(s.start, p(0, 3));
        assert_eq!(s.end, p(2, 0));
    }

    #[test]
    fn set_is_sorted_and_disjoint() {
        let mut set = SelectionSet::new();
        set.add(Selection::new(p(3, 0), p(3, 4)));
        set.add(Selection::new(p(0, 0), p(0, 2)));
        set.add(Selection::new(p(0, 1), p(1, 0)));
        let ranges: Vec<_> = set.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(ranges, [(p(0, 0), p(1, 0)), (p(3, 0), p(3, 4))]);
    }

    #[test]
    fn empty_selection_is_ignored() {
        let mut set = SelectionSet::new();
        set.add(Selection::new(p(1, 1), p(1, 1)));
        assert!(!set.has_selection());
    }

    // -- Document interaction -----------------------------------------------

    #[test]
    fn offsets_and_length() {
        let doc = Document::from_text("abc\ndef");
        let s = Selection::new(p(0, 1), p(1, 2));
        assert_eq!(s.offset(&doc), 1);
        assert_eq!(s.end_offset(&doc), 6);
        assert_eq!(s.length(&doc), 5);
    }

    #[test]
    fn read_only_sources() {
        let mut doc = Document::from_text("0123456789");
        let mut set = SelectionSet::single(p(0, 0), p(0, 2));
        assert!(!set.is_read_only(&doc));

        doc.protect(1, 1);
        assert!(set.is_read_only(&doc));

        let mut doc = Document::from_text("0123456789");
        set.clear();
        set.add(Selection {
            read_only: true,
            ..Selection::new(p(0, 4), p(0, 6))
        });
        assert!(set.is_read_only(&doc));

        doc.set_read_only(true);
        assert!(SelectionSet::single(p(0, 0), p(0, 1)).is_read_only(&doc));
    }

    #[test]
    fn remove_selected_text_back_to_front() {
        let mut doc = Document::from_text("ab cd ef");
        let mut set = SelectionSet::new();
        set.add(Selection::new(p(0, 0), p(0, 3)));
        set.add(Selection::new(p(0, 5), p(0, 8)));
        set.remove_selected_text(&mut doc);
        assert_eq!(doc.contents(), "cd");
        assert!(!set.has_selection());
    }

    #[test]
    fn reanchor_follows_shifted_offsets() {
        let mut doc = Document::from_text("ab\ncd");
        let mut set = SelectionSet::new();
        set.add(Selection {
            read_only: true,
            ..Selection::new(p(0, 1), p(1, 1))
        });
        doc.insert(3, "\t");
        doc.insert(0, "\t");
        set.reanchor(&doc, &[2..6]);
        let sel = set.first().copied();
        assert_eq!(sel.map(|s| (s.start, s.end)), Some((p(0, 2), p(1, 2))));
        assert!(sel.is_some_and(|s| s.read_only));

        set.reanchor(&doc, &[4..4]);
        assert!(!set.has_selection());
    }
}
