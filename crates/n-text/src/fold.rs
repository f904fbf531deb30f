//! Fold state — collapsible regions of the document.
//!
//! A [`FoldMarker`] spans two positions and is either folded (collapsed) or
//! expanded. Folding never touches the text; it only changes how caret
//! stepping and the view treat the region. A folded marker hides every
//! position strictly between its endpoints, and every line after its start
//! line up to and including its end line.
//!
//! [`FoldSet`] keeps markers ordered by start position. All queries yield in
//! that order, so "the first marker found" is always the one that starts
//! earliest; nested folds therefore resolve to the outermost one.

use crate::position::Position;

// ---------------------------------------------------------------------------
// FoldMarker
// ---------------------------------------------------------------------------

/// A foldable region with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FoldMarker {
    pub start: Position,
    pub end: Position,
    pub folded: bool,
}

impl FoldMarker {
    /// An expanded marker. Endpoints are swapped if given backwards.
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        Self {
            start,
            end,
            folded: false,
        }
    }

    /// A collapsed marker.
    #[must_use]
    pub fn collapsed(start: Position, end: Position) -> Self {
        Self {
            folded: true,
            ..Self::new(start, end)
        }
    }

    /// True when `pos` lies strictly between the endpoints.
    #[must_use]
    pub fn strictly_contains(&self, pos: Position) -> bool {
        self.start < pos && pos < self.end
    }
}

// ---------------------------------------------------------------------------
// FoldSet
// ---------------------------------------------------------------------------

/// All fold markers of a document, sorted by start position.
#[derive(Debug, Clone, Default)]
pub struct FoldSet {
    markers: Vec<FoldMarker>,
}

impl FoldSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            markers: Vec::new(),
        }
    }

    /// Insert a marker, keeping start order. Markers with equal starts keep
    /// insertion order.
    pub fn add(&mut self, marker: FoldMarker) {
        let idx = self.markers.partition_point(|m| m.start <= marker.start);
        self.markers.insert(idx, marker);
    }

    #[must_use]
    pub fn markers(&self) -> &[FoldMarker] {
        &self.markers
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    /// Collapse or expand every marker starting at `start`. Returns how many
    /// markers changed.
    pub fn set_folded_at(&mut self, start: Position, folded: bool) -> usize {
        let mut changed = 0;
        for m in self.markers.iter_mut().filter(|m| m.start == start) {
            if m.folded != folded {
                m.folded = folded;
                changed += 1;
            }
        }
        changed
    }

    /// Folded markers whose end lies on `line`.
    pub fn folded_with_end(&self, line: usize) -> impl Iterator<Item = &FoldMarker> {
        self.markers
            .iter()
            .filter(move |m| m.folded && m.end.line == line)
    }

    /// Folded markers whose start lies on `line`.
    pub fn folded_with_start(&self, line: usize) -> impl Iterator<Item = &FoldMarker> {
        self.markers
            .iter()
            .filter(move |m| m.folded && m.start.line == line)
    }

    /// Markers, folded or not, that strictly contain `pos`.
    pub fn containing(&self, pos: Position) -> impl Iterator<Item = &FoldMarker> {
        self.markers
            .iter()
            .filter(move |m| m.strictly_contains(pos))
    }

    /// True when a folded marker hides `line` (it sits after the marker's
    /// start line, up to and including its end line).
    #[must_use]
    pub fn is_line_hidden(&self, line: usize) -> bool {
        self.markers
            .iter()
            .any(|m| m.folded && m.start.line < line && line <= m.end.line)
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

    #[test]
    fn new_orders_endpoints() {
        let m = FoldMarker::new(p(3, 0), p(1, 4));
        assert_eq!(m.start, p(1, 4));
        assert_eq!(m.end, p(3, 0));
        assert!(!m.folded);
    }

    #[test]
    fn strict_containment_excludes_endpoints() {
        let m = FoldMarker::collapsed(p(0, 5), p(2, 1));
        assert!(!m.strictly_contains(p(0, 5)));
        assert!(m.strictly_contains(p(0, 6)));
        assert!(m.strictly_contains(p(1, 0)));
        assert!(m.strictly_contains(p(2, 0)));
        assert!(!m.strictly_contains(p(2, 1)));
    }

    #[test]
    fn markers_stay_sorted_by_start() {
        let mut set = FoldSet::new();
        set.add(FoldMarker::new(p(5, 0), p(6, 0)));
        set.add(FoldMarker::new(p(1, 0), p(9, 0)));
        set.add(FoldMarker::new(p(3, 2), p(4, 0)));
        let starts: Vec<_> = set.markers().iter().map(|m| m.start).collect();
        assert_eq!(starts, [p(1, 0), p(3, 2), p(5, 0)]);
    }

    #[test]
    fn nested_folds_ending_together_yield_outermost_first() {
        let mut set = FoldSet::new();
        set.add(FoldMarker::collapsed(p(2, 4), p(4, 1)));
        set.add(FoldMarker::collapsed(p(0, 8), p(4, 1)));
        let first = set.folded_with_end(4).next().unwrap();
        assert_eq!(first.start, p(0, 8));
    }

    #[test]
    fn folded_queries_skip_expanded_markers() {
        let mut set = FoldSet::new();
        set.add(FoldMarker::new(p(0, 3), p(2, 0)));
        assert_eq!(set.folded_with_start(0).count(), 0);
        assert_eq!(set.containing(p(1, 0)).count(), 1);

        assert_eq!(set.set_folded_at(p(0, 3), true), 1);
        assert_eq!(set.folded_with_start(0).count(), 1);
        assert_eq!(set.folded_with_end(2).count(), 1);
    }

    #[test]
    fn hidden_lines() {
        let mut set = FoldSet::new();
        set.add(FoldMarker::collapsed(p(1, 2), p(3, 1)));
        assert!(!set.is_line_hidden(1));
        assert!(set.is_line_hidden(2));
        assert!(set.is_line_hidden(3));
        assert!(!set.is_line_hidden(4));
    }
}
