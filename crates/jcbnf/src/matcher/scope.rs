//! Capture tables: named spans recorded while matching.

use std::collections::BTreeMap;
use std::ops::Range;

/// A half-open interval `[start, end)` of codepoint offsets into the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Span {
    /// First codepoint offset.
    pub start: usize,
    /// One past the last codepoint offset.
    pub end: usize,
}

impl Span {
    /// Creates a span from `start` to `end`.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of codepoints covered.
    #[must_use]
    pub fn len(self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the span covers nothing.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// The span as a range, for slicing the input.
    #[must_use]
    pub fn range(self) -> Range<usize> {
        self.start..self.end
    }
}

/// One recorded capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capture {
    /// The captured span.
    pub span: Span,
    /// Position of the capture construct in entry order across the whole
    /// match. Larger is entered later.
    pub order: usize,
}

/// Captures grouped by name, each queue ordered by [`Capture::order`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureTable {
    captures: BTreeMap<String, Vec<Capture>>,
}

impl CaptureTable {
    /// Captures recorded under `name`, earliest entered first.
    #[must_use]
    pub fn get(&self, name: &str) -> &[Capture] {
        self.captures.get(name).map_or(&[], Vec::as_slice)
    }

    /// The capture a backreference to `name` would consume next.
    #[must_use]
    pub fn latest(&self, name: &str) -> Option<&Capture> {
        self.get(name).last()
    }

    /// Names with at least one capture, in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.captures.keys().map(String::as_str)
    }

    /// Every name with its captures, in lexical order of names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Capture])> {
        self.captures
            .iter()
            .map(|(name, captures)| (name.as_str(), captures.as_slice()))
    }

    /// Returns `true` if nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    /// Total number of captures across all names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.captures.values().map(Vec::len).sum()
    }

    /// Adds a capture, keeping its queue in entry order.
    pub(crate) fn record(&mut self, name: &str, capture: Capture) {
        let queue = self.captures.entry(name.to_owned()).or_default();
        let at = queue.partition_point(|existing| existing.order < capture.order);
        queue.insert(at, capture);
    }

    /// Removes and returns the latest-entered capture under `name`.
    pub(crate) fn pop_latest(&mut self, name: &str) -> Option<Capture> {
        let queue = self.captures.get_mut(name)?;
        let capture = queue.pop();
        if queue.is_empty() {
            self.captures.remove(name);
        }
        capture
    }

    /// Moves every capture of `other` into this table.
    pub(crate) fn merge(&mut self, other: CaptureTable) {
        for (name, captures) in other.captures {
            for capture in captures {
                self.record(&name, capture);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(start: usize, end: usize, order: usize) -> Capture {
        Capture {
            span: Span::new(start, end),
            order,
        }
    }

    #[test]
    fn queues_stay_in_entry_order() {
        let mut table = CaptureTable::default();
        table.record("x", capture(4, 6, 3));
        table.record("x", capture(0, 2, 1));
        table.record("x", capture(2, 4, 2));
        let orders: Vec<_> = table.get("x").iter().map(|c| c.order).collect();
        assert_eq!(orders, [1, 2, 3]);
        assert_eq!(table.latest("x").map(|c| c.span), Some(Span::new(4, 6)));
    }

    #[test]
    fn pop_removes_latest_and_empties_name() {
        let mut table = CaptureTable::default();
        table.record("x", capture(0, 1, 0));
        table.record("x", capture(1, 2, 5));
        assert_eq!(table.pop_latest("x"), Some(capture(1, 2, 5)));
        assert_eq!(table.pop_latest("x"), Some(capture(0, 1, 0)));
        assert!(table.is_empty());
        assert_eq!(table.pop_latest("x"), None);
    }

    #[test]
    fn merge_interleaves_by_order() {
        let mut outer = CaptureTable::default();
        outer.record("x", capture(0, 1, 0));
        outer.record("x", capture(5, 6, 4));
        let mut inner = CaptureTable::default();
        inner.record("x", capture(2, 3, 2));
        inner.record("y", capture(3, 4, 3));
        outer.merge(inner);
        let orders: Vec<_> = outer.get("x").iter().map(|c| c.order).collect();
        assert_eq!(orders, [0, 2, 4]);
        assert_eq!(outer.names().collect::<Vec<_>>(), ["x", "y"]);
        assert_eq!(outer.len(), 4);
    }

    #[test]
    fn span_helpers() {
        let span = Span::new(2, 5);
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());
        assert_eq!(span.range(), 2..5);
        assert!(Span::new(3, 3).is_empty());
    }
}
