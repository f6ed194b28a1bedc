//! Document coordinates.
//!
//! Rows and columns are zero-based. Columns count Unicode scalar values (`char`s) within a
//! logical line, which is also how edit records measure their text.

use std::cmp::Ordering;

/// Position coordinates (row and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Zero-based logical row.
    pub row: usize,
    /// Zero-based column in characters within the row.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A selection or caret reported by the editing surface.
///
/// `start` is the anchor and `end` the active end (the caret), so a backwards selection has
/// `end < start`. Use [`Range::ordered`] when the direction does not matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    /// Selection anchor.
    pub start: Position,
    /// Active end (caret).
    pub end: Position,
}

impl Range {
    /// Create a range from anchor to caret.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// An empty range (a caret) at `position`.
    pub fn caret(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// A range covering rows `first..=last` entirely.
    ///
    /// The end column is `usize::MAX`; surfaces clamp it to the line length.
    pub fn whole_rows(first: usize, last: usize) -> Self {
        Self {
            start: Position::new(first, 0),
            end: Position::new(last, usize::MAX),
        }
    }

    /// Returns `true` if this range is a caret.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `(min, max)` of the two ends.
    pub fn ordered(&self) -> (Position, Position) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// The contiguous set of rows this range touches.
    pub fn rows(&self) -> Vec<usize> {
        let (first, last) = self.ordered();
        (first.row..=last.row).collect()
    }
}
