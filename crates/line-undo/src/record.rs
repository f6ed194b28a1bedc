//! Edit records and edit groups.
//!
//! An [`EditRecord`] is one primitive insertion or removal as reported by the editing surface.
//! Records are batched into [`EditGroup`]s, one per user action; a group is always undone or
//! redone as a unit.
//!
//! Coordinates stored on a record are the coordinates at the time the edit was applied. Later
//! edits elsewhere in the document move the record's line; that drift is accumulated in
//! [`EditRecord::row_offset`] instead of rewriting `start`/`end`. Column drift (line merges and
//! splits) is rare enough that it is applied to the columns in place.

use crate::position::Position;
use crate::text::{char_len, join_lines, split_lines};
use std::fmt;

/// Primitive edit kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditAction {
    /// Text was inserted at `start`.
    Insert,
    /// Text between `start` and `end` was removed.
    Remove,
}

impl EditAction {
    /// The action that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Self::Insert => Self::Remove,
            Self::Remove => Self::Insert,
        }
    }
}

/// Identifier of an [`EditGroup`].
///
/// `seq` is issued by the editing surface when a user action starts. Groups split off from
/// another group keep its `seq` and receive a fresh `split` value from a monotonically
/// increasing counter, so every derived id is unique and sorts after the group it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId {
    seq: u64,
    split: u32,
}

impl GroupId {
    /// An id for a group opened by the editing surface.
    pub fn new(seq: u64) -> Self {
        Self { seq, split: 0 }
    }

    pub(crate) fn derived(seq: u64, split: u32) -> Self {
        Self { seq, split }
    }

    /// Sequence number issued by the editing surface.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Split sequence number; `0` for groups that were never split off.
    pub fn split(&self) -> u32 {
        self.split
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.split == 0 {
            write!(f, "{}", self.seq)
        } else {
            write!(f, "{}.{}", self.seq, self.split)
        }
    }
}

/// One primitive change to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    /// Insert or remove.
    pub action: EditAction,
    /// Start of the edit when it was applied.
    pub start: Position,
    /// End of the inserted text, or end of the removed range before removal.
    pub end: Position,
    /// Inserted or removed content, one entry per line (`["", ""]` is a line break).
    pub lines: Vec<String>,
    /// Owning group, if already tagged.
    pub id: Option<GroupId>,
    /// Rows gained (positive) or lost (negative) above this record since it was recorded.
    pub row_offset: isize,
}

impl EditRecord {
    /// Build a record, deriving `end` from `start` and the content.
    pub fn new(action: EditAction, start: Position, mut lines: Vec<String>) -> Self {
        if lines.is_empty() {
            lines.push(String::new());
        }
        let end = end_of(start, &lines);
        Self {
            action,
            start,
            end,
            lines,
            id: None,
            row_offset: 0,
        }
    }

    /// An insertion of `text` at `start`.
    pub fn insert(start: Position, text: &str) -> Self {
        Self::new(EditAction::Insert, start, split_lines(text))
    }

    /// A removal of `text` that started at `start`.
    pub fn remove(start: Position, text: &str) -> Self {
        Self::new(EditAction::Remove, start, split_lines(text))
    }

    /// Attach a group id.
    pub fn with_id(mut self, id: GroupId) -> Self {
        self.id = Some(id);
        self
    }

    /// The content as a single string.
    pub fn text(&self) -> String {
        join_lines(&self.lines)
    }

    /// Returns `true` if the record spans a line break.
    pub fn is_multiline(&self) -> bool {
        self.start.row != self.end.row
    }

    /// Current row of the record's start.
    pub fn anchor_row(&self) -> usize {
        self.start.row.saturating_add_signed(self.row_offset)
    }

    /// A copy with `row_offset` folded into absolute rows.
    pub fn materialized(&self) -> Self {
        let mut record = self.clone();
        record.start.row = self.start.row.saturating_add_signed(self.row_offset);
        record.end.row = self.end.row.saturating_add_signed(self.row_offset);
        record.row_offset = 0;
        record
    }

    /// Move the record's columns by `by`.
    ///
    /// `end.column` only moves for single-line records; on a multi-line record it lives on a
    /// different row than the one being shifted.
    pub fn shift_columns(&mut self, by: isize) {
        let multiline = self.is_multiline();
        self.start.column = self.start.column.saturating_add_signed(by);
        if !multiline {
            self.end.column = self.end.column.saturating_add_signed(by);
        }
    }

    /// Accumulate row drift.
    pub fn shift_rows(&mut self, by: isize) {
        self.row_offset += by;
    }
}

fn end_of(start: Position, lines: &[String]) -> Position {
    match lines {
        [only] => Position::new(start.row, start.column + char_len(only)),
        [.., last] => Position::new(start.row + lines.len() - 1, char_len(last)),
        [] => start,
    }
}

/// An atomically undoable batch of records from one user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditGroup {
    /// Group identifier.
    pub id: GroupId,
    /// Records in application order.
    pub records: Vec<EditRecord>,
}

impl EditGroup {
    /// Create a group from records.
    pub fn new(id: GroupId, records: Vec<EditRecord>) -> Self {
        Self { id, records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the group holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The line this group is filed under: the current row of its first record.
    pub fn anchor_row(&self) -> Option<usize> {
        self.records.first().map(EditRecord::anchor_row)
    }

    /// Smallest start column over all records.
    pub fn first_column(&self) -> Option<usize> {
        self.records.iter().map(|r| r.start.column).min()
    }

    /// Largest end column over all records.
    pub fn last_column(&self) -> Option<usize> {
        self.records.iter().map(|r| r.end.column).max()
    }

    /// Stamp `id` on the group and every record.
    pub fn restamp(&mut self, id: GroupId) {
        self.id = id;
        for record in &mut self.records {
            record.id = Some(id);
        }
    }

    /// A copy without records that span a line break.
    pub fn without_multiline_records(&self) -> Self {
        Self {
            id: self.id,
            records: self
                .records
                .iter()
                .filter(|r| !r.is_multiline())
                .cloned()
                .collect(),
        }
    }

    /// A copy with every record's offset materialized.
    pub fn materialized(&self) -> Self {
        Self {
            id: self.id,
            records: self.records.iter().map(EditRecord::materialized).collect(),
        }
    }

    /// Move every record's columns by `by`.
    pub fn shift_columns(&mut self, by: isize) {
        for record in &mut self.records {
            record.shift_columns(by);
        }
    }

    /// Accumulate row drift on every record.
    pub fn shift_rows(&mut self, by: isize) {
        for record in &mut self.records {
            record.shift_rows(by);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_is_derived_from_content() {
        let record = EditRecord::insert(Position::new(2, 3), "abc");
        assert_eq!(record.end, Position::new(2, 6));
        assert!(!record.is_multiline());

        let record = EditRecord::insert(Position::new(2, 3), "\n");
        assert_eq!(record.end, Position::new(3, 0));
        assert!(record.is_multiline());

        let record = EditRecord::remove(Position::new(0, 1), "x\n中文");
        assert_eq!(record.end, Position::new(1, 2));
    }

    #[test]
    fn test_materialized_folds_offset() {
        let mut record = EditRecord::insert(Position::new(1, 0), "a\nb");
        record.shift_rows(3);
        assert_eq!(record.anchor_row(), 4);

        let abs = record.materialized();
        assert_eq!(abs.start, Position::new(4, 0));
        assert_eq!(abs.end, Position::new(5, 1));
        assert_eq!(abs.row_offset, 0);
        // The stored record keeps its offset.
        assert_eq!(record.start.row, 1);
    }

    #[test]
    fn test_shift_columns_skips_end_of_multiline() {
        let mut single = EditRecord::insert(Position::new(0, 2), "xy");
        single.shift_columns(5);
        assert_eq!((single.start.column, single.end.column), (7, 9));

        let mut multi = EditRecord::insert(Position::new(0, 2), "\n");
        multi.shift_columns(5);
        assert_eq!((multi.start.column, multi.end.column), (7, 0));

        let mut clamp = EditRecord::insert(Position::new(0, 1), "z");
        clamp.shift_columns(-4);
        assert_eq!((clamp.start.column, clamp.end.column), (0, 0));
    }

    #[test]
    fn test_group_id_ordering_and_display() {
        let base = GroupId::new(7);
        let split = GroupId::derived(7, 3);
        assert!(base < split);
        assert!(split < GroupId::new(8));
        assert_eq!(base.to_string(), "7");
        assert_eq!(split.to_string(), "7.3");
    }

    #[test]
    fn test_group_anchor_and_columns() {
        let id = GroupId::new(1);
        let mut group = EditGroup::new(
            id,
            vec![
                EditRecord::insert(Position::new(4, 2), "ab"),
                EditRecord::insert(Position::new(4, 4), "\n"),
            ],
        );
        group.shift_rows(-1);
        assert_eq!(group.anchor_row(), Some(3));
        assert_eq!(group.first_column(), Some(2));
        assert_eq!(group.last_column(), Some(4));
        assert_eq!(group.without_multiline_records().len(), 1);

        group.restamp(GroupId::new(9));
        assert!(group.records.iter().all(|r| r.id == Some(GroupId::new(9))));
    }
}
