//! Edit notifications.
//!
//! The editing surface reports every primitive change as an [`EditDelta`], in the order the
//! changes are applied. Each delta is tagged with the [`OperationKind`] that produced it, so
//! the controller can tell a fresh edit from the replay of an undo or redo without inferring
//! it from side effects.

use crate::position::Position;
use crate::record::{EditAction, EditRecord, GroupId};

/// The command that caused a document change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// An ordinary user edit.
    Edit,
    /// Leading whitespace the surface removed on its own before inserting a line break.
    ///
    /// Recorded like [`OperationKind::Edit`]; the line break that follows carries the
    /// whitespace onto the new line.
    WhitespaceTrim,
    /// Inverse applied by a selective undo.
    SelectiveUndo,
    /// Reapplication by a selective redo.
    SelectiveRedo,
    /// Inverse applied by a chronological undo.
    GlobalUndo,
    /// Reapplication by a chronological redo.
    GlobalRedo,
    /// A record replayed by the controller itself (auto-trim re-anchoring).
    Replay,
    /// Whole-document replacement; never tracked.
    Load,
}

impl OperationKind {
    /// Returns `true` for changes that must be recorded as new history.
    pub fn is_fresh_edit(self) -> bool {
        matches!(self, Self::Edit | Self::WhitespaceTrim)
    }
}

/// A single primitive change reported by the editing surface.
///
/// Semantics match [`EditRecord`]: `start`/`end` are coordinates at the time the change is
/// applied and `end` of a removal is the end of the removed range before removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDelta {
    /// Insert or remove.
    pub action: EditAction,
    /// Start of the change.
    pub start: Position,
    /// End of the change.
    pub end: Position,
    /// Changed content, one entry per line.
    pub lines: Vec<String>,
    /// Group this change belongs to.
    ///
    /// A surface may set this only on the first delta of a user action and leave it `None`
    /// on the rest of the burst.
    pub id: Option<GroupId>,
    /// Command that produced the change.
    pub kind: OperationKind,
}

impl EditDelta {
    /// Build a delta from a record (used by surfaces replaying records).
    pub fn from_record(record: &EditRecord, kind: OperationKind) -> Self {
        Self {
            action: record.action,
            start: record.start,
            end: record.end,
            lines: record.lines.clone(),
            id: record.id,
            kind,
        }
    }

    /// The record to store for this delta.
    pub fn to_record(&self) -> EditRecord {
        EditRecord {
            action: self.action,
            start: self.start,
            end: self.end,
            lines: self.lines.clone(),
            id: self.id,
            row_offset: 0,
        }
    }

    /// Returns `true` if the change spans a line break.
    pub fn is_multiline(&self) -> bool {
        self.lines.len() > 1
    }

    /// A removal that joins lines.
    pub fn is_line_merge(&self) -> bool {
        self.action == EditAction::Remove && self.is_multiline()
    }

    /// An insertion that breaks a line.
    pub fn is_line_split(&self) -> bool {
        self.action == EditAction::Insert && self.is_multiline()
    }

    /// Net rows added (positive) or removed (negative) by this change.
    pub fn row_delta(&self) -> isize {
        let span = self.end.row.saturating_sub(self.start.row) as isize;
        match self.action {
            EditAction::Insert => span,
            EditAction::Remove => -span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(action: EditAction, start: Position, text: &str) -> EditDelta {
        let record = EditRecord::new(action, start, crate::text::split_lines(text));
        EditDelta::from_record(&record, OperationKind::Edit)
    }

    #[test]
    fn test_row_delta_sign() {
        let split = delta(EditAction::Insert, Position::new(1, 4), "a\nb\nc");
        assert!(split.is_line_split());
        assert_eq!(split.row_delta(), 2);

        let merge = delta(EditAction::Remove, Position::new(3, 5), "\n");
        assert!(merge.is_line_merge());
        assert_eq!(merge.row_delta(), -1);

        let typed = delta(EditAction::Insert, Position::new(0, 0), "x");
        assert!(!typed.is_multiline());
        assert_eq!(typed.row_delta(), 0);
    }

    #[test]
    fn test_only_user_edits_are_fresh() {
        assert!(OperationKind::Edit.is_fresh_edit());
        assert!(OperationKind::WhitespaceTrim.is_fresh_edit());
        for kind in [
            OperationKind::SelectiveUndo,
            OperationKind::SelectiveRedo,
            OperationKind::GlobalUndo,
            OperationKind::GlobalRedo,
            OperationKind::Replay,
            OperationKind::Load,
        ] {
            assert!(!kind.is_fresh_edit());
        }
    }

    #[test]
    fn test_inverted_delta_has_no_row_delta() {
        let mut inverted = delta(EditAction::Insert, Position::new(4, 0), "a\nb");
        inverted.end = Position::new(1, 0);
        assert_eq!(inverted.row_delta(), 0);
    }
}
