//! Read-only history state, for enabling undo/redo commands in a UI.

use crate::record::GroupId;

/// Snapshot of the controller's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryState {
    /// Groups on the undo stack
    pub undo_depth: usize,
    /// Groups on the redo stack
    pub redo_depth: usize,
    /// A selective undo on the current lines would do something
    pub can_undo_on_lines: bool,
    /// A selective redo on the current lines would do something
    pub can_redo_on_lines: bool,
    /// Lines covered by the current selection
    pub target_lines: Vec<usize>,
    /// Group the next continuation edit is added to
    pub open_group: Option<GroupId>,
}

impl HistoryState {
    /// Returns `true` if a global undo is possible.
    pub fn can_undo(&self) -> bool {
        self.undo_depth > 0
    }

    /// Returns `true` if a global redo is possible.
    pub fn can_redo(&self) -> bool {
        self.redo_depth > 0
    }
}
