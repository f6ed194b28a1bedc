//! Selective undo/redo controller.
//!
//! [`SelectiveUndoController`] owns the undo and redo stacks and drives an [`EditSurface`].
//! Every change the surface reports goes through [`SelectiveUndoController::handle_delta`]:
//!
//! 1. fresh edits are recorded into the open group, or open a new one;
//! 2. both stacks absorb the row/column drift ([`crate::offsets`]);
//! 3. line splits restructure the groups on the split row ([`crate::split`]);
//! 4. multi-line changes close the surface's open group;
//! 5. fresh edits invalidate redo groups on the edited line.
//!
//! Selective undo/redo picks the most recent group anchored on the selected lines, moves it
//! to the other stack and asks the surface to revert or reapply it. The deltas produced by
//! that command flow back through the same pipeline, tagged with the command's
//! [`OperationKind`], so they shift other groups without being recorded.

use crate::config::SelectiveUndoConfig;
use crate::delta::{EditDelta, OperationKind};
use crate::document::DocumentSurface;
use crate::group_index::GroupIndex;
use crate::history::{EditStack, History};
use crate::offsets;
use crate::position::{Position, Range};
use crate::record::{EditGroup, EditRecord, GroupId};
use crate::split::{self, LineSplit};
use crate::state::HistoryState;
use crate::surface::{EditSurface, SurfaceError};
use crate::text::normalize_line_endings;

/// Line-scoped undo/redo over an [`EditSurface`].
///
/// # Example
///
/// ```rust
/// use line_undo::{LineUndoEditor, Position};
///
/// let mut editor = LineUndoEditor::new_document("\n");
/// editor.type_text("ab\ncd").unwrap();
///
/// // Undo only what was typed on line 0.
/// editor.set_cursor(Position::new(0, 1));
/// assert!(editor.selective_undo());
/// assert_eq!(editor.text(), "\ncd\n");
/// ```
#[derive(Debug)]
pub struct SelectiveUndoController<S: EditSurface> {
    surface: S,
    history: History,
    index: GroupIndex,
    config: SelectiveUndoConfig,
    open_group: Option<GroupId>,
    trim_pending: bool,
}

/// The controller over the bundled [`DocumentSurface`].
pub type LineUndoEditor = SelectiveUndoController<DocumentSurface>;

impl<S: EditSurface> SelectiveUndoController<S> {
    /// Create a controller with the default configuration.
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, SelectiveUndoConfig::default())
    }

    /// Create a controller with `config`.
    pub fn with_config(surface: S, config: SelectiveUndoConfig) -> Self {
        Self {
            surface,
            history: History::new(config.max_undo_groups),
            index: GroupIndex::new(),
            config,
            open_group: None,
            trim_pending: false,
        }
    }

    /// The driven surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Groups available to undo, oldest first.
    pub fn undo_stack(&self) -> &EditStack {
        &self.history.undo
    }

    /// Groups available to redo, in the order they were undone.
    pub fn redo_stack(&self) -> &EditStack {
        &self.history.redo
    }

    /// Active configuration.
    pub fn config(&self) -> &SelectiveUndoConfig {
        &self.config
    }

    /// Include or leave out line-break records in later selective operations.
    pub fn set_exclude_line_breaks(&mut self, exclude: bool) {
        self.config.exclude_line_breaks = exclude;
    }

    /// Lines covered by the surface's current selection.
    pub fn target_lines(&self) -> Vec<usize> {
        self.surface.selection().rows()
    }

    /// Change the surface's selection.
    pub fn set_selection(&mut self, range: Range) {
        self.surface.set_selection(range);
    }

    /// Run `edit` against the surface and ingest every delta it reports.
    pub fn apply<F>(&mut self, edit: F) -> Result<(), SurfaceError>
    where
        F: FnOnce(&mut S) -> Result<Vec<EditDelta>, SurfaceError>,
    {
        let deltas = edit(&mut self.surface)?;
        self.handle_deltas(deltas);
        Ok(())
    }

    /// Ingest deltas in the order the surface applied them.
    pub fn handle_deltas(&mut self, deltas: impl IntoIterator<Item = EditDelta>) {
        for delta in deltas {
            self.handle_delta(&delta);
        }
    }

    /// Ingest one delta reported by the surface.
    pub fn handle_delta(&mut self, delta: &EditDelta) {
        if delta.kind == OperationKind::Load {
            return;
        }
        if delta.end < delta.start {
            tracing::warn!(
                start = ?delta.start,
                end = ?delta.end,
                "ignoring delta that ends before it starts"
            );
            return;
        }

        let follows_trim = std::mem::replace(
            &mut self.trim_pending,
            delta.kind == OperationKind::WhitespaceTrim,
        );
        let fresh = delta.kind.is_fresh_edit();
        let cause = if fresh {
            Some(self.record(delta))
        } else {
            delta.id
        };

        offsets::propagate(&mut self.history.undo, delta, cause);
        offsets::propagate(&mut self.history.redo, delta, cause);

        let mut trimmed = None;
        if let Some(line_split) = LineSplit::from_delta(delta) {
            if fresh && follows_trim {
                trimmed = split::detach_trimmed_whitespace(
                    &mut self.history.undo,
                    delta,
                    &line_split,
                    cause,
                );
            }
            let undo = split::apply_split(
                &mut self.history.undo,
                &line_split,
                cause,
                &mut self.index,
            );
            let redo = split::apply_split(
                &mut self.history.redo,
                &line_split,
                cause,
                &mut self.index,
            );
            tracing::trace!(
                row = line_split.row,
                column = line_split.column,
                ?undo,
                ?redo,
                "restructured split row"
            );
        }

        if delta.is_multiline() {
            self.surface.start_new_group();
            self.open_group = None;
        }

        if fresh {
            self.clear_redo_on_line(delta.start.row);
        }

        if let Some(record) = trimmed {
            self.replay(record);
        }
    }

    /// Undo the most recent group anchored on the selected lines.
    ///
    /// Returns `false` if there is nothing to undo there or the surface rejected the change.
    pub fn selective_undo(&mut self) -> bool {
        let lines = self.target_lines();
        if self.history.undo.is_empty() {
            tracing::debug!("undo stack is empty");
            return false;
        }

        GroupIndex::tag_with_id(&mut self.history.undo);
        let found = GroupIndex::find_groups_on_lines(
            &self.history.undo,
            &lines,
            self.config.exclude_line_breaks,
        );
        let Some(group) = found.into_iter().next_back() else {
            tracing::debug!(?lines, "nothing to undo on these lines");
            return false;
        };
        self.transfer(group, &lines, OperationKind::SelectiveUndo)
    }

    /// Redo the most recently undone group anchored on the selected lines.
    pub fn selective_redo(&mut self) -> bool {
        let lines = self.target_lines();
        if self.history.redo.is_empty() {
            tracing::debug!("redo stack is empty");
            return false;
        }

        GroupIndex::tag_with_id(&mut self.history.redo);
        let found = GroupIndex::find_groups_on_lines(
            &self.history.redo,
            &lines,
            self.config.exclude_line_breaks,
        );
        let Some(group) = found.into_iter().next_back() else {
            tracing::debug!(?lines, "nothing to redo on these lines");
            return false;
        };
        self.transfer(group, &lines, OperationKind::SelectiveRedo)
    }

    /// Undo the newest group, wherever it is.
    pub fn global_undo(&mut self) -> bool {
        GroupIndex::tag_with_id(&mut self.history.undo);
        let Some(group) = self.history.undo.last().cloned() else {
            tracing::debug!("undo stack is empty");
            return false;
        };
        self.transfer(group, &[], OperationKind::GlobalUndo)
    }

    /// Redo the most recently undone group, wherever it is.
    pub fn global_redo(&mut self) -> bool {
        GroupIndex::tag_with_id(&mut self.history.redo);
        let Some(group) = self.history.redo.last().cloned() else {
            tracing::debug!("redo stack is empty");
            return false;
        };
        self.transfer(group, &[], OperationKind::GlobalRedo)
    }

    /// Returns `true` if [`Self::selective_undo`] would find a group on the selected lines.
    pub fn has_selective_undo_on_current_lines(&self) -> bool {
        self.has_group_on_lines(&self.history.undo)
    }

    /// Returns `true` if [`Self::selective_redo`] would find a group on the selected lines.
    pub fn has_selective_redo_on_current_lines(&self) -> bool {
        self.has_group_on_lines(&self.history.redo)
    }

    /// Forget all history.
    pub fn reset(&mut self) {
        self.history.clear();
        self.open_group = None;
        self.trim_pending = false;
        self.surface.start_new_group();
    }

    /// Snapshot for enabling commands in a UI.
    pub fn state(&self) -> HistoryState {
        HistoryState {
            undo_depth: self.history.undo.len(),
            redo_depth: self.history.redo.len(),
            can_undo_on_lines: self.has_selective_undo_on_current_lines(),
            can_redo_on_lines: self.has_selective_redo_on_current_lines(),
            target_lines: self.target_lines(),
            open_group: self.open_group,
        }
    }

    fn has_group_on_lines(&self, stack: &EditStack) -> bool {
        let lines = self.target_lines();
        !GroupIndex::find_groups_on_lines(stack, &lines, self.config.exclude_line_breaks)
            .is_empty()
    }

    /// Record a fresh delta and return the id of the group it went into.
    fn record(&mut self, delta: &EditDelta) -> GroupId {
        let record = delta.to_record();
        match delta.id {
            Some(id) if self.history.undo.contains(id) => self.append(id, record),
            Some(id) => {
                self.index.observe(id);
                self.open(id, record)
            }
            None => match self.open_group.filter(|id| self.history.undo.contains(*id)) {
                Some(id) => self.append(id, record),
                None => {
                    let id = self.index.derive_latest();
                    tracing::warn!(group = %id, "continuation edit with no open group");
                    self.open(id, record)
                }
            },
        }
    }

    fn append(&mut self, id: GroupId, record: EditRecord) -> GroupId {
        if let Some(group) = self.history.undo.get_mut(id) {
            group.records.push(record);
        }
        self.open_group = Some(id);
        id
    }

    fn open(&mut self, id: GroupId, mut record: EditRecord) -> GroupId {
        record.id = Some(id);
        for evicted in self.history.push_undo(EditGroup::new(id, vec![record])) {
            tracing::debug!(group = %evicted.id, "evicted oldest undo group");
        }
        self.open_group = Some(id);
        id
    }

    fn clear_redo_on_line(&mut self, row: usize) {
        for id in GroupIndex::ids_on_line(&self.history.redo, row) {
            self.history.redo.remove(id);
            tracing::debug!(group = %id, row, "dropped redo group on edited line");
        }
    }

    /// Carry a detached whitespace trim onto the new line.
    fn replay(&mut self, record: EditRecord) {
        match self
            .surface
            .revert(std::slice::from_ref(&record), OperationKind::Replay)
        {
            Ok(deltas) => self.handle_deltas(deltas),
            Err(err) => {
                tracing::warn!(%err, "could not carry trimmed whitespace to the new line");
            }
        }
    }

    /// Move `group` to the other stack and apply it to the surface, rolling the stacks back
    /// if the surface refuses.
    fn transfer(&mut self, group: EditGroup, lines: &[usize], kind: OperationKind) -> bool {
        let id = group.id;
        let undoing = matches!(
            kind,
            OperationKind::SelectiveUndo | OperationKind::GlobalUndo
        );
        let working = group.materialized();

        let History { undo, redo, .. } = &mut self.history;
        let (from, to) = if undoing { (undo, redo) } else { (redo, undo) };
        let Some(position) = from.position(id) else {
            return false;
        };
        to.push(group);
        let Some(original) = from.remove(id) else {
            return false;
        };

        tracing::debug!(group = %id, records = working.len(), ?lines, ?kind, "applying group");
        let result = if undoing {
            self.surface.revert(&working.records, kind)
        } else {
            self.surface.reapply(&working.records, kind)
        };

        let deltas = match result {
            Ok(deltas) => deltas,
            Err(err) => {
                tracing::warn!(group = %id, %err, ?kind, "surface rejected group; rolled back");
                to.remove(id);
                from.insert(position, original);
                return false;
            }
        };

        self.handle_deltas(deltas);
        self.surface.start_new_group();
        self.open_group = None;

        if let (Some(&first), Some(&last)) = (lines.first(), lines.last())
            && first != last
            && self.config.reselect_after_multiline
        {
            self.surface.set_selection(Range::whole_rows(first, last));
        }
        true
    }
}

impl LineUndoEditor {
    /// A controller over a new [`DocumentSurface`] holding `text`.
    pub fn new_document(text: &str) -> Self {
        Self::new(DocumentSurface::new(text))
    }

    /// Full document text.
    pub fn text(&self) -> String {
        self.surface.text()
    }

    /// Type `text` at the caret, one character at a time.
    pub fn type_text(&mut self, text: &str) -> Result<(), SurfaceError> {
        for ch in normalize_line_endings(text).chars() {
            self.apply(|doc| doc.type_char(ch))?;
        }
        Ok(())
    }

    /// Delete backwards from the caret.
    pub fn backspace(&mut self) -> Result<(), SurfaceError> {
        self.apply(DocumentSurface::backspace)
    }

    /// Insert `text` at `at` as its own group.
    pub fn insert_at(&mut self, at: Position, text: &str) -> Result<(), SurfaceError> {
        self.apply(|doc| doc.insert_at(at, text))
    }

    /// Remove `range` as its own group.
    pub fn remove_range(&mut self, range: Range) -> Result<(), SurfaceError> {
        self.apply(|doc| doc.remove_range(range))
    }

    /// Move the caret.
    pub fn set_cursor(&mut self, at: Position) {
        self.surface.set_cursor(at);
    }

    /// Select `range`.
    pub fn select(&mut self, range: Range) {
        self.surface.select(range);
    }

    /// Replace the document and forget all history.
    pub fn load(&mut self, text: &str) {
        let deltas = self.surface.replace_all(text, OperationKind::Load);
        self.handle_deltas(deltas);
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EditAction;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_typing_burst_is_one_group_until_line_break() {
        let mut editor = LineUndoEditor::new_document("");
        editor.type_text("ab\ncd").expect("typing");

        let undo = editor.undo_stack();
        assert_eq!(undo.len(), 2);
        assert_eq!(undo.groups()[0].len(), 3);
        assert_eq!(undo.groups()[0].anchor_row(), Some(0));
        assert_eq!(undo.groups()[1].len(), 2);
        assert_eq!(undo.groups()[1].anchor_row(), Some(1));
        assert_eq!(editor.state().open_group, Some(undo.groups()[1].id));
    }

    #[test]
    fn test_empty_history_is_a_noop() {
        let mut editor = LineUndoEditor::new_document("text");
        assert!(!editor.selective_undo());
        assert!(!editor.selective_redo());
        assert!(!editor.global_undo());
        assert!(!editor.global_redo());
        assert_eq!(editor.text(), "text");
    }

    #[test]
    fn test_nothing_on_target_line() {
        let mut editor = LineUndoEditor::new_document("one\ntwo");
        editor.set_cursor(Position::new(0, 3));
        editor.type_text("!").expect("typing");

        editor.set_cursor(Position::new(1, 0));
        assert!(!editor.has_selective_undo_on_current_lines());
        assert!(!editor.selective_undo());
        assert_eq!(editor.undo_stack().len(), 1);
    }

    #[test]
    fn test_continuation_without_open_group_gets_derived_id() {
        let mut editor = LineUndoEditor::new_document("");
        let orphan = EditDelta::from_record(
            &EditRecord::insert(Position::new(0, 0), "x"),
            OperationKind::Edit,
        );
        editor.handle_delta(&orphan);

        let group = &editor.undo_stack().groups()[0];
        assert_eq!(group.id.seq(), 0);
        assert!(group.id.split() > 0);
        assert_eq!(group.records[0].id, Some(group.id));
    }

    #[test]
    fn test_non_edit_deltas_are_not_recorded() {
        let mut editor = LineUndoEditor::new_document("");
        for kind in [
            OperationKind::SelectiveUndo,
            OperationKind::GlobalRedo,
            OperationKind::Replay,
            OperationKind::Load,
        ] {
            let delta =
                EditDelta::from_record(&EditRecord::insert(Position::new(0, 0), "x"), kind);
            editor.handle_delta(&delta);
        }
        assert!(editor.undo_stack().is_empty());
    }

    #[test]
    fn test_load_resets_history() {
        let mut editor = LineUndoEditor::new_document("");
        editor.type_text("draft").expect("typing");
        editor.load("fresh\ncontent");

        assert_eq!(editor.text(), "fresh\ncontent");
        assert_eq!(editor.state().undo_depth, 0);
        assert_eq!(editor.state().redo_depth, 0);
    }

    #[test]
    fn test_multiline_selection_is_reselected() {
        let mut editor = LineUndoEditor::new_document("a\nb\nc");
        editor.set_cursor(Position::new(0, 1));
        editor.type_text("1").expect("typing");
        editor.set_cursor(Position::new(2, 1));
        editor.type_text("3").expect("typing");

        editor.select(Range::new(Position::new(0, 0), Position::new(2, 0)));
        assert!(editor.selective_undo());
        assert_eq!(editor.text(), "a1\nb\nc");
        assert_eq!(
            editor.surface().selection(),
            Range::new(Position::new(0, 0), Position::new(2, 1))
        );
    }

    #[test]
    fn test_redo_moves_group_back() {
        let mut editor = LineUndoEditor::new_document("");
        editor.type_text("hey").expect("typing");
        let mut before = editor.undo_stack().clone();
        GroupIndex::tag_with_id(&mut before);

        assert!(editor.selective_undo());
        assert_eq!(editor.text(), "");
        assert!(editor.state().can_redo_on_lines);

        assert!(editor.selective_redo());
        assert_eq!(editor.text(), "hey");
        assert_eq!(editor.undo_stack(), &before);
        assert!(editor.redo_stack().is_empty());
        assert!(
            editor.undo_stack().groups()[0]
                .records
                .iter()
                .all(|r| r.action == EditAction::Insert)
        );
    }

    #[test]
    fn test_delta_ending_before_its_start_is_ignored() {
        let mut editor = LineUndoEditor::new_document("a\nb\nc");
        editor.set_cursor(Position::new(1, 1));
        editor.type_text("!").expect("typing");
        let before = editor.undo_stack().clone();

        let mut inverted = EditDelta::from_record(
            &EditRecord::insert(Position::new(2, 0), "x\ny"),
            OperationKind::Edit,
        );
        inverted.end = Position::new(0, 1);
        editor.handle_delta(&inverted);

        assert_eq!(editor.undo_stack(), &before);
    }
}
