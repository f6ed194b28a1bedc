//! Coordinate drift of recorded edits.
//!
//! Every delta applied to the document may move the lines that older groups are anchored to.
//! [`propagate`] keeps both stacks consistent:
//!
//! - line-adding insertions move every group anchored below the insertion row down;
//! - line-removing deletions move groups anchored at or below the removal's last row up,
//!   after giving the groups on that last row the column of the merge point, and forget
//!   groups whose whole line disappeared;
//! - edits within one line move the columns of records that follow them on that line.
//!
//! The group that produced the delta is never shifted by its own change. Restructuring of the
//! split row itself happens afterwards, in [`crate::split`].

use crate::delta::EditDelta;
use crate::group_index::GroupIndex;
use crate::history::EditStack;
use crate::record::{EditAction, GroupId};
use crate::text::char_len;

/// Apply the row/column drift caused by `delta` to `stack`.
pub fn propagate(stack: &mut EditStack, delta: &EditDelta, cause: Option<GroupId>) {
    if !delta.is_multiline() {
        let width = delta.lines.first().map_or(0, |line| char_len(line)) as isize;
        let (from_column, columns) = match delta.action {
            EditAction::Insert => (delta.start.column, width),
            EditAction::Remove => (delta.end.column, -width),
        };
        let shifted = shift_line_columns(stack, delta.start.row, from_column, columns, cause);
        if shifted > 0 {
            tracing::trace!(
                row = delta.start.row,
                columns,
                shifted,
                "same-line edit shifted records"
            );
        }
        return;
    }

    let rows = delta.row_delta();
    match delta.action {
        EditAction::Insert => {
            let shifted = shift_rows(stack, delta.start.row + 1, rows, cause);
            tracing::trace!(rows, shifted, "line split shifted groups");
        }
        EditAction::Remove => {
            let dropped = drop_deleted_lines(stack, delta.start.row, delta.end.row, cause);
            let columns = delta.start.column as isize - delta.end.column as isize;
            let merged = merge_columns(stack, delta.end.row, columns, cause);
            let shifted = shift_rows(stack, delta.end.row, rows, cause);
            tracing::trace!(
                rows,
                columns,
                dropped,
                merged,
                shifted,
                "line merge shifted groups"
            );
        }
    }
}

/// Add `rows` to the offset of every group anchored at or after `from_row`.
///
/// Returns the number of groups shifted.
pub fn shift_rows(
    stack: &mut EditStack,
    from_row: usize,
    rows: isize,
    cause: Option<GroupId>,
) -> usize {
    if rows == 0 {
        return 0;
    }
    let mut shifted = 0;
    for group in stack.iter_mut() {
        if Some(group.id) == cause {
            continue;
        }
        if group.anchor_row().is_some_and(|anchor| anchor >= from_row) {
            group.shift_rows(rows);
            shifted += 1;
        }
    }
    shifted
}

/// Move the columns of every group anchored on `line` by `columns`.
///
/// Used when `line` is joined onto the end of the previous line: its content now starts at
/// the merge column.
pub fn merge_columns(
    stack: &mut EditStack,
    line: usize,
    columns: isize,
    cause: Option<GroupId>,
) -> usize {
    if columns == 0 {
        return 0;
    }
    let ids = GroupIndex::ids_on_line(stack, line);
    let mut merged = 0;
    for id in ids {
        if Some(id) == cause {
            continue;
        }
        if let Some(group) = stack.get_mut(id) {
            group.shift_columns(columns);
            merged += 1;
        }
    }
    merged
}

/// Move by `columns` every record that starts on `row` at or after `from_column`.
///
/// Returns the number of records moved.
pub fn shift_line_columns(
    stack: &mut EditStack,
    row: usize,
    from_column: usize,
    columns: isize,
    cause: Option<GroupId>,
) -> usize {
    if columns == 0 {
        return 0;
    }
    let mut shifted = 0;
    for group in stack.iter_mut() {
        if Some(group.id) == cause {
            continue;
        }
        for record in &mut group.records {
            if record.anchor_row() == row && record.start.column >= from_column {
                record.shift_columns(columns);
                shifted += 1;
            }
        }
    }
    shifted
}

/// Forget groups anchored on rows strictly between `first` and `last`; those lines are gone.
pub fn drop_deleted_lines(
    stack: &mut EditStack,
    first: usize,
    last: usize,
    cause: Option<GroupId>,
) -> usize {
    let before = stack.len();
    stack.retain(|group| {
        Some(group.id) == cause
            || !group
                .anchor_row()
                .is_some_and(|anchor| anchor > first && anchor < last)
    });
    before - stack.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::OperationKind;
    use crate::position::Position;
    use crate::record::{EditGroup, EditRecord};

    fn typed(seq: u64, row: usize, column: usize, text: &str) -> EditGroup {
        let id = GroupId::new(seq);
        EditGroup::new(
            id,
            vec![EditRecord::insert(Position::new(row, column), text).with_id(id)],
        )
    }

    fn delta(record: EditRecord) -> EditDelta {
        EditDelta::from_record(&record, OperationKind::Edit)
    }

    #[test]
    fn test_insertion_shifts_groups_below() {
        let mut stack: EditStack = vec![
            typed(0, 0, 0, "top"),
            typed(1, 1, 2, "mid"),
            typed(2, 4, 0, "low"),
        ]
        .into_iter()
        .collect();

        let paste = delta(EditRecord::insert(Position::new(0, 1), "a\nb\nc"));
        propagate(&mut stack, &paste, None);

        let anchors: Vec<Option<usize>> = stack.iter().map(EditGroup::anchor_row).collect();
        assert_eq!(anchors, vec![Some(0), Some(3), Some(6)]);
        // Stored coordinates are untouched; only the offset moves.
        assert_eq!(stack.groups()[1].records[0].start, Position::new(1, 2));
    }

    #[test]
    fn test_cause_is_not_offset_by_itself() {
        let id = GroupId::new(5);
        let mut stack: EditStack = vec![
            typed(0, 2, 0, "x"),
            EditGroup::new(
                id,
                vec![EditRecord::insert(Position::new(2, 0), "\n").with_id(id)],
            ),
        ]
        .into_iter()
        .collect();
        // Pretend the newline group is anchored below its own edit.
        stack.get_mut(id).expect("present").shift_rows(1);

        let newline = delta(EditRecord::insert(Position::new(1, 0), "\n").with_id(id));
        propagate(&mut stack, &newline, Some(id));

        assert_eq!(stack.groups()[0].anchor_row(), Some(3));
        assert_eq!(stack.groups()[1].anchor_row(), Some(3));
        assert_eq!(stack.groups()[1].records[0].row_offset, 1);
    }

    #[test]
    fn test_merge_moves_columns_then_rows() {
        let mut stack: EditStack = vec![
            typed(0, 0, 0, "abc"),
            typed(1, 1, 0, "xyz"),
            typed(2, 2, 1, "q"),
        ]
        .into_iter()
        .collect();

        // Backspace at (1, 0) joins line 1 onto "abc".
        let join = delta(EditRecord::remove(Position::new(0, 3), "\n"));
        propagate(&mut stack, &join, None);

        let merged = &stack.groups()[1];
        assert_eq!(merged.anchor_row(), Some(0));
        assert_eq!(merged.records[0].start.column, 3);
        assert_eq!(merged.records[0].end.column, 6);

        let below = &stack.groups()[2];
        assert_eq!(below.anchor_row(), Some(1));
        assert_eq!(below.records[0].start.column, 1);
    }

    #[test]
    fn test_removing_whole_lines_drops_their_groups() {
        let mut stack: EditStack = vec![
            typed(0, 1, 0, "keep"),
            typed(1, 2, 0, "gone"),
            typed(2, 3, 0, "gone too"),
            typed(3, 4, 0, "tail"),
        ]
        .into_iter()
        .collect();

        let removal = delta(EditRecord::remove(Position::new(1, 4), "\ngone\ngone too\n"));
        propagate(&mut stack, &removal, None);

        assert_eq!(stack.ids(), vec![GroupId::new(0), GroupId::new(3)]);
        let tail = &stack.groups()[1];
        assert_eq!(tail.anchor_row(), Some(1));
        assert_eq!(tail.records[0].start.column, 4);
    }

    #[test]
    fn test_single_line_edits_do_not_move_other_rows() {
        let mut stack: EditStack = vec![typed(0, 3, 0, "x")].into_iter().collect();
        let before = stack.clone();
        propagate(
            &mut stack,
            &delta(EditRecord::insert(Position::new(0, 0), "hello")),
            None,
        );
        assert_eq!(stack, before);
    }

    #[test]
    fn test_same_line_edits_move_following_records() {
        let mut stack: EditStack = vec![typed(0, 0, 1, "ab"), typed(1, 0, 6, "tail")]
            .into_iter()
            .collect();

        propagate(
            &mut stack,
            &delta(EditRecord::remove(Position::new(0, 3), "xy")),
            None,
        );
        assert_eq!(stack.groups()[0].records[0].start, Position::new(0, 1));
        assert_eq!(stack.groups()[1].records[0].start, Position::new(0, 4));
        assert_eq!(stack.groups()[1].records[0].end, Position::new(0, 8));

        propagate(
            &mut stack,
            &delta(EditRecord::insert(Position::new(0, 1), "123")),
            Some(GroupId::new(1)),
        );
        assert_eq!(stack.groups()[0].records[0].start, Position::new(0, 4));
        assert_eq!(stack.groups()[1].records[0].start, Position::new(0, 4));
    }
}
