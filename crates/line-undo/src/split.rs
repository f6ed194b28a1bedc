//! Restructuring of groups when a line is split.
//!
//! A multi-line insertion at `(row, column)` moves everything after `column` on `row` to a
//! new line. Each group anchored on `row` is classified into a [`SplitPlacement`] and
//! transformed by the matching pure function:
//!
//! | placement  | transformation |
//! |------------|----------------|
//! | `Cause`    | none, it is the group that inserted the line break |
//! | `Before`   | [`keep`]: stays on `row` |
//! | `After`    | [`relocate`]: moves to the new line, columns relative to the split point |
//! | `Straddle` | [`divide`]: records before the split stay, the rest form a new group |
//!
//! Line merges need no restructuring; the column drift applied by
//! [`crate::offsets::propagate`] is enough.

use crate::delta::EditDelta;
use crate::group_index::GroupIndex;
use crate::history::EditStack;
use crate::record::{EditAction, EditGroup, EditRecord, GroupId};

/// Geometry of a line-splitting insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSplit {
    /// Row the insertion happened on.
    pub row: usize,
    /// Column of the split point.
    pub column: usize,
    /// Number of line breaks inserted.
    pub rows_added: usize,
    /// Column at which the text that followed the split point now starts.
    pub tail_column: usize,
}

impl LineSplit {
    /// The split described by `delta`, if it inserts a line break.
    pub fn from_delta(delta: &EditDelta) -> Option<Self> {
        if !delta.is_line_split() {
            return None;
        }
        Some(Self {
            row: delta.start.row,
            column: delta.start.column,
            rows_added: delta.end.row.saturating_sub(delta.start.row),
            tail_column: delta.end.column,
        })
    }

    fn column_shift(&self) -> isize {
        self.tail_column as isize - self.column as isize
    }
}

/// Where a single record lies relative to a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSide {
    /// On a row above the split row.
    Above,
    /// On the split row, at or before the split column.
    Before,
    /// On the split row, at or after the split column.
    After,
    /// An insertion on the split row that covers the split column.
    Straddle,
    /// On a row below the split row.
    Below,
}

/// Side of `record` relative to `split`.
///
/// A removal no longer occupies any text, so it is placed by its start alone. Line-break
/// records are placed by their start column too, which sends trailing line breaks to the
/// new line.
pub fn record_side(record: &EditRecord, split: &LineSplit) -> RecordSide {
    let row = record.anchor_row();
    if row < split.row {
        return RecordSide::Above;
    }
    if row > split.row {
        return RecordSide::Below;
    }
    if record.is_multiline() || record.action == EditAction::Remove {
        return if record.start.column >= split.column {
            RecordSide::After
        } else {
            RecordSide::Before
        };
    }
    if record.end.column <= split.column {
        RecordSide::Before
    } else if record.start.column >= split.column {
        RecordSide::After
    } else {
        RecordSide::Straddle
    }
}

/// How a group anchored on the split row is restructured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPlacement {
    /// The group that inserted the line break.
    Cause,
    /// Lies wholly before the split point.
    Before,
    /// Lies wholly after the split point.
    After,
    /// Has records on both sides of the split point.
    Straddle,
}

/// Classify a group anchored on `split.row`.
pub fn classify(group: &EditGroup, split: &LineSplit, cause: Option<GroupId>) -> SplitPlacement {
    if Some(group.id) == cause {
        return SplitPlacement::Cause;
    }

    let mut before = false;
    let mut after = false;
    for record in &group.records {
        match record_side(record, split) {
            RecordSide::Above | RecordSide::Before => before = true,
            RecordSide::After => after = true,
            RecordSide::Straddle => return SplitPlacement::Straddle,
            RecordSide::Below => {}
        }
    }

    match (before, after) {
        (true, true) => SplitPlacement::Straddle,
        (false, true) => SplitPlacement::After,
        _ => SplitPlacement::Before,
    }
}

/// Transformation for [`SplitPlacement::Before`]: the group stays, records already below the
/// split row move down with their line.
pub fn keep(mut group: EditGroup, split: &LineSplit) -> EditGroup {
    for record in &mut group.records {
        if record_side(record, split) == RecordSide::Below {
            record.shift_rows(split.rows_added as isize);
        }
    }
    group
}

/// Transformation for [`SplitPlacement::After`]: re-anchor the group on the new line.
pub fn relocate(mut group: EditGroup, split: &LineSplit) -> EditGroup {
    for record in &mut group.records {
        relocate_record(record, split);
    }
    group
}

fn relocate_record(record: &mut EditRecord, split: &LineSplit) {
    if record.anchor_row() == split.row {
        record.shift_columns(split.column_shift());
    }
    record.shift_rows(split.rows_added as isize);
}

/// Transformation for [`SplitPlacement::Straddle`].
///
/// Returns `(head, tail)`: the head keeps the original id and the records before the split;
/// the tail carries `tail_id` and is re-anchored on the new line. An insertion covering the
/// split column is cut in two at the column.
pub fn divide(group: EditGroup, split: &LineSplit, tail_id: GroupId) -> (EditGroup, EditGroup) {
    let mut head = Vec::new();
    let mut tail = Vec::new();

    for record in group.records {
        match record_side(&record, split) {
            RecordSide::Above | RecordSide::Before => head.push(record),
            RecordSide::After | RecordSide::Below => tail.push(record),
            RecordSide::Straddle => {
                let (left, right) = cut_record(record, split.column);
                head.push(left);
                tail.push(right);
            }
        }
    }

    let head = EditGroup::new(group.id, head);
    let mut tail = EditGroup::new(tail_id, tail);
    tail.restamp(tail_id);
    (head, relocate(tail, split))
}

fn cut_record(record: EditRecord, column: usize) -> (EditRecord, EditRecord) {
    let at = column - record.start.column;
    let text = record.lines.first().cloned().unwrap_or_default();
    let left_text: String = text.chars().take(at).collect();
    let right_text: String = text.chars().skip(at).collect();

    let mut left = record.clone();
    left.end.column = column;
    left.lines = vec![left_text];

    let mut right = record;
    right.start.column = column;
    right.lines = vec![right_text];

    (left, right)
}

/// Counts of what [`apply_split`] did, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Groups moved wholly to the new line.
    pub relocated: usize,
    /// Groups divided in two.
    pub divided: usize,
}

/// Restructure every group of `stack` anchored on the split row.
pub fn apply_split(
    stack: &mut EditStack,
    split: &LineSplit,
    cause: Option<GroupId>,
    index: &mut GroupIndex,
) -> SplitReport {
    let mut report = SplitReport::default();

    for id in GroupIndex::ids_on_line(stack, split.row) {
        let Some(position) = stack.position(id) else {
            continue;
        };
        let placement = classify(&stack.groups()[position], split, cause);
        if placement == SplitPlacement::Cause {
            continue;
        }
        let Some(group) = stack.remove(id) else {
            continue;
        };

        match placement {
            SplitPlacement::Cause | SplitPlacement::Before => {
                stack.insert(position, keep(group, split));
            }
            SplitPlacement::After => {
                stack.insert(position, relocate(group, split));
                report.relocated += 1;
            }
            SplitPlacement::Straddle => {
                let tail_id = index.derive(id);
                let (head, tail) = divide(group, split, tail_id);
                tracing::debug!(group = %id, tail = %tail_id, "divided group at line split");
                stack.insert(position, head);
                stack.insert(position + 1, tail);
                report.divided += 1;
            }
        }
    }

    report
}

/// Detach the whitespace trim that accompanies an auto-trimmed line break.
///
/// When the newest group is the cause of `delta` and holds exactly the removal of the split
/// row's leading whitespace followed by a bare line break at the start of that row, the
/// removal is taken out of the group and re-anchored at the start of the next row. The caller replays its inverse after the split
/// has been processed, which carries the indentation onto the new line.
pub fn detach_trimmed_whitespace(
    stack: &mut EditStack,
    delta: &EditDelta,
    split: &LineSplit,
    cause: Option<GroupId>,
) -> Option<EditRecord> {
    let cause = cause?;
    if delta.lines.len() != 2 || delta.lines.iter().any(|line| !line.is_empty()) {
        return None;
    }

    let group = stack.last_mut()?;
    if group.id != cause || group.records.len() != 2 {
        return None;
    }

    let trim = &group.records[0];
    let text = trim.text();
    let is_trim = trim.action == EditAction::Remove
        && !trim.is_multiline()
        && trim.anchor_row() == split.row
        && trim.start.column == 0
        && split.column == 0
        && !text.is_empty()
        && text.chars().all(char::is_whitespace);
    let breaks_line =
        group.records[1].action == EditAction::Insert && group.records[1].is_multiline();
    if !is_trim || !breaks_line {
        return None;
    }

    let mut record = group.records.remove(0).materialized();
    record.start.row += 1;
    record.end.row += 1;
    record.end.column = record.end.column.saturating_sub(record.start.column);
    record.start.column = 0;
    Some(record)
}
