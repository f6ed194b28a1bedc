//! Group identity and lookup.
//!
//! Editing surfaces commonly tag only the first record of a burst with the group id. Before
//! any lookup the stacks are normalised with [`GroupIndex::tag_with_id`] so every record
//! carries the id of the group it belongs to.

use crate::history::EditStack;
use crate::record::{EditGroup, GroupId};

/// Id bookkeeping plus the by-line lookup over an [`EditStack`].
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    highest_seq: Option<u64>,
    next_split: u32,
}

impl GroupIndex {
    /// Create an index that has seen no ids yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every record with its group's id.
    ///
    /// Returns the number of records that changed; tagging an already tagged stack returns 0
    /// and leaves it untouched.
    pub fn tag_with_id(stack: &mut EditStack) -> usize {
        let mut changed = 0;
        for group in stack.iter_mut() {
            let id = group.id;
            for record in &mut group.records {
                if record.id != Some(id) {
                    record.id = Some(id);
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Groups whose anchor line is one of `lines`, in stack order.
    ///
    /// With `exclude_multiline_records`, records spanning a line break are dropped from the
    /// returned copies, and groups left with no records are skipped. The anchor is always
    /// taken from the unfiltered group.
    pub fn find_groups_on_lines(
        stack: &EditStack,
        lines: &[usize],
        exclude_multiline_records: bool,
    ) -> Vec<EditGroup> {
        stack
            .iter()
            .filter(|group| {
                group
                    .anchor_row()
                    .is_some_and(|anchor| lines.contains(&anchor))
            })
            .map(|group| {
                if exclude_multiline_records {
                    group.without_multiline_records()
                } else {
                    group.clone()
                }
            })
            .filter(|group| !group.is_empty())
            .collect()
    }

    /// Ids of all groups anchored on `line`, line-break-only groups included.
    pub fn ids_on_line(stack: &EditStack, line: usize) -> Vec<GroupId> {
        stack
            .iter()
            .filter(|group| group.anchor_row() == Some(line))
            .map(|group| group.id)
            .collect()
    }

    /// Record an id issued by the editing surface.
    pub fn observe(&mut self, id: GroupId) {
        self.highest_seq = Some(self.highest_seq.map_or(id.seq(), |seq| seq.max(id.seq())));
    }

    /// A fresh id that sorts after `id` and has never been issued before.
    pub fn derive(&mut self, id: GroupId) -> GroupId {
        self.next_split = self.next_split.max(id.split()) + 1;
        GroupId::derived(id.seq(), self.next_split)
    }

    /// A fresh id after every id seen so far, for groups the controller opens itself.
    pub fn derive_latest(&mut self) -> GroupId {
        let seq = self.highest_seq.unwrap_or(0);
        self.derive(GroupId::new(seq))
    }
}
