//! Undo and redo stacks.

use crate::record::{EditGroup, GroupId};

/// An ordered sequence of edit groups.
///
/// Order is chronological: for the undo stack, the order groups were applied; for the redo
/// stack, the order they were undone. The newest group is last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditStack {
    groups: Vec<EditGroup>,
}

impl EditStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if the stack holds no groups, or only empty ones.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(EditGroup::is_empty)
    }

    /// Groups, oldest first.
    pub fn groups(&self) -> &[EditGroup] {
        &self.groups
    }

    /// Iterate groups, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &EditGroup> {
        self.groups.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut EditGroup> {
        self.groups.iter_mut()
    }

    /// Ids of all groups, oldest first.
    pub fn ids(&self) -> Vec<GroupId> {
        self.groups.iter().map(|g| g.id).collect()
    }

    /// Newest group.
    pub fn last(&self) -> Option<&EditGroup> {
        self.groups.last()
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut EditGroup> {
        self.groups.last_mut()
    }

    /// Look up a group by id.
    pub fn get(&self, id: GroupId) -> Option<&EditGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: GroupId) -> Option<&mut EditGroup> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    /// Index of the group with `id`.
    pub fn position(&self, id: GroupId) -> Option<usize> {
        self.groups.iter().position(|g| g.id == id)
    }

    /// Returns `true` if a group with `id` is present.
    pub fn contains(&self, id: GroupId) -> bool {
        self.position(id).is_some()
    }

    /// Append a group as the newest entry.
    pub fn push(&mut self, group: EditGroup) {
        self.groups.push(group);
    }

    pub(crate) fn insert(&mut self, index: usize, group: EditGroup) {
        let index = index.min(self.groups.len());
        self.groups.insert(index, group);
    }

    /// Remove the group with `id`, wherever it is.
    pub fn remove(&mut self, id: GroupId) -> Option<EditGroup> {
        let index = self.position(id)?;
        Some(self.groups.remove(index))
    }

    pub(crate) fn remove_oldest(&mut self) -> Option<EditGroup> {
        if self.groups.is_empty() {
            None
        } else {
            Some(self.groups.remove(0))
        }
    }

    pub(crate) fn retain(&mut self, f: impl FnMut(&EditGroup) -> bool) {
        self.groups.retain(f);
    }

    /// Drop every group.
    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

impl FromIterator<EditGroup> for EditStack {
    fn from_iter<T: IntoIterator<Item = EditGroup>>(iter: T) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

/// The pair of stacks owned by the controller.
#[derive(Debug, Clone)]
pub(crate) struct History {
    pub(crate) undo: EditStack,
    pub(crate) redo: EditStack,
    max_undo: usize,
}

impl History {
    pub(crate) fn new(max_undo: usize) -> Self {
        Self {
            undo: EditStack::new(),
            redo: EditStack::new(),
            max_undo: max_undo.max(1),
        }
    }

    /// Push a group onto the undo stack, evicting the oldest groups beyond capacity.
    pub(crate) fn push_undo(&mut self, group: EditGroup) -> Vec<EditGroup> {
        let mut evicted = Vec::new();
        while self.undo.len() >= self.max_undo {
            match self.undo.remove_oldest() {
                Some(oldest) => evicted.push(oldest),
                None => break,
            }
        }
        self.undo.push(group);
        evicted
    }

    pub(crate) fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
