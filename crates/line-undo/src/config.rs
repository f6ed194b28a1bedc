//! Controller configuration.

/// Tunables of [`crate::SelectiveUndoController`].
///
/// # Example
///
/// ```rust
/// use line_undo::SelectiveUndoConfig;
///
/// let config = SelectiveUndoConfig::default().with_max_undo_groups(64);
/// assert!(config.exclude_line_breaks);
/// assert_eq!(config.max_undo_groups, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectiveUndoConfig {
    /// Leave records that span a line break out of selective undo/redo.
    ///
    /// Line breaks join or split lines, which is rarely what undoing "this line" should do.
    pub exclude_line_breaks: bool,
    /// Maximum number of groups kept on the undo stack; the oldest is dropped beyond it.
    pub max_undo_groups: usize,
    /// After a selective operation on several lines, select those lines entirely.
    pub reselect_after_multiline: bool,
}

impl Default for SelectiveUndoConfig {
    fn default() -> Self {
        Self {
            exclude_line_breaks: true,
            max_undo_groups: 1000,
            reselect_after_multiline: true,
        }
    }
}

impl SelectiveUndoConfig {
    /// Set [`Self::exclude_line_breaks`].
    pub fn with_exclude_line_breaks(mut self, exclude: bool) -> Self {
        self.exclude_line_breaks = exclude;
        self
    }

    /// Set [`Self::max_undo_groups`] (at least 1).
    pub fn with_max_undo_groups(mut self, max: usize) -> Self {
        self.max_undo_groups = max.max(1);
        self
    }

    /// Set [`Self::reselect_after_multiline`].
    pub fn with_reselect_after_multiline(mut self, reselect: bool) -> Self {
        self.reselect_after_multiline = reselect;
        self
    }
}
