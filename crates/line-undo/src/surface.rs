//! The editing surface the controller commands.
//!
//! The controller never touches document text itself. It reads the selection, asks the
//! surface to revert or reapply records, and feeds every resulting [`EditDelta`] back into its
//! own bookkeeping. [`crate::DocumentSurface`] is the reference implementation.

use crate::delta::{EditDelta, OperationKind};
use crate::position::{Position, Range};
use crate::record::EditRecord;
use thiserror::Error;

/// Errors reported by an [`EditSurface`] when a record cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("invalid position: row {row}, column {column}")]
    /// A record refers to a row or column outside the document.
    InvalidPosition {
        /// Logical row.
        row: usize,
        /// Column in characters.
        column: usize,
    },

    #[error("text mismatch at {at:?}: expected {expected:?}, found {found:?}")]
    /// The text a removal expects is not present in the document.
    TextMismatch {
        /// Start of the removal.
        at: Position,
        /// Text the record expects to remove.
        expected: String,
        /// Text actually found in the document.
        found: String,
    },
}

/// Text surface driven by the selective undo controller.
///
/// `revert` and `reapply` must be atomic: either every record is applied or the document is
/// left unchanged and an error is returned. Returned deltas are listed in application order and
/// tagged with `kind`.
pub trait EditSurface {
    /// Current selection; a caret is an empty range.
    fn selection(&self) -> Range;

    /// Replace the selection. Out-of-range columns are clamped.
    fn set_selection(&mut self, range: Range);

    /// Apply the inverse of each record, last record first.
    fn revert(
        &mut self,
        records: &[EditRecord],
        kind: OperationKind,
    ) -> Result<Vec<EditDelta>, SurfaceError>;

    /// Apply each record again, first record first.
    fn reapply(
        &mut self,
        records: &[EditRecord],
        kind: OperationKind,
    ) -> Result<Vec<EditDelta>, SurfaceError>;

    /// Close the open group so the next user edit starts a new one.
    fn start_new_group(&mut self);
}
