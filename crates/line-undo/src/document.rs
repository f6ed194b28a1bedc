//! Reference editing surface.
//!
//! [`DocumentSurface`] is a headless LF text buffer backed by a [`ropey::Rope`], with a single
//! selection whose `end` is the caret. User-level helpers ([`DocumentSurface::type_char`],
//! [`DocumentSurface::backspace`], ...) apply a change and return the [`EditDelta`]s it
//! produced; the caller forwards them to the controller.
//!
//! # Grouping
//!
//! - consecutive [`DocumentSurface::type_char`] calls coalesce into one group, line breaks
//!   included;
//! - every other edit is a group of its own;
//! - moving the caret, changing the selection, and reverting or reapplying records close the
//!   open group.
//!
//! Only the first delta of a group carries the group id.

use crate::delta::{EditDelta, OperationKind};
use crate::position::{Position, Range};
use crate::record::{EditAction, EditRecord, GroupId};
use crate::surface::{EditSurface, SurfaceError};
use crate::text::{char_len, normalize_line_endings};
use ropey::Rope;
use unicode_segmentation::UnicodeSegmentation;

/// Rope-backed text buffer implementing [`EditSurface`].
#[derive(Debug, Clone)]
pub struct DocumentSurface {
    rope: Rope,
    selection: Range,
    next_group: u64,
    open_group: Option<GroupId>,
    trim_whitespace_on_newline: bool,
}

impl DocumentSurface {
    /// Create a surface holding `text`, caret at the start.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&normalize_line_endings(text)),
            selection: Range::default(),
            next_group: 0,
            open_group: None,
            trim_whitespace_on_newline: false,
        }
    }

    /// Trim whitespace-only text before the caret when a line break is typed.
    ///
    /// The trim and the line break form one group of their own.
    pub fn with_trim_whitespace_on_newline(mut self, enabled: bool) -> Self {
        self.trim_whitespace_on_newline = enabled;
        self
    }

    /// Full document text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Number of logical lines (a trailing line break starts an empty last line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Text of `row` without its line break.
    pub fn line(&self, row: usize) -> Option<String> {
        if row >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(row);
        let len = line_len(&self.rope, row);
        Some(line.slice(..len).to_string())
    }

    /// Caret position.
    pub fn cursor(&self) -> Position {
        self.selection.end
    }

    /// Group that the next typed character joins, if any.
    pub fn open_group(&self) -> Option<GroupId> {
        self.open_group
    }

    /// Move the caret, clamped into the document.
    pub fn set_cursor(&mut self, at: Position) {
        self.selection = Range::caret(clamp(&self.rope, at));
        self.open_group = None;
    }

    /// Select `range`, clamped into the document.
    pub fn select(&mut self, range: Range) {
        self.selection = Range::new(
            clamp(&self.rope, range.start),
            clamp(&self.rope, range.end),
        );
        self.open_group = None;
    }

    /// Type one character at the caret, replacing the selection if there is one.
    pub fn type_char(&mut self, ch: char) -> Result<Vec<EditDelta>, SurfaceError> {
        let ch = if ch == '\r' { '\n' } else { ch };
        let mut deltas = Vec::with_capacity(2);

        if !self.selection.is_empty() {
            self.open_group = None;
            let (start, end) = self.selection.ordered();
            deltas.push(self.edit_remove(start, end)?);
        } else if ch == '\n' && self.trim_whitespace_on_newline {
            let at = self.cursor();
            let prefix = self.line(at.row).unwrap_or_default();
            let prefix: String = prefix.chars().take(at.column).collect();
            if !prefix.is_empty() && prefix.chars().all(char::is_whitespace) {
                self.open_group = None;
                let mut trim = self.edit_remove(Position::new(at.row, 0), at)?;
                trim.kind = OperationKind::WhitespaceTrim;
                deltas.push(trim);
            }
        }

        let mut buf = [0u8; 4];
        deltas.push(self.edit_insert(self.cursor(), ch.encode_utf8(&mut buf))?);
        Ok(deltas)
    }

    /// Delete the selection, or the grapheme cluster or line break before the caret.
    pub fn backspace(&mut self) -> Result<Vec<EditDelta>, SurfaceError> {
        self.open_group = None;

        let (start, end) = if self.selection.is_empty() {
            let at = self.cursor();
            let start = if at.column > 0 {
                let line = self.line(at.row).unwrap_or_default();
                let prefix: String = line.chars().take(at.column).collect();
                let width = prefix.graphemes(true).next_back().map_or(1, char_len);
                Position::new(at.row, at.column - width)
            } else if at.row > 0 {
                Position::new(at.row - 1, line_len(&self.rope, at.row - 1))
            } else {
                return Ok(Vec::new());
            };
            (start, at)
        } else {
            self.selection.ordered()
        };

        let delta = self.edit_remove(start, end)?;
        self.open_group = None;
        Ok(vec![delta])
    }

    /// Insert `text` at `at` as a group of its own; the caret moves to the end of the text.
    pub fn insert_at(&mut self, at: Position, text: &str) -> Result<Vec<EditDelta>, SurfaceError> {
        let text = normalize_line_endings(text);
        if text.is_empty() {
            return Ok(Vec::new());
        }
        self.open_group = None;
        let delta = self.edit_insert(at, &text)?;
        self.open_group = None;
        Ok(vec![delta])
    }

    /// Remove the text in `range` as a group of its own.
    pub fn remove_range(&mut self, range: Range) -> Result<Vec<EditDelta>, SurfaceError> {
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let (start, end) = range.ordered();
        self.open_group = None;
        let delta = self.edit_remove(start, end)?;
        self.open_group = None;
        Ok(vec![delta])
    }

    /// Replace the whole document, reporting the change with `kind`.
    ///
    /// Deltas carry no group id; use [`OperationKind::Load`] for a reload that the history
    /// should not track.
    pub fn replace_all(&mut self, text: &str, kind: OperationKind) -> Vec<EditDelta> {
        let old = self.rope.to_string();
        let text = normalize_line_endings(text);
        let mut deltas = Vec::with_capacity(2);

        if !old.is_empty() {
            let removed = EditRecord::remove(Position::default(), &old);
            deltas.push(EditDelta::from_record(&removed, kind));
        }
        self.rope = Rope::from_str(&text);
        if !text.is_empty() {
            let inserted = EditRecord::insert(Position::default(), &text);
            deltas.push(EditDelta::from_record(&inserted, kind));
        }

        self.selection = Range::default();
        self.open_group = None;
        deltas
    }

    fn begin_edit(&mut self) -> Option<GroupId> {
        if self.open_group.is_some() {
            return None;
        }
        let id = GroupId::new(self.next_group);
        self.next_group += 1;
        self.open_group = Some(id);
        Some(id)
    }

    fn edit_insert(&mut self, at: Position, text: &str) -> Result<EditDelta, SurfaceError> {
        let record = insert_text(&mut self.rope, at, text)?;
        self.selection = Range::caret(record.end);
        Ok(self.user_delta(record))
    }

    fn edit_remove(&mut self, start: Position, end: Position) -> Result<EditDelta, SurfaceError> {
        let record = remove_text(&mut self.rope, start, end, None)?;
        self.selection = Range::caret(start);
        Ok(self.user_delta(record))
    }

    fn user_delta(&mut self, record: EditRecord) -> EditDelta {
        let mut delta = EditDelta::from_record(&record, OperationKind::Edit);
        delta.id = self.begin_edit();
        delta
    }

    fn apply_records<'a>(
        &mut self,
        records: impl Iterator<Item = &'a EditRecord>,
        invert: bool,
        kind: OperationKind,
    ) -> Result<Vec<EditDelta>, SurfaceError> {
        // Work on a copy so a failing record leaves the document untouched.
        let mut rope = self.rope.clone();
        let mut deltas = Vec::new();

        for record in records {
            let record = record.materialized();
            let action = if invert {
                record.action.inverse()
            } else {
                record.action
            };
            let text = record.text();
            let applied = match action {
                EditAction::Insert => insert_text(&mut rope, record.start, &text)?,
                EditAction::Remove => {
                    remove_text(&mut rope, record.start, record.end, Some(text.as_str()))?
                }
            };
            let mut delta = EditDelta::from_record(&applied, kind);
            delta.id = record.id;
            deltas.push(delta);
        }

        self.rope = rope;
        if let Some(last) = deltas.last() {
            let caret = match last.action {
                EditAction::Insert => last.end,
                EditAction::Remove => last.start,
            };
            self.selection = Range::caret(caret);
        }
        self.open_group = None;
        Ok(deltas)
    }
}

impl Default for DocumentSurface {
    fn default() -> Self {
        Self::new("")
    }
}

impl EditSurface for DocumentSurface {
    fn selection(&self) -> Range {
        self.selection
    }

    fn set_selection(&mut self, range: Range) {
        self.select(range);
    }

    fn revert(
        &mut self,
        records: &[EditRecord],
        kind: OperationKind,
    ) -> Result<Vec<EditDelta>, SurfaceError> {
        self.apply_records(records.iter().rev(), true, kind)
    }

    fn reapply(
        &mut self,
        records: &[EditRecord],
        kind: OperationKind,
    ) -> Result<Vec<EditDelta>, SurfaceError> {
        self.apply_records(records.iter(), false, kind)
    }

    fn start_new_group(&mut self) {
        self.open_group = None;
    }
}

fn line_len(rope: &Rope, row: usize) -> usize {
    let line = rope.line(row);
    let len = line.len_chars();
    if len > 0 && line.char(len - 1) == '\n' {
        len - 1
    } else {
        len
    }
}

fn clamp(rope: &Rope, at: Position) -> Position {
    let row = at.row.min(rope.len_lines().saturating_sub(1));
    Position::new(row, at.column.min(line_len(rope, row)))
}

fn char_index(rope: &Rope, at: Position) -> Result<usize, SurfaceError> {
    if at.row >= rope.len_lines() || at.column > line_len(rope, at.row) {
        return Err(SurfaceError::InvalidPosition {
            row: at.row,
            column: at.column,
        });
    }
    Ok(rope.line_to_char(at.row) + at.column)
}

fn insert_text(rope: &mut Rope, at: Position, text: &str) -> Result<EditRecord, SurfaceError> {
    let index = char_index(rope, at)?;
    rope.insert(index, text);
    Ok(EditRecord::insert(at, text))
}

fn remove_text(
    rope: &mut Rope,
    start: Position,
    end: Position,
    expected: Option<&str>,
) -> Result<EditRecord, SurfaceError> {
    let from = char_index(rope, start)?;
    let to = char_index(rope, end)?;
    if to < from {
        return Err(SurfaceError::InvalidPosition {
            row: end.row,
            column: end.column,
        });
    }

    let found = rope.slice(from..to).to_string();
    if let Some(expected) = expected
        && expected != found
    {
        return Err(SurfaceError::TextMismatch {
            at: start,
            expected: expected.to_string(),
            found,
        });
    }

    rope.remove(from..to);
    Ok(EditRecord::remove(start, &found))
}
