#![warn(missing_docs)]
//! Line Undo - Selective, Line-Scoped Undo/Redo Engine
//!
//! # Overview
//!
//! `line-undo` lets a user undo only the edits that touched the selected line(s), leaving
//! edits elsewhere intact, and redo them independently of other regions. Every recorded
//! group stays attached to its line while other edits insert, delete, split, and merge lines
//! around it.
//!
//! The crate is headless: it drives an editing surface through the [`EditSurface`] trait and
//! ships a rope-backed reference surface, [`DocumentSurface`].
//!
//! # Core Features
//!
//! - **Per-line history**: undo/redo restricted to groups anchored on the selected lines
//! - **Stable anchors**: row offsets and column drift follow line splits and merges
//! - **Split restructuring**: groups cut by a line break are divided or re-anchored
//! - **Global undo/redo**: chronological undo over the same stacks
//! - **Atomic commands**: a rejected revert or reapply leaves document and stacks unchanged
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  SelectiveUndoController                    │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Split Restructuring (split)                │  ← Line splits
//! ├─────────────────────────────────────────────┤
//! │  Coordinate Offsets (offsets)               │  ← Row/column drift
//! ├─────────────────────────────────────────────┤
//! │  Edit Stacks + Group Index                  │  ← History storage
//! ├─────────────────────────────────────────────┤
//! │  Records, Groups, Deltas                    │  ← Data model
//! └─────────────────────────────────────────────┘
//!              ▲ deltas          │ commands
//!              │                 ▼
//! ┌─────────────────────────────────────────────┐
//! │  EditSurface (DocumentSurface: ropey)       │  ← Text storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use line_undo::{LineUndoEditor, Position};
//!
//! let mut editor = LineUndoEditor::new_document("first\nsecond");
//!
//! editor.set_cursor(Position::new(0, 5));
//! editor.type_text("!").unwrap();
//! editor.set_cursor(Position::new(1, 6));
//! editor.type_text("?").unwrap();
//!
//! // Undo on line 0 leaves the edit on line 1 alone.
//! editor.set_cursor(Position::new(0, 0));
//! assert!(editor.selective_undo());
//! assert_eq!(editor.text(), "first\nsecond?");
//!
//! assert!(editor.selective_redo());
//! assert_eq!(editor.text(), "first!\nsecond?");
//! ```
//!
//! # Module Description
//!
//! - [`record`] - Edit records, groups and group ids
//! - [`delta`] - Edit notifications tagged with their operation kind
//! - [`history`] - Undo/redo stacks
//! - [`group_index`] - Id tagging, by-line lookup, derived ids
//! - [`offsets`] - Coordinate drift on line-count changes
//! - [`split`] - Group restructuring on line splits
//! - [`controller`] - Selective and global undo/redo
//! - [`surface`] - Editing surface interface
//! - [`document`] - Reference rope-backed surface
//!
//! # Logging
//!
//! Diagnostics are emitted through `tracing`; the library never installs a subscriber.

pub mod config;
pub mod controller;
pub mod delta;
pub mod document;
pub mod group_index;
pub mod history;
pub mod offsets;
pub mod position;
pub mod record;
pub mod split;
pub mod state;
pub mod surface;
mod text;

pub use config::SelectiveUndoConfig;
pub use controller::{LineUndoEditor, SelectiveUndoController};
pub use delta::{EditDelta, OperationKind};
pub use document::DocumentSurface;
pub use group_index::GroupIndex;
pub use history::EditStack;
pub use position::{Position, Range};
pub use record::{EditAction, EditGroup, EditRecord, GroupId};
pub use split::{LineSplit, SplitPlacement};
pub use state::HistoryState;
pub use surface::{EditSurface, SurfaceError};
