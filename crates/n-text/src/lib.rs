//! # n-text — Document model for n-edit
//!
//! The state every edit action reads and writes:
//!
//! - **[`position`]** — `Position` (line, col) and `Range` types, 0-indexed
//! - **[`buffer`]** — `Buffer` wrapping a rope, with the line/offset model
//! - **[`history`]** — undo/redo with nestable groups
//! - **[`options`]** — editor properties and `:set`-style directives
//! - **[`document`]** — `Document` tying the above together, plus read-only
//!   regions, comment-token properties, and view invalidation
//! - **[`fold`]** — fold markers and the ordered fold set
//! - **[`selection`]** — the ordered, disjoint selection set
//! - **[`caret`]** — caret position, desired column, and insert/overwrite mode

pub mod buffer;
pub mod caret;
pub mod document;
pub mod fold;
pub mod history;
pub mod options;
pub mod position;
pub mod selection;

pub use buffer::{Buffer, LineSegment};
pub use caret::{Caret, CaretMode};
pub use document::{Document, Invalidation, UpdateRequest};
pub use fold::{FoldMarker, FoldSet};
pub use options::{BracketStyle, OptionError, Properties};
pub use position::{Position, Range};
pub use selection::{Selection, SelectionSet};
