//! # n-actions — Edit action engine for n-edit
//!
//! Keystroke-level commands over an [`n_text::Document`]:
//!
//! - **[`action`]** — `EditAction`, the closed action set, and its one
//!   dispatch entry point
//! - **[`context`]** — `EditContext`, the borrowed editor state an action
//!   runs against, with scoped undo groups and update batches
//! - **[`caret`]** — horizontal, vertical and word motion, fold-aware
//! - **[`indent`]** — Tab and Shift-Tab
//! - **[`comment`]** — line and block comment toggling
//! - **[`delete`]** — backspace, delete, word and line deletion
//! - **[`transpose`]** — moving a line up or down
//! - **[`brace`]** — jumping to the matching bracket
//! - **[`word`]** — word boundary scans
//! - **[`view`]** — the pixel mapping vertical motion goes through
//!
//! ```text
//! let mut cx = EditContext::new(&mut doc, &mut selections, &folds, &mut caret, &view);
//! let outcome = EditAction::Backspace.execute(&mut cx);
//! ```

pub mod action;
pub mod brace;
pub mod caret;
pub mod comment;
pub mod context;
pub mod delete;
pub mod indent;
pub mod transpose;
pub mod view;
pub mod word;

#[cfg(test)]
mod testing;

pub use action::{EditAction, ParseActionError};
pub use context::{EditContext, Outcome, Scope};
pub use transpose::TransposeError;
pub use view::{MonospaceView, TextView};
