//! Awaitable modal `alert`, `confirm` and `prompt` dialogs.
//!
//! [`dialog`] holds the dialog lifecycle and the [`Dialogs`](dialog::Dialogs)
//! handle callers await on. [`surface`] is the element tree a dialog is built
//! on, and [`tui`] drives that tree in a terminal.

pub mod config;
pub mod dialog;
pub mod surface;
pub mod tui;
