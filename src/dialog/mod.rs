//! Modal dialog core
//!
//! Turns unordered click and key interactions into exactly one answer per
//! dialog and hands that answer to whoever is awaiting it:
//!
//! - [`classifier`] decides whether an interaction closes the dialog
//! - [`resolver`] turns the way it closed into a value
//! - [`response`] is the single-assignment cell callers await
//! - [`session`] builds, runs and tears down one dialog
//! - [`host`] keeps at most one session open on a surface
//! - [`facade`] exposes `alert`, `confirm` and `prompt`

pub mod classifier;
pub mod facade;
pub mod host;
pub mod parts;
pub mod resolver;
pub mod response;
pub mod session;
pub mod types;

pub use classifier::{classify, ClassifierResult, InteractionKind, Key, RawInteraction};
pub use facade::Dialogs;
pub use host::{DialogHost, HostCommand};
pub use resolver::resolve_value;
pub use response::{Response, ResponseChannel};
pub use session::DialogSession;
pub use types::*;
