mod root;

pub use root::{Cli, EXIT_ERROR};
