//! Tools behind the CLI commands
//!
//! Each tool takes a loaded store and returns markdown.

pub mod agencies;
pub mod overview;
pub mod search;
pub mod shell;
pub mod suggest;
pub mod util;
