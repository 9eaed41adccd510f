//! contract-search: hybrid search over contract-processing records
//!
//! - [`records`]: the in-memory record table and its JSON loader
//! - [`search`]: query parsing, fuzzy matching, scoring and suggestions
//! - [`stats`]: success rates per agency
//! - [`tools`]: markdown front ends used by the CLI

pub mod cli;
pub mod config;
pub mod error;
pub mod records;
pub mod search;
pub mod session;
pub mod stats;
pub mod tools;

pub use config::SearchConfig;
pub use error::AppError;
pub use records::RecordStore;
pub use search::{SearchEngine, SearchMode};
pub use session::SessionContext;
