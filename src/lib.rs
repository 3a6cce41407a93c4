pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod query;
pub mod record;

pub use error::QueryError;
pub use record::{Record, RecordError};
