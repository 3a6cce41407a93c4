pub mod config;
pub mod parse;
pub mod query;
pub mod replay;
