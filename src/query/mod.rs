pub mod debounce;
pub mod duplicate;
pub mod state;

pub use debounce::Debouncer;
pub use duplicate::{CheckStatus, DuplicateCheck, ExistenceChecker};
pub use state::{QueryCommand, QueryOptions, QueryState};
