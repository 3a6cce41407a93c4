pub mod types;
pub mod filter;
pub mod filter_where;
pub mod filter_order;
pub mod filter_page;
pub mod error;

pub use types::*;
pub use error::FilterError;
pub use filter::Filter;
pub use filter_where::{build_filter_query, filter_records, FilterWhere};
pub use filter_order::{sort_records, FilterOrder};
pub use filter_page::{paginate, total_pages, ListPage};
