// List query error types surfaced to the owning view
use serde_json::{json, Value};

use crate::filter::FilterError;
use crate::record::RecordError;

/// Errors returned by list query operations.
///
/// Every variant leaves the caller's current list untouched; the view only has to
/// show the notification built by [`QueryError::to_json`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// The search query does not parse into `attribute operator value` conditions
    #[error("{0}")]
    FilterSyntax(FilterError),

    /// Filtering or sorting on a field the view did not declare
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Invalid sort order: {0}")]
    InvalidOrder(String),

    #[error("Invalid collection: {0}")]
    InvalidCollection(String),
}

impl QueryError {
    /// Client-facing message for the alert/notification area
    pub fn message(&self) -> String {
        match self {
            QueryError::FilterSyntax(_) => "Your search query is invalid, please correct it".to_string(),
            QueryError::UnknownAttribute(name) => format!("Cannot search or sort by '{}'", name),
            QueryError::InvalidOrder(_) => "The requested sort order is invalid".to_string(),
            QueryError::InvalidCollection(_) => "The list could not be loaded".to_string(),
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::FilterSyntax(_) => "FILTER_SYNTAX_ERROR",
            QueryError::UnknownAttribute(_) => "UNKNOWN_ATTRIBUTE",
            QueryError::InvalidOrder(_) => "INVALID_ORDER",
            QueryError::InvalidCollection(_) => "INVALID_COLLECTION",
        }
    }

    /// Notification payload: `{ error, message, code, detail }`
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code(),
            "detail": self.to_string()
        })
    }
}

impl From<FilterError> for QueryError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::UnknownAttribute(name) => QueryError::UnknownAttribute(name),
            FilterError::InvalidOrder(msg) => QueryError::InvalidOrder(msg),
            other => QueryError::FilterSyntax(other),
        }
    }
}

impl From<RecordError> for QueryError {
    fn from(err: RecordError) -> Self {
        QueryError::InvalidCollection(err.to_string())
    }
}
