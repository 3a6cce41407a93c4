use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid filter query: {0}")]
    InvalidSyntax(String),

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("Missing value for attribute: {0}")]
    MissingValue(String),

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Filter nesting depth {depth} exceeds maximum {max_depth}")]
    NestingTooDeep { depth: u32, max_depth: u32 },

    #[error("Filter query is {length} characters, maximum is {max_length}")]
    QueryTooLong { length: usize, max_length: usize },

    #[error("Invalid order: {0}")]
    InvalidOrder(String),
}

impl FilterError {
    /// Errors caused by a malformed query string, as opposed to a bad attribute name
    pub fn is_syntax_error(&self) -> bool {
        !matches!(self, FilterError::UnknownAttribute(_) | FilterError::InvalidOrder(_))
    }
}
