use serde_json::Value;

use super::error::FilterError;
use super::types::{scalar_text, AttributeSet, FilterCondition, FilterExpression, FilterOp, FilterValue};
use crate::config::FilterConfig;
use crate::record::Record;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open,
    Close,
    Word(String),
    Quoted(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Open => "(".to_string(),
            Token::Close => ")".to_string(),
            Token::Word(w) => w.clone(),
            Token::Quoted(q) => format!("\"{}\"", q),
        }
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

/// Parser and evaluator for list search queries such as `name eq "jsconsole"`
/// or `alias co test and (tag eq social or tag eq enterprise)`.
///
/// `and` binds tighter than `or`; parentheses group.
pub struct FilterWhere<'a> {
    tokens: Vec<Token>,
    position: usize,
    depth: u32,
    max_depth: u32,
    attributes: &'a AttributeSet,
}

impl<'a> FilterWhere<'a> {
    fn new(tokens: Vec<Token>, attributes: &'a AttributeSet, max_depth: u32) -> Self {
        Self { tokens, position: 0, depth: 0, max_depth, attributes }
    }

    /// Parse a raw query string. Blank input means "no filter" and yields None.
    pub fn parse(
        query: &str,
        attributes: &AttributeSet,
        config: &FilterConfig,
    ) -> Result<Option<FilterExpression>, FilterError> {
        let query = query.trim();
        if query.is_empty() { return Ok(None); }

        let length = query.chars().count();
        if length > config.max_query_length {
            return Err(FilterError::QueryTooLong { length, max_length: config.max_query_length });
        }

        let tokens = tokenize(query)?;
        let mut parser = FilterWhere::new(tokens, attributes, config.max_nested_depth);
        let expression = parser.parse_or()?;

        if let Some(token) = parser.peek() {
            return Err(FilterError::InvalidSyntax(format!("unexpected '{}'", token.describe())));
        }

        if config.debug_logging {
            tracing::debug!("Parsed filter query {:?} into {:?}", query, expression);
        }
        Ok(Some(expression))
    }

    /// Build a single condition from the basic-filter form `(attribute, operator, value)`
    pub fn condition(
        attribute: &str,
        operator: &str,
        value: &str,
        attributes: &AttributeSet,
    ) -> Result<FilterExpression, FilterError> {
        let attribute = attribute.trim();
        if attribute.is_empty() {
            return Err(FilterError::InvalidSyntax("attribute name cannot be empty".to_string()));
        }
        let operator = FilterOp::parse(operator.trim())
            .ok_or_else(|| FilterError::UnsupportedOperator(operator.trim().to_string()))?;
        if value.trim().is_empty() {
            return Err(FilterError::MissingValue(attribute.to_string()));
        }
        if !attributes.contains(attribute) {
            return Err(FilterError::UnknownAttribute(attribute.to_string()));
        }
        Ok(FilterExpression::condition(attribute, operator, FilterValue::String(value.trim().to_string())))
    }

    /// Check that every attribute in an already-built expression is declared
    pub fn validate(expression: &FilterExpression, attributes: &AttributeSet) -> Result<(), FilterError> {
        match expression.attributes().into_iter().find(|a| !attributes.contains(a)) {
            Some(unknown) => Err(FilterError::UnknownAttribute(unknown.to_string())),
            None => Ok(()),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() { self.position += 1; }
        token
    }

    fn parse_or(&mut self) -> Result<FilterExpression, FilterError> {
        let mut parts = vec![self.parse_and()?];
        while self.peek().is_some_and(|t| t.is_keyword("or")) {
            self.position += 1;
            parts.push(self.parse_and()?);
        }
        Ok(if parts.len() == 1 { parts.remove(0) } else { FilterExpression::Or(parts) })
    }

    fn parse_and(&mut self) -> Result<FilterExpression, FilterError> {
        let mut parts = vec![self.parse_term()?];
        while self.peek().is_some_and(|t| t.is_keyword("and")) {
            self.position += 1;
            parts.push(self.parse_term()?);
        }
        Ok(if parts.len() == 1 { parts.remove(0) } else { FilterExpression::And(parts) })
    }

    fn parse_term(&mut self) -> Result<FilterExpression, FilterError> {
        if self.peek() != Some(&Token::Open) {
            return self.parse_condition();
        }

        self.position += 1;
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(FilterError::NestingTooDeep { depth: self.depth, max_depth: self.max_depth });
        }
        let inner = self.parse_or()?;
        match self.next() {
            Some(Token::Close) => {
                self.depth -= 1;
                Ok(inner)
            }
            _ => Err(FilterError::InvalidSyntax("missing closing parenthesis".to_string())),
        }
    }

    fn parse_condition(&mut self) -> Result<FilterExpression, FilterError> {
        let attribute = match self.next() {
            Some(Token::Word(word)) => word,
            Some(other) => {
                return Err(FilterError::InvalidSyntax(format!("expected attribute name, found '{}'", other.describe())))
            }
            None => return Err(FilterError::InvalidSyntax("expected a condition".to_string())),
        };

        let operator = match self.next() {
            Some(Token::Word(word)) => {
                FilterOp::parse(&word).ok_or(FilterError::UnsupportedOperator(word))?
            }
            Some(other) => return Err(FilterError::UnsupportedOperator(other.describe())),
            None => {
                return Err(FilterError::InvalidSyntax(format!("expected operator after '{}'", attribute)))
            }
        };

        let value = match self.peek() {
            Some(Token::Word(word)) if !word.eq_ignore_ascii_case("and") && !word.eq_ignore_ascii_case("or") => {
                FilterValue::from_bare(word)
            }
            Some(Token::Quoted(text)) => FilterValue::String(text.clone()),
            _ => return Err(FilterError::MissingValue(attribute)),
        };
        self.position += 1;

        if !self.attributes.contains(&attribute) {
            return Err(FilterError::UnknownAttribute(attribute));
        }

        Ok(FilterExpression::Condition(FilterCondition { attribute, operator, value }))
    }

    /// Evaluate an expression against one record
    pub fn matches(expression: &FilterExpression, record: &Record) -> bool {
        match expression {
            FilterExpression::Condition(condition) => record
                .get(&condition.attribute)
                .is_some_and(|field| matches_value(field, condition.operator, &condition.value)),
            FilterExpression::And(children) => children.iter().all(|c| Self::matches(c, record)),
            FilterExpression::Or(children) => children.iter().any(|c| Self::matches(c, record)),
        }
    }
}

/// Records for which the expression holds, in their original order
pub fn filter_records<'r>(records: &'r [Record], expression: &FilterExpression) -> Vec<&'r Record> {
    records.iter().filter(|r| FilterWhere::matches(expression, r)).collect()
}

/// Positions of the matching records in the input slice
pub fn filter_indices(records: &[Record], expression: &FilterExpression) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| FilterWhere::matches(expression, r))
        .map(|(i, _)| i)
        .collect()
}

fn matches_value(field: &Value, operator: FilterOp, literal: &FilterValue) -> bool {
    match field {
        Value::Null | Value::Object(_) => false,
        // Multi-valued fields (tags, roles) match when any scalar element matches
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_array())
            .any(|item| matches_value(item, operator, literal)),
        scalar => {
            if operator == FilterOp::Eq {
                match (scalar, literal) {
                    (Value::Number(n), FilterValue::Number { value, .. }) => return n.as_f64() == Some(*value),
                    (Value::Bool(b), FilterValue::Bool(l)) => return b == l,
                    _ => {}
                }
            }

            let Some(text) = scalar_text(scalar) else { return false };
            let needle = literal.text();
            match operator {
                FilterOp::Eq => text == needle,
                FilterOp::Co => text.contains(&needle),
                FilterOp::Sw => text.starts_with(&needle),
                FilterOp::Ew => text.ends_with(&needle),
            }
        }
    }
}

fn tokenize(query: &str) -> Result<Vec<Token>, FilterError> {
    let mut tokens = Vec::new();
    let mut chars = query.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '"' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            Some(escaped) => text.push(escaped),
                            None => break,
                        },
                        '"' => {
                            closed = true;
                            break;
                        }
                        other => text.push(other),
                    }
                }
                if !closed {
                    return Err(FilterError::InvalidSyntax("unterminated quoted value".to_string()));
                }
                tokens.push(Token::Quoted(text));
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' || c == '"' { break; }
                    word.push(c);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }

    Ok(tokens)
}

/// Quote a value for embedding in a query string when it would not survive as a bare token
pub fn quote_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.chars().any(|c| c.is_whitespace() || c == '(' || c == ')' || c == '"' || c == '\\')
        || value.eq_ignore_ascii_case("and")
        || value.eq_ignore_ascii_case("or");
    if !needs_quotes { return value.to_string(); }
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Combine a free-text search query with a set of selected values for one attribute,
/// e.g. `(name co google) and (tag eq social or tag eq enterprise)`.
pub fn build_filter_query(search: &str, attribute: &str, values: &[String]) -> Option<String> {
    let search = search.trim();
    if values.is_empty() {
        return if search.is_empty() { None } else { Some(search.to_string()) };
    }

    let alternatives = values
        .iter()
        .map(|v| format!("{} eq {}", attribute, quote_value(v)))
        .collect::<Vec<_>>()
        .join(" or ");

    Some(if search.is_empty() {
        format!("({})", alternatives)
    } else {
        format!("({}) and ({})", search, alternatives)
    })
}
