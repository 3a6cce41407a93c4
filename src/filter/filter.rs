use serde_json::Value;

use super::error::FilterError;
use super::filter_order::{sort_records, FilterOrder};
use super::filter_page::{paginate, ListPage};
use super::filter_where::{filter_records, FilterWhere};
use super::types::{AttributeSet, FilterData, FilterExpression, PageWindow, SortSpec};
use crate::config::FilterConfig;
use crate::record::Record;

/// One-shot list query: filter, then sort, then slice.
///
/// Stateless counterpart of [`crate::query::QueryState`], for callers that hold the
/// full query in one place (CLI, request bodies).
pub struct Filter {
    attributes: AttributeSet,
    config: FilterConfig,
    where_data: Option<FilterExpression>,
    order_data: Vec<SortSpec>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl Filter {
    pub fn new(attributes: AttributeSet, config: FilterConfig) -> Self {
        Self {
            attributes,
            config,
            where_data: None,
            order_data: vec![],
            limit: None,
            offset: None,
        }
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(where_clause) = data.where_clause { self.where_clause(&where_clause)?; }
        if let Some(order) = data.order { self.order(&order)?; }
        match (data.page, data.limit) {
            (Some(page), Some(limit)) => { self.page(page, limit); }
            (_, Some(limit)) => { self.limit(limit, data.offset); }
            (_, None) => {
                if let Some(offset) = data.offset { self.offset(offset); }
            }
        }
        Ok(self)
    }

    pub fn where_clause(&mut self, query: &str) -> Result<&mut Self, FilterError> {
        self.where_data = FilterWhere::parse(query, &self.attributes, &self.config)?;
        Ok(self)
    }

    pub fn expression(&mut self, expression: FilterExpression) -> Result<&mut Self, FilterError> {
        FilterWhere::validate(&expression, &self.attributes)?;
        self.where_data = Some(expression);
        Ok(self)
    }

    pub fn order(&mut self, order_spec: &Value) -> Result<&mut Self, FilterError> {
        self.order_data = FilterOrder::validate_and_parse(order_spec)?;
        Ok(self)
    }

    pub fn sort(&mut self, specs: Vec<SortSpec>) -> &mut Self {
        self.order_data = specs;
        self
    }

    pub fn limit(&mut self, limit: usize, offset: Option<usize>) -> &mut Self {
        // Apply max limit from config
        let max_limit = self.config.max_limit.unwrap_or(usize::MAX);
        let applied_limit = if limit > max_limit {
            tracing::warn!("Limit {} exceeds max {}, capping to max", limit, max_limit);
            max_limit
        } else {
            limit
        };

        self.limit = Some(applied_limit);
        self.offset = offset;
        self
    }

    /// Skip the first `offset` matches; without a limit the rest of the list is returned
    pub fn offset(&mut self, offset: usize) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// One-based page number and page size
    pub fn page(&mut self, page: usize, limit: usize) -> &mut Self {
        self.limit(limit, None);
        let window = PageWindow::from_page(page, self.limit.unwrap_or(limit));
        self.offset = Some(window.offset);
        self
    }

    pub fn apply<'r>(&self, records: &'r [Record]) -> ListPage<&'r Record> {
        let mut matched = match &self.where_data {
            Some(expression) => filter_records(records, expression),
            None => records.iter().collect(),
        };
        sort_records(&mut matched, &self.order_data);

        let window = PageWindow::new(self.offset.unwrap_or(0), self.limit.unwrap_or(matched.len()));
        if self.config.debug_logging {
            tracing::debug!(
                "Filter matched {} of {} records, window offset={} limit={}",
                matched.len(), records.len(), window.offset, window.limit
            );
        }

        let items = paginate(&matched, window.limit, window.offset).to_vec();
        ListPage::new(items, window, matched.len())
    }
}
