use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, FilterConfig, QueryConfig};
use crate::error::QueryError;
use crate::filter::filter_order::sort_indices;
use crate::filter::filter_where::{filter_indices, quote_value};
use crate::filter::{paginate, total_pages, AttributeSet, FilterExpression, FilterWhere, ListPage, PageWindow, SortSpec};
use crate::record::Record;

/// What a list view declares about itself when it mounts
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub searchable: AttributeSet,
    pub sortable: AttributeSet,
    pub filter: FilterConfig,
    pub query: QueryConfig,
}

impl QueryOptions {
    pub fn new(searchable: AttributeSet, sortable: AttributeSet) -> Self {
        Self { searchable, sortable, ..Self::default() }
    }

    pub fn from_config(config: &AppConfig, searchable: AttributeSet, sortable: AttributeSet) -> Self {
        Self {
            searchable,
            sortable,
            filter: config.filter.clone(),
            query: config.query.clone(),
        }
    }
}

/// User interactions a list view forwards to its query state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum QueryCommand {
    ApplyFilter(String),
    ApplyCondition { attribute: String, operator: String, value: String },
    ClearFilter,
    ChangeSort(SortSpec),
    ChangePage(usize),
    ChangeOffset(usize),
    ChangePageSize(usize),
    SetCollection(Vec<Record>),
}

/// Per-view filter, sort and page state over one fetched collection.
///
/// The filtered list is kept as positions into the original collection, so it is
/// always a subset of what was fetched and the fetch order can be restored.
#[derive(Debug, Clone)]
pub struct QueryState {
    original: Vec<Record>,
    options: QueryOptions,
    query: Option<String>,
    expression: Option<FilterExpression>,
    sort: Vec<SortSpec>,
    window: PageWindow,
    filtered: Vec<usize>,
}

impl QueryState {
    pub fn new(collection: Vec<Record>, options: QueryOptions) -> Self {
        let window = PageWindow::new(0, options.query.default_page_size);
        let filtered = (0..collection.len()).collect();
        Self {
            original: collection,
            options,
            query: None,
            expression: None,
            sort: vec![],
            window,
            filtered,
        }
    }

    /// Parse and apply a search query against the original collection.
    ///
    /// On error nothing changes: the previous results stay on screen.
    pub fn apply_filter(&mut self, query: &str) -> Result<(), QueryError> {
        let expression = FilterWhere::parse(query, &self.options.searchable, &self.options.filter)?;
        self.query = expression.as_ref().map(|_| query.trim().to_string());
        self.set_expression(expression);
        Ok(())
    }

    /// Apply the basic-filter form triple
    pub fn apply_filter_condition(&mut self, attribute: &str, operator: &str, value: &str) -> Result<(), QueryError> {
        let expression = FilterWhere::condition(attribute, operator, value, &self.options.searchable)?;
        self.query = Some(format!("{} {} {}", attribute.trim(), operator.trim().to_ascii_lowercase(), quote_value(value.trim())));
        self.set_expression(Some(expression));
        Ok(())
    }

    /// Back to the fetched collection in fetch order, without filter or sort
    pub fn clear_filter(&mut self) {
        self.query = None;
        self.expression = None;
        self.sort.clear();
        self.filtered = (0..self.original.len()).collect();
        self.window.offset = 0;
    }

    /// Re-sort the current results; the page offset is kept
    pub fn change_sort(&mut self, spec: SortSpec) -> Result<(), QueryError> {
        if !self.options.sortable.contains(&spec.attribute) {
            if self.options.query.strict_attributes {
                return Err(QueryError::UnknownAttribute(spec.attribute));
            }
            tracing::warn!("Ignoring sort on undeclared attribute '{}'", spec.attribute);
            return Ok(());
        }

        self.sort = vec![spec];
        self.resort();
        Ok(())
    }

    /// One-based page number
    pub fn change_page(&mut self, page: usize) {
        self.window = PageWindow::from_page(page, self.window.limit);
    }

    pub fn change_offset(&mut self, offset: usize) {
        self.window.offset = offset;
    }

    /// New page size; returns to the first page
    pub fn change_page_size(&mut self, limit: usize) {
        let max_limit = self.options.filter.max_limit.unwrap_or(usize::MAX);
        let limit = if limit > max_limit {
            tracing::warn!("Page size {} exceeds max {}, capping to max", limit, max_limit);
            max_limit
        } else {
            limit
        };
        self.window = PageWindow::new(0, limit);
    }

    /// Replace the fetched collection, keeping the active filter and sort
    pub fn set_collection(&mut self, collection: Vec<Record>) {
        self.original = collection;
        self.filtered = self.recompute();
        self.window.offset = 0;
    }

    pub fn dispatch(&mut self, command: QueryCommand) -> Result<(), QueryError> {
        match command {
            QueryCommand::ApplyFilter(query) => self.apply_filter(&query),
            QueryCommand::ApplyCondition { attribute, operator, value } => {
                self.apply_filter_condition(&attribute, &operator, &value)
            }
            QueryCommand::ClearFilter => {
                self.clear_filter();
                Ok(())
            }
            QueryCommand::ChangeSort(spec) => self.change_sort(spec),
            QueryCommand::ChangePage(page) => {
                self.change_page(page);
                Ok(())
            }
            QueryCommand::ChangeOffset(offset) => {
                self.change_offset(offset);
                Ok(())
            }
            QueryCommand::ChangePageSize(limit) => {
                self.change_page_size(limit);
                Ok(())
            }
            QueryCommand::SetCollection(collection) => {
                self.set_collection(collection);
                Ok(())
            }
        }
    }

    /// Records on the current page
    pub fn page(&self) -> Vec<&Record> {
        paginate(&self.filtered, self.window.limit, self.window.offset)
            .iter()
            .map(|&i| &self.original[i])
            .collect()
    }

    /// Every record that passes the current filter, in display order
    pub fn filtered(&self) -> Vec<&Record> {
        self.filtered.iter().map(|&i| &self.original[i]).collect()
    }

    pub fn total_list_size(&self) -> usize {
        self.filtered.len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len(), self.window.limit)
    }

    pub fn view(&self) -> ListPage<Record> {
        let items = self.page().into_iter().cloned().collect();
        ListPage::new(items, self.window, self.filtered.len())
    }

    pub fn original(&self) -> &[Record] {
        &self.original
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn expression(&self) -> Option<&FilterExpression> {
        self.expression.as_ref()
    }

    pub fn sort(&self) -> &[SortSpec] {
        &self.sort
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    fn set_expression(&mut self, expression: Option<FilterExpression>) {
        self.expression = expression;
        self.filtered = self.recompute();
        self.window.offset = 0;

        if self.options.filter.debug_logging {
            tracing::debug!(
                "Filter {:?} matched {} of {} records",
                self.query, self.filtered.len(), self.original.len()
            );
        }
    }

    // Filters never stack: always start from the original collection
    fn recompute(&self) -> Vec<usize> {
        let mut indices = match &self.expression {
            Some(expression) => filter_indices(&self.original, expression),
            None => (0..self.original.len()).collect(),
        };
        sort_indices(&mut indices, &self.original, &self.sort);
        indices
    }

    fn resort(&mut self) {
        // Ties fall back to fetch order, not to whatever the previous sort left
        self.filtered.sort_unstable();
        sort_indices(&mut self.filtered, &self.original, &self.sort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(values: serde_json::Value) -> QueryState {
        let records = Record::collection_from_json(values).unwrap();
        QueryState::new(records, QueryOptions::new(AttributeSet::of(["alias"]), AttributeSet::of(["alias", "size"])))
    }

    fn aliases(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.get_str("alias").unwrap_or_default().to_string()).collect()
    }

    #[test]
    fn test_failed_filter_keeps_previous_results() {
        let mut s = state(json!([{"alias": "a1"}, {"alias": "b1"}, {"alias": "a2"}]));
        s.apply_filter("alias sw a").unwrap();
        s.change_offset(1);

        assert!(s.apply_filter("alias gt 4").is_err());
        assert_eq!(aliases(&s.filtered()), vec!["a1", "a2"]);
        assert_eq!(s.window().offset, 1);
        assert_eq!(s.query(), Some("alias sw a"));
    }

    #[test]
    fn test_new_filter_replaces_previous() {
        let mut s = state(json!([{"alias": "a1"}, {"alias": "b1"}, {"alias": "a2"}]));
        s.apply_filter("alias eq a1").unwrap();
        s.apply_filter("alias sw b").unwrap();
        assert_eq!(aliases(&s.filtered()), vec!["b1"]);
    }

    #[test]
    fn test_sort_survives_new_filter() {
        let mut s = state(json!([{"alias": "a1"}, {"alias": "b1"}, {"alias": "a2"}]));
        s.change_sort(SortSpec::desc("alias")).unwrap();
        s.apply_filter("alias sw a").unwrap();
        assert_eq!(aliases(&s.filtered()), vec!["a2", "a1"]);
    }

    #[test]
    fn test_unknown_sort_attribute_strict_and_lenient() {
        let mut s = state(json!([{"alias": "b"}, {"alias": "a"}]));
        assert_eq!(s.change_sort(SortSpec::asc("serial")), Err(QueryError::UnknownAttribute("serial".into())));

        let mut options = QueryOptions::new(AttributeSet::any(), AttributeSet::of(["alias"]));
        options.query.strict_attributes = false;
        let mut lenient = QueryState::new(s.original().to_vec(), options);
        lenient.change_sort(SortSpec::asc("serial")).unwrap();
        assert_eq!(aliases(&lenient.filtered()), vec!["b", "a"]);
        assert!(lenient.sort().is_empty());
    }

    #[test]
    fn test_page_size_capped_and_resets_offset() {
        let mut s = state(json!([{"alias": "a"}, {"alias": "b"}, {"alias": "c"}]));
        s.options.filter.max_limit = Some(2);
        s.change_offset(2);
        s.change_page_size(50);
        assert_eq!(s.window(), PageWindow::new(0, 2));
        assert_eq!(s.total_pages(), 2);
    }

    #[test]
    fn test_condition_records_query_text() {
        let mut s = state(json!([{"alias": "my cert"}, {"alias": "other"}]));
        s.apply_filter_condition("alias", "CO", "my cert").unwrap();
        assert_eq!(s.query(), Some("alias co \"my cert\""));
        assert_eq!(s.total_list_size(), 1);
    }

    #[test]
    fn test_commands_deserialize() {
        let commands: Vec<QueryCommand> = serde_json::from_value(json!([
            {"command": "apply_filter", "args": "alias co x"},
            {"command": "change_sort", "args": {"attribute": "alias", "direction": "desc"}},
            {"command": "change_page", "args": 2},
            {"command": "clear_filter"}
        ]))
        .unwrap();
        assert_eq!(commands.len(), 4);
        assert!(matches!(commands[3], QueryCommand::ClearFilter));
    }
}
