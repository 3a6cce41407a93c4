mod common;

use console_list_query::filter::{AttributeSet, PageWindow, SortSpec};
use console_list_query::query::{QueryCommand, QueryOptions, QueryState};
use console_list_query::QueryError;
use serde_json::json;

#[test]
fn new_state_shows_first_page_of_everything() {
    let state = common::certificate_state();
    assert_eq!(state.total_list_size(), 6);
    assert_eq!(state.window(), PageWindow::new(0, 10));
    assert_eq!(state.page().len(), 6);
    assert_eq!(state.total_pages(), 1);
}

#[test]
fn filter_change_resets_offset() {
    let mut state = common::certificate_state();
    state.change_page_size(2);
    state.change_page(3);
    assert_eq!(state.window().offset, 4);

    state.apply_filter("alias co cert").unwrap();
    assert_eq!(state.window().offset, 0);
    assert_eq!(state.total_list_size(), 2);
    assert_eq!(state.total_pages(), 1);
}

#[test]
fn sort_change_keeps_offset() {
    let mut state = common::certificate_state();
    state.change_page_size(2);
    state.change_page(2);
    state.change_sort(SortSpec::asc("alias")).unwrap();

    assert_eq!(state.window().offset, 2);
    assert_eq!(common::field(&state.page(), "alias"), vec![json!("prod-cert"), json!("test-cert")]);
}

#[test]
fn page_size_change_does_not_touch_filter_or_sort() {
    let mut state = common::certificate_state();
    state.apply_filter("issuerDN co acme").unwrap();
    state.change_sort(SortSpec::desc("validity")).unwrap();
    state.change_page_size(1);

    assert_eq!(state.query(), Some("issuerDN co acme"));
    assert_eq!(state.sort(), &[SortSpec::desc("validity")]);
    assert_eq!(state.total_pages(), 3);
    assert_eq!(common::field(&state.page(), "alias"), vec![json!("prod-cert")]);
}

#[test]
fn clear_filter_restores_fetch_order() {
    let mut state = common::certificate_state();
    let original = common::certificates();

    state.apply_filter("alias co t").unwrap();
    state.change_sort(SortSpec::desc("alias")).unwrap();
    state.apply_filter("issuerDN eq \"CN=Acme\"").unwrap();
    state.change_sort(SortSpec::asc("validity")).unwrap();
    state.clear_filter();

    let restored: Vec<_> = state.filtered().into_iter().cloned().collect();
    assert_eq!(restored, original);
    assert!(state.sort().is_empty());
    assert!(state.expression().is_none());
}

#[test]
fn empty_query_means_no_filter() {
    let mut state = common::certificate_state();
    state.apply_filter("alias eq gateway").unwrap();
    assert_eq!(state.total_list_size(), 1);

    state.apply_filter("   ").unwrap();
    assert_eq!(state.total_list_size(), 6);
    assert_eq!(state.query(), None);
}

#[test]
fn invalid_query_surfaces_notification_and_keeps_list() {
    let mut state = common::certificate_state();
    state.apply_filter("alias sw test").unwrap();
    let before: Vec<_> = state.filtered().into_iter().cloned().collect();

    let err = state.apply_filter("alias sw").unwrap_err();
    assert_eq!(err.error_code(), "FILTER_SYNTAX_ERROR");
    assert_eq!(err.to_json()["message"], "Your search query is invalid, please correct it");

    let after: Vec<_> = state.filtered().into_iter().cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn undeclared_filter_attribute_rejected() {
    let mut state = common::certificate_state();
    let err = state.apply_filter("validity eq 30").unwrap_err();
    assert_eq!(err, QueryError::UnknownAttribute("validity".to_string()));
}

#[test]
fn refetch_keeps_filter_and_sort() {
    let mut state = common::certificate_state();
    state.apply_filter("issuerDN co acme").unwrap();
    state.change_sort(SortSpec::asc("validity")).unwrap();

    let mut refetched = common::certificates();
    refetched.retain(|r| r.get_str("alias") != Some("test-cert"));
    state.set_collection(refetched);

    assert_eq!(common::field(&state.filtered(), "alias"), vec![json!("idp-signing"), json!("prod-cert")]);
}

#[test]
fn dispatch_drives_the_same_transitions() {
    let mut state = QueryState::new(
        common::applications(30),
        QueryOptions::new(AttributeSet::of(["name", "protocol"]), AttributeSet::of(["name"])),
    );

    let commands: Vec<QueryCommand> = serde_json::from_value(json!([
        {"command": "apply_condition", "args": {"attribute": "protocol", "operator": "eq", "value": "saml"}},
        {"command": "change_sort", "args": {"attribute": "name", "direction": "desc"}},
        {"command": "change_page_size", "args": 5},
        {"command": "change_page", "args": 2}
    ]))
    .unwrap();
    for command in commands {
        state.dispatch(command).unwrap();
    }

    let view = state.view();
    assert_eq!(view.total_list_size, 15);
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.page, 2);
    assert_eq!(view.items[0].get_str("name"), Some("app-19"));

    state.dispatch(QueryCommand::ClearFilter).unwrap();
    assert_eq!(state.total_list_size(), 30);
    assert_eq!(state.window().offset, 0);
}
