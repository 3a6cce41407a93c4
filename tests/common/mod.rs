#![allow(dead_code)]

use console_list_query::filter::AttributeSet;
use console_list_query::query::{QueryOptions, QueryState};
use console_list_query::Record;
use serde_json::{json, Value};

/// Certificate truststore as returned by the keystore list endpoint
pub fn certificates() -> Vec<Record> {
    Record::collection_from_json(json!([
        {"alias": "wso2carbon", "issuerDN": "CN=localhost", "validity": 365},
        {"alias": "test-cert", "issuerDN": "CN=Acme", "validity": 30},
        {"alias": "prod-cert", "issuerDN": "CN=Acme", "validity": 730},
        {"alias": "Test-Root", "issuerDN": "CN=Root", "validity": 3650},
        {"alias": "gateway", "issuerDN": null},
        {"alias": "idp-signing", "issuerDN": "CN=Acme", "validity": 30}
    ]))
    .expect("fixture is a valid collection")
}

/// `count` applications named app-00, app-01, ... with alternating protocols
pub fn applications(count: usize) -> Vec<Record> {
    let items: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("{:04}", i),
                "name": format!("app-{:02}", i),
                "protocol": if i % 2 == 0 { "oidc" } else { "saml" },
                "tags": if i % 3 == 0 { json!(["social"]) } else { json!(["enterprise"]) }
            })
        })
        .collect();
    Record::collection_from_json(Value::Array(items)).expect("generated collection")
}

pub fn certificate_state() -> QueryState {
    QueryState::new(
        certificates(),
        QueryOptions::new(AttributeSet::of(["alias", "issuerDN"]), AttributeSet::of(["alias", "validity"])),
    )
}

pub fn field(records: &[&Record], name: &str) -> Vec<Value> {
    records.iter().map(|r| r.get(name).cloned().unwrap_or(Value::Null)).collect()
}
