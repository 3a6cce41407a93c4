use anyhow::Context;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

use crate::filter::AttributeSet;
use crate::record::Record;

/// Read a collection from a JSON or YAML file, or from stdin when `path` is `-`
pub fn load_collection(path: &str) -> anyhow::Result<Vec<Record>> {
    let (content, is_yaml) = if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
        (buf, false)
    } else {
        let content = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
        (content, has_yaml_extension(path))
    };

    let value = parse_document(&content, is_yaml)?;
    Ok(Record::collection_from_json(unwrap_list_payload(value))?)
}

/// Parse a JSON or YAML document into a JSON value
pub fn parse_document(content: &str, is_yaml: bool) -> anyhow::Result<Value> {
    if is_yaml {
        serde_yaml::from_str(content).context("invalid YAML document")
    } else {
        serde_json::from_str(content).context("invalid JSON document")
    }
}

/// Load a JSON or YAML file into a typed value
pub fn load_document<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
    let value = parse_document(&content, has_yaml_extension(path))?;
    serde_json::from_value(value).with_context(|| format!("unexpected document shape in {}", path))
}

fn has_yaml_extension(path: &str) -> bool {
    matches!(
        Path::new(path).extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

// List endpoints wrap results as { "totalResults": n, "Resources": [...] } or { "list": [...] }
fn unwrap_list_payload(value: Value) -> Value {
    match value {
        Value::Object(mut obj) => {
            for key in ["Resources", "list", "items", "data"] {
                if let Some(items @ Value::Array(_)) = obj.remove(key) {
                    return items;
                }
            }
            Value::Object(obj)
        }
        other => other,
    }
}

/// Comma-separated attribute list from the command line; empty means any attribute
pub fn attribute_set(names: &[String]) -> AttributeSet {
    if names.is_empty() {
        AttributeSet::any()
    } else {
        AttributeSet::of(names.iter().map(|n| n.trim().to_string()))
    }
}
