use serde_json::Value;
use std::cmp::Ordering;

use super::error::FilterError;
use super::types::{SortDirection, SortSpec};
use crate::record::Record;

pub struct FilterOrder;

impl FilterOrder {
    pub fn validate_and_parse(order: &Value) -> Result<Vec<SortSpec>, FilterError> {
        match order {
            Value::Null => Ok(vec![]),
            Value::String(s) => Self::parse_order_string(s),
            Value::Array(arr) => {
                // Expect array of strings like ["alias desc", "issuer asc"]
                let mut out = Vec::new();
                for v in arr {
                    match v {
                        Value::String(s) => out.extend(Self::parse_order_string(s)?),
                        other => return Err(FilterError::InvalidOrder(format!("expected string, found {}", other))),
                    }
                }
                Ok(out)
            }
            Value::Object(obj) => {
                // { "alias": "desc", "issuer": "asc" }
                let mut out = Vec::new();
                for (k, v) in obj {
                    let direction = match v {
                        Value::String(s) => Self::parse_direction(s)?,
                        Value::Null => SortDirection::Asc,
                        other => {
                            return Err(FilterError::InvalidOrder(format!("direction for '{}' must be a string, found {}", k, other)))
                        }
                    };
                    out.push(SortSpec { attribute: k.clone(), direction });
                }
                Ok(out)
            }
            other => Err(FilterError::InvalidOrder(format!("unsupported order format: {}", other))),
        }
    }

    pub fn parse_order_string(s: &str) -> Result<Vec<SortSpec>, FilterError> {
        // split on commas, then each token into attribute and direction
        let mut out = Vec::new();
        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() { continue; }
            let mut it = trimmed.split_whitespace();
            if let Some(attribute) = it.next() {
                let direction = Self::parse_direction(it.next().unwrap_or("asc"))?;
                if let Some(extra) = it.next() {
                    return Err(FilterError::InvalidOrder(format!("unexpected '{}' in '{}'", extra, trimmed)));
                }
                out.push(SortSpec { attribute: attribute.to_string(), direction });
            }
        }
        Ok(out)
    }

    fn parse_direction(token: &str) -> Result<SortDirection, FilterError> {
        match token.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(FilterError::InvalidOrder(format!("unknown direction '{}'", other))),
        }
    }

    /// Compare two records under a list of sort keys, primary key first
    pub fn compare(a: &Record, b: &Record, specs: &[SortSpec]) -> Ordering {
        specs
            .iter()
            .map(|spec| compare_field(a.get(&spec.attribute), b.get(&spec.attribute), spec.direction))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

/// Stable in-place sort of record references
pub fn sort_records(records: &mut [&Record], specs: &[SortSpec]) {
    if specs.is_empty() { return; }
    records.sort_by(|a, b| FilterOrder::compare(a, b, specs));
}

/// Stable in-place sort of positions into `records`
pub(crate) fn sort_indices(indices: &mut [usize], records: &[Record], specs: &[SortSpec]) {
    if specs.is_empty() { return; }
    indices.sort_by(|&a, &b| FilterOrder::compare(&records[a], &records[b], specs));
}

fn compare_field(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        // Missing values trail in both directions
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = compare_values(a, b);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        Value::Bool(_) => 2,
        _ => 3,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (x, y) if type_rank(x) == type_rank(y) => x.to_string().cmp(&y.to_string()),
        (x, y) => type_rank(x).cmp(&type_rank(y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: Value) -> Vec<Record> {
        Record::collection_from_json(values).unwrap()
    }

    fn field(sorted: &[&Record], name: &str) -> Vec<Value> {
        sorted.iter().map(|r| r.get(name).cloned().unwrap_or(Value::Null)).collect()
    }

    #[test]
    fn test_parse_order_formats() {
        let specs = FilterOrder::validate_and_parse(&json!("alias desc, issuer")).unwrap();
        assert_eq!(specs, vec![SortSpec::desc("alias"), SortSpec::asc("issuer")]);

        let specs = FilterOrder::validate_and_parse(&json!(["alias ASC"])).unwrap();
        assert_eq!(specs, vec![SortSpec::asc("alias")]);

        let specs = FilterOrder::validate_and_parse(&json!({"alias": "desc"})).unwrap();
        assert_eq!(specs, vec![SortSpec::desc("alias")]);
    }

    #[test]
    fn test_parse_order_rejects_garbage() {
        assert!(FilterOrder::validate_and_parse(&json!("alias sideways")).is_err());
        assert!(FilterOrder::validate_and_parse(&json!(42)).is_err());
        assert!(FilterOrder::validate_and_parse(&json!("alias asc extra")).is_err());
        assert!(matches!(
            FilterOrder::validate_and_parse(&json!({"alias": 5})),
            Err(FilterError::InvalidOrder(_))
        ));
        assert!(FilterOrder::validate_and_parse(&json!({"alias": ["desc"]})).is_err());
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let data = records(json!([{"alias": "Charlie"}, {"alias": "alpha"}, {"alias": "Bravo"}]));
        let mut refs: Vec<&Record> = data.iter().collect();
        sort_records(&mut refs, &[SortSpec::asc("alias")]);
        assert_eq!(field(&refs, "alias"), vec![json!("alpha"), json!("Bravo"), json!("Charlie")]);
    }

    #[test]
    fn test_numbers_sort_numerically() {
        let data = records(json!([{"n": 10}, {"n": 9}, {"n": 100}]));
        let mut refs: Vec<&Record> = data.iter().collect();
        sort_records(&mut refs, &[SortSpec::desc("n")]);
        assert_eq!(field(&refs, "n"), vec![json!(100), json!(10), json!(9)]);
    }

    #[test]
    fn test_missing_fields_sort_last_both_directions() {
        let data = records(json!([{"id": 1}, {"id": 2, "name": "b"}, {"id": 3, "name": null}, {"id": 4, "name": "a"}]));
        for spec in [SortSpec::asc("name"), SortSpec::desc("name")] {
            let mut refs: Vec<&Record> = data.iter().collect();
            sort_records(&mut refs, &[spec]);
            assert_eq!(field(&refs, "id")[2..], [json!(1), json!(3)]);
        }
    }

    #[test]
    fn test_mixed_types_rank() {
        let data = records(json!([{"v": true}, {"v": "x"}, {"v": 5}]));
        let mut refs: Vec<&Record> = data.iter().collect();
        sort_records(&mut refs, &[SortSpec::asc("v")]);
        assert_eq!(field(&refs, "v"), vec![json!(5), json!("x"), json!(true)]);
    }

    #[test]
    fn test_secondary_key_breaks_ties() {
        let data = records(json!([
            {"type": "b", "name": "z"},
            {"type": "a", "name": "y"},
            {"type": "b", "name": "x"}
        ]));
        let mut refs: Vec<&Record> = data.iter().collect();
        sort_records(&mut refs, &[SortSpec::asc("type"), SortSpec::asc("name")]);
        assert_eq!(field(&refs, "name"), vec![json!("y"), json!("x"), json!("z")]);
    }

    #[test]
    fn test_absent_attribute_is_noop() {
        let data = records(json!([{"a": 3}, {"a": 1}, {"a": 2}]));
        let mut refs: Vec<&Record> = data.iter().collect();
        sort_records(&mut refs, &[SortSpec::desc("nope")]);
        assert_eq!(field(&refs, "a"), vec![json!(3), json!(1), json!(2)]);
    }
}
