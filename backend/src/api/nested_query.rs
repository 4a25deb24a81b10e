//! Bracket-notation query string parsing.
//!
//! Admin clients send deeply nested search arguments as flat query
//! strings, e.g.
//!
//! ```text
//! where[customer][payments][paymentType]=Cash&where[OR][0][quantity][gte]=2
//! ```
//!
//! This module rebuilds the nested structure as a `serde_json::Value`
//! tree. Numeric (or empty) bracket segments create arrays, everything
//! else creates objects. All leaf values stay strings; type coercion is
//! the composer's job.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("malformed query key: {0}")]
    MalformedKey(String),
    #[error("invalid percent-encoding in: {0}")]
    InvalidEncoding(String),
    #[error("conflicting values for query key: {0}")]
    Conflict(String),
    #[error("array index out of order in query key: {0}")]
    SparseIndex(String),
}

/// Parse a raw (still percent-encoded) query string into a JSON tree.
pub fn parse_query(raw: &str) -> Result<Value, ParseError> {
    let mut root = Value::Object(Map::new());

    for pair in raw.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode(key)?;
        let value = decode(value)?;

        let segments = split_key(&key)?;
        insert(&mut root, &key, &segments, Value::String(value))?;
    }

    Ok(root)
}

/// Percent-decode one component, treating '+' as space.
fn decode(component: &str) -> Result<String, ParseError> {
    let plus_decoded = component.replace('+', " ");
    urlencoding::decode(&plus_decoded)
        .map(|cow| cow.into_owned())
        .map_err(|_| ParseError::InvalidEncoding(component.to_string()))
}

/// Split `where[customer][payments]` into `["where", "customer", "payments"]`.
fn split_key(key: &str) -> Result<Vec<String>, ParseError> {
    let Some(open) = key.find('[') else {
        if key.is_empty() {
            return Err(ParseError::MalformedKey(key.to_string()));
        }
        return Ok(vec![key.to_string()]);
    };
    if open == 0 {
        return Err(ParseError::MalformedKey(key.to_string()));
    }

    let mut segments = vec![key[..open].to_string()];
    let mut rest = &key[open..];
    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return Err(ParseError::MalformedKey(key.to_string()));
        }
        let Some(close) = rest.find(']') else {
            return Err(ParseError::MalformedKey(key.to_string()));
        };
        segments.push(rest[1..close].to_string());
        rest = &rest[close + 1..];
    }

    Ok(segments)
}

/// A segment that is empty or all digits addresses an array slot.
fn is_array_segment(segment: &str) -> bool {
    segment.chars().all(|c| c.is_ascii_digit())
}

/// The container a path segment wants to live in.
fn new_container(segment: &str) -> Value {
    if is_array_segment(segment) {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

fn insert(
    target: &mut Value,
    key: &str,
    segments: &[String],
    value: Value,
) -> Result<(), ParseError> {
    let segment = &segments[0];
    let rest = &segments[1..];

    let entry = match target {
        Value::Object(map) => map.entry(segment.clone()).or_insert(Value::Null),
        Value::Array(arr) => {
            let index = if segment.is_empty() {
                arr.len()
            } else {
                segment
                    .parse::<usize>()
                    .map_err(|_| ParseError::Conflict(key.to_string()))?
            };
            if index > arr.len() {
                return Err(ParseError::SparseIndex(key.to_string()));
            }
            if index == arr.len() {
                arr.push(Value::Null);
            }
            &mut arr[index]
        }
        _ => return Err(ParseError::Conflict(key.to_string())),
    };

    if rest.is_empty() {
        if !entry.is_null() {
            return Err(ParseError::Conflict(key.to_string()));
        }
        *entry = value;
        return Ok(());
    }

    if entry.is_null() {
        *entry = new_container(&rest[0]);
    }
    insert(entry, key, rest, value)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn flat_keys_become_top_level_fields() {
        let parsed = parse_query("skip=0&take=10").unwrap();
        assert_eq!(parsed, json!({"skip": "0", "take": "10"}));
    }

    #[test]
    fn bracketed_keys_build_nested_objects() {
        let parsed =
            parse_query("where[customer][payments][paymentType]=Cash&where[quantity][gte]=2")
                .unwrap();
        assert_eq!(
            parsed,
            json!({
                "where": {
                    "customer": {"payments": {"paymentType": "Cash"}},
                    "quantity": {"gte": "2"},
                }
            })
        );
    }

    #[test]
    fn numeric_segments_build_arrays() {
        let parsed =
            parse_query("where[OR][0][quantity][gte]=2&where[OR][1][discount][gt]=0").unwrap();
        assert_eq!(
            parsed,
            json!({
                "where": {
                    "OR": [
                        {"quantity": {"gte": "2"}},
                        {"discount": {"gt": "0"}},
                    ]
                }
            })
        );
    }

    #[test]
    fn empty_segments_append_to_arrays() {
        let parsed = parse_query("where[id][in][]=a&where[id][in][]=b").unwrap();
        assert_eq!(parsed, json!({"where": {"id": {"in": ["a", "b"]}}}));
    }

    #[test]
    fn percent_encoding_and_plus_decode() {
        let parsed = parse_query("where[email][contains]=jane%40example.com&q=two+words").unwrap();
        assert_eq!(
            parsed,
            json!({
                "where": {"email": {"contains": "jane@example.com"}},
                "q": "two words",
            })
        );
    }

    #[test]
    fn duplicate_scalar_key_is_a_conflict() {
        assert_eq!(
            parse_query("take=1&take=2"),
            Err(ParseError::Conflict("take".to_string()))
        );
    }

    #[test]
    fn scalar_under_object_key_is_a_conflict() {
        assert_eq!(
            parse_query("where=x&where[id]=y"),
            Err(ParseError::Conflict("where[id]".to_string()))
        );
    }

    #[test]
    fn sparse_array_index_is_rejected() {
        assert_eq!(
            parse_query("where[OR][2][quantity]=1"),
            Err(ParseError::SparseIndex("where[OR][2][quantity]".to_string()))
        );
    }

    #[test]
    fn unbalanced_brackets_are_rejected() {
        assert_matches!(
            parse_query("where[customer=1"),
            Err(ParseError::MalformedKey(_))
        );
        assert_matches!(parse_query("[customer]=1"), Err(ParseError::MalformedKey(_)));
    }
}
