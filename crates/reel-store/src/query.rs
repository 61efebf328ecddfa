//! List queries: equality filters, ordering and limits.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::{Document, DocumentList};

/// A single list query clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Attribute equals any of the values.
    Equal { attribute: String, values: Vec<Value> },
    /// Ascending order by attribute.
    OrderAsc(String),
    /// Descending order by attribute.
    OrderDesc(String),
    /// Return at most this many documents.
    Limit(usize),
}

#[derive(Serialize)]
struct WireQuery<'a> {
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    values: Vec<Value>,
}

impl Query {
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Equal {
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    pub fn order_asc(attribute: impl Into<String>) -> Self {
        Query::OrderAsc(attribute.into())
    }

    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Query::OrderDesc(attribute.into())
    }

    pub fn limit(limit: usize) -> Self {
        Query::Limit(limit)
    }

    /// JSON form sent as a `queries[]` parameter.
    pub fn to_wire(&self) -> String {
        let wire = match self {
            Query::Equal { attribute, values } => WireQuery {
                method: "equal",
                attribute: Some(attribute),
                values: values.clone(),
            },
            Query::OrderAsc(attribute) => WireQuery {
                method: "orderAsc",
                attribute: Some(attribute),
                values: Vec::new(),
            },
            Query::OrderDesc(attribute) => WireQuery {
                method: "orderDesc",
                attribute: Some(attribute),
                values: Vec::new(),
            },
            Query::Limit(limit) => WireQuery {
                method: "limit",
                attribute: None,
                values: vec![Value::from(*limit as u64)],
            },
        };
        // A struct of strings and JSON values always serializes.
        serde_json::to_string(&wire).unwrap_or_default()
    }
}

/// Evaluate queries locally against a set of documents, in insertion order.
pub(crate) fn evaluate<'a>(
    queries: &[Query],
    documents: impl Iterator<Item = &'a Document>,
) -> DocumentList {
    let mut matched: Vec<&Document> = documents
        .filter(|doc| {
            queries.iter().all(|q| match q {
                Query::Equal { attribute, values } => doc
                    .get(attribute)
                    .map(|v| values.iter().any(|want| values_equal(v, want)))
                    .unwrap_or(false),
                _ => true,
            })
        })
        .collect();

    let total = matched.len() as u64;

    let orders: Vec<(&str, bool)> = queries
        .iter()
        .filter_map(|q| match q {
            Query::OrderAsc(a) => Some((a.as_str(), false)),
            Query::OrderDesc(a) => Some((a.as_str(), true)),
            _ => None,
        })
        .collect();

    if !orders.is_empty() {
        matched.sort_by(|a, b| {
            for (attribute, descending) in &orders {
                let ord = compare_values(a.get(attribute), b.get(attribute));
                let ord = if *descending { ord.reverse() } else { ord };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }

    let limit = queries
        .iter()
        .filter_map(|q| match q {
            Query::Limit(n) => Some(*n),
            _ => None,
        })
        .min();
    if let Some(limit) = limit {
        matched.truncate(limit);
    }

    DocumentList {
        total,
        documents: matched.into_iter().cloned().collect(),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn type_rank(v: Option<&Value>) -> u8 {
    match v {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(_) => 4,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, term: &str, count: i64) -> Document {
        serde_json::from_value(json!({"$id": id, "searchTerm": term, "count": count})).unwrap()
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(
            Query::equal("searchTerm", "batman").to_wire(),
            r#"{"method":"equal","attribute":"searchTerm","values":["batman"]}"#
        );
        assert_eq!(
            Query::order_desc("count").to_wire(),
            r#"{"method":"orderDesc","attribute":"count"}"#
        );
        assert_eq!(Query::limit(5).to_wire(), r#"{"method":"limit","values":[5]}"#);
    }

    #[test]
    fn test_equal_filter_is_exact() {
        let docs = vec![doc("1", "batman", 1), doc("2", "Batman", 4), doc("3", "batman ", 2)];
        let list = evaluate(&[Query::equal("searchTerm", "batman")], docs.iter());
        assert_eq!(list.total, 1);
        assert_eq!(list.documents[0].id, "1");
    }

    #[test]
    fn test_order_desc_with_limit() {
        let docs: Vec<Document> = (0..8).map(|i| doc(&i.to_string(), "t", (i * 7) % 5)).collect();
        let list = evaluate(&[Query::order_desc("count"), Query::limit(5)], docs.iter());

        assert_eq!(list.total, 8);
        assert_eq!(list.documents.len(), 5);
        let counts: Vec<i64> = list
            .documents
            .iter()
            .map(|d| d.get("count").and_then(Value::as_i64).unwrap())
            .collect();
        let mut sorted = counts.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(counts, sorted);
    }

    #[test]
    fn test_numeric_equality_across_representations() {
        let docs = vec![doc("1", "t", 2)];
        let list = evaluate(&[Query::equal("count", 2.0)], docs.iter());
        assert_eq!(list.total, 1);
    }

    #[test]
    fn test_missing_attribute_sorts_last_descending() {
        let with: Document = doc("a", "t", 1);
        let without: Document = serde_json::from_value(json!({"$id": "b"})).unwrap();
        let docs = vec![without, with];
        let list = evaluate(&[Query::order_desc("count")], docs.iter());
        assert_eq!(list.documents[0].id, "a");
    }
}
