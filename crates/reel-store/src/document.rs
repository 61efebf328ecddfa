//! Schemaless documents.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::StoreError;

/// A stored document: system attributes plus free-form data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable unique identifier, usable as a list rendering key.
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "$updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// User attributes (and any other system fields the store returns).
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Document {
    /// Look up a single attribute.
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.data.get(attribute)
    }

    /// Decode the whole document, `$id` included, into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let value = serde_json::to_value(self)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Identifier to use when creating a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentId {
    /// Let the store generate one.
    Unique,
    /// Use this exact id.
    Custom(String),
}

impl DocumentId {
    /// Wire form understood by the store (`unique()` asks for a generated id).
    pub fn as_wire(&self) -> &str {
        match self {
            DocumentId::Unique => "unique()",
            DocumentId::Custom(id) => id,
        }
    }

    /// Generate a 20-character hex id, the shape the hosted store produces.
    pub fn generate() -> String {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        let millis = chrono::Utc::now().timestamp_millis() as u64;
        let tail: u32 = rng.gen_range(0..0x1000_0000);
        format!("{:013x}{:07x}", millis & 0xf_ffff_ffff_ffff, tail)
    }
}

/// A page of documents returned by a list query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentList {
    /// Number of documents matching the filters, before limit.
    pub total: u64,
    pub documents: Vec<Document>,
}

impl DocumentList {
    /// Decode every document into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Vec<T>, StoreError> {
        self.documents.iter().map(Document::decode).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_wire_shape() {
        let doc: Document = serde_json::from_value(json!({
            "$id": "abc",
            "$createdAt": "2024-01-01T00:00:00.000+00:00",
            "$collectionId": "metrics",
            "searchTerm": "batman",
            "count": 3
        }))
        .unwrap();

        assert_eq!(doc.id, "abc");
        assert_eq!(doc.get("count"), Some(&json!(3)));
        assert_eq!(doc.get("$collectionId"), Some(&json!("metrics")));
        assert!(doc.updated_at.is_none());
    }

    #[test]
    fn test_document_decode_includes_id() {
        #[derive(Deserialize)]
        struct Counter {
            #[serde(rename = "$id")]
            id: String,
            count: i64,
        }

        let doc: Document =
            serde_json::from_value(json!({"$id": "x1", "count": 7, "extra": true})).unwrap();
        let counter: Counter = doc.decode().unwrap();
        assert_eq!(counter.id, "x1");
        assert_eq!(counter.count, 7);
    }

    #[test]
    fn test_generated_ids_are_twenty_hex_chars() {
        let a = DocumentId::generate();
        assert_eq!(a.len(), 20);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(DocumentId::Unique.as_wire(), "unique()");
        assert_eq!(DocumentId::Custom("k".into()).as_wire(), "k");
    }
}
