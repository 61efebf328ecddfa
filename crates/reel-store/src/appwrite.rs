//! Hosted document store over the Appwrite databases REST API.

use async_trait::async_trait;
use reel_data::FetchClient;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Document, DocumentId, DocumentList, DocumentStore, Query, StoreError};

/// Connection parameters for a hosted store.
#[derive(Debug, Clone)]
pub struct AppwriteConfig {
    /// API endpoint, e.g. `https://cloud.appwrite.io/v1`.
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    /// Server API key. Browser-style sessions work without one.
    pub api_key: Option<String>,
}

/// [`DocumentStore`] backed by an Appwrite project.
#[derive(Debug, Clone)]
pub struct AppwriteStore {
    client: FetchClient,
    database_id: String,
}

#[derive(Serialize)]
struct CreateBody<'a> {
    #[serde(rename = "documentId")]
    document_id: &'a str,
    data: &'a Map<String, Value>,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    data: &'a Map<String, Value>,
}

impl AppwriteStore {
    /// Create a store using the default HTTP transport.
    pub fn new(config: AppwriteConfig) -> Self {
        Self::with_client(FetchClient::new(), config)
    }

    /// Create a store on top of an existing client (custom transport, timeouts).
    pub fn with_client(client: FetchClient, config: AppwriteConfig) -> Self {
        let mut client = client
            .with_base_url(config.endpoint)
            .with_default_header("X-Appwrite-Project", config.project_id)
            .with_default_header("Accept", "application/json");
        if let Some(key) = config.api_key {
            client = client.with_default_header("X-Appwrite-Key", key);
        }

        Self {
            client,
            database_id: config.database_id,
        }
    }

    fn documents_path(&self, collection: &str) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            self.database_id, collection
        )
    }
}

#[async_trait]
impl DocumentStore for AppwriteStore {
    async fn list_documents(
        &self,
        collection: &str,
        queries: &[Query],
    ) -> Result<DocumentList, StoreError> {
        let mut request = self.client.get(self.documents_path(collection));
        for query in queries {
            request = request.query("queries[]", query.to_wire());
        }

        let list: DocumentList = request.send().await?.error_for_status()?.json()?;
        tracing::debug!(collection, total = list.total, "listed documents");
        Ok(list)
    }

    async fn create_document(
        &self,
        collection: &str,
        id: DocumentId,
        data: Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let body = CreateBody {
            document_id: id.as_wire(),
            data: &data,
        };

        let response = self
            .client
            .post(self.documents_path(collection))
            .json(&body)?
            .send()
            .await?;

        if response.status == 409 {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                id: id.as_wire().to_string(),
            });
        }

        Ok(response.error_for_status()?.json()?)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, StoreError> {
        let response = self
            .client
            .patch(format!("{}/{}", self.documents_path(collection), id))
            .json(&UpdateBody { data: &data })?
            .send()
            .await?;

        if response.status == 404 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        Ok(response.error_for_status()?.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_data::testing::{MockRoute, MockTransport};
    use reel_data::Method;
    use serde_json::json;
    use std::sync::Arc;

    fn store(transport: Arc<MockTransport>, api_key: Option<&str>) -> AppwriteStore {
        AppwriteStore::with_client(
            FetchClient::with_transport(transport),
            AppwriteConfig {
                endpoint: "https://cloud.example.io/v1".into(),
                project_id: "proj".into(),
                database_id: "db".into(),
                api_key: api_key.map(String::from),
            },
        )
    }

    #[tokio::test]
    async fn test_list_sends_queries_and_project_header() {
        let transport = MockTransport::new();
        transport.route(MockRoute::get("/databases/db/collections/metrics/documents").json(
            200,
            json!({"total": 1, "documents": [{"$id": "a1", "searchTerm": "dune", "count": 2}]}),
        ));

        let list = store(transport.clone(), None)
            .list_documents("metrics", &[Query::order_desc("count"), Query::limit(5)])
            .await
            .unwrap();
        assert_eq!(list.total, 1);
        assert_eq!(list.documents[0].id, "a1");

        let sent = &transport.requests()[0];
        assert_eq!(sent.header("X-Appwrite-Project"), Some("proj"));
        assert_eq!(sent.header("X-Appwrite-Key"), None);
        let queries: Vec<String> = sent
            .url
            .query_pairs()
            .filter(|(k, _)| k == "queries[]")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(
            queries,
            vec![
                r#"{"method":"orderDesc","attribute":"count"}"#.to_string(),
                r#"{"method":"limit","values":[5]}"#.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_body_shape() {
        let transport = MockTransport::new();
        transport.route(
            MockRoute::post("/collections/metrics/documents")
                .json(201, json!({"$id": "new1", "searchTerm": "dune", "count": 1})),
        );

        let mut data = Map::new();
        data.insert("searchTerm".into(), json!("dune"));
        data.insert("count".into(), json!(1));

        let doc = store(transport.clone(), Some("secret"))
            .create_document("metrics", DocumentId::Unique, data)
            .await
            .unwrap();
        assert_eq!(doc.id, "new1");

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.header("X-Appwrite-Key"), Some("secret"));
        assert_eq!(
            sent.json_body(),
            Some(json!({"documentId": "unique()", "data": {"searchTerm": "dune", "count": 1}}))
        );
    }

    #[tokio::test]
    async fn test_update_targets_document_path() {
        let transport = MockTransport::new();
        transport.route(
            MockRoute::patch("/collections/metrics/documents/a1")
                .json(200, json!({"$id": "a1", "count": 3})),
        );

        let mut data = Map::new();
        data.insert("count".into(), json!(3));
        let doc = store(transport.clone(), None)
            .update_document("metrics", "a1", data)
            .await
            .unwrap();

        assert_eq!(doc.get("count"), Some(&json!(3)));
        assert_eq!(transport.requests()[0].json_body(), Some(json!({"data": {"count": 3}})));
    }

    #[tokio::test]
    async fn test_update_missing_maps_to_not_found() {
        let transport = MockTransport::new();
        transport.route(
            MockRoute::patch("/documents/ghost").json(404, json!({"message": "Document not found"})),
        );

        let err = store(transport, None)
            .update_document("metrics", "ghost", Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_server_error_surfaces_as_request_error() {
        let transport = MockTransport::new();
        transport.route(MockRoute::get("/documents").json(500, json!({"message": "boom"})));

        let err = store(transport, None)
            .list_documents("metrics", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Request(_)));
    }
}
