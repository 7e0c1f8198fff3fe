use async_trait::async_trait;
use reqwest::Response;
use serde_json::Value;
use std::sync::Arc;

use super::{status_error, RestBackend};
use crate::error::{AdminError, AdminResult};
use crate::gateway::{DataGateway, OrderBy, RecordQuery};
use crate::models::Record;
use crate::types::{Collection, Operation, RecordId};

/// Record store over `/rest/v1/{collection}`
pub struct RestDataGateway {
    backend: Arc<RestBackend>,
}

impl RestDataGateway {
    pub fn new(backend: Arc<RestBackend>) -> Self {
        Self { backend }
    }

    fn collection_url(&self, collection: Collection) -> String {
        self.backend.endpoint(&format!("rest/v1/{}", collection.as_str()))
    }

    /// Query string pairs: select, row filters, order, limit
    fn query_pairs(query: &RecordQuery) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        pairs.extend(query.filters.iter().map(|f| f.to_query_pair()));
        if let Some(order) = OrderBy::to_query(&query.order) {
            pairs.push(("order".to_string(), order));
        }
        if let Some(limit) = query.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    fn id_filter(id: &RecordId) -> [(String, String); 1] {
        [("id".to_string(), format!("eq.{}", id))]
    }

    /// Read a successful response as an array of rows, or map the failure
    async fn rows(response: Response, collection: Collection, op: Operation) -> AdminResult<Vec<Record>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, collection, op));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AdminError::transient_fetch(collection, format!("invalid response body: {}", e)))?;
        Record::from_json_array(body).map_err(|e| AdminError::malformed(collection, e))
    }

    fn network_error(collection: Collection, op: Operation, err: reqwest::Error) -> AdminError {
        tracing::error!("{} {} request failed: {}", op.as_str(), collection, err);
        AdminError::transient_fetch(collection, err.to_string())
    }
}

#[async_trait]
impl DataGateway for RestDataGateway {
    async fn list(&self, collection: Collection, query: &RecordQuery) -> AdminResult<Vec<Record>> {
        let url = self.collection_url(collection);
        self.backend.trace("GET", &url);

        let request = self.backend.http().get(&url).query(&Self::query_pairs(query));
        let response = self
            .backend
            .authorize(request)
            .await
            .send()
            .await
            .map_err(|e| Self::network_error(collection, Operation::Select, e))?;

        let rows = Self::rows(response, collection, Operation::Select).await?;
        tracing::debug!("Fetched {} rows from {}", rows.len(), collection);
        Ok(rows)
    }

    async fn get_singleton(&self, collection: Collection) -> AdminResult<Option<Record>> {
        // Ask for two rows so a violated singleton shows up in the logs; the
        // order keeps "first" stable across calls
        let query = RecordQuery::ordered(vec![OrderBy::asc("id")]).limit(2);
        let rows = self.list(collection, &query).await?;
        if rows.len() > 1 {
            tracing::warn!("{} holds more than one row; using the first", collection);
        }
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, collection: Collection, record: Record) -> AdminResult<Record> {
        let url = self.collection_url(collection);
        self.backend.trace("POST", &url);

        let request = self
            .backend
            .http()
            .post(&url)
            .header("Prefer", "return=representation")
            .json(&Value::Array(vec![record.into()]));
        let response = self
            .backend
            .authorize(request)
            .await
            .send()
            .await
            .map_err(|e| Self::network_error(collection, Operation::Create, e))?;

        let stored = Self::rows(response, collection, Operation::Create)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AdminError::validation(format!("{} insert returned no row", collection)))?;
        tracing::info!("Inserted {} row {}", collection, stored.id().map(|id| id.to_string()).unwrap_or_default());
        Ok(stored)
    }

    async fn update(&self, collection: Collection, id: &RecordId, record: Record) -> AdminResult<()> {
        let url = self.collection_url(collection);
        self.backend.trace("PATCH", &url);

        let request = self
            .backend
            .http()
            .patch(&url)
            .query(&Self::id_filter(id))
            .header("Prefer", "return=representation")
            .json(&Value::from(record));
        let response = self
            .backend
            .authorize(request)
            .await
            .send()
            .await
            .map_err(|e| Self::network_error(collection, Operation::Update, e))?;

        // A filter that matched nothing comes back as an empty array
        if Self::rows(response, collection, Operation::Update).await?.is_empty() {
            return Err(AdminError::not_found(format!("{} {}", collection, id)));
        }
        tracing::info!("Updated {} row {}", collection, id);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &RecordId) -> AdminResult<()> {
        let url = self.collection_url(collection);
        self.backend.trace("DELETE", &url);

        let request = self
            .backend
            .http()
            .delete(&url)
            .query(&Self::id_filter(id))
            .header("Prefer", "return=representation");
        let response = self
            .backend
            .authorize(request)
            .await
            .send()
            .await
            .map_err(|e| Self::network_error(collection, Operation::Delete, e))?;

        if Self::rows(response, collection, Operation::Delete).await?.is_empty() {
            return Err(AdminError::not_found(format!("{} {}", collection, id)));
        }
        tracing::info!("Deleted {} row {}", collection, id);
        Ok(())
    }
}
