//! Gateway contracts for the three remote capabilities the admin core consumes:
//! sessions and roles, structured records, and binary object storage.
//!
//! Rows cross the data gateway as untyped [`Record`]s; typed decoding happens
//! in the entity layer so malformed rows are rejected on ingest.

pub mod filter;
pub mod rest;
pub mod session;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::AdminResult;
use crate::models::Record;
use crate::types::{Collection, RecordId};

pub use filter::{EqFilter, OrderBy, RecordQuery, SortDirection};
pub use session::{Session, SessionStore};

/// Session retrieval, sign-out and role lookup
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Current session, or `None` when nobody is signed in
    async fn get_session(&self) -> AdminResult<Option<Session>>;

    /// Whether a role assignment exists for (user id, role name)
    async fn has_role(&self, user_id: &str, role: &str) -> AdminResult<bool>;

    /// Invalidate the current session
    async fn sign_out(&self) -> AdminResult<()>;
}

/// Per-collection record store
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Ordered rows; an empty result is not an error
    async fn list(&self, collection: Collection, query: &RecordQuery) -> AdminResult<Vec<Record>>;

    /// The single row of a singleton collection; no rows reads as `None`
    async fn get_singleton(&self, collection: Collection) -> AdminResult<Option<Record>>;

    /// Insert a row without an id and return it as stored
    async fn insert(&self, collection: Collection, record: Record) -> AdminResult<Record>;

    /// Overwrite the given fields of an existing row
    async fn update(&self, collection: Collection, id: &RecordId, record: Record) -> AdminResult<()>;

    /// Delete an existing row; a missing id is an error
    async fn delete(&self, collection: Collection, id: &RecordId) -> AdminResult<()>;
}

/// Binary object storage for images
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Store bytes at `namespace/filename` and return the stored path.
    /// Callers make filenames unique; the gateway never overwrites.
    async fn upload(&self, namespace: &str, filename: &str, bytes: Vec<u8>) -> AdminResult<String>;

    /// Public URL for a stored path
    fn public_url(&self, path: &str) -> String;
}

/// The gateway set handed to the dashboard and its controllers
#[derive(Clone)]
pub struct Gateways {
    pub auth: Arc<dyn AuthGateway>,
    pub data: Arc<dyn DataGateway>,
    pub storage: Arc<dyn StorageGateway>,
}

impl Gateways {
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        data: Arc<dyn DataGateway>,
        storage: Arc<dyn StorageGateway>,
    ) -> Self {
        Self { auth, data, storage }
    }
}
