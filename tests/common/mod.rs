#![allow(dead_code)]

pub mod backend;

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use portfolio_admin::controller::{Confirm, Feedback, Notice, Notifier};
use portfolio_admin::dashboard::Dashboard;
use portfolio_admin::gateway::{AuthGateway, DataGateway, Gateways, RecordQuery, Session, StorageGateway};
use portfolio_admin::models::Record;
use portfolio_admin::types::{Collection, Operation, RecordId};
use portfolio_admin::{AdminError, AdminResult};

pub const ADMIN_ID: &str = "user-admin";
pub const ADMIN_ROLE: &str = "admin";

pub fn session(user_id: &str) -> Session {
    Session {
        user_id: user_id.to_string(),
        email: Some(format!("{}@example.com", user_id)),
        access_token: "token".to_string(),
        refresh_token: None,
        expires_at: None,
    }
}

/// Session and role table held in memory
#[derive(Default)]
pub struct MemoryAuth {
    session: Mutex<Option<Session>>,
    roles: Mutex<Vec<(String, String)>>,
    pub role_lookups: AtomicU64,
    pub sign_outs: AtomicU64,
}

impl MemoryAuth {
    pub fn sign_in(&self, session: Session) {
        *self.session.lock().unwrap() = Some(session);
    }

    pub fn grant(&self, user_id: &str, role: &str) {
        self.roles.lock().unwrap().push((user_id.to_string(), role.to_string()));
    }

    pub fn revoke(&self, user_id: &str, role: &str) {
        self.roles.lock().unwrap().retain(|(u, r)| !(u == user_id && r == role));
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.lock().unwrap().is_some()
    }
}

#[async_trait]
impl AuthGateway for MemoryAuth {
    async fn get_session(&self) -> AdminResult<Option<Session>> {
        Ok(self.session.lock().unwrap().clone())
    }

    async fn has_role(&self, user_id: &str, role: &str) -> AdminResult<bool> {
        self.role_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .any(|(u, r)| u == user_id && r == role))
    }

    async fn sign_out(&self) -> AdminResult<()> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        *self.session.lock().unwrap() = None;
        Ok(())
    }
}

/// Record store in memory, with per-operation failure injection and a call log
#[derive(Default)]
pub struct MemoryData {
    tables: Mutex<HashMap<Collection, Vec<Record>>>,
    next_id: AtomicU64,
    failing: Mutex<HashSet<(Collection, Operation)>>,
    calls: Mutex<Vec<(Collection, Operation)>>,
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or_default()
            .total_cmp(&y.as_f64().unwrap_or_default()),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (Some(_), None) => std::cmp::Ordering::Less,
        _ => std::cmp::Ordering::Equal,
    }
}

impl MemoryData {
    /// Store a row as-is; it must carry its own id
    pub fn seed(&self, collection: Collection, row: Value) {
        let record = Record::from_json(row).unwrap();
        self.tables.lock().unwrap().entry(collection).or_default().push(record);
    }

    pub fn rows(&self, collection: Collection) -> Vec<Record> {
        self.tables.lock().unwrap().get(&collection).cloned().unwrap_or_default()
    }

    pub fn ids(&self, collection: Collection) -> Vec<String> {
        self.rows(collection)
            .iter()
            .map(|r| r.id().unwrap().to_string())
            .collect()
    }

    pub fn fail(&self, collection: Collection, op: Operation) {
        self.failing.lock().unwrap().insert((collection, op));
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<(Collection, Operation)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, collection: Collection, op: Operation) -> usize {
        self.calls().iter().filter(|c| **c == (collection, op)).count()
    }

    fn record_call(&self, collection: Collection, op: Operation) -> AdminResult<()> {
        self.calls.lock().unwrap().push((collection, op));
        if !self.failing.lock().unwrap().contains(&(collection, op)) {
            return Ok(());
        }
        Err(match op {
            Operation::Select => AdminError::transient_fetch(collection, "service unavailable"),
            Operation::Create => AdminError::validation("rejected by schema"),
            Operation::Update | Operation::Delete => AdminError::not_found(collection.to_string()),
        })
    }
}

#[async_trait]
impl DataGateway for MemoryData {
    async fn list(&self, collection: Collection, query: &RecordQuery) -> AdminResult<Vec<Record>> {
        self.record_call(collection, Operation::Select)?;
        let mut rows: Vec<Record> = self
            .rows(collection)
            .into_iter()
            .filter(|row| query.filters.iter().all(|f| f.matches(row.get(&f.column))))
            .collect();
        rows.sort_by(|a, b| {
            query
                .order
                .iter()
                .map(|o| {
                    let ord = compare(a.get(&o.column), b.get(&o.column));
                    match o.sort {
                        portfolio_admin::gateway::SortDirection::Asc => ord,
                        portfolio_admin::gateway::SortDirection::Desc => ord.reverse(),
                    }
                })
                .find(|ord| ord.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn get_singleton(&self, collection: Collection) -> AdminResult<Option<Record>> {
        self.record_call(collection, Operation::Select)?;
        Ok(self.rows(collection).into_iter().min_by_key(|r| r.id().ok()))
    }

    async fn insert(&self, collection: Collection, mut record: Record) -> AdminResult<Record> {
        self.record_call(collection, Operation::Create)?;
        assert!(record.get("id").is_none(), "insert must not carry an id");
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        record.set("id", format!("{}-{}", collection, n));
        self.tables
            .lock()
            .unwrap()
            .entry(collection)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, collection: Collection, id: &RecordId, record: Record) -> AdminResult<()> {
        self.record_call(collection, Operation::Update)?;
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .entry(collection)
            .or_default()
            .iter_mut()
            .find(|row| row.id().ok().as_ref() == Some(id))
            .ok_or_else(|| AdminError::not_found(format!("{} {}", collection, id)))?;
        for (key, value) in record.into_map() {
            row.set(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &RecordId) -> AdminResult<()> {
        self.record_call(collection, Operation::Delete)?;
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(collection).or_default();
        let before = rows.len();
        rows.retain(|row| row.id().ok().as_ref() != Some(id));
        if rows.len() == before {
            return Err(AdminError::not_found(format!("{} {}", collection, id)));
        }
        Ok(())
    }
}

/// Object store that keeps uploaded names and sizes
#[derive(Default)]
pub struct MemoryStorage {
    uploads: Mutex<Vec<(String, usize)>>,
    failing: Mutex<bool>,
}

impl MemoryStorage {
    pub fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn fail(&self) {
        *self.failing.lock().unwrap() = true;
    }
}

#[async_trait]
impl StorageGateway for MemoryStorage {
    async fn upload(&self, namespace: &str, filename: &str, bytes: Vec<u8>) -> AdminResult<String> {
        if *self.failing.lock().unwrap() {
            return Err(AdminError::upload("bucket unavailable"));
        }
        let path = format!("{}/{}", namespace, filename);
        let mut uploads = self.uploads.lock().unwrap();
        assert!(uploads.iter().all(|(p, _)| *p != path), "upload overwrote {}", path);
        uploads.push((path.clone(), bytes.len()));
        Ok(path)
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://cdn.test/site-images/{}", path)
    }
}

/// Notifier that keeps every notice for assertions
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| n.is_error())
            .map(|n| n.description)
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| !n.is_error())
            .map(|n| n.description)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// Confirm double with a fixed answer
pub struct ScriptedConfirm {
    answer: Mutex<bool>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer: Mutex::new(answer),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn set(&self, answer: bool) {
        *self.answer.lock().unwrap() = answer;
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        *self.answer.lock().unwrap()
    }
}

/// Every double wired together
pub struct Harness {
    pub auth: Arc<MemoryAuth>,
    pub data: Arc<MemoryData>,
    pub storage: Arc<MemoryStorage>,
    pub notifier: Arc<RecordingNotifier>,
    pub confirm: Arc<ScriptedConfirm>,
}

impl Harness {
    /// Nobody signed in
    pub fn anonymous() -> Self {
        Self {
            auth: Arc::new(MemoryAuth::default()),
            data: Arc::new(MemoryData::default()),
            storage: Arc::new(MemoryStorage::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            confirm: Arc::new(ScriptedConfirm::answering(true)),
        }
    }

    /// Signed in with the admin role
    pub fn admin() -> Self {
        let harness = Self::anonymous();
        harness.auth.sign_in(session(ADMIN_ID));
        harness.auth.grant(ADMIN_ID, ADMIN_ROLE);
        harness
    }

    pub fn gateways(&self) -> Gateways {
        Gateways::new(self.auth.clone(), self.data.clone(), self.storage.clone())
    }

    pub fn feedback(&self) -> Feedback {
        Feedback::new(self.notifier.clone(), self.confirm.clone())
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.gateways(), self.feedback(), ADMIN_ROLE)
    }
}

pub fn project_row(id: &str, title: &str, order_index: i64) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{} description", title),
        "long_description": null,
        "image_url": null,
        "tech_stack": ["Rust"],
        "live_url": null,
        "github_url": null,
        "featured": false,
        "order_index": order_index,
        "created_at": "2024-01-01T00:00:00Z"
    })
}

pub fn skill_row(id: &str, name: &str, category: &str, order_index: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "category": category,
        "proficiency": 70,
        "order_index": order_index
    })
}
