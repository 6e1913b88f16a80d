//! Fixture-backed gateway holding JSON payloads in memory.
//!
//! Collections are registered as routes: a list path that GET returns and an
//! item prefix that POST appends to and that PUT/DELETE address by key. The
//! offline CLI mode seeds it from a fixture file; tests use it to simulate the
//! server side of a mutation followed by a re-fetch.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Semaphore;

use crate::gateway::errors::{GatewayError, GatewayResult};
use crate::gateway::{GatewayReader, GatewayWriter, QueryPairs};
use crate::resource::encode_segment;

/// Maps a list endpoint to the item endpoints that mutate it.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRoute {
    pub list_path: String,
    pub item_prefix: String,
    /// JSON field identifying an item in the last path segment.
    pub key: String,
}

impl CollectionRoute {
    pub fn new(list_path: &str, item_prefix: &str, key: &str) -> Self {
        Self {
            list_path: list_path.to_string(),
            item_prefix: item_prefix.to_string(),
            key: key.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallMethod {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub method: CallMethod,
    pub path: String,
    pub body: Option<Value>,
}

/// On-disk fixture format for [`InMemoryGateway::from_fixture_file`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fixture {
    pub payloads: HashMap<String, Value>,
    pub routes: Vec<CollectionRoute>,
}

#[derive(Default)]
struct State {
    payloads: HashMap<String, Value>,
    routes: Vec<CollectionRoute>,
    failures: HashMap<String, Vec<GatewayError>>,
    calls: Vec<RecordedCall>,
}

#[derive(Default)]
pub struct InMemoryGateway {
    state: Mutex<State>,
    read_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes of the back-office API, keyed the way the endpoints address items.
    pub fn with_default_routes() -> Self {
        let gateway = Self::new();
        for route in default_routes() {
            gateway.add_route(route);
        }
        gateway
    }

    pub fn from_fixture(fixture: Fixture) -> Self {
        let gateway = Self::new();
        let routes = if fixture.routes.is_empty() {
            default_routes()
        } else {
            fixture.routes
        };
        for route in routes {
            gateway.add_route(route);
        }
        for (path, payload) in fixture.payloads {
            gateway.seed(&path, payload);
        }
        gateway
    }

    pub fn from_fixture_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let raw = fs::read_to_string(path)?;
        let fixture: Fixture = serde_json::from_str(&raw).map_err(std::io::Error::other)?;
        Ok(Self::from_fixture(fixture))
    }

    pub fn add_route(&self, route: CollectionRoute) {
        self.lock().routes.push(route);
    }

    /// Stores the payload returned by GET on `path` (query string included).
    pub fn seed(&self, path: &str, payload: Value) {
        self.lock().payloads.insert(path.to_string(), payload);
    }

    /// Makes the next call on `path` fail with `err`.
    pub fn fail_next(&self, path: &str, err: GatewayError) {
        self.lock()
            .failures
            .entry(path.to_string())
            .or_default()
            .push(err);
    }

    /// Blocks every subsequent GET until [`release_reads`](Self::release_reads).
    pub fn hold_reads(&self) {
        *self.read_gate.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_reads(&self, count: usize) {
        if let Some(gate) = self
            .read_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            gate.add_permits(count);
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn write_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.method != CallMethod::Get)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(
        &self,
        method: CallMethod,
        path: &str,
        body: Option<&Value>,
    ) -> GatewayResult<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.calls.push(RecordedCall {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
        if let Some(queue) = state.failures.get_mut(path)
            && !queue.is_empty()
        {
            return Err(queue.remove(0));
        }
        Ok(state)
    }
}

impl State {
    /// Finds the route whose item prefix addresses `path`, with the key segment.
    fn route_for_item(&self, path: &str) -> Option<(CollectionRoute, String)> {
        self.routes
            .iter()
            .filter_map(|route| {
                let rest = path.strip_prefix(&route.item_prefix)?.strip_prefix('/')?;
                let key = rest.split('/').next().filter(|k| !k.is_empty())?;
                Some((route.clone(), key.to_string()))
            })
            .max_by_key(|(route, _)| route.item_prefix.len())
    }

    fn list_mut(&mut self, list_path: &str) -> &mut Vec<Value> {
        let slot = self
            .payloads
            .entry(list_path.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            let previous = std::mem::take(slot);
            *slot = Value::Array(if previous.is_null() {
                Vec::new()
            } else {
                vec![previous]
            });
        }
        match slot {
            Value::Array(items) => items,
            _ => unreachable!("slot was normalized to an array"),
        }
    }

    fn lookup(&mut self, path: &str, query: &QueryPairs) -> Option<Value> {
        if let Some(payload) = self.payloads.get(&query_key(path, query)) {
            return Some(payload.clone());
        }
        if let Some(payload) = self.payloads.get(path) {
            return Some(payload.clone());
        }
        let (route, key) = self.route_for_item(path)?;
        let index = self.position(&route, &key)?;
        Some(self.list_mut(&route.list_path)[index].clone())
    }

    fn position(&mut self, route: &CollectionRoute, key: &str) -> Option<usize> {
        let field = route.key.clone();
        self.list_mut(&route.list_path)
            .iter()
            .position(|item| key_matches(item, &field, key))
    }
}

fn key_matches(item: &Value, field: &str, key: &str) -> bool {
    match item.get(field) {
        Some(Value::String(s)) => encode_segment(s) == key,
        Some(other @ Value::Number(_)) => other.to_string() == key,
        _ => false,
    }
}

fn not_found(path: &str) -> GatewayError {
    GatewayError::with_status(404, format!("no fixture for {path}"))
}

fn query_key(path: &str, query: &QueryPairs) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let pairs = query
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{pairs}")
}

pub fn default_routes() -> Vec<CollectionRoute> {
    vec![
        CollectionRoute::new("/api/RiderList", "/api/Rider", "id"),
        CollectionRoute::new("/api/vehicles", "/api/vehicles", "plateNumber"),
        CollectionRoute::new("/api/vehicles", "/api/vehicles/plate", "plateNumber"),
        CollectionRoute::new("/api/Housing", "/api/Housing", "name"),
        CollectionRoute::new("/api/SpareParts", "/api/SpareParts", "id"),
    ]
}

#[async_trait]
impl GatewayReader for InMemoryGateway {
    async fn get(&self, path: &str, query: &QueryPairs) -> GatewayResult<Value> {
        let gate = self
            .read_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        // The response reflects the data at request time, even while held.
        let response = self.begin(CallMethod::Get, path, None).and_then(|mut state| {
            state.lookup(path, query).ok_or_else(|| not_found(path))
        });

        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map(|permit| permit.forget())
                .map_err(|_| GatewayError::network("fixture gateway closed"))?;
        }
        response
    }
}

#[async_trait]
impl GatewayWriter for InMemoryGateway {
    async fn post(&self, path: &str, body: &Value) -> GatewayResult<Value> {
        let mut state = self.begin(CallMethod::Post, path, Some(body))?;

        let Some(route) = state
            .routes
            .iter()
            .find(|route| route.item_prefix == path)
            .cloned()
        else {
            // Action endpoints (take, return, report-problem) only acknowledge.
            return Ok(Value::Null);
        };

        let mut item = body.clone();
        let items = state.list_mut(&route.list_path);
        if route.key == "id"
            && let Value::Object(fields) = &mut item
            && !fields.contains_key("id")
        {
            let next_id = items
                .iter()
                .filter_map(|existing| existing.get("id").and_then(Value::as_i64))
                .max()
                .unwrap_or(0)
                + 1;
            fields.insert("id".to_string(), Value::from(next_id));
        }
        items.push(item.clone());
        Ok(item)
    }

    async fn put(&self, path: &str, body: &Value) -> GatewayResult<Value> {
        let mut state = self.begin(CallMethod::Put, path, Some(body))?;
        let (route, key) = state.route_for_item(path).ok_or_else(|| not_found(path))?;
        let index = state.position(&route, &key).ok_or_else(|| not_found(path))?;

        let item = &mut state.list_mut(&route.list_path)[index];
        if let (Value::Object(target), Value::Object(changes)) = (item, body) {
            for (field, value) in changes {
                target.insert(field.clone(), value.clone());
            }
        }
        Ok(state.list_mut(&route.list_path)[index].clone())
    }

    async fn delete(&self, path: &str) -> GatewayResult<Value> {
        let mut state = self.begin(CallMethod::Delete, path, None)?;
        let (route, key) = state.route_for_item(path).ok_or_else(|| not_found(path))?;
        let index = state.position(&route, &key).ok_or_else(|| not_found(path))?;
        state.list_mut(&route.list_path).remove(index);
        Ok(Value::Null)
    }
}
