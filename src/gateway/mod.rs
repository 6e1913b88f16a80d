//! The single capability through which every API call flows.
//!
//! Reads and writes are split the same way services declare what they need:
//! a page that only loads data asks for a [`GatewayReader`], a form submit
//! asks for a [`GatewayWriter`].

use async_trait::async_trait;
use serde_json::Value;

use crate::gateway::errors::GatewayResult;

pub mod errors;
pub mod http;
pub mod memory;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

/// Query string pairs appended to a GET.
pub type QueryPairs = [(String, String)];

#[async_trait]
pub trait GatewayReader: Send + Sync {
    async fn get(&self, path: &str, query: &QueryPairs) -> GatewayResult<Value>;
}

#[async_trait]
pub trait GatewayWriter: Send + Sync {
    async fn post(&self, path: &str, body: &Value) -> GatewayResult<Value>;
    async fn put(&self, path: &str, body: &Value) -> GatewayResult<Value>;
    async fn delete(&self, path: &str) -> GatewayResult<Value>;
}

/// Full read/write access to the remote API.
pub trait RemoteGateway: GatewayReader + GatewayWriter {}

impl<T> RemoteGateway for T where T: GatewayReader + GatewayWriter + ?Sized {}
