//! Mock gateway implementation for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;

use crate::gateway::errors::GatewayResult;
use crate::gateway::{GatewayReader, GatewayWriter};

mock! {
    pub Gateway {}

    #[async_trait]
    impl GatewayReader for Gateway {
        async fn get(&self, path: &str, query: &[(String, String)]) -> GatewayResult<Value>;
    }

    #[async_trait]
    impl GatewayWriter for Gateway {
        async fn post(&self, path: &str, body: &Value) -> GatewayResult<Value>;
        async fn put(&self, path: &str, body: &Value) -> GatewayResult<Value>;
        async fn delete(&self, path: &str) -> GatewayResult<Value>;
    }
}
