//! Shared fixtures for integration tests.

use std::sync::Arc;

use fleet_backoffice::gateway::memory::InMemoryGateway;
use serde_json::json;

/// Fixture gateway seeded with a small fleet.
pub fn seeded_gateway() -> Arc<InMemoryGateway> {
    let gateway = InMemoryGateway::with_default_routes();
    gateway.seed(
        "/api/RiderList",
        json!([
            {"id": 1, "name": "Omar Farouk", "iqamaNo": "2098765432", "status": "Active", "vehiclePlate": "ABC 123"},
            {"id": 2, "name": "Ahmed Ali", "iqamaNo": "2212345678", "status": "Active"},
            {"id": 3, "name": "Bilal Khan", "iqamaNo": "2300000001", "status": "OnLeave"}
        ]),
    );
    gateway.seed(
        "/api/vehicles",
        json!([
            {"id": 1, "plateNumber": "ABC 123", "status": "Taken", "riderName": "Omar Farouk"},
            {"id": 2, "plateNumber": "KLM 456", "status": "Available"}
        ]),
    );
    gateway.seed(
        "/api/vehicles/available",
        json!([{"id": 2, "plateNumber": "KLM 456", "status": "Available"}]),
    );
    gateway.seed(
        "/api/Housing",
        json!([
            {"name": "Villa 3", "address": "Riyadh", "capacity": 4},
            {"name": "Tower B", "capacity": 10}
        ]),
    );
    gateway.seed(
        "/api/SpareParts",
        json!([
            {"id": 1, "name": "Chain", "quantity": 3, "price": 25.0},
            {"id": 2, "name": "Tyre", "quantity": 10, "price": 80.0}
        ]),
    );
    Arc::new(gateway)
}
