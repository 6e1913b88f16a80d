use crate::domain::rider::Rider;
use crate::domain::spare_part::SparePart;
use crate::domain::vehicle::Vehicle;
use crate::dto::dashboard::DashboardData;
use crate::gateway::GatewayReader;
use crate::services::riders::riders_resource;
use crate::services::spare_parts::spare_parts_resource;
use crate::services::vehicles::vehicles_resource;
use crate::services::{ServiceResult, fetch_list};
use crate::stats::{FleetSummary, InventorySummary, RiderSummary};

/// Fetches vehicles, riders and spare parts together and aggregates the cards.
pub async fn load_dashboard<G>(gateway: &G) -> ServiceResult<DashboardData>
where
    G: GatewayReader + ?Sized,
{
    let vehicles_list = vehicles_resource(false);
    let riders_list = riders_resource();
    let parts_list = spare_parts_resource();
    let (vehicles, riders, parts) = tokio::try_join!(
        fetch_list::<Vehicle, G>(gateway, &vehicles_list),
        fetch_list::<Rider, G>(gateway, &riders_list),
        fetch_list::<SparePart, G>(gateway, &parts_list),
    )?;

    Ok(DashboardData {
        fleet: FleetSummary::from_vehicles(&vehicles),
        riders: RiderSummary::from_riders(&riders),
        inventory: InventorySummary::from_parts(&parts),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::gateway::errors::{GatewayError, NETWORK_ERROR_MESSAGE};
    use crate::gateway::mock::MockGateway;

    #[tokio::test]
    async fn cards_aggregate_all_three_lists() {
        let mut gateway = MockGateway::new();
        gateway.expect_get().times(3).returning(|path, _| {
            Ok(match path {
                "/api/vehicles" => json!([
                    {"plateNumber": "A 1", "status": "Available"},
                    {"plateNumber": "A 2", "status": "Taken"}
                ]),
                "/api/RiderList" => json!([{"id": 1, "status": "Active"}]),
                "/api/SpareParts" => json!([{"id": 1, "name": "Chain", "quantity": 2, "price": 10.0}]),
                _ => Value::Null,
            })
        });

        let data = load_dashboard(&gateway).await.expect("dashboard");
        assert_eq!(data.fleet.total, 2);
        assert_eq!(data.fleet.taken, 1);
        assert_eq!(data.riders.without_vehicle, 1);
        assert_eq!(data.inventory.value, 20.0);
    }

    #[tokio::test]
    async fn one_failed_list_fails_the_dashboard() {
        let mut gateway = MockGateway::new();
        gateway.expect_get().returning(|path, _| match path {
            "/api/SpareParts" => Err(GatewayError::network("connection refused")),
            _ => Ok(Value::Null),
        });

        let err = load_dashboard(&gateway).await.expect_err("failed");
        assert_eq!(err.alert().message, NETWORK_ERROR_MESSAGE);
    }
}
