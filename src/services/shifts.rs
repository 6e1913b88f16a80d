use chrono::NaiveDate;

use crate::domain::shift::Shift;
use crate::domain::types::IqamaNumber;
use crate::dto::shifts::ShiftsPageData;
use crate::gateway::GatewayReader;
use crate::resource::Resource;
use crate::services::{ServiceResult, fetch_list};
use crate::stats::ShiftTotals;

pub const SHIFTS_PATH: &str = "/api/Shifts";

pub fn daily_shifts_resource(date: NaiveDate) -> Resource {
    Resource::new(SHIFTS_PATH).query("date", date.format("%Y-%m-%d").to_string())
}

pub fn rider_shifts_resource(iqama: &IqamaNumber) -> Resource {
    Resource::new(SHIFTS_PATH)
        .segment("rider")
        .segment(iqama.as_str())
}

/// Every rider's shifts on one day.
pub async fn load_daily_shifts<G>(gateway: &G, date: NaiveDate) -> ServiceResult<ShiftsPageData>
where
    G: GatewayReader + ?Sized,
{
    let shifts: Vec<Shift> = fetch_list(gateway, &daily_shifts_resource(date)).await?;
    Ok(ShiftsPageData {
        date: Some(date),
        rider_iqama: None,
        totals: ShiftTotals::from_shifts(&shifts),
        shifts,
    })
}

/// One rider's shift history.
pub async fn load_rider_shifts<G>(gateway: &G, iqama: &str) -> ServiceResult<ShiftsPageData>
where
    G: GatewayReader + ?Sized,
{
    let iqama = IqamaNumber::new(iqama)?;
    let shifts: Vec<Shift> = fetch_list(gateway, &rider_shifts_resource(&iqama)).await?;
    Ok(ShiftsPageData {
        date: None,
        rider_iqama: Some(iqama.into_inner()),
        totals: ShiftTotals::from_shifts(&shifts),
        shifts,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::services::ServiceError;

    #[tokio::test]
    async fn daily_shifts_pass_the_date_as_a_query() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_get()
            .withf(|path, query| {
                path == "/api/Shifts"
                    && query == [("date".to_string(), "2024-05-01".to_string())]
            })
            .times(1)
            .returning(|_, _| {
                Ok(json!([
                    {"id": 1, "riderName": "Omar", "orders": 12, "hoursWorked": 8.0},
                    {"id": 2, "riderName": "Ahmed", "orders": 18, "hoursWorked": 10.0}
                ]))
            });

        let date = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
        let data = load_daily_shifts(&gateway, date).await.expect("shifts");
        assert_eq!(data.shifts.len(), 2);
        assert_eq!(data.totals.total_orders, 30);
        assert_eq!(data.totals.average_orders, 15.0);
    }

    #[tokio::test]
    async fn rider_without_shifts_has_zero_totals() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_get()
            .withf(|path, _| path == "/api/Shifts/rider/2212345678")
            .times(1)
            .returning(|_, _| Ok(Value::Null));

        let data = load_rider_shifts(&gateway, " 2212345678 ")
            .await
            .expect("shifts");
        assert!(data.shifts.is_empty());
        assert_eq!(data.totals, ShiftTotals::default());
        assert_eq!(data.rider_iqama.as_deref(), Some("2212345678"));
    }

    #[tokio::test]
    async fn malformed_iqama_is_rejected_locally() {
        let mut gateway = MockGateway::new();
        gateway.expect_get().times(0);

        let result = load_rider_shifts(&gateway, "22-123").await;
        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }
}
