//! Downloadable reports. Each report is gathered from several endpoints and
//! exported as CSV.

use std::io;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::bill::Bill;
use crate::domain::rider::Rider;
use crate::domain::shift::Shift;
use crate::domain::types::IqamaNumber;
use crate::dto::reports::{DailyDetailsReport, RiderHistoryReport};
use crate::gateway::GatewayReader;
use crate::resource::Resource;
use crate::services::riders::riders_resource;
use crate::services::shifts::{daily_shifts_resource, rider_shifts_resource};
use crate::services::{ServiceError, ServiceResult, fetch_list};
use crate::stats::{BillTotals, ShiftTotals};

pub const BILLS_PATH: &str = "/api/Bills";

pub fn rider_bills_resource(iqama: &IqamaNumber) -> Resource {
    Resource::new(BILLS_PATH)
        .segment("rider")
        .segment(iqama.as_str())
}

/// Rider profile, shifts and bills, fetched concurrently.
pub async fn rider_history_report<G>(gateway: &G, iqama: &str) -> ServiceResult<RiderHistoryReport>
where
    G: GatewayReader + ?Sized,
{
    let iqama = IqamaNumber::new(iqama)?;

    let riders_list = riders_resource();
    let shifts_list = rider_shifts_resource(&iqama);
    let bills_list = rider_bills_resource(&iqama);
    let (riders, shifts, bills) = tokio::try_join!(
        fetch_list::<Rider, G>(gateway, &riders_list),
        fetch_list::<Shift, G>(gateway, &shifts_list),
        fetch_list::<Bill, G>(gateway, &bills_list),
    )?;

    let rider = riders
        .into_iter()
        .find(|r| r.iqama_no.trim() == iqama.as_str())
        .ok_or_else(|| {
            log::error!("No rider with iqama {iqama}");
            ServiceError::NotFound
        })?;

    Ok(RiderHistoryReport {
        rider,
        shift_totals: ShiftTotals::from_shifts(&shifts),
        bill_totals: BillTotals::from_bills(&bills),
        shifts,
        bills,
    })
}

pub async fn daily_details_report<G>(gateway: &G, date: NaiveDate) -> ServiceResult<DailyDetailsReport>
where
    G: GatewayReader + ?Sized,
{
    let shifts: Vec<Shift> = fetch_list(gateway, &daily_shifts_resource(date)).await?;
    Ok(DailyDetailsReport {
        date,
        totals: ShiftTotals::from_shifts(&shifts),
        shifts,
    })
}

#[derive(Serialize)]
struct HistoryRow<'a> {
    entry: &'a str,
    date: Option<NaiveDate>,
    description: &'a str,
    hours_worked: Option<f64>,
    orders: Option<i64>,
    amount: Option<f64>,
    paid: Option<bool>,
}

/// One row per shift, then one per bill, then a totals row.
pub fn write_rider_history_csv<W: io::Write>(
    report: &RiderHistoryReport,
    writer: W,
) -> ServiceResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    for shift in &report.shifts {
        csv.serialize(HistoryRow {
            entry: "shift",
            date: shift.date,
            description: shift.notes.as_deref().unwrap_or_default(),
            hours_worked: Some(shift.hours_worked),
            orders: Some(i64::from(shift.orders)),
            amount: None,
            paid: None,
        })?;
    }
    for bill in &report.bills {
        csv.serialize(HistoryRow {
            entry: "bill",
            date: bill.date,
            description: &bill.description,
            hours_worked: None,
            orders: None,
            amount: Some(bill.amount),
            paid: Some(bill.paid),
        })?;
    }
    csv.serialize(HistoryRow {
        entry: "total",
        date: None,
        description: &report.rider.name,
        hours_worked: Some(report.shift_totals.total_hours),
        orders: Some(report.shift_totals.total_orders),
        amount: Some(report.bill_totals.outstanding),
        paid: None,
    })?;

    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[derive(Serialize)]
struct DailyRow<'a> {
    rider_name: &'a str,
    rider_iqama: &'a str,
    hours_worked: f64,
    orders: i64,
    notes: &'a str,
}

pub fn write_daily_details_csv<W: io::Write>(
    report: &DailyDetailsReport,
    writer: W,
) -> ServiceResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    for shift in &report.shifts {
        csv.serialize(DailyRow {
            rider_name: &shift.rider_name,
            rider_iqama: &shift.rider_iqama,
            hours_worked: shift.hours_worked,
            orders: i64::from(shift.orders),
            notes: shift.notes.as_deref().unwrap_or_default(),
        })?;
    }
    csv.serialize(DailyRow {
        rider_name: "TOTAL",
        rider_iqama: "",
        hours_worked: report.totals.total_hours,
        orders: report.totals.total_orders,
        notes: "",
    })?;

    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::gateway::mock::MockGateway;

    fn history_gateway() -> MockGateway {
        let mut gateway = MockGateway::new();
        gateway.expect_get().times(3).returning(|path, _| {
            Ok(match path {
                "/api/RiderList" => json!([
                    {"id": 1, "name": "Omar", "iqamaNo": "2098765432"},
                    {"id": 2, "name": "Ahmed", "iqamaNo": "2212345678"}
                ]),
                "/api/Shifts/rider/2212345678" => json!([
                    {"id": 7, "date": "2024-05-01", "orders": 12, "hoursWorked": 8.0, "notes": "Rain"}
                ]),
                "/api/Bills/rider/2212345678" => json!([
                    {"id": 3, "description": "Fuel", "amount": 50.0, "paid": true},
                    {"id": 4, "description": "Fine", "amount": 20.0}
                ]),
                _ => Value::Null,
            })
        });
        gateway
    }

    #[tokio::test]
    async fn history_joins_rider_shifts_and_bills() {
        let gateway = history_gateway();

        let report = rider_history_report(&gateway, "2212345678")
            .await
            .expect("report");
        assert_eq!(report.rider.id, 2);
        assert_eq!(report.shifts.len(), 1);
        assert_eq!(report.bill_totals.outstanding, 20.0);
        assert_eq!(report.shift_totals.total_orders, 12);
    }

    #[tokio::test]
    async fn history_for_unknown_rider_is_not_found() {
        let mut gateway = MockGateway::new();
        gateway.expect_get().times(3).returning(|_, _| Ok(Value::Null));

        let result = rider_history_report(&gateway, "2000000000").await;
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn history_csv_has_a_header_and_one_row_per_entry() {
        let gateway = history_gateway();
        let report = rider_history_report(&gateway, "2212345678")
            .await
            .expect("report");

        let mut out = Vec::new();
        write_rider_history_csv(&report, &mut out).expect("csv");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "entry,date,description,hours_worked,orders,amount,paid"
        );
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "shift,2024-05-01,Rain,8.0,12,,");
        assert!(lines[4].starts_with("total,,Ahmed,"));
    }

    #[tokio::test]
    async fn daily_csv_ends_with_totals() {
        let mut gateway = MockGateway::new();
        gateway.expect_get().times(1).returning(|_, _| {
            Ok(json!([
                {"riderName": "Omar", "riderIqama": "2098765432", "orders": 10, "hoursWorked": 8.0},
                {"riderName": "Ahmed", "riderIqama": "2212345678", "orders": 20, "hoursWorked": 9.5}
            ]))
        });
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
        let report = daily_details_report(&gateway, date).await.expect("report");

        let mut out = Vec::new();
        write_daily_details_csv(&report, &mut out).expect("csv");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "rider_name,rider_iqama,hours_worked,orders,notes");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "TOTAL,,17.5,30,");
    }
}
