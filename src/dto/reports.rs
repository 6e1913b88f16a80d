use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::bill::Bill;
use crate::domain::rider::Rider;
use crate::domain::shift::Shift;
use crate::stats::{BillTotals, ShiftTotals};

/// Everything the rider history download contains.
#[derive(Debug, Serialize)]
pub struct RiderHistoryReport {
    pub rider: Rider,
    pub shifts: Vec<Shift>,
    pub bills: Vec<Bill>,
    pub shift_totals: ShiftTotals,
    pub bill_totals: BillTotals,
}

/// Per-day shift details across all riders.
#[derive(Debug, Serialize)]
pub struct DailyDetailsReport {
    pub date: NaiveDate,
    pub shifts: Vec<Shift>,
    pub totals: ShiftTotals,
}
