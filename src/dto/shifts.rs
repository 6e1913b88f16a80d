use chrono::NaiveDate;

use crate::domain::shift::Shift;
use crate::stats::ShiftTotals;

#[derive(Debug)]
pub struct ShiftsPageData {
    pub date: Option<NaiveDate>,
    pub rider_iqama: Option<String>,
    pub shifts: Vec<Shift>,
    pub totals: ShiftTotals,
}
