use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Shift {
    pub id: i32,
    pub rider_name: String,
    pub rider_iqama: String,
    pub date: Option<NaiveDate>,
    pub hours_worked: f64,
    pub orders: i32,
    pub notes: Option<String>,
}
