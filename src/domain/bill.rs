use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Bill {
    pub id: i32,
    pub rider_iqama: String,
    pub description: String,
    pub amount: f64,
    pub date: Option<NaiveDate>,
    pub paid: bool,
}
