use serde::{Deserialize, Serialize};

use crate::domain::types::PartName;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SparePart {
    pub id: i32,
    pub name: String,
    pub part_number: Option<String>,
    pub vehicle_type: Option<String>,
    pub quantity: i32,
    pub price: f64,
}

/// Payload of `POST /api/SpareParts`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewSparePart {
    pub name: PartName,
    pub part_number: Option<String>,
    pub vehicle_type: Option<String>,
    pub quantity: i32,
    pub price: f64,
}

/// Payload of `PUT /api/SpareParts/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    pub quantity: i32,
}
