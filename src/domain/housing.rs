use serde::{Deserialize, Serialize};

use crate::domain::rider::Rider;
use crate::domain::types::HousingName;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Housing {
    pub name: String,
    pub address: Option<String>,
    pub capacity: Option<u32>,
    /// Riders currently assigned to the unit. Only filled on detail reads.
    pub riders: Vec<Rider>,
}

impl Housing {
    /// Number of free beds, when the capacity is known.
    pub fn vacancies(&self) -> Option<u32> {
        self.capacity
            .map(|capacity| capacity.saturating_sub(self.riders.len() as u32))
    }
}

/// Payload of `POST /api/Housing` and `PUT /api/Housing/{name}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HousingPayload {
    pub name: HousingName,
    pub address: Option<String>,
    pub capacity: Option<u32>,
}
