use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::status_enum;
use crate::domain::types::{IqamaNumber, PhoneNumber, PlateNumber, RiderName, StatusLabel};

status_enum!(RiderStatus, "Employment status of a rider.", {
    Active => "Active",
    Inactive => "Inactive",
    OnLeave => "OnLeave",
    Suspended => "Suspended",
    Terminated => "Terminated",
});

impl Default for RiderStatus {
    fn default() -> Self {
        RiderStatus::Active
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Rider {
    pub id: i32,
    pub name: String,
    pub iqama_no: String,
    pub work_id: Option<String>,
    pub phone: Option<String>,
    pub status: RiderStatus,
    pub housing_name: Option<String>,
    /// Plate of the vehicle currently taken by the rider.
    pub vehicle_plate: Option<String>,
    pub join_date: Option<NaiveDate>,
}

/// Payload of `POST /api/Rider`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewRider {
    pub name: RiderName,
    pub iqama_no: IqamaNumber,
    pub work_id: Option<String>,
    pub phone: Option<PhoneNumber>,
    pub housing_name: Option<String>,
    pub join_date: Option<NaiveDate>,
}

/// Payload of `PUT /api/Rider/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRider {
    pub name: RiderName,
    pub phone: Option<PhoneNumber>,
    pub housing_name: Option<String>,
    pub vehicle_plate: Option<PlateNumber>,
}

/// Payload of `POST /api/Rider/{id}/status`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiderStatusChange {
    pub current_status: RiderStatus,
    pub new_status: RiderStatus,
    pub reason: Option<StatusLabel>,
}
