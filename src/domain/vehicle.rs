use serde::{Deserialize, Serialize};

use crate::domain::status_enum;
use crate::domain::types::{IqamaNumber, PlateNumber, ProblemDescription};

status_enum!(VehicleStatus, "Operational status of a fleet vehicle.", {
    Available => "Available",
    Taken => "Taken",
    UnderMaintenance => "UnderMaintenance",
    OutOfService => "OutOfService",
});

impl Default for VehicleStatus {
    fn default() -> Self {
        VehicleStatus::Available
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Vehicle {
    pub id: i32,
    pub plate_number: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub status: VehicleStatus,
    pub rider_name: Option<String>,
    pub rider_iqama: Option<String>,
    pub mileage: Option<i64>,
}

/// Payload of `POST /api/vehicles`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    pub plate_number: PlateNumber,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub mileage: Option<i64>,
}

/// Payload of `POST /api/vehicles/take`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TakeVehicle {
    pub plate_number: PlateNumber,
    pub rider_iqama: IqamaNumber,
}

/// Payload of `POST /api/vehicles/return`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReturnVehicle {
    pub plate_number: PlateNumber,
    pub mileage: i64,
}

/// Payload of `POST /api/vehicles/report-problem`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleProblemReport {
    pub plate_number: PlateNumber,
    pub description: ProblemDescription,
}

/// Payload of `PUT /api/vehicles/{plate}/status`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleStatusChange {
    pub current_status: VehicleStatus,
    pub new_status: VehicleStatus,
}
