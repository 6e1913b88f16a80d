use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{IqamaNumber, PlateNumber, ProblemDescription};
use crate::domain::vehicle::{
    NewVehicle, ReturnVehicle, TakeVehicle, VehicleProblemReport, VehicleStatus,
    VehicleStatusChange,
};
use crate::forms::{FormError, constrained, optional_text, parse_number, parse_optional_number};

#[derive(Clone, Debug, Default, Deserialize, Validate, PartialEq)]
/// Form data for registering a vehicle.
pub struct AddVehicleForm {
    #[validate(length(min = 1))]
    pub plate_number: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub mileage: String,
}

impl TryFrom<&AddVehicleForm> for NewVehicle {
    type Error = FormError;

    fn try_from(form: &AddVehicleForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewVehicle {
            plate_number: constrained("plate number", PlateNumber::new(form.plate_number.as_str()))?,
            make: optional_text(&form.make),
            model: optional_text(&form.model),
            year: parse_optional_number("year", &form.year)?,
            mileage: parse_optional_number("mileage", &form.mileage)?,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate, PartialEq)]
/// Form data for handing a vehicle to a rider.
pub struct TakeVehicleForm {
    #[validate(length(min = 1))]
    pub plate_number: String,
    #[validate(length(min = 1))]
    pub rider_iqama: String,
}

impl TryFrom<&TakeVehicleForm> for TakeVehicle {
    type Error = FormError;

    fn try_from(form: &TakeVehicleForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(TakeVehicle {
            plate_number: constrained("plate number", PlateNumber::new(form.plate_number.as_str()))?,
            rider_iqama: constrained("iqama number", IqamaNumber::new(form.rider_iqama.as_str()))?,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate, PartialEq)]
/// Form data for returning a vehicle to the pool.
pub struct ReturnVehicleForm {
    #[validate(length(min = 1))]
    pub plate_number: String,
    #[validate(length(min = 1))]
    pub mileage: String,
}

impl TryFrom<&ReturnVehicleForm> for ReturnVehicle {
    type Error = FormError;

    fn try_from(form: &ReturnVehicleForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let mileage: i64 = parse_number("mileage", &form.mileage)?;
        if mileage < 0 {
            return Err(FormError::InvalidNumber {
                field: "mileage",
                value: form.mileage.clone(),
            });
        }
        Ok(ReturnVehicle {
            plate_number: constrained("plate number", PlateNumber::new(form.plate_number.as_str()))?,
            mileage,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate, PartialEq)]
/// Form data for reporting a vehicle problem.
pub struct ReportProblemForm {
    #[validate(length(min = 1))]
    pub plate_number: String,
    #[validate(length(min = 1))]
    pub description: String,
}

impl TryFrom<&ReportProblemForm> for VehicleProblemReport {
    type Error = FormError;

    fn try_from(form: &ReportProblemForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(VehicleProblemReport {
            plate_number: constrained("plate number", PlateNumber::new(form.plate_number.as_str()))?,
            description: constrained(
                "description",
                ProblemDescription::new(form.description.as_str()),
            )?,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate, PartialEq)]
/// Form data for moving a vehicle between operational statuses.
pub struct VehicleStatusForm {
    #[validate(length(min = 1))]
    pub plate_number: String,
    #[validate(length(min = 1))]
    pub current_status: String,
    #[validate(length(min = 1))]
    pub new_status: String,
}

/// Validated status change addressed to one vehicle.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleStatusPayload {
    pub plate_number: PlateNumber,
    pub change: VehicleStatusChange,
}

impl TryFrom<&VehicleStatusForm> for VehicleStatusPayload {
    type Error = FormError;

    fn try_from(form: &VehicleStatusForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let current_status = VehicleStatus::from(form.current_status.as_str());
        let new_status = VehicleStatus::from(form.new_status.as_str());
        if current_status == new_status {
            return Err(FormError::Unchanged { field: "status" });
        }
        Ok(VehicleStatusPayload {
            plate_number: constrained("plate number", PlateNumber::new(form.plate_number.as_str()))?,
            change: VehicleStatusChange {
                current_status,
                new_status,
            },
        })
    }
}
