use serde::Deserialize;
use validator::Validate;

use crate::domain::rider::{NewRider, RiderStatus, RiderStatusChange, UpdateRider};
use crate::domain::types::{
    IqamaNumber, PhoneNumber, PlateNumber, RiderId, RiderName, StatusLabel,
};
use crate::forms::{FormError, constrained, optional_text, parse_optional_date};

#[derive(Clone, Debug, Default, Deserialize, Validate, PartialEq)]
/// Form data for registering a rider.
pub struct AddRiderForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub iqama_no: String,
    #[serde(default)]
    pub work_id: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub housing_name: String,
    /// `YYYY-MM-DD`, optional.
    #[serde(default)]
    pub join_date: String,
}

impl TryFrom<&AddRiderForm> for NewRider {
    type Error = FormError;

    fn try_from(form: &AddRiderForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewRider {
            name: constrained("name", RiderName::new(form.name.as_str()))?,
            iqama_no: constrained("iqama number", IqamaNumber::new(form.iqama_no.as_str()))?,
            work_id: optional_text(&form.work_id),
            phone: optional_text(&form.phone)
                .map(|phone| constrained("phone", PhoneNumber::new(phone)))
                .transpose()?,
            housing_name: optional_text(&form.housing_name),
            join_date: parse_optional_date(&form.join_date)?,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate, PartialEq)]
/// Form data for editing a rider's contact and assignment details.
pub struct EditRiderForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub housing_name: String,
    #[serde(default)]
    pub vehicle_plate: String,
}

impl TryFrom<&EditRiderForm> for UpdateRider {
    type Error = FormError;

    fn try_from(form: &EditRiderForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(UpdateRider {
            name: constrained("name", RiderName::new(form.name.as_str()))?,
            phone: optional_text(&form.phone)
                .map(|phone| constrained("phone", PhoneNumber::new(phone)))
                .transpose()?,
            housing_name: optional_text(&form.housing_name),
            vehicle_plate: optional_text(&form.vehicle_plate)
                .map(|plate| constrained("plate number", PlateNumber::new(plate)))
                .transpose()?,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate, PartialEq)]
/// Form data for requesting a rider status change.
pub struct StatusChangeForm {
    pub rider_id: i32,
    #[validate(length(min = 1))]
    pub current_status: String,
    #[validate(length(min = 1))]
    pub new_status: String,
    #[serde(default)]
    pub reason: String,
}

/// Validated status change request addressed to one rider.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusChangePayload {
    pub rider_id: RiderId,
    pub change: RiderStatusChange,
}

impl TryFrom<&StatusChangeForm> for StatusChangePayload {
    type Error = FormError;

    fn try_from(form: &StatusChangeForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let current_status = RiderStatus::from(form.current_status.as_str());
        let new_status = RiderStatus::from(form.new_status.as_str());
        if current_status == new_status {
            return Err(FormError::Unchanged { field: "status" });
        }
        Ok(StatusChangePayload {
            rider_id: constrained("rider id", RiderId::new(form.rider_id))?,
            change: RiderStatusChange {
                current_status,
                new_status,
                reason: optional_text(&form.reason)
                    .map(|reason| constrained("reason", StatusLabel::new(reason)))
                    .transpose()?,
            },
        })
    }
}
