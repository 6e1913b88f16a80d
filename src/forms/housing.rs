use serde::Deserialize;
use validator::Validate;

use crate::domain::housing::HousingPayload;
use crate::domain::types::HousingName;
use crate::forms::{FormError, constrained, optional_text, parse_optional_number};

#[derive(Clone, Debug, Default, Deserialize, Validate, PartialEq)]
/// Form data shared by the add and edit housing pages.
pub struct HousingForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub capacity: String,
}

impl TryFrom<&HousingForm> for HousingPayload {
    type Error = FormError;

    fn try_from(form: &HousingForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(HousingPayload {
            name: constrained("name", HousingName::new(form.name.as_str()))?,
            address: optional_text(&form.address),
            capacity: parse_optional_number("capacity", &form.capacity)?,
        })
    }
}
