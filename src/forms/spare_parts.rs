use serde::Deserialize;
use validator::Validate;

use crate::domain::spare_part::{NewSparePart, StockAdjustment};
use crate::domain::types::{PartName, SparePartId};
use crate::forms::{FormError, constrained, optional_text, parse_number};

#[derive(Clone, Debug, Default, Deserialize, Validate, PartialEq)]
/// Form data for adding a spare part to the inventory.
pub struct SparePartForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub part_number: String,
    #[serde(default)]
    pub vehicle_type: String,
    #[validate(length(min = 1))]
    pub quantity: String,
    #[validate(length(min = 1))]
    pub price: String,
}

impl TryFrom<&SparePartForm> for NewSparePart {
    type Error = FormError;

    fn try_from(form: &SparePartForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let quantity: i32 = parse_number("quantity", &form.quantity)?;
        let price: f64 = parse_number("price", &form.price)?;
        if quantity < 0 {
            return Err(FormError::InvalidNumber {
                field: "quantity",
                value: form.quantity.clone(),
            });
        }
        if !price.is_finite() || price < 0.0 {
            return Err(FormError::InvalidNumber {
                field: "price",
                value: form.price.clone(),
            });
        }
        Ok(NewSparePart {
            name: constrained("name", PartName::new(form.name.as_str()))?,
            part_number: optional_text(&form.part_number),
            vehicle_type: optional_text(&form.vehicle_type),
            quantity,
            price,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, Validate, PartialEq)]
/// Form data for correcting the stock level of a part.
pub struct StockAdjustmentForm {
    pub id: i32,
    pub current_quantity: i32,
    #[validate(length(min = 1))]
    pub quantity: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StockAdjustmentPayload {
    pub id: SparePartId,
    pub adjustment: StockAdjustment,
}

impl TryFrom<&StockAdjustmentForm> for StockAdjustmentPayload {
    type Error = FormError;

    fn try_from(form: &StockAdjustmentForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let quantity: i32 = parse_number("quantity", &form.quantity)?;
        if quantity < 0 {
            return Err(FormError::InvalidNumber {
                field: "quantity",
                value: form.quantity.clone(),
            });
        }
        if quantity == form.current_quantity {
            return Err(FormError::Unchanged { field: "quantity" });
        }
        Ok(StockAdjustmentPayload {
            id: constrained("part id", SparePartId::new(form.id))?,
            adjustment: StockAdjustment { quantity },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part_form() -> SparePartForm {
        SparePartForm {
            name: "Brake pad".to_string(),
            quantity: "4".to_string(),
            price: "35.5".to_string(),
            ..SparePartForm::default()
        }
    }

    #[test]
    fn numeric_fields_are_parsed() {
        let part = NewSparePart::try_from(&part_form()).expect("valid form");
        assert_eq!(part.quantity, 4);
        assert_eq!(part.price, 35.5);
    }

    #[test]
    fn unparseable_price_is_rejected() {
        let form = SparePartForm {
            price: "cheap".to_string(),
            ..part_form()
        };
        assert!(matches!(
            NewSparePart::try_from(&form),
            Err(FormError::InvalidNumber { field: "price", .. })
        ));
    }

    #[test]
    fn stock_adjustment_must_change_quantity() {
        let form = StockAdjustmentForm {
            id: 3,
            current_quantity: 4,
            quantity: "4".to_string(),
        };
        assert!(matches!(
            StockAdjustmentPayload::try_from(&form),
            Err(FormError::Unchanged { field: "quantity" })
        ));
    }
}
