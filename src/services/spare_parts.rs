use crate::domain::spare_part::{NewSparePart, SparePart};
use crate::domain::types::SparePartId;
use crate::dto::mutation::MutationOutcome;
use crate::dto::spare_parts::SparePartsPageData;
use crate::forms::spare_parts::{SparePartForm, StockAdjustmentForm, StockAdjustmentPayload};
use crate::gateway::{GatewayReader, GatewayWriter};
use crate::resource::Resource;
use crate::search::filter_items;
use crate::services::{ServiceError, ServiceResult};
use crate::services::{Write, fetch_list, remove, search_term, send};
use crate::stats::InventorySummary;

pub const SPARE_PARTS_PATH: &str = "/api/SpareParts";
const SPARE_PARTS_PAGE: &str = "/spare-parts";

pub fn spare_parts_resource() -> Resource {
    Resource::new(SPARE_PARTS_PATH)
}

fn spare_part_resource(id: SparePartId) -> Resource {
    Resource::new(SPARE_PARTS_PATH).segment(id.to_string())
}

pub async fn load_spare_parts_page<G>(
    gateway: &G,
    search: Option<String>,
) -> ServiceResult<SparePartsPageData>
where
    G: GatewayReader + ?Sized,
{
    let parts: Vec<SparePart> = fetch_list(gateway, &spare_parts_resource()).await?;
    let summary = InventorySummary::from_parts(&parts);

    let search_query = search_term(search);
    let parts = match &search_query {
        Some(term) => filter_items(&parts, term),
        None => parts,
    };

    Ok(SparePartsPageData {
        parts,
        search_query,
        summary,
    })
}

pub async fn add_spare_part<G>(gateway: &G, form: &SparePartForm) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let part = NewSparePart::try_from(form).map_err(|err| {
        log::error!("Failed to validate spare part form: {err}");
        err
    })?;

    let response = send(gateway, Write::Post, SPARE_PARTS_PATH, &part).await?;

    Ok(
        MutationOutcome::new(format!("Spare part {} was added.", part.name), response)
            .redirect_to(SPARE_PARTS_PAGE),
    )
}

pub async fn adjust_stock<G>(
    gateway: &G,
    form: &StockAdjustmentForm,
) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let payload = StockAdjustmentPayload::try_from(form).map_err(|err| {
        log::error!("Rejected stock adjustment: {err}");
        ServiceError::from(err)
    })?;

    let path = spare_part_resource(payload.id);
    let response = send(gateway, Write::Put, path.path(), &payload.adjustment).await?;

    Ok(MutationOutcome::new(
        format!(
            "Stock of part #{} set to {}.",
            payload.id, payload.adjustment.quantity
        ),
        response,
    )
    .redirect_to(SPARE_PARTS_PAGE))
}

pub async fn delete_spare_part<G>(gateway: &G, id: i32) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let id = SparePartId::new(id)?;
    let response = remove(gateway, spare_part_resource(id).path()).await?;
    Ok(MutationOutcome::new(
        format!("Spare part #{id} was deleted."),
        response,
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::gateway::errors::{GatewayError, SERVER_ERROR_MESSAGE};
    use crate::gateway::mock::MockGateway;

    #[tokio::test]
    async fn summary_covers_the_whole_inventory() {
        let mut gateway = MockGateway::new();
        gateway.expect_get().times(1).returning(|_, _| {
            Ok(json!([
                {"id": 1, "name": "Chain", "quantity": 3, "price": 25.0},
                {"id": 2, "name": "Tyre", "quantity": 10, "price": 80.0}
            ]))
        });

        let data = load_spare_parts_page(&gateway, Some("tyre".to_string()))
            .await
            .expect("page");
        assert_eq!(data.parts.len(), 1);
        assert_eq!(data.summary.value, 875.0);
        assert_eq!(data.summary.low_stock.len(), 1);
    }

    #[tokio::test]
    async fn unparseable_quantity_sends_nothing() {
        let mut gateway = MockGateway::new();
        gateway.expect_post().times(0);

        let form = SparePartForm {
            name: "Chain".to_string(),
            quantity: "three".to_string(),
            price: "25".to_string(),
            ..SparePartForm::default()
        };
        let result = add_spare_part(&gateway, &form).await;
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[tokio::test]
    async fn unchanged_quantity_sends_nothing() {
        let mut gateway = MockGateway::new();
        gateway.expect_put().times(0);

        let form = StockAdjustmentForm {
            id: 1,
            current_quantity: 3,
            quantity: "3".to_string(),
        };
        assert!(adjust_stock(&gateway, &form).await.is_err());
    }

    #[tokio::test]
    async fn adjustment_puts_the_new_quantity() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_put()
            .withf(|path, body| path == "/api/SpareParts/1" && body == &json!({"quantity": 8}))
            .times(1)
            .returning(|_, _| Ok(Value::Null));

        let form = StockAdjustmentForm {
            id: 1,
            current_quantity: 3,
            quantity: "8".to_string(),
        };
        adjust_stock(&gateway, &form).await.expect("adjusted");
    }

    #[tokio::test]
    async fn server_failure_on_delete_is_reported() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_delete()
            .times(1)
            .returning(|_| Err(GatewayError::with_status(500, "boom")));

        let err = delete_spare_part(&gateway, 1).await.expect_err("failed");
        assert_eq!(err.alert().message, SERVER_ERROR_MESSAGE);
    }
}
