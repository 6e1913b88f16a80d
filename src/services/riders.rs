//! Services backing the riders pages.

use crate::domain::rider::{NewRider, Rider, UpdateRider};
use crate::domain::types::RiderId;
use crate::dto::mutation::MutationOutcome;
use crate::dto::riders::{RidersPageData, RidersQuery};
use crate::forms::riders::{AddRiderForm, EditRiderForm, StatusChangeForm, StatusChangePayload};
use crate::gateway::{GatewayReader, GatewayWriter};
use crate::pagination::Paginated;
use crate::resource::Resource;
use crate::search::filter_items;
use crate::services::{Write, fetch_list, fetch_one, remove, search_term, send};
use crate::services::{ServiceError, ServiceResult};

pub const RIDERS_LIST_PATH: &str = "/api/RiderList";
pub const RIDER_PATH: &str = "/api/Rider";
const RIDERS_PAGE: &str = "/riders";

pub fn riders_resource() -> Resource {
    Resource::new(RIDERS_LIST_PATH)
}

pub fn rider_resource(id: RiderId) -> Resource {
    Resource::new(RIDER_PATH).segment(id.to_string())
}

/// Loads and filters the riders table.
pub async fn load_riders_page<G>(
    gateway: &G,
    query: RidersQuery,
    per_page: usize,
) -> ServiceResult<RidersPageData>
where
    G: GatewayReader + ?Sized,
{
    let riders: Vec<Rider> = fetch_list(gateway, &riders_resource()).await?;

    let search_query = search_term(query.search);
    let riders = match &search_query {
        Some(term) => filter_items(&riders, term),
        None => riders,
    };

    let riders = Paginated::from_items(riders, query.page.unwrap_or(1), per_page);

    Ok(RidersPageData {
        riders,
        search_query,
    })
}

pub async fn load_rider<G>(gateway: &G, id: i32) -> ServiceResult<Rider>
where
    G: GatewayReader + ?Sized,
{
    let id = RiderId::new(id)?;
    fetch_one(gateway, &rider_resource(id)).await
}

/// Validates the add-rider form and creates the rider.
pub async fn add_rider<G>(gateway: &G, form: &AddRiderForm) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let new_rider = NewRider::try_from(form).map_err(|err| {
        log::error!("Failed to validate rider form: {err}");
        err
    })?;

    let response = send(gateway, Write::Post, RIDER_PATH, &new_rider).await?;

    Ok(MutationOutcome::new(
        format!("Rider {} was added.", new_rider.name),
        response,
    )
    .redirect_to(RIDERS_PAGE))
}

pub async fn update_rider<G>(
    gateway: &G,
    id: i32,
    form: &EditRiderForm,
) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let id = RiderId::new(id)?;
    let updates = UpdateRider::try_from(form).map_err(|err| {
        log::error!("Failed to validate rider form: {err}");
        err
    })?;

    let path = rider_resource(id);
    let response = send(gateway, Write::Put, path.path(), &updates).await?;

    Ok(MutationOutcome::new(format!("Rider {} was updated.", updates.name), response)
        .redirect_to(format!("{RIDERS_PAGE}/{id}")))
}

pub async fn delete_rider<G>(gateway: &G, id: i32) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let id = RiderId::new(id)?;
    let response = remove(gateway, rider_resource(id).path()).await?;
    Ok(MutationOutcome::new(format!("Rider #{id} was deleted."), response))
}

/// Submits a status change; identical current and new statuses never leave the client.
pub async fn request_status_change<G>(
    gateway: &G,
    form: &StatusChangeForm,
) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let payload = StatusChangePayload::try_from(form).map_err(|err| {
        log::error!("Rejected status change request: {err}");
        ServiceError::from(err)
    })?;

    let path = rider_resource(payload.rider_id).segment("status");
    let response = send(gateway, Write::Post, path.path(), &payload.change).await?;

    Ok(MutationOutcome::new(
        format!(
            "Status change from {} to {} was requested.",
            payload.change.current_status, payload.change.new_status
        ),
        response,
    )
    .redirect_to(format!("{RIDERS_PAGE}/{}", payload.rider_id)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::gateway::errors::{GENERAL_ERROR_MESSAGE, GatewayError, NOT_FOUND_MESSAGE};
    use crate::gateway::mock::MockGateway;
    use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

    fn riders_payload() -> serde_json::Value {
        json!([
            {"id": 1, "name": "Omar Farouk", "iqamaNo": "2098765432", "status": "Active"},
            {"id": 2, "name": "Ahmed Ali", "iqamaNo": "2212345678", "status": "Active"},
            {"id": 3, "name": "Bilal Khan", "iqamaNo": "2300000001", "status": "OnLeave"}
        ])
    }

    fn add_form() -> AddRiderForm {
        AddRiderForm {
            name: "Yusuf Rahman".to_string(),
            iqama_no: "2456789012".to_string(),
            ..AddRiderForm::default()
        }
    }

    #[tokio::test]
    async fn search_by_iqama_returns_the_matching_rider() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_get()
            .withf(|path, _| path == RIDERS_LIST_PATH)
            .times(1)
            .returning(|_, _| Ok(riders_payload()));

        let data = load_riders_page(
            &gateway,
            RidersQuery {
                search: Some(" 12345 ".to_string()),
                page: None,
            },
            DEFAULT_ITEMS_PER_PAGE,
        )
        .await
        .expect("page data");

        assert_eq!(data.search_query.as_deref(), Some("12345"));
        assert_eq!(data.riders.items.len(), 1);
        assert_eq!(data.riders.items[0].id, 2);
    }

    #[tokio::test]
    async fn blank_search_shows_everyone() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_get()
            .times(1)
            .returning(|_, _| Ok(riders_payload()));

        let data = load_riders_page(
            &gateway,
            RidersQuery {
                search: Some("  ".to_string()),
                page: Some(1),
            },
            DEFAULT_ITEMS_PER_PAGE,
        )
        .await
        .expect("page data");

        assert_eq!(data.search_query, None);
        assert_eq!(data.riders.total, 3);
    }

    #[tokio::test]
    async fn add_rider_posts_once_and_redirects() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_post()
            .withf(|path, body| {
                path == RIDER_PATH
                    && body["name"] == json!("Yusuf Rahman")
                    && body["iqamaNo"] == json!("2456789012")
            })
            .times(1)
            .returning(|_, _| Ok(json!({"id": 9})));

        let outcome = add_rider(&gateway, &add_form()).await.expect("created");

        let redirect = outcome.redirect.expect("redirect");
        assert_eq!(redirect.to, "/riders");
        assert_eq!(outcome.response["id"], json!(9));
    }

    #[tokio::test]
    async fn add_rider_with_empty_field_sends_nothing() {
        let mut gateway = MockGateway::new();
        gateway.expect_post().times(0);

        let form = AddRiderForm {
            name: String::new(),
            ..add_form()
        };
        let result = add_rider(&gateway, &form).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[tokio::test]
    async fn rejected_create_shows_general_error_and_keeps_input() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_post()
            .times(1)
            .returning(|_, _| Err(GatewayError::with_status(400, "Iqama already registered")));

        let form = add_form();
        let err = add_rider(&gateway, &form).await.expect_err("rejected");

        let alert = err.alert();
        assert_eq!(alert.message, GENERAL_ERROR_MESSAGE);
        assert_ne!(alert.message, NOT_FOUND_MESSAGE);
        assert_eq!(form, add_form());
    }

    #[tokio::test]
    async fn unchanged_status_sends_nothing() {
        let mut gateway = MockGateway::new();
        gateway.expect_post().times(0);

        let form = StatusChangeForm {
            rider_id: 2,
            current_status: "Active".to_string(),
            new_status: "Active".to_string(),
            reason: String::new(),
        };
        let err = request_status_change(&gateway, &form)
            .await
            .expect_err("rejected locally");

        assert!(err.alert().message.contains("different"));
    }

    #[tokio::test]
    async fn status_change_posts_to_the_rider() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_post()
            .withf(|path, body| {
                path == "/api/Rider/2/status"
                    && body["currentStatus"] == json!("Active")
                    && body["newStatus"] == json!("Suspended")
            })
            .times(1)
            .returning(|_, _| Ok(serde_json::Value::Null));

        let form = StatusChangeForm {
            rider_id: 2,
            current_status: "Active".to_string(),
            new_status: "Suspended".to_string(),
            reason: String::new(),
        };
        request_status_change(&gateway, &form)
            .await
            .expect("submitted");
    }

    #[tokio::test]
    async fn update_puts_normalized_fields() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_put()
            .withf(|path, body| {
                path == "/api/Rider/2"
                    && body["phone"] == json!("+966501234567")
                    && body["vehiclePlate"] == json!("ABC 123")
            })
            .times(1)
            .returning(|_, _| Ok(serde_json::Value::Null));

        let form = EditRiderForm {
            name: "Ahmed Ali".to_string(),
            phone: "0501234567".to_string(),
            vehicle_plate: "abc 123".to_string(),
            ..EditRiderForm::default()
        };
        let outcome = update_rider(&gateway, 2, &form).await.expect("updated");
        assert_eq!(outcome.redirect.map(|r| r.to).as_deref(), Some("/riders/2"));
    }

    #[tokio::test]
    async fn invalid_id_is_rejected_before_any_call() {
        let mut gateway = MockGateway::new();
        gateway.expect_delete().times(0);

        let result = delete_rider(&gateway, 0).await;
        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }

    #[tokio::test]
    async fn missing_rider_is_not_found() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_get()
            .withf(|path, _| path == "/api/Rider/5")
            .times(1)
            .returning(|_, _| Ok(serde_json::Value::Null));

        let result = load_rider(&gateway, 5).await;
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
