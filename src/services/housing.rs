use crate::domain::housing::{Housing, HousingPayload};
use crate::domain::types::HousingName;
use crate::dto::housing::HousingPageData;
use crate::dto::mutation::MutationOutcome;
use crate::forms::housing::HousingForm;
use crate::gateway::{GatewayReader, GatewayWriter};
use crate::resource::Resource;
use crate::search::filter_items;
use crate::services::ServiceResult;
use crate::services::{Write, fetch_list, fetch_one, remove, search_term, send};

pub const HOUSING_PATH: &str = "/api/Housing";
const HOUSING_PAGE: &str = "/housing";

pub fn housing_list_resource() -> Resource {
    Resource::new(HOUSING_PATH)
}

pub fn housing_resource(name: &HousingName) -> Resource {
    Resource::new(HOUSING_PATH).segment(name.as_str())
}

/// Loads the housing units; totals cover every unit, not just the matches.
pub async fn load_housing_page<G>(gateway: &G, search: Option<String>) -> ServiceResult<HousingPageData>
where
    G: GatewayReader + ?Sized,
{
    let units: Vec<Housing> = fetch_list(gateway, &housing_list_resource()).await?;

    let total_capacity = units.iter().filter_map(|u| u.capacity).sum();
    let total_residents = units.iter().map(|u| u.riders.len()).sum();

    let search_query = search_term(search);
    let units = match &search_query {
        Some(term) => filter_items(&units, term),
        None => units,
    };

    Ok(HousingPageData {
        units,
        search_query,
        total_capacity,
        total_residents,
    })
}

/// Housing detail including the assigned riders.
pub async fn load_housing<G>(gateway: &G, name: &str) -> ServiceResult<Housing>
where
    G: GatewayReader + ?Sized,
{
    let name = HousingName::new(name)?;
    fetch_one(gateway, &housing_resource(&name)).await
}

pub async fn add_housing<G>(gateway: &G, form: &HousingForm) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let payload = HousingPayload::try_from(form).map_err(|err| {
        log::error!("Failed to validate housing form: {err}");
        err
    })?;

    let response = send(gateway, Write::Post, HOUSING_PATH, &payload).await?;

    Ok(
        MutationOutcome::new(format!("Housing {} was added.", payload.name), response)
            .redirect_to(HOUSING_PAGE),
    )
}

/// Updates the unit currently named `name`; the form may rename it.
pub async fn update_housing<G>(
    gateway: &G,
    name: &str,
    form: &HousingForm,
) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let name = HousingName::new(name)?;
    let payload = HousingPayload::try_from(form).map_err(|err| {
        log::error!("Failed to validate housing form: {err}");
        err
    })?;

    let path = housing_resource(&name);
    let response = send(gateway, Write::Put, path.path(), &payload).await?;

    Ok(
        MutationOutcome::new(format!("Housing {} was updated.", payload.name), response)
            .redirect_to(HOUSING_PAGE),
    )
}

pub async fn delete_housing<G>(gateway: &G, name: &str) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let name = HousingName::new(name)?;
    let response = remove(gateway, housing_resource(&name).path()).await?;
    Ok(MutationOutcome::new(format!("Housing {name} was deleted."), response))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::services::ServiceError;

    #[tokio::test]
    async fn housing_names_with_spaces_are_encoded() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_get()
            .withf(|path, _| path == "/api/Housing/Villa%203")
            .times(1)
            .returning(|_, _| {
                Ok(json!({
                    "name": "Villa 3",
                    "capacity": 4,
                    "riders": [{"id": 1, "name": "Omar"}]
                }))
            });

        let unit = load_housing(&gateway, "Villa 3").await.expect("unit");
        assert_eq!(unit.riders.len(), 1);
        assert_eq!(unit.vacancies(), Some(3));
    }

    #[tokio::test]
    async fn page_totals_ignore_the_search() {
        let mut gateway = MockGateway::new();
        gateway.expect_get().times(1).returning(|_, _| {
            Ok(json!([
                {"name": "Villa 3", "capacity": 4, "riders": [{"id": 1}]},
                {"name": "Tower B", "capacity": 10}
            ]))
        });

        let data = load_housing_page(&gateway, Some("tower".to_string()))
            .await
            .expect("page");
        assert_eq!(data.units.len(), 1);
        assert_eq!(data.total_capacity, 14);
        assert_eq!(data.total_residents, 1);
    }

    #[tokio::test]
    async fn invalid_capacity_sends_nothing() {
        let mut gateway = MockGateway::new();
        gateway.expect_post().times(0);

        let form = HousingForm {
            name: "Villa 3".to_string(),
            capacity: "four".to_string(),
            ..HousingForm::default()
        };
        let result = add_housing(&gateway, &form).await;
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[tokio::test]
    async fn update_puts_to_the_old_name() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_put()
            .withf(|path, body| path == "/api/Housing/Villa%203" && body["name"] == json!("Villa 4"))
            .times(1)
            .returning(|_, _| Ok(Value::Null));

        let form = HousingForm {
            name: "Villa 4".to_string(),
            ..HousingForm::default()
        };
        update_housing(&gateway, "Villa 3", &form)
            .await
            .expect("updated");
    }
}
