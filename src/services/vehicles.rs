//! Services backing the vehicles pages: list, lookup by plate, take/return
//! flows and status changes.

use crate::domain::rider::{Rider, RiderStatus};
use crate::domain::types::PlateNumber;
use crate::domain::vehicle::{NewVehicle, ReturnVehicle, TakeVehicle, Vehicle, VehicleProblemReport};
use crate::dto::mutation::MutationOutcome;
use crate::dto::vehicles::{TakeVehiclePageData, VehiclesPageData, VehiclesQuery};
use crate::forms::vehicles::{
    AddVehicleForm, ReportProblemForm, ReturnVehicleForm, TakeVehicleForm, VehicleStatusForm,
    VehicleStatusPayload,
};
use crate::gateway::{GatewayReader, GatewayWriter};
use crate::pagination::Paginated;
use crate::resource::Resource;
use crate::search::filter_items;
use crate::services::riders::riders_resource;
use crate::services::{ServiceError, ServiceResult};
use crate::services::{Write, fetch_list, fetch_one, remove, search_term, send};

pub const VEHICLES_PATH: &str = "/api/vehicles";
const VEHICLES_PAGE: &str = "/vehicles";

pub fn vehicles_resource(available_only: bool) -> Resource {
    let resource = Resource::new(VEHICLES_PATH);
    if available_only {
        resource.segment("available")
    } else {
        resource
    }
}

pub fn vehicle_by_plate_resource(plate: &PlateNumber) -> Resource {
    Resource::new(VEHICLES_PATH)
        .segment("plate")
        .segment(plate.as_str())
}

fn action_path(action: &str) -> String {
    format!("{VEHICLES_PATH}/{action}")
}

pub async fn load_vehicles_page<G>(
    gateway: &G,
    query: VehiclesQuery,
    per_page: usize,
) -> ServiceResult<VehiclesPageData>
where
    G: GatewayReader + ?Sized,
{
    let vehicles: Vec<Vehicle> =
        fetch_list(gateway, &vehicles_resource(query.available_only)).await?;

    let search_query = search_term(query.search);
    let vehicles = match &search_query {
        Some(term) => filter_items(&vehicles, term),
        None => vehicles,
    };

    Ok(VehiclesPageData {
        vehicles: Paginated::from_items(vehicles, query.page.unwrap_or(1), per_page),
        search_query,
    })
}

pub async fn load_available_vehicles<G>(gateway: &G) -> ServiceResult<Vec<Vehicle>>
where
    G: GatewayReader + ?Sized,
{
    fetch_list(gateway, &vehicles_resource(true)).await
}

/// Looks a vehicle up by plate; the plate is normalized before the request.
pub async fn find_vehicle_by_plate<G>(gateway: &G, plate: &str) -> ServiceResult<Vehicle>
where
    G: GatewayReader + ?Sized,
{
    let plate = PlateNumber::new(plate)?;
    fetch_one(gateway, &vehicle_by_plate_resource(&plate)).await
}

/// Available vehicles and riders are fetched together; only active riders
/// without a vehicle are offered.
pub async fn load_take_vehicle_page<G>(gateway: &G) -> ServiceResult<TakeVehiclePageData>
where
    G: GatewayReader + ?Sized,
{
    let riders_list = riders_resource();
    let (vehicles, riders) = tokio::try_join!(
        load_available_vehicles(gateway),
        fetch_list::<Rider, G>(gateway, &riders_list),
    )?;

    let riders = riders
        .into_iter()
        .filter(|r| r.status == RiderStatus::Active)
        .filter(|r| r.vehicle_plate.as_deref().is_none_or(|p| p.trim().is_empty()))
        .collect();

    Ok(TakeVehiclePageData { vehicles, riders })
}

pub async fn add_vehicle<G>(gateway: &G, form: &AddVehicleForm) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let new_vehicle = NewVehicle::try_from(form).map_err(|err| {
        log::error!("Failed to validate vehicle form: {err}");
        err
    })?;

    let response = send(gateway, Write::Post, VEHICLES_PATH, &new_vehicle).await?;

    Ok(MutationOutcome::new(
        format!("Vehicle {} was added.", new_vehicle.plate_number),
        response,
    )
    .redirect_to(VEHICLES_PAGE))
}

pub async fn delete_vehicle<G>(gateway: &G, plate: &str) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let plate = PlateNumber::new(plate)?;
    let path = Resource::new(VEHICLES_PATH).segment(plate.as_str());
    let response = remove(gateway, path.path()).await?;
    Ok(MutationOutcome::new(format!("Vehicle {plate} was deleted."), response))
}

pub async fn take_vehicle<G>(gateway: &G, form: &TakeVehicleForm) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let take = TakeVehicle::try_from(form).map_err(|err| {
        log::error!("Failed to validate take vehicle form: {err}");
        err
    })?;

    let response = send(gateway, Write::Post, &action_path("take"), &take).await?;

    Ok(MutationOutcome::new(
        format!(
            "Vehicle {} was assigned to rider {}.",
            take.plate_number, take.rider_iqama
        ),
        response,
    )
    .redirect_to(VEHICLES_PAGE))
}

pub async fn return_vehicle<G>(
    gateway: &G,
    form: &ReturnVehicleForm,
) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let returned = ReturnVehicle::try_from(form).map_err(|err| {
        log::error!("Failed to validate return vehicle form: {err}");
        err
    })?;

    let response = send(gateway, Write::Post, &action_path("return"), &returned).await?;

    Ok(MutationOutcome::new(
        format!("Vehicle {} was returned.", returned.plate_number),
        response,
    )
    .redirect_to(VEHICLES_PAGE))
}

pub async fn report_problem<G>(
    gateway: &G,
    form: &ReportProblemForm,
) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let report = VehicleProblemReport::try_from(form).map_err(|err| {
        log::error!("Failed to validate problem report: {err}");
        err
    })?;

    let response = send(gateway, Write::Post, &action_path("report-problem"), &report).await?;

    Ok(MutationOutcome::new(
        format!("Problem with vehicle {} was reported.", report.plate_number),
        response,
    )
    .redirect_to(VEHICLES_PAGE))
}

/// Identical current and new statuses are rejected before any request.
pub async fn change_vehicle_status<G>(
    gateway: &G,
    form: &VehicleStatusForm,
) -> ServiceResult<MutationOutcome>
where
    G: GatewayWriter + ?Sized,
{
    let payload = VehicleStatusPayload::try_from(form).map_err(|err| {
        log::error!("Rejected vehicle status change: {err}");
        ServiceError::from(err)
    })?;

    let path = Resource::new(VEHICLES_PATH)
        .segment(payload.plate_number.as_str())
        .segment("status");
    let response = send(gateway, Write::Put, path.path(), &payload.change).await?;

    Ok(MutationOutcome::new(
        format!(
            "Vehicle {} is now {}.",
            payload.plate_number, payload.change.new_status
        ),
        response,
    )
    .redirect_to(VEHICLES_PAGE))
}
