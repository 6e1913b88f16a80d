use crate::domain::rider::Rider;
use crate::domain::vehicle::Vehicle;
use crate::pagination::Paginated;

#[derive(Debug, Default, Clone)]
pub struct VehiclesQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
    /// Restrict the list to vehicles that can be taken.
    pub available_only: bool,
}

#[derive(Debug)]
pub struct VehiclesPageData {
    pub vehicles: Paginated<Vehicle>,
    pub search_query: Option<String>,
}

/// Data required by the take-vehicle form: what can be taken and by whom.
#[derive(Debug)]
pub struct TakeVehiclePageData {
    pub vehicles: Vec<Vehicle>,
    /// Active riders without a vehicle.
    pub riders: Vec<Rider>,
}
