use crate::domain::rider::Rider;
use crate::pagination::Paginated;

/// Query parameters accepted by the riders list page.
#[derive(Debug, Default, Clone)]
pub struct RidersQuery {
    /// Free-text search over name, iqama, work id, phone and plate.
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the riders table.
#[derive(Debug)]
pub struct RidersPageData {
    pub riders: Paginated<Rider>,
    /// Search query echoed back to the search box when present.
    pub search_query: Option<String>,
}
