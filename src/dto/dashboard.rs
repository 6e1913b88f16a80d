use serde::Serialize;

use crate::stats::{FleetSummary, InventorySummary, RiderSummary};

/// Statistic cards for the landing page.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub fleet: FleetSummary,
    pub riders: RiderSummary,
    pub inventory: InventorySummary,
}
