use crate::domain::spare_part::SparePart;
use crate::stats::InventorySummary;

#[derive(Debug)]
pub struct SparePartsPageData {
    pub parts: Vec<SparePart>,
    pub search_query: Option<String>,
    /// Computed over the full inventory, not the filtered rows.
    pub summary: InventorySummary,
}
