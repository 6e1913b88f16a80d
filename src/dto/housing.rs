use crate::domain::housing::Housing;

#[derive(Debug)]
pub struct HousingPageData {
    pub units: Vec<Housing>,
    pub search_query: Option<String>,
    pub total_capacity: u32,
    pub total_residents: usize,
}
