//! In-memory search boxes over fetched lists.
//!
//! Lists are small (tens to low hundreds of rows), so every keystroke is a
//! plain linear scan without any index.

use crate::domain::housing::Housing;
use crate::domain::rider::Rider;
use crate::domain::spare_part::SparePart;
use crate::domain::vehicle::Vehicle;

/// Fields a page's search box looks at.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

/// Case-insensitive substring match of `query` against any search field.
///
/// The query is trimmed; an empty query keeps everything. Order is preserved.
pub fn filter_items<T: Searchable + Clone>(items: &[T], query: &str) -> Vec<T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| matches_query(*item, &needle))
        .cloned()
        .collect()
}

fn matches_query<T: Searchable>(item: &T, needle: &str) -> bool {
    item.search_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

impl Searchable for Rider {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.iqama_no.as_str()];
        fields.extend(
            [&self.work_id, &self.phone, &self.vehicle_plate]
                .into_iter()
                .filter_map(|field| field.as_deref()),
        );
        fields
    }
}

impl Searchable for Vehicle {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.plate_number.as_str()];
        fields.extend(
            [&self.make, &self.model, &self.rider_name, &self.rider_iqama]
                .into_iter()
                .filter_map(|field| field.as_deref()),
        );
        fields
    }
}

impl Searchable for Housing {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.address.as_deref());
        fields
    }
}

impl Searchable for SparePart {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(
            [&self.part_number, &self.vehicle_type]
                .into_iter()
                .filter_map(|field| field.as_deref()),
        );
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rider(id: i32, name: &str, iqama: &str) -> Rider {
        Rider {
            id,
            name: name.to_string(),
            iqama_no: iqama.to_string(),
            ..Rider::default()
        }
    }

    fn riders() -> Vec<Rider> {
        vec![
            rider(1, "Omar Farouk", "2098765432"),
            rider(2, "Ahmed Ali", "2212345678"),
            rider(3, "Bilal Khan", "2300000001"),
        ]
    }

    #[test]
    fn iqama_search_finds_the_single_rider() {
        let result = filter_items(&riders(), "12345");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);
    }

    #[test]
    fn empty_query_returns_the_list() {
        assert_eq!(filter_items(&riders(), ""), riders());
        assert_eq!(filter_items(&riders(), "   "), riders());
    }

    #[test]
    fn search_is_case_insensitive() {
        assert_eq!(
            filter_items(&riders(), "AHMED"),
            filter_items(&riders(), "ahmed")
        );
        assert_eq!(filter_items(&riders(), "AhMeD").len(), 1);
    }

    #[test]
    fn result_is_an_ordered_subset() {
        let list = riders();
        let result = filter_items(&list, "a");
        assert!(result.iter().all(|r| list.contains(r)));
        let ids: Vec<_> = result.iter().map(|r| r.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn longer_queries_never_grow_the_result() {
        let list = riders();
        let query = "ahmed ali";
        let mut previous = filter_items(&list, "").len();
        for end in 1..=query.len() {
            let current = filter_items(&list, &query[..end]).len();
            assert!(current <= previous, "query {:?} grew the result", &query[..end]);
            previous = current;
        }
    }

    #[test]
    fn optional_fields_are_searched() {
        let mut list = riders();
        list[2].vehicle_plate = Some("XYZ 987".to_string());
        let result = filter_items(&list, "xyz");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 3);
    }

    #[test]
    fn vehicles_match_plate_and_rider() {
        let vehicles = vec![
            Vehicle {
                plate_number: "ABC 123".to_string(),
                rider_name: Some("Omar".to_string()),
                ..Vehicle::default()
            },
            Vehicle {
                plate_number: "KLM 456".to_string(),
                ..Vehicle::default()
            },
        ];
        assert_eq!(filter_items(&vehicles, "abc").len(), 1);
        assert_eq!(filter_items(&vehicles, "omar").len(), 1);
        assert!(filter_items(&vehicles, "zzz").is_empty());
    }
}
