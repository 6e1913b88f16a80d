use serde::Serialize;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Page links with `None` marking a gap, e.g. `1 2 … 5 6 [7] 8 … 19 20`.
fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = current_page
        .saturating_add(right_current + 1)
        .min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// One table page of an in-memory list.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    /// Number of rows across all pages.
    pub total: usize,
}

impl<T> Paginated<T> {
    /// Slices `items` to the requested page. Page 0 is treated as page 1 and
    /// a page past the end as the last page.
    pub fn from_items(items: Vec<T>, current_page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total = items.len();
        let total_pages = total.div_ceil(per_page);
        let current_page = current_page.clamp(1, total_pages.max(1));

        let items = items
            .into_iter()
            .skip((current_page - 1) * per_page)
            .take(per_page)
            .collect();

        let pages = get_pages(total_pages, current_page, 2, 2, 4, 2);

        Self {
            items,
            pages,
            page: current_page,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pages_for_an_empty_list() {
        let page = Paginated::<i32>::from_items(Vec::new(), 1, 20);
        assert!(page.items.is_empty());
        assert!(page.pages.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn page_zero_is_the_first_page() {
        let page = Paginated::from_items((1..=30).collect(), 0, 20);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.pages, vec![Some(1), Some(2)]);
    }

    #[test]
    fn later_pages_are_sliced() {
        let page = Paginated::from_items((1..=45).collect(), 3, 20);
        assert_eq!(page.items, (41..=45).collect::<Vec<_>>());
        assert_eq!(page.total, 45);
    }

    #[test]
    fn page_past_the_end_is_the_last_page() {
        let page = Paginated::from_items((1..=45).collect(), 9, 20);
        assert_eq!(page.page, 3);
        assert_eq!(page.items, (41..=45).collect::<Vec<_>>());

        let page = Paginated::from_items(vec![1, 2, 3], usize::MAX, 20);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.pages, vec![Some(1)]);
    }

    #[test]
    fn gaps_are_marked_in_long_ranges() {
        assert_eq!(
            get_pages(20, 10, 2, 2, 4, 2),
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20)
            ]
        );
    }
}
