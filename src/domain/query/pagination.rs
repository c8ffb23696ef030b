//! Page links for list responses

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub page: u64,
    pub limit: u64,
}

/// `next` / `prev` descriptors; either may be absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

impl Pagination {
    /// `next` exists iff `page * limit < total`; `prev` iff `page > 1`.
    pub fn compute(page: u64, limit: u64, total: u64) -> Self {
        let start_index = page.saturating_sub(1).saturating_mul(limit);
        let end_index = page.saturating_mul(limit);

        Self {
            next: (end_index < total).then_some(PageLink {
                page: page + 1,
                limit,
            }),
            prev: (start_index > 0).then_some(PageLink {
                page: page - 1,
                limit,
            }),
        }
    }
}

/// Which records the pagination total is counted over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountScope {
    /// Records matching the request's filter
    #[default]
    Filtered,
    /// The whole collection, ignoring filters
    Collection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_page_has_both_links() {
        let p = Pagination::compute(2, 10, 25);
        assert_eq!(p.prev, Some(PageLink { page: 1, limit: 10 }));
        assert_eq!(p.next, Some(PageLink { page: 3, limit: 10 }));
    }

    #[test]
    fn first_and_last_pages() {
        let first = Pagination::compute(1, 10, 25);
        assert!(first.prev.is_none());
        assert!(first.next.is_some());

        let last = Pagination::compute(3, 10, 25);
        assert!(last.prev.is_some());
        assert!(last.next.is_none());
    }

    #[test]
    fn exact_fit_has_no_next() {
        assert!(Pagination::compute(1, 25, 25).next.is_none());
        assert!(Pagination::compute(1, 25, 0).next.is_none());
    }

    #[test]
    fn links_follow_page_and_total_for_all_small_inputs() {
        for page in 1..=6u64 {
            for limit in 1..=6u64 {
                for total in 0..=40u64 {
                    let p = Pagination::compute(page, limit, total);
                    assert_eq!(p.next.is_some(), page * limit < total, "{page}/{limit}/{total}");
                    assert_eq!(p.prev.is_some(), page > 1, "{page}/{limit}/{total}");
                }
            }
        }
    }

    #[test]
    fn empty_links_serialize_as_empty_object() {
        let json = serde_json::to_value(Pagination::compute(1, 25, 3)).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
