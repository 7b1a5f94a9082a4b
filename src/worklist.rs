//! Worklist filtering and pagination over an in-memory list of trámites.

use serde::Serialize;

use crate::tramite::{Tramite, TramiteStatus};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Up to four predicates, ANDed. Empty predicates are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorklistFilter {
    pub case_number: Option<String>,
    pub client_name: Option<String>,
    pub cups: Option<String>,
    pub status: Option<TramiteStatus>,
}

impl WorklistFilter {
    pub fn is_empty(&self) -> bool {
        active(&self.case_number).is_none()
            && active(&self.client_name).is_none()
            && active(&self.cups).is_none()
            && self.status.is_none()
    }

    pub fn matches(&self, tramite: &Tramite) -> bool {
        if let Some(needle) = active(&self.case_number) {
            match tramite.case_number.as_deref() {
                Some(case_number) if contains_ignore_case(case_number, needle) => {}
                _ => return false,
            }
        }
        if let Some(needle) = active(&self.client_name) {
            if !contains_ignore_case(&tramite.client_name, needle) {
                return false;
            }
        }
        if let Some(needle) = active(&self.cups) {
            if !contains_ignore_case(&tramite.cups, needle) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if tramite.status != status {
                return false;
            }
        }
        true
    }

    /// Keep matching records in store order.
    pub fn apply(&self, tramites: Vec<Tramite>) -> Vec<Tramite> {
        if self.is_empty() {
            return tramites;
        }
        tramites.into_iter().filter(|t| self.matches(t)).collect()
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// One page of a filtered worklist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    /// 1-based index of the first item shown, 0 when the page is empty
    pub first_index: usize,
    /// 1-based index of the last item shown, 0 when the page is empty
    pub last_index: usize,
}

/// Slice `items` into the 1-based `page` of `per_page` items.
///
/// Page 0 is treated as page 1, a page size of 0 as the default. A page past
/// the end is empty.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let page = page.max(1);
    let per_page = if per_page == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        per_page
    };
    let total = items.len();
    let total_pages = total.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page);
    let items: Vec<T> = items.into_iter().skip(start).take(per_page).collect();
    let (first_index, last_index) = if items.is_empty() {
        (0, 0)
    } else {
        (start + 1, start + items.len())
    };

    Page {
        items,
        page,
        per_page,
        total,
        total_pages,
        first_index,
        last_index,
    }
}
