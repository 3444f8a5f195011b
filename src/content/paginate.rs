//! Ordering and pagination of content collections

use serde::Serialize;
use std::num::NonZeroUsize;

use super::ContentRecord;
use crate::config::SiteConfig;
use crate::helpers::page_url;

/// Sort newest first. Records with the same date keep their input order.
pub fn sort_by_date_descending<T: ContentRecord>(records: &mut [T]) {
    // slice::sort_by is stable
    records.sort_by(|a, b| b.date().instant().cmp(a.date().instant()));
}

/// Number of pages needed for `total` records; zero when there are none
pub fn page_count(total: usize, per_page: NonZeroUsize) -> usize {
    total.div_ceil(per_page.get())
}

/// A window over a sorted collection
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based
    pub number: usize,
    pub page_count: usize,
    pub per_page: usize,
}

impl<T> Clone for Page<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Page<'_, T> {}

impl<T> Page<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_first(&self) -> bool {
        self.number == 1
    }

    pub fn is_last(&self) -> bool {
        self.number >= self.page_count
    }
}

/// Select page `page` (1-based) of `records`.
///
/// Page 0 and pages past the end are empty. Route enumeration never asks
/// for those; see [`page_routes`].
pub fn paginate<T>(records: &[T], per_page: NonZeroUsize, page: usize) -> Page<'_, T> {
    let size = per_page.get();
    let items = match page.checked_sub(1) {
        Some(index) => {
            let start = index.saturating_mul(size).min(records.len());
            let end = start.saturating_add(size).min(records.len());
            &records[start..end]
        }
        None => &records[..0],
    };

    Page {
        items,
        number: page,
        page_count: page_count(records.len(), per_page),
        per_page: size,
    }
}

/// Page numbers that get their own route under the pagination directory.
/// Page 1 lives at the blog root.
pub fn page_routes(page_count: usize) -> impl Iterator<Item = usize> {
    2..=page_count
}

/// A numbered link in the page navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: usize,
    pub url: String,
    pub current: bool,
}

/// Navigation data for one blog index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub per_page: usize,
    pub total: usize,
    pub current: usize,
    pub current_url: String,
    /// Newer posts
    pub prev_link: Option<String>,
    /// Older posts
    pub next_link: Option<String>,
    pub links: Vec<PageLink>,
}

impl Pagination {
    pub fn new(config: &SiteConfig, page: &Page<'_, impl Sized>) -> Self {
        let current = page.number;
        let total = page.page_count;

        let links = (1..=total)
            .map(|number| PageLink {
                number,
                url: page_url(config, number),
                current: number == current,
            })
            .collect();

        Self {
            per_page: page.per_page,
            total,
            current,
            current_url: page_url(config, current),
            prev_link: (current > 1).then(|| page_url(config, current - 1)),
            next_link: (current < total).then(|| page_url(config, current + 1)),
            links,
        }
    }

    /// Navigation is only shown with two or more pages
    pub fn is_needed(&self) -> bool {
        self.total >= 2
    }
}
