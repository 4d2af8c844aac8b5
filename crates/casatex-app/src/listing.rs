// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{PageInfo, Product};

pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// One catalog list request, ready to be turned into query parameters.
///
/// Sorting is only requested for an unfiltered browse. The backend applies
/// its own relevance ordering to filtered queries, and sending an explicit
/// sort alongside a filter overrides that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub title: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<&'static str>,
    pub sort_order: Option<&'static str>,
}

impl ListQuery {
    /// The "fetch everything" query used to seed the suggestion index.
    pub fn for_suggestions(limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            title: None,
            category: None,
            sort_by: None,
            sort_order: None,
        }
    }
}

/// State behind one paginated catalog screen: the current page, the active
/// filters, the last page of products, and the server's pagination metadata.
#[derive(Debug, Clone, Default)]
pub struct CatalogPager {
    page_size: u32,
    page: u32,
    title_filter: String,
    category_filter: String,
    products: Vec<Product>,
    pagination: Option<PageInfo>,
    error: Option<String>,
}

impl CatalogPager {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 1,
            ..Self::default()
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn title_filter(&self) -> &str {
        &self.title_filter
    }

    pub fn category_filter(&self) -> &str {
        &self.category_filter
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn pagination(&self) -> Option<&PageInfo> {
        self.pagination.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_filtered(&self) -> bool {
        !self.title_filter.is_empty() || !self.category_filter.is_empty()
    }

    pub fn total_pages(&self) -> u32 {
        self.pagination.map(|p| p.total_pages.max(1)).unwrap_or(1)
    }

    pub fn has_next_page(&self) -> bool {
        self.pagination.is_some_and(|p| p.has_next_page)
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 1
    }

    /// The request matching the current page and filters.
    pub fn query(&self) -> ListQuery {
        let filtered = self.is_filtered();
        ListQuery {
            page: self.page,
            limit: self.page_size,
            title: (!self.title_filter.is_empty()).then(|| self.title_filter.clone()),
            category: (!self.category_filter.is_empty()).then(|| self.category_filter.clone()),
            sort_by: (!filtered).then_some("updatedAt"),
            sort_order: (!filtered).then_some("desc"),
        }
    }

    /// Accept a fetched page. When the first page comes back short, the
    /// server's page count is stale for the active filters, so the metadata
    /// is coerced down to a single page.
    pub fn apply_page(&mut self, products: Vec<Product>, mut pagination: PageInfo) {
        if self.page == 1 && (products.len() as u32) < self.page_size {
            pagination.total_pages = 1;
            pagination.has_next_page = false;
        }
        self.products = products;
        self.pagination = Some(pagination);
        self.error = None;
    }

    /// Record a fetch failure. The screen shows the message in place of
    /// the product grid; no retry is scheduled.
    pub fn apply_error(&mut self, message: impl Into<String>) {
        self.products.clear();
        self.pagination = None;
        self.error = Some(message.into());
    }

    /// Replace both filters and reset to page 1.
    pub fn set_filters(&mut self, title: impl Into<String>, category: impl Into<String>) {
        self.title_filter = title.into();
        self.category_filter = category.into();
        self.page = 1;
    }

    pub fn set_title_filter(&mut self, title: impl Into<String>) {
        self.title_filter = title.into();
        self.page = 1;
    }

    pub fn set_category_filter(&mut self, category: impl Into<String>) {
        self.category_filter = category.into();
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.title_filter.clear();
        self.category_filter.clear();
        self.page = 1;
    }

    /// Move to an absolute page, ignoring anything outside `[1, total_pages]`.
    /// Returns whether the page actually changed.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages() || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> bool {
        self.go_to_page(self.page.saturating_sub(1))
    }

    /// Reset for a fresh browse: page 1, no filters. Used after a product is
    /// created or edited so the re-sorted item shows up at the top.
    pub fn reset(&mut self) {
        self.clear_filters();
        self.products.clear();
        self.pagination = None;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogPager, DEFAULT_PAGE_SIZE, ListQuery};
    use crate::model::{PageInfo, Product};

    fn product(title: &str) -> Product {
        serde_json::from_str(&format!(r#"{{"id": "p", "title": "{title}"}}"#)).expect("product")
    }

    fn page_info(page: u32, total_pages: u32, has_next_page: bool) -> PageInfo {
        PageInfo {
            total: u64::from(total_pages) * u64::from(DEFAULT_PAGE_SIZE),
            page,
            limit: DEFAULT_PAGE_SIZE,
            total_pages,
            has_next_page,
            has_prev_page: page > 1,
        }
    }

    #[test]
    fn unfiltered_query_requests_recency_sort() {
        let pager = CatalogPager::new(DEFAULT_PAGE_SIZE);
        let query = pager.query();
        assert_eq!(query.limit, 9);
        assert_eq!(query.page, 1);
        assert_eq!(query.sort_by, Some("updatedAt"));
        assert_eq!(query.sort_order, Some("desc"));
        assert_eq!(query.title, None);
    }

    #[test]
    fn filtered_query_drops_the_sort() {
        let mut pager = CatalogPager::new(DEFAULT_PAGE_SIZE);
        pager.set_filters("durry", "");
        let query = pager.query();
        assert_eq!(query.title.as_deref(), Some("durry"));
        assert_eq!(query.category, None);
        assert_eq!(query.sort_by, None);
        assert_eq!(query.sort_order, None);
    }

    #[test]
    fn short_first_page_coerces_pagination() {
        let mut pager = CatalogPager::new(DEFAULT_PAGE_SIZE);
        pager.apply_page(
            vec![product("a"), product("b")],
            page_info(1, 7, true),
        );
        assert_eq!(pager.total_pages(), 1);
        assert!(!pager.has_next_page());
    }

    #[test]
    fn full_first_page_keeps_server_pagination() {
        let mut pager = CatalogPager::new(2);
        pager.apply_page(vec![product("a"), product("b")], page_info(1, 3, true));
        assert_eq!(pager.total_pages(), 3);
        assert!(pager.has_next_page());
    }

    #[test]
    fn short_later_page_is_left_alone() {
        let mut pager = CatalogPager::new(2);
        pager.apply_page(vec![product("a"), product("b")], page_info(1, 2, true));
        assert!(pager.next_page());
        pager.apply_page(vec![product("c")], page_info(2, 2, false));
        assert_eq!(pager.total_pages(), 2);
        assert_eq!(pager.page(), 2);
    }

    #[test]
    fn page_changes_clamp_to_known_range() {
        let mut pager = CatalogPager::new(2);
        pager.apply_page(vec![product("a"), product("b")], page_info(1, 3, true));

        assert!(!pager.prev_page(), "page 1 has no previous page");
        assert!(!pager.go_to_page(4), "past the last page");
        assert!(!pager.go_to_page(0));
        assert!(pager.go_to_page(3));
        assert_eq!(pager.page(), 3);
    }

    #[test]
    fn setting_filters_resets_to_page_one() {
        let mut pager = CatalogPager::new(2);
        pager.apply_page(vec![product("a"), product("b")], page_info(1, 3, true));
        pager.next_page();
        assert_eq!(pager.page(), 2);

        pager.set_title_filter("rug");
        assert_eq!(pager.page(), 1);

        pager.clear_filters();
        assert!(!pager.is_filtered());
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn errors_clear_items_and_metadata() {
        let mut pager = CatalogPager::new(2);
        pager.apply_page(vec![product("a"), product("b")], page_info(1, 3, true));
        pager.apply_error("failed to load products");

        assert!(pager.products().is_empty());
        assert_eq!(pager.pagination(), None);
        assert_eq!(pager.error(), Some("failed to load products"));

        pager.apply_page(vec![product("c"), product("d")], page_info(1, 2, true));
        assert_eq!(pager.error(), None);
    }

    #[test]
    fn suggestion_query_is_a_plain_bulk_fetch() {
        let query = ListQuery::for_suggestions(1000);
        assert_eq!(query.limit, 1000);
        assert_eq!(query.page, 1);
        assert_eq!(query.sort_by, None);
    }
}
