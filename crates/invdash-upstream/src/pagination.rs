//! Offset pagination and listing filters for the upstream `/products` endpoint.
//!
//! The upstream API accepts both `offset` and a 1-based `page`; different
//! deployments honour one or the other, so every request carries both.
//!
//! ```text
//! /products?limit=100&offset=200&page=3&search=caneca&categoryId=12
//! ```

/// Page size used when a caller does not set one.
pub const DEFAULT_LIMIT: u32 = 20;

/// One page of the product listing, with optional filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number. `0` is treated as `1`.
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub supplier_id: Option<String>,
    pub order_by: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            search: None,
            category_id: None,
            supplier_id: None,
            order_by: None,
        }
    }
}

impl ListQuery {
    /// Unfiltered listing page with the given number and size.
    #[must_use]
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    #[must_use]
    pub fn with_supplier(mut self, supplier_id: impl Into<String>) -> Self {
        self.supplier_id = Some(supplier_id.into());
        self
    }

    #[must_use]
    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Page number clamped to at least 1.
    #[must_use]
    pub fn effective_page(&self) -> u32 {
        self.page.max(1)
    }

    /// Zero-based record offset of this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.effective_page() - 1) * u64::from(self.limit)
    }

    /// Query pairs in the order they are appended to the URL. Blank filters
    /// are omitted.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset().to_string()),
            ("page", self.effective_page().to_string()),
        ];
        let filters = [
            ("search", &self.search),
            ("categoryId", &self.category_id),
            ("supplierId", &self.supplier_id),
            ("orderBy", &self.order_by),
        ];
        for (key, value) in filters {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, value.to_owned()));
            }
        }
        pairs
    }
}
