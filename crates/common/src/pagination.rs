//! Pagination and sorting utilities.
//!
//! Page numbers are 1-based. [`PaginationParams::new`] clamps whatever the
//! caller supplies into a usable range, so repositories can accept raw
//! request values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default page number (1-indexed)
const DEFAULT_PAGE: u32 = 1;

/// Default items per page
const DEFAULT_PER_PAGE: u32 = 20;

/// Maximum items per page
const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters for API requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Items per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PaginationParams {
    /// Create new pagination parameters.
    pub fn new(page: u32, per_page: u32) -> Self {
        let page = if page == 0 { DEFAULT_PAGE } else { page };
        let per_page = if per_page == 0 {
            DEFAULT_PER_PAGE
        } else {
            per_page.min(MAX_PER_PAGE)
        };

        Self { page, per_page }
    }

    /// Re-apply the clamping rules to possibly hand-built parameters.
    pub fn normalized(&self) -> Self {
        Self::new(self.page, self.per_page)
    }

    /// Calculate the offset for database queries (0-indexed).
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Get the limit for database queries.
    pub fn limit(&self) -> u32 {
        self.per_page
    }

    /// Validate pagination parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("Page number must be greater than 0".to_string());
        }
        if self.per_page == 0 {
            return Err("Items per page must be greater than 0".to_string());
        }
        if self.per_page > MAX_PER_PAGE {
            return Err(format!(
                "Items per page cannot exceed {}",
                MAX_PER_PAGE
            ));
        }
        Ok(())
    }
}

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order
    Asc,
    /// Descending order
    Desc,
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Asc
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "ASC"),
            Self::Desc => write!(f, "DESC"),
        }
    }
}

impl From<&str> for SortDirection {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "desc" | "descending" => Self::Desc,
            _ => Self::Asc,
        }
    }
}

/// Sort parameters for API requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortParams {
    /// Field to sort by
    pub field: String,

    /// Sort direction
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortParams {
    /// Create new sort parameters.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Create ascending sort parameters.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Create descending sort parameters.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

impl Default for SortParams {
    fn default() -> Self {
        Self {
            field: "created_at".to_string(),
            direction: SortDirection::Desc,
        }
    }
}

/// Paginated result wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    /// The items for the current page
    pub items: Vec<T>,

    /// Current page number (1-indexed)
    pub page: u32,

    /// Items per page
    pub per_page: u32,

    /// Total number of items across all pages
    pub total: u64,

    /// Total number of pages
    pub total_pages: u32,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl<T> PaginatedResult<T> {
    /// Create a new paginated result.
    pub fn new(items: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(u64::from(per_page)) as u32
        };
        let has_next = page < total_pages;
        let has_prev = page > 1;

        Self {
            items,
            page,
            per_page,
            total,
            total_pages,
            has_next,
            has_prev,
        }
    }

    /// Create from pagination parameters and total count.
    pub fn from_params(items: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        Self::new(items, params.page, params.per_page, total)
    }

    /// Map the items to a different type.
    pub fn map<U, F>(self, f: F) -> PaginatedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params_default() {
        let params = PaginationParams::default();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 20);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), 20);
    }

    #[test]
    fn test_pagination_params_new() {
        let params = PaginationParams::new(2, 50);
        assert_eq!(params.page, 2);
        assert_eq!(params.per_page, 50);
        assert_eq!(params.offset(), 50);
        assert_eq!(params.limit(), 50);
    }

    #[test]
    fn test_pagination_params_zero_page() {
        let params = PaginationParams::new(0, 20);
        assert_eq!(params.page, 1);
    }

    #[test]
    fn test_pagination_params_max_per_page() {
        let params = PaginationParams::new(1, 200);
        assert_eq!(params.per_page, 100);
    }

    #[test]
    fn test_pagination_params_validation() {
        let valid = PaginationParams::new(1, 20);
        assert!(valid.validate().is_ok());

        let mut invalid = PaginationParams { page: 0, per_page: 20 };
        assert!(invalid.validate().is_err());

        invalid = PaginationParams { page: 1, per_page: 0 };
        assert!(invalid.validate().is_err());

        invalid = PaginationParams { page: 1, per_page: 101 };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_sort_direction() {
        assert_eq!(SortDirection::from("asc"), SortDirection::Asc);
        assert_eq!(SortDirection::from("desc"), SortDirection::Desc);
        assert_eq!(SortDirection::from("descending"), SortDirection::Desc);
        assert_eq!(SortDirection::from("invalid"), SortDirection::Asc);
    }

    #[test]
    fn test_sort_params() {
        let sort = SortParams::asc("name");
        assert_eq!(sort.field, "name");
        assert_eq!(sort.direction, SortDirection::Asc);

        let sort = SortParams::desc("created_at");
        assert_eq!(sort.field, "created_at");
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn test_paginated_result() {
        let items = vec![1, 2, 3, 4, 5];
        let result = PaginatedResult::new(items, 2, 5, 25);

        assert_eq!(result.page, 2);
        assert_eq!(result.per_page, 5);
        assert_eq!(result.total, 25);
        assert_eq!(result.total_pages, 5);
        assert!(result.has_next);
        assert!(result.has_prev);
    }

    #[test]
    fn test_paginated_result_map() {
        let items = vec![1, 2, 3];
        let result = PaginatedResult::new(items, 1, 3, 10);
        let mapped = result.map(|x| x * 2);

        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.total, 10);
    }

    #[test]
    fn test_pagination_offset_past_end() {
        let params = PaginationParams::new(4, 10);
        assert_eq!(params.offset(), 30);

        let page = PaginatedResult::<u8>::from_params(vec![], &params, 25);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn test_normalized_reclamps() {
        let raw = PaginationParams { page: 0, per_page: 5000 };
        let params = raw.normalized();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 100);
    }

    #[test]
    fn test_empty_result() {
        let page = PaginatedResult::<u8>::from_params(Vec::new(), &PaginationParams::default(), 0);
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    proptest::proptest! {
        #[test]
        fn prop_clamped_params_stay_in_range(page in 0u32..10_000, per_page in 0u32..10_000) {
            let params = PaginationParams::new(page, per_page);
            proptest::prop_assert!(params.page >= 1);
            proptest::prop_assert!((1..=100).contains(&params.per_page));
            proptest::prop_assert!(params.validate().is_ok());
        }

        #[test]
        fn prop_total_pages_cover_all_items(total in 0u64..100_000, per_page in 1u32..=100) {
            let page = PaginatedResult::<u8>::new(vec![], 1, per_page, total);
            let capacity = u64::from(page.total_pages) * u64::from(per_page);
            proptest::prop_assert!(capacity >= total);
            proptest::prop_assert!(capacity < total + u64::from(per_page) || total == 0);
        }
    }
}
