//! Query-string pagination and the list response envelope.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, Page, PageOf};

/// Raw `?page=&limit=` query values. Validation happens in [`Page`].
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number, defaults to 1.
    pub page: Option<i64>,
    /// Page size, defaults to 20 (50 for comments and messages), capped at 100.
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn to_page(self) -> Result<Page, Error> {
        Page::new(self.page, self.limit)
    }

    pub fn to_page_with_default(self, default_limit: i64) -> Result<Page, Error> {
        Page::with_default_limit(self.page, self.limit, default_limit)
    }
}

/// Paginated response envelope: `{ "data": [...], "total": n, "page": p, "limit": l }`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T> From<PageOf<T>> for Paginated<T> {
    fn from(page: PageOf<T>) -> Self {
        Self {
            data: page.items,
            total: page.total,
            page: page.page,
            limit: page.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_keeps_the_paging_fields() {
        let page = Page::new(Some(3), Some(10)).expect("valid page");
        let envelope: Paginated<i32> = PageOf::new(vec![1, 2, 3], 42, page).into();
        assert_eq!(envelope.data, vec![1, 2, 3]);
        assert_eq!(envelope.total, 42);
        assert_eq!(envelope.page, 3);
        assert_eq!(envelope.limit, 10);
    }

    #[test]
    fn invalid_query_values_are_rejected() {
        let query = PageQuery {
            page: Some(0),
            limit: None,
        };
        assert!(query.to_page().is_err());
    }
}
