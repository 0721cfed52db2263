//! Offset pagination shared by list operations.

use super::error::Error;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// A validated page request. Page numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: i64,
    limit: i64,
}

impl Page {
    /// Validate raw query values. Missing values fall back to page 1 with
    /// a limit of 20; limits are capped at 100.
    pub fn new(number: Option<i64>, limit: Option<i64>) -> Result<Self, Error> {
        Self::with_default_limit(number, limit, DEFAULT_LIMIT)
    }

    /// As [`Page::new`] but with a caller-chosen default limit. Comment and
    /// message listings default to 50.
    pub fn with_default_limit(
        number: Option<i64>,
        limit: Option<i64>,
        default_limit: i64,
    ) -> Result<Self, Error> {
        let number = number.unwrap_or(1);
        if number < 1 {
            return Err(Error::invalid_request("page must be at least 1"));
        }
        let limit = limit.unwrap_or(default_limit);
        if limit < 1 {
            return Err(Error::invalid_request("limit must be at least 1"));
        }
        Ok(Self {
            number,
            limit: limit.min(MAX_LIMIT),
        })
    }

    pub const fn number(self) -> i64 {
        self.number
    }

    pub const fn limit(self) -> i64 {
        self.limit
    }

    pub const fn offset(self) -> i64 {
        (self.number - 1) * self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of results plus the total row count.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOf<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T> PageOf<T> {
    pub fn new(items: Vec<T>, total: i64, page: Page) -> Self {
        Self {
            items,
            total,
            page: page.number(),
            limit: page.limit(),
        }
    }

    /// Map the items while keeping the paging envelope.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageOf<U> {
        PageOf {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let page = Page::new(None, None).expect("valid");
        assert_eq!(page.number(), 1);
        assert_eq!(page.limit(), 20);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn limit_is_capped() {
        let page = Page::new(Some(2), Some(500)).expect("valid");
        assert_eq!(page.limit(), 100);
        assert_eq!(page.offset(), 100);
    }

    #[test]
    fn zero_and_negative_values_are_rejected() {
        assert!(Page::new(Some(0), None).is_err());
        assert!(Page::new(None, Some(-5)).is_err());
    }
}
