//! This module defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of transactions per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a request may ask for.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// A validated page request, expressed as a SQL limit and offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The maximum number of rows to return.
    pub limit: u64,
    /// The number of rows to skip before the first returned row.
    pub offset: u64,
}

impl PaginationConfig {
    /// Turn the raw `page` and `perPage` query parameters into a [PageRequest].
    ///
    /// Missing parameters fall back to the configured defaults. Page numbers
    /// start at 1 and page sizes are limited to `max_page_size` so a single
    /// request cannot ask for an unbounded number of rows.
    ///
    /// # Errors
    /// Returns [Error::InvalidPage] if `page` is not a number, is zero, or
    /// names a row offset too large for the database, or
    /// [Error::InvalidPageSize] if `per_page` is not a number between 1 and
    /// `max_page_size`.
    pub fn resolve(&self, page: Option<&str>, per_page: Option<&str>) -> Result<PageRequest, Error> {
        let page = match page {
            Some(raw_page) => raw_page
                .parse::<u64>()
                .ok()
                .filter(|&number| number > 0)
                .ok_or_else(|| Error::InvalidPage(raw_page.to_owned()))?,
            None => self.default_page,
        };

        let page_size = match per_page {
            Some(raw_page_size) => raw_page_size
                .parse::<u64>()
                .ok()
                .filter(|&number| number > 0 && number <= self.max_page_size)
                .ok_or_else(|| Error::InvalidPageSize {
                    given: raw_page_size.to_owned(),
                    max: self.max_page_size,
                })?,
            None => self.default_page_size,
        };

        // SQLite stores integers as 64-bit signed values, so an offset beyond
        // i64::MAX cannot be queried.
        let offset = (page - 1)
            .checked_mul(page_size)
            .filter(|&offset| offset <= i64::MAX as u64)
            .ok_or_else(|| Error::InvalidPage(page.to_string()))?;

        Ok(PageRequest {
            limit: page_size,
            offset,
        })
    }
}
