//! Page requests, page results and total-count resolution.

use serde::Serialize;
use tracing::trace;

use crate::error::{DbError, Result};

/// A validated request for one slice of an ordered result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    offset: i64,
    page_size: i64,
}

impl Pageable {
    /// Creates a page request starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidPageable`] if `offset` is negative or
    /// `page_size` is not positive.
    pub fn new(offset: i64, page_size: i64) -> Result<Self> {
        if offset < 0 {
            return Err(DbError::InvalidPageable(format!(
                "offset must not be negative, got {offset}"
            )));
        }
        if page_size <= 0 {
            return Err(DbError::InvalidPageable(format!(
                "page size must be positive, got {page_size}"
            )));
        }
        Ok(Self { offset, page_size })
    }

    /// Creates a request for the zero-based page number `page`.
    pub fn of_page(page: i64, page_size: i64) -> Result<Self> {
        if page < 0 {
            return Err(DbError::InvalidPageable(format!(
                "page number must not be negative, got {page}"
            )));
        }
        let offset = page.checked_mul(page_size).ok_or_else(|| {
            DbError::InvalidPageable(format!("page {page} of size {page_size} is out of range"))
        })?;
        Self::new(offset, page_size)
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Zero-based page number; offsets that are not page aligned round down.
    pub fn page_number(&self) -> i64 {
        self.offset / self.page_size
    }

    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.page_size),
            page_size: self.page_size,
        }
    }
}

/// How the total element count of a page is obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountStrategy {
    /// Always run the count query.
    Simple,
    /// Infer the total from the fetched page when it proves the end was reached.
    #[default]
    Optimized,
}

/// One slice of a result together with the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: i64,
    pub pageable: Pageable,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: i64, pageable: Pageable) -> Self {
        Self {
            content,
            total_elements,
            pageable,
        }
    }

    pub fn total_pages(&self) -> i64 {
        let size = self.pageable.page_size;
        self.total_elements / size + i64::from(self.total_elements % size != 0)
    }

    pub fn has_next(&self) -> bool {
        self.pageable.offset.saturating_add(self.content.len() as i64) < self.total_elements
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            pageable: self.pageable,
        }
    }
}

/// Resolves the total element count for a fetched page.
///
/// With [`CountStrategy::Optimized`] the `count` closure is skipped when a
/// short, non-empty (or first) page already shows where the result ends.
/// An empty page past the end always falls back to `count`.
pub fn resolve_total<F, E>(
    pageable: &Pageable,
    fetched: usize,
    strategy: CountStrategy,
    count: F,
) -> std::result::Result<i64, E>
where
    F: FnOnce() -> std::result::Result<i64, E>,
{
    let fetched = fetched as i64;

    if strategy == CountStrategy::Optimized && fetched < pageable.page_size {
        if pageable.offset == 0 {
            trace!(fetched, "total inferred from first page");
            return Ok(fetched);
        }
        if fetched > 0 {
            trace!(offset = pageable.offset, fetched, "total inferred from last page");
            return Ok(pageable.offset.saturating_add(fetched));
        }
    }

    count()
}
