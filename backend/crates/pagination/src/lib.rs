//! Limit/offset pagination primitives shared by LocalConnect list endpoints.
//!
//! List endpoints accept an optional `limit` and `offset`. [`PageRequest`]
//! validates both against the service-wide bounds and [`Page`] wraps the
//! returned slice together with the offset a client should request next.
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(Some(2), Some(0)).expect("valid bounds");
//! let page = Page::from_overfetch(vec![1, 2, 3], request);
//! assert_eq!(page.items, vec![1, 2]);
//! assert_eq!(page.next_offset, Some(2));
//! ```

use serde::{Deserialize, Serialize};

/// Default number of items returned when the client omits `limit`.
pub const DEFAULT_LIMIT: u32 = 20;

/// Largest `limit` a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Reasons a page request is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// `limit` was zero.
    #[error("limit must be at least 1")]
    LimitTooSmall,
    /// `limit` exceeded [`MAX_LIMIT`].
    #[error("limit must be at most {max}, got {actual}")]
    LimitTooLarge {
        /// Upper bound accepted by the service.
        max: u32,
        /// Value supplied by the client.
        actual: u32,
    },
    /// `offset` was negative.
    #[error("offset must not be negative, got {actual}")]
    NegativeOffset {
        /// Value supplied by the client.
        actual: i64,
    },
}

/// Validated limit/offset pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    limit: u32,
    offset: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageRequest {
    /// Validate optional client-supplied bounds, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `limit` is outside `1..=MAX_LIMIT` or
    /// `offset` is negative.
    pub fn new(limit: Option<u32>, offset: Option<i64>) -> Result<Self, PageRequestError> {
        let limit = match limit {
            None => DEFAULT_LIMIT,
            Some(0) => return Err(PageRequestError::LimitTooSmall),
            Some(value) if value > MAX_LIMIT => {
                return Err(PageRequestError::LimitTooLarge {
                    max: MAX_LIMIT,
                    actual: value,
                });
            }
            Some(value) => value,
        };
        let offset = match offset {
            None => 0,
            Some(value) => u64::try_from(value)
                .map_err(|_| PageRequestError::NegativeOffset { actual: value })?,
        };
        Ok(Self { limit, offset })
    }

    /// Number of items requested.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Limit plus one, so adapters can detect whether another page exists.
    #[must_use]
    pub const fn overfetch_limit(&self) -> u32 {
        self.limit.saturating_add(1)
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, at most `limit` long.
    pub items: Vec<T>,
    /// Limit that produced this page.
    pub limit: u32,
    /// Offset that produced this page.
    pub offset: u64,
    /// Offset of the following page when more items exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<u64>,
}

impl<T> Page<T> {
    /// Build a page from rows fetched with [`PageRequest::overfetch_limit`].
    ///
    /// The extra row, when present, is dropped and signals a next page.
    #[must_use]
    pub fn from_overfetch(mut items: Vec<T>, request: PageRequest) -> Self {
        let limit = usize::try_from(request.limit).unwrap_or(usize::MAX);
        let has_more = items.len() > limit;
        items.truncate(limit);
        let next_offset = has_more.then(|| request.offset.saturating_add(u64::from(request.limit)));
        Self {
            items,
            limit: request.limit,
            offset: request.offset,
            next_offset,
        }
    }

    /// Transform each item while keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            limit: self.limit,
            offset: self.offset,
            next_offset: self.next_offset,
        }
    }
}
