//! Offset and limit page windows shared by backend list endpoints.
//!
//! Clients address a list with a zero-based row offset (`from`) and a page
//! size (`size`). The window is page aligned: the offset selects the page
//! `from div size` and the window starts at that page's first row, so
//! `from = 15, size = 10` yields rows `10..20`.
//!
//! ```
//! use pagination::PageRequest;
//!
//! let page = PageRequest::new(15, 10).expect("valid window");
//! assert_eq!(page.page_index(), 1);
//! let rows: Vec<u32> = page.window(0..30).collect();
//! assert_eq!(rows.first(), Some(&10));
//! assert_eq!(rows.len(), 10);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default page size applied when clients omit `size`.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Errors raised when a page window is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// The row offset was negative.
    #[error("from must be zero or positive (got {from})")]
    NegativeOffset {
        /// Offending offset.
        from: i64,
    },
    /// The page size was zero or negative.
    #[error("size must be positive (got {size})")]
    NonPositiveSize {
        /// Offending page size.
        size: i64,
    },
}

/// Validated page window.
///
/// ## Invariants
/// - `from >= 0`
/// - `size > 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest", into = "RawPageRequest")]
pub struct PageRequest {
    from: i64,
    size: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawPageRequest {
    from: i64,
    size: i64,
}

impl PageRequest {
    /// Validate and construct a page window.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::NegativeOffset`] when `from < 0` and
    /// [`PageRequestError::NonPositiveSize`] when `size <= 0`.
    pub const fn new(from: i64, size: i64) -> Result<Self, PageRequestError> {
        if from < 0 {
            return Err(PageRequestError::NegativeOffset { from });
        }
        if size <= 0 {
            return Err(PageRequestError::NonPositiveSize { size });
        }
        Ok(Self { from, size })
    }

    /// Row offset requested by the client.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.from
    }

    /// Maximum number of rows in the window.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.size
    }

    /// Zero-based page index, `from div size`.
    #[must_use]
    pub const fn page_index(&self) -> i64 {
        match self.from.checked_div(self.size) {
            Some(index) => index,
            None => 0,
        }
    }

    /// Offset of the first row in the window.
    #[must_use]
    pub const fn first_row(&self) -> i64 {
        self.page_index().saturating_mul(self.size)
    }

    /// Apply the window to an already ordered sequence.
    pub fn window<I>(&self, items: I) -> std::iter::Take<std::iter::Skip<I::IntoIter>>
    where
        I: IntoIterator,
    {
        let skip = usize::try_from(self.first_row()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(take)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            from: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = PageRequestError;

    fn try_from(value: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(value.from, value.size)
    }
}

impl From<PageRequest> for RawPageRequest {
    fn from(value: PageRequest) -> Self {
        Self {
            from: value.from,
            size: value.size,
        }
    }
}
