//! List-endpoint pagination built on page tokens.
//!
//! Handlers fetch one row more than the page size. If the extra row arrives
//! there is another page, and the token for it is built from the last row that
//! is actually returned. This avoids a separate count query.
//!
//! ```rust
//! use std::time::SystemTime;
//! use tokenseal::pagination::{CursorRow, Page, PageLimits, PageRequest};
//!
//! struct Device { id: String, created_at: SystemTime }
//!
//! impl CursorRow for Device {
//!     fn created_at(&self) -> Option<SystemTime> { Some(self.created_at) }
//!     fn id(&self) -> &str { &self.id }
//! }
//!
//! let request = PageRequest::parse(2, "", &PageLimits::default()).unwrap();
//! let rows: Vec<Device> = (1..=3)
//!     .map(|n| Device {
//!         id: format!("00000000-0000-4000-8000-00000000000{n}"),
//!         created_at: SystemTime::now(),
//!     })
//!     .take(request.fetch_limit())
//!     .collect();
//!
//! let page = Page::from_rows(rows, request.page_size());
//! assert_eq!(page.rows().len(), 2);
//! assert!(!page.next_page_token().is_empty());
//! ```

use std::time::SystemTime;

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Result;
use crate::cursor::{Cursor, generate_cursor, parse_cursor};

/// Page size used when a request leaves it unset.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Largest page size a request may ask for.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Bounds applied to requested page sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    /// Size used when the request asks for zero or a negative size.
    pub default_page_size: usize,
    /// Upper bound on any requested size.
    pub max_page_size: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl PageLimits {
    /// Resolves a requested size against these limits.
    pub fn resolve(&self, requested: i32) -> usize {
        let max = self.max_page_size.max(1);
        match usize::try_from(requested) {
            Ok(0) | Err(_) => self.default_page_size.clamp(1, max),
            Ok(n) => n.min(max),
        }
    }
}

/// A validated list request: page size plus resume position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page_size: usize,
    cursor: Cursor,
}

impl PageRequest {
    /// Parses the page size and page token of an incoming list request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CursorDecode`](crate::Error::CursorDecode) if the page
    /// token is malformed. That is a client input error.
    pub fn parse(page_size: i32, page_token: &str, limits: &PageLimits) -> Result<Self> {
        Ok(Self {
            page_size: limits.resolve(page_size),
            cursor: parse_cursor(page_token)?,
        })
    }

    /// Rows to return to the client.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Rows to fetch from storage: one more than the page size.
    pub fn fetch_limit(&self) -> usize {
        self.page_size.saturating_add(1)
    }

    /// Position to resume from.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }
}

/// A row that can anchor a page token.
pub trait CursorRow {
    /// Creation time used as the primary sort key.
    fn created_at(&self) -> Option<SystemTime>;

    /// Row id used to break ties between equal timestamps.
    fn id(&self) -> &str;
}

/// One page of a list response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    rows: Vec<T>,
    next_page_token: String,
}

impl<T: CursorRow> Page<T> {
    /// Builds a page from rows fetched with a limit of `page_size + 1`.
    ///
    /// If more than `page_size` rows arrived, the surplus is dropped and the
    /// next token points at the last kept row. Otherwise this is the last page
    /// and the token is empty.
    ///
    /// A row id that cannot be encoded is logged and yields no next token
    /// rather than failing the whole request.
    pub fn from_rows(mut rows: Vec<T>, page_size: usize) -> Self {
        if page_size == 0 || rows.len() <= page_size {
            return Self {
                rows,
                next_page_token: String::new(),
            };
        }

        rows.truncate(page_size);
        let next_page_token = rows
            .last()
            .map(|last| match generate_cursor(last.created_at(), last.id()) {
                Ok(token) => token,
                Err(e) => {
                    counter!("tokenseal.pagination.cursor_failure").increment(1);
                    warn!(row_id = last.id(), error = %e, "failed to build next page token");
                    String::new()
                }
            })
            .unwrap_or_default();

        Self {
            rows,
            next_page_token,
        }
    }
}

impl<T> Page<T> {
    /// Rows on this page.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Token for the next page, or an empty string on the last page.
    pub fn next_page_token(&self) -> &str {
        &self.next_page_token
    }

    /// Returns `true` if another page follows.
    pub fn has_next(&self) -> bool {
        !self.next_page_token.is_empty()
    }

    /// Splits the page into its rows and next token.
    pub fn into_parts(self) -> (Vec<T>, String) {
        (self.rows, self.next_page_token)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    struct Row {
        id: String,
        created_at: SystemTime,
    }

    impl CursorRow for Row {
        fn created_at(&self) -> Option<SystemTime> {
            Some(self.created_at)
        }

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| Row {
                id: format!("00000000-0000-4000-8000-{i:012}"),
                created_at: UNIX_EPOCH + Duration::from_secs(1_700_000_000 + i as u64),
            })
            .collect()
    }

    #[test]
    fn limits_resolve_requested_sizes() {
        let limits = PageLimits::default();
        assert_eq!(limits.resolve(0), DEFAULT_PAGE_SIZE);
        assert_eq!(limits.resolve(-5), DEFAULT_PAGE_SIZE);
        assert_eq!(limits.resolve(20), 20);
        assert_eq!(limits.resolve(1_000_000), MAX_PAGE_SIZE);
    }

    #[test]
    fn zero_page_size_returns_rows_untouched() {
        let page = Page::from_rows(rows(3), 0);
        assert_eq!(page.rows().len(), 3);
        assert!(!page.has_next());
    }

    #[test]
    fn surplus_beyond_one_row_is_also_trimmed() {
        let page = Page::from_rows(rows(8), 5);
        assert_eq!(page.rows().len(), 5);
        let cursor = parse_cursor(page.next_page_token()).unwrap();
        assert_eq!(cursor.prev_id(), rows(5)[4].id);
    }

    #[test]
    fn bad_row_id_degrades_to_last_page() {
        let mut fetched = rows(3);
        fetched[1].id = "corrupt".to_string();

        let page = Page::from_rows(fetched, 2);
        assert_eq!(page.rows().len(), 2);
        assert!(!page.has_next());
    }

    #[test]
    fn request_parses_token() {
        let token = generate_cursor(None, &rows(1)[0].id).unwrap();
        let request = PageRequest::parse(10, &token, &PageLimits::default()).unwrap();
        assert_eq!(request.fetch_limit(), 11);
        assert_eq!(request.cursor().prev_id(), rows(1)[0].id);

        assert!(PageRequest::parse(10, "...", &PageLimits::default()).is_err());
    }
}
