//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page number.
pub const DEFAULT_PAGE: u64 = 1;
/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 20;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request, clamping both values into range.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Build a page request from raw query string values.
    ///
    /// Missing, non-numeric, or non-positive values fall back to the
    /// defaults; page sizes above [`MAX_PAGE_SIZE`] are clamped.
    pub fn from_params(page: Option<&str>, page_size: Option<&str>) -> Self {
        let page = page
            .and_then(parse_leading_int)
            .filter(|p| *p > 0)
            .map(|p| p as u64)
            .unwrap_or(DEFAULT_PAGE);

        let page_size = page_size
            .and_then(parse_leading_int)
            .filter(|p| *p > 0)
            .map(|p| (p as u64).min(MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self { page, page_size }
    }

    /// Zero-based index of the first row on this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Number of rows on a full page.
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// Zero-based index of the last row on this page (inclusive).
    pub fn last_index(&self) -> u64 {
        self.offset().saturating_add(self.page_size - 1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of matching items across all pages.
    pub total: u64,
    /// Whether rows exist beyond this page.
    pub has_more: bool,
}

impl<T> PageResponse<T> {
    /// Create a response for the given request.
    ///
    /// When the store could not report an exact count, `total` falls back
    /// to the number of rows actually returned.
    pub fn new(data: Vec<T>, request: &PageRequest, exact_total: Option<u64>) -> Self {
        let returned = data.len() as u64;
        let total = exact_total.unwrap_or(returned);
        let has_more = request.offset().saturating_add(returned) < total;

        Self {
            data,
            page: request.page,
            page_size: request.page_size,
            total,
            has_more,
        }
    }

    /// Map every item while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            data: self.data.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            has_more: self.has_more,
        }
    }
}

/// Parse a base-10 integer prefix, the way lenient form parsers do.
///
/// Leading whitespace and a single sign are accepted, then the longest
/// run of ASCII digits. Anything after the digits is ignored; a string
/// without leading digits is not a number. Overflow saturates.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let run = digits.bytes().take_while(u8::is_ascii_digit).count();
    if run == 0 {
        return None;
    }

    let magnitude = digits[..run].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });

    Some(if negative { -magnitude } else { magnitude })
}
