use once_cell::sync::Lazy;
use regex::Regex;

use super::value::CellValue;

pub const DEFAULT_PAGE_SIZE: u32 = 50;

static LEADING_INTEGER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").unwrap());

/// Read a `page` query value leniently.
///
/// Absent or non-numeric input means page 1, a leading integer prefix is
/// honoured (`"3abc"` is page 3) and anything below 1 is raised to 1.
pub fn parse_page(raw: Option<&str>) -> i64 {
    let parsed = raw
        .and_then(|value| LEADING_INTEGER_PATTERN.captures(value))
        .and_then(|caps| caps.get(1))
        .map(|m| {
            let digits = m.as_str();
            digits.parse::<i64>().unwrap_or_else(|_| {
                if digits.starts_with('-') {
                    i64::MIN
                } else {
                    i64::MAX
                }
            })
        })
        .unwrap_or(1);
    parsed.max(1)
}

/// Offset/limit arithmetic for one page of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub page_size: u32,
}

impl PageWindow {
    /// `page` is clamped to a minimum of 1
    pub fn new(page: i64, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit())
    }

    /// `ceil(total / page_size)`, never less than 1
    pub fn total_pages(&self, total: i64) -> i64 {
        let size = self.limit();
        let pages = (total.max(0) + size - 1) / size;
        pages.max(1)
    }
}

/// One window of a table plus the figures needed to render navigation
#[derive(Debug, Clone)]
pub struct Page {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<CellValue>>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

impl Page {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
