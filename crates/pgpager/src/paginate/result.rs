//! Pagination metadata and the page envelope.

use serde::{Deserialize, Serialize};

/// Totals derived from a count query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTotals {
    pub total: i64,
    pub last_page: i64,
    pub prev_page: Option<i64>,
    pub next_page: Option<i64>,
}

impl PageTotals {
    /// Derive page bounds from a row count.
    pub fn compute(total: i64, per_page: i64, current_page: i64) -> Self {
        let last_page = if total <= 0 || per_page <= 0 {
            0
        } else {
            total / per_page + i64::from(total % per_page != 0)
        };
        Self {
            total,
            last_page,
            prev_page: (current_page > 1).then(|| current_page - 1),
            next_page: (current_page < last_page).then(|| current_page + 1),
        }
    }
}

/// Metadata describing one page.
///
/// Serializes flat, in camelCase:
///
/// ```json
/// { "total": 10, "lastPage": 5, "prevPage": 1, "nextPage": 3,
///   "perPage": 2, "currentPage": 2, "from": 2, "to": 4 }
/// ```
///
/// The four totals keys are absent (not `null`) when totals were not fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(flatten)]
    pub totals: Option<PageTotals>,
    pub per_page: i64,
    pub current_page: i64,
    /// Offset of the first returned row.
    pub from: i64,
    /// `from` plus the number of returned rows.
    pub to: i64,
}

impl Pagination {
    pub fn total(&self) -> Option<i64> {
        self.totals.map(|t| t.total)
    }

    pub fn last_page(&self) -> Option<i64> {
        self.totals.map(|t| t.last_page)
    }

    /// Previous page; `None` when totals were not fetched or on page 1.
    pub fn prev_page(&self) -> Option<i64> {
        self.totals.and_then(|t| t.prev_page)
    }

    /// Next page; `None` when totals were not fetched or on the last page.
    pub fn next_page(&self) -> Option<i64> {
        self.totals.and_then(|t| t.next_page)
    }

    /// Whether a count query ran for this page.
    pub fn has_totals(&self) -> bool {
        self.totals.is_some()
    }
}

/// Rows of one page and the metadata describing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Map each row, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_parts(self) -> (Vec<T>, Pagination) {
        (self.data, self.pagination)
    }
}
