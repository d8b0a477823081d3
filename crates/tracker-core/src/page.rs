//! Keyset pagination over weight records.

use serde::{Deserialize, Serialize};

use crate::models::WeightRecord;

/// Number of records fetched per page.
pub const PAGE_SIZE: usize = 20;

/// Upper bound on a single page request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Position after which the next page starts.
///
/// Records are ordered by `date DESC, id DESC`; the next page holds records
/// strictly after `(date, id)` in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub date: String,
    pub id: String,
}

impl PageCursor {
    /// Whether `record` sorts after this cursor.
    pub fn precedes(&self, record: &WeightRecord) -> bool {
        (record.date.as_str(), record.id.as_str()) < (self.date.as_str(), self.id.as_str())
    }
}

/// One page of weight records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightPage {
    pub records: Vec<WeightRecord>,
    pub next_cursor: Option<PageCursor>,
    pub has_more: bool,
}

impl WeightPage {
    /// Build a page from fetched rows. A full page implies more may follow.
    pub fn from_records(records: Vec<WeightRecord>, limit: usize) -> Self {
        let has_more = limit > 0 && records.len() == limit;
        let next_cursor = records.last().map(WeightRecord::cursor);
        Self {
            records,
            next_cursor,
            has_more,
        }
    }
}

/// Clamp a requested page size to `1..=MAX_PAGE_SIZE`, defaulting to [`PAGE_SIZE`].
pub fn clamp_limit(requested: Option<usize>) -> usize {
    match requested {
        Some(0) | None => PAGE_SIZE,
        Some(n) => n.min(MAX_PAGE_SIZE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, date: &str) -> WeightRecord {
        WeightRecord {
            id: id.to_string(),
            user_id: "u1".to_string(),
            weight: 70.0,
            body_fat: None,
            date: date.to_string(),
            created_at: String::new(),
        }
    }

    #[test]
    fn cursor_orders_by_date_then_id() {
        let cursor = record("b", "2026-01-10").cursor();
        assert!(cursor.precedes(&record("z", "2026-01-09")));
        assert!(cursor.precedes(&record("a", "2026-01-10")));
        assert!(!cursor.precedes(&record("b", "2026-01-10")));
        assert!(!cursor.precedes(&record("a", "2026-01-11")));
    }

    #[test]
    fn full_page_reports_more() {
        let records: Vec<_> = (0..PAGE_SIZE)
            .map(|i| record(&format!("id{i}"), "2026-01-01"))
            .collect();
        let page = WeightPage::from_records(records, PAGE_SIZE);
        assert!(page.has_more);
        assert_eq!(page.next_cursor.unwrap().id, format!("id{}", PAGE_SIZE - 1));

        let short = WeightPage::from_records(vec![record("x", "2026-01-01")], PAGE_SIZE);
        assert!(!short.has_more);

        let empty = WeightPage::from_records(Vec::new(), PAGE_SIZE);
        assert!(!empty.has_more);
        assert!(empty.next_cursor.is_none());
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(clamp_limit(None), PAGE_SIZE);
        assert_eq!(clamp_limit(Some(0)), PAGE_SIZE);
        assert_eq!(clamp_limit(Some(5)), 5);
        assert_eq!(clamp_limit(Some(10_000)), MAX_PAGE_SIZE);
    }
}
