//! Response envelope for list endpoints.

use serde::Deserialize;
use serde::Serialize;

/// One page of rows plus the size of the full filtered set.
///
/// This is the body a list endpoint must return: `{"data": [...], "total": n}`.
/// `total` counts every row matching the filters, not just the rows in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows in the requested window.
    pub data: Vec<T>,
    /// Total matching rows on the server.
    pub total: u64,
}

impl<T> Page<T> {
    /// Creates a page from rows and a total count.
    pub fn new(data: Vec<T>, total: u64) -> Self {
        Self { data, total }
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if rows remain after this page, given the page's offset.
    pub fn has_more(&self, first: u64) -> bool {
        first.saturating_add(self.data.len() as u64) < self.total
    }

    /// Maps each row using the provided function.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_more() {
        let page = Page::new(vec![1, 2, 3], 10);
        assert!(page.has_more(0));
        assert!(page.has_more(6));
        assert!(!page.has_more(7));
    }

    #[test]
    fn test_has_more_at_max_offset() {
        let page = Page::new(vec![1], u64::MAX);
        assert!(!page.has_more(u64::MAX));
        assert!(page.has_more(u64::MAX - 2));
    }

    #[test]
    fn test_decode_envelope() {
        let page: Page<serde_json::Value> =
            serde_json::from_str(r#"{"data":[{"id":1}],"total":1}"#).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0]["id"], 1);
    }

    #[test]
    fn test_missing_total_is_an_error() {
        assert!(serde_json::from_str::<Page<u32>>(r#"{"data":[]}"#).is_err());
    }
}
