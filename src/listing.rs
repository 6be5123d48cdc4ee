use crate::match_store::MatchRecord;

pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const MAX_PAGE_SIZE: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: usize,
    pub max_size: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: MAX_PAGE_SIZE,
        }
    }
}

/// A resolved page request: `page` is 1-based and `page_size` already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: usize,
    pub page_size: usize,
}

impl Page {
    pub fn resolve(page: Option<i64>, page_size: Option<i64>, limits: PageLimits) -> Self {
        let max_size = limits.max_size.max(1);
        let page = page
            .and_then(|p| usize::try_from(p).ok())
            .unwrap_or(1)
            .max(1);
        let page_size = match page_size {
            Some(n) if n < 1 => 1,
            Some(n) => usize::try_from(n).unwrap_or(max_size),
            None => limits.default_size,
        }
        .clamp(1, max_size);
        Self { page, page_size }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }
}

/// Newest first. The sort is stable, so equal dates keep their input order.
pub fn sort_by_date_desc(records: &mut [&MatchRecord]) {
    records.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_defaults_and_clamps() {
        let limits = PageLimits::default();
        assert_eq!(
            Page::resolve(None, None, limits),
            Page {
                page: 1,
                page_size: 100
            }
        );
        assert_eq!(Page::resolve(Some(0), Some(1000), limits).page, 1);
        assert_eq!(Page::resolve(Some(0), Some(1000), limits).page_size, 500);
        assert_eq!(Page::resolve(Some(-4), Some(-3), limits).page_size, 1);
        assert_eq!(Page::resolve(Some(3), Some(20), limits).offset(), 40);
    }

    #[test]
    fn slice_past_the_end_is_empty() {
        let items = [1, 2, 3, 4, 5];
        let page = Page {
            page: 2,
            page_size: 2,
        };
        assert_eq!(page.slice(&items), &[3, 4]);
        let last = Page {
            page: 3,
            page_size: 2,
        };
        assert_eq!(last.slice(&items), &[5]);
        let beyond = Page {
            page: 9,
            page_size: 2,
        };
        assert!(beyond.slice(&items).is_empty());
    }

    #[test]
    fn undated_records_sink_and_ties_keep_order() {
        let records: Vec<MatchRecord> = [
            json!({"home_team": "Undated"}),
            json!({"home_team": "Old", "date": "2023-05-01"}),
            json!({"home_team": "First", "date": "2024-05-01"}),
            json!({"home_team": "Second", "date": "2024-05-01"}),
            json!({"home_team": "Broken", "date": "sometime"}),
        ]
        .into_iter()
        .map(MatchRecord::from_value)
        .collect();
        let mut view: Vec<&MatchRecord> = records.iter().collect();
        sort_by_date_desc(&mut view);
        let order: Vec<&str> = view.iter().map(|r| r.home_team()).collect();
        assert_eq!(order, ["First", "Second", "Old", "Undated", "Broken"]);
    }
}
