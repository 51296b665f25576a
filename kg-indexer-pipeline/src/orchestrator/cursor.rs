//! Page cursor for the page loop.

use crate::errors::PipelineError;

/// Iterates the page offsets of a job.
///
/// The first page is the one containing `start_offset`, rounded down to a
/// page boundary. Page `i` is visited while `i * page_size < total +
/// page_size`, so the walk always ends with one page at or past `total`.
/// That trailing page is usually empty and picks up records added while the
/// job was running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    next_page: u64,
    page_size: u64,
    total: u64,
}

impl PageCursor {
    pub fn new(total: u64, page_size: u64, start_offset: u64) -> Result<Self, PipelineError> {
        if page_size == 0 {
            return Err(PipelineError::config("page_size must be greater than 0"));
        }

        Ok(Self {
            next_page: start_offset / page_size,
            page_size,
            total,
        })
    }

    /// Pages left to visit.
    pub fn remaining_pages(&self) -> u64 {
        let last_page = self.total.saturating_add(self.page_size - 1) / self.page_size;
        (last_page + 1).saturating_sub(self.next_page)
    }
}

impl Iterator for PageCursor {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let offset = self.next_page.checked_mul(self.page_size)?;
        if offset < self.total.saturating_add(self.page_size) {
            self.next_page += 1;
            Some(offset)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining_pages()).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(total: u64, page_size: u64, start: u64) -> Vec<u64> {
        PageCursor::new(total, page_size, start).unwrap().collect()
    }

    #[test]
    fn test_visits_trailing_page() {
        assert_eq!(offsets(100, 50, 0), vec![0, 50, 100]);
        assert_eq!(offsets(101, 50, 0), vec![0, 50, 100, 150]);
        assert_eq!(offsets(99, 50, 0), vec![0, 50, 100]);
    }

    #[test]
    fn test_empty_collection_visits_one_page() {
        assert_eq!(offsets(0, 42, 0), vec![0]);
    }

    #[test]
    fn test_start_offset_rounds_down_to_page() {
        assert_eq!(offsets(100, 50, 60), vec![50, 100]);
        assert_eq!(offsets(100, 50, 50), vec![50, 100]);
        assert_eq!(offsets(100, 50, 49), vec![0, 50, 100]);
    }

    #[test]
    fn test_start_past_end() {
        assert!(offsets(100, 50, 500).is_empty());
        assert_eq!(PageCursor::new(100, 50, 500).unwrap().remaining_pages(), 0);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        assert!(matches!(
            PageCursor::new(10, 0, 0),
            Err(PipelineError::ConfigError(_))
        ));
    }

    #[test]
    fn test_pages_cover_every_record() {
        for total in 0..=130u64 {
            for page_size in 1..=13u64 {
                for start in [0u64, 7, 50, 200] {
                    let cursor = PageCursor::new(total, page_size, start).unwrap();
                    let expected = cursor.remaining_pages();
                    let pages: Vec<u64> = cursor.collect();

                    assert_eq!(pages.len() as u64, expected);
                    assert!(pages.iter().all(|offset| offset % page_size == 0));
                    assert!(pages.windows(2).all(|w| w[1] == w[0] + page_size));

                    if let Some(&last) = pages.last() {
                        assert!(last >= total);
                        assert!(pages[0] <= start);
                    } else {
                        assert!(start / page_size * page_size >= total + page_size);
                    }
                }
            }
        }
    }
}
