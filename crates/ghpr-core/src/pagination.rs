use std::env;

pub const DEFAULT_MAX_RESULTS: usize = 1000;

/// Get the maximum results limit from environment variable or default
pub fn get_max_results() -> usize {
    env::var("GHPR_MAX_RESULTS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_RESULTS)
}

/// Fetch every page of a page-numbered list endpoint.
///
/// `fetch_page` receives a 1-based page number and the page size. Fetching
/// stops on an empty or short page, or once the results cap is reached, which
/// is logged as a warning. The first error aborts the whole fetch.
pub fn fetch_all_pages<T, E, F>(fetch_page: F, page_size: usize) -> Result<Vec<T>, E>
where
    F: FnMut(usize, usize) -> Result<Vec<T>, E>,
{
    fetch_pages_capped(fetch_page, page_size, get_max_results())
}

fn fetch_pages_capped<T, E, F>(
    mut fetch_page: F,
    page_size: usize,
    max_results: usize,
) -> Result<Vec<T>, E>
where
    F: FnMut(usize, usize) -> Result<Vec<T>, E>,
{
    let mut all_results = Vec::new();
    let mut page = 1;

    loop {
        if all_results.len() >= max_results {
            tracing::warn!(
                max_results,
                "stopped after {} results, the list may be incomplete; raise GHPR_MAX_RESULTS to fetch more",
                max_results
            );
            break;
        }

        let page_results = fetch_page(page, page_size)?;
        let page_len = page_results.len();

        if page_len == 0 {
            break;
        }

        all_results.extend(page_results);

        if page_len < page_size {
            break;
        }

        page += 1;
    }

    all_results.truncate(max_results);
    Ok(all_results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, ReviewError};
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    fn page_of(data: &[i32], page: usize, per_page: usize) -> Vec<i32> {
        data.iter()
            .copied()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect()
    }

    #[test]
    fn fetch_all_pages_single_page() {
        let data = [1, 2, 3];
        let result: Result<Vec<i32>> =
            fetch_all_pages(|page, per_page| Ok(page_of(&data, page, per_page)), 10);
        let result = result.unwrap();
        assert_eq!(result, vec![1, 2, 3]);
    }

    #[test]
    fn fetch_all_pages_multiple_pages() {
        let data: Vec<i32> = (1..=25).collect();
        let mut pages_requested = Vec::new();
        let result: Result<Vec<i32>> = fetch_all_pages(
            |page, per_page| {
                pages_requested.push(page);
                Ok(page_of(&data, page, per_page))
            },
            10,
        );
        let result = result.unwrap();
        assert_eq!(result, data);
        assert_eq!(pages_requested, vec![1, 2, 3]);
    }

    #[test]
    fn fetch_all_pages_exact_multiple_needs_empty_page() {
        let data: Vec<i32> = (1..=20).collect();
        let mut calls = 0;
        let result: Result<Vec<i32>> = fetch_all_pages(
            |page, per_page| {
                calls += 1;
                Ok(page_of(&data, page, per_page))
            },
            10,
        );
        let result = result.unwrap();
        assert_eq!(result.len(), 20);
        assert_eq!(calls, 3);
    }

    #[test]
    fn fetch_all_pages_empty_first_page() {
        let result: Result<Vec<i32>> = fetch_all_pages(|_, _| Ok(vec![]), 10);
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn capped_fetch_stops_at_max_results() {
        let data: Vec<i32> = (1..=2000).collect();
        let result: Result<Vec<i32>> =
            fetch_pages_capped(|page, per_page| Ok(page_of(&data, page, per_page)), 100, 250);
        let result = result.unwrap();
        assert_eq!(result.len(), 250);
        assert_eq!(result.last(), Some(&250));
    }

    /// Log sink shared between a test and its subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capped_with_logs(total: i32, max_results: usize) -> (Vec<i32>, String) {
        let data: Vec<i32> = (1..=total).collect();
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        let result: Result<Vec<i32>> = tracing::subscriber::with_default(subscriber, || {
            fetch_pages_capped(|page, per_page| Ok(page_of(&data, page, per_page)), 100, max_results)
        });
        (result.unwrap(), logs.contents())
    }

    #[test]
    fn capped_fetch_warns_when_results_are_cut() {
        let (results, logs) = capped_with_logs(2000, 250);
        assert_eq!(results.len(), 250);
        assert!(logs.contains("WARN"), "no warning logged: {:?}", logs);
        assert!(logs.contains("GHPR_MAX_RESULTS"));
    }

    #[test]
    fn uncapped_fetch_does_not_warn() {
        let (results, logs) = capped_with_logs(120, 250);
        assert_eq!(results.len(), 120);
        assert!(!logs.contains("WARN"), "unexpected warning: {:?}", logs);
    }

    #[test]
    fn fetch_all_pages_propagates_error() {
        let mut call_count = 0;
        let result: Result<Vec<i32>> = fetch_all_pages(
            |_, _| {
                call_count += 1;
                if call_count == 1 {
                    Ok(vec![1, 2, 3, 4, 5])
                } else {
                    Err(ReviewError::Api {
                        status: 500,
                        message: "Server error".to_string(),
                    })
                }
            },
            5,
        );
        assert!(result.is_err());
    }
}
