//! Cursor pagination over connection-style listings.

use std::future::Future;

use tracing::{debug, warn};

use crate::shopify::Page;

/// Fetch every page and concatenate the items in order.
///
/// `fetch` receives `None` for the first page and the previous page's
/// `end_cursor` afterwards. A page that claims more results but carries no
/// cursor ends the loop.
///
/// # Errors
///
/// Returns the first error from `fetch`; items collected so far are dropped.
pub async fn collect_all<T, E, F, Fut>(mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let mut items = Vec::new();
    let mut cursor = None;
    let mut pages = 0_usize;

    loop {
        let page = fetch(cursor.take()).await?;
        pages += 1;
        items.extend(page.items);

        if !page.has_next_page {
            break;
        }
        match page.end_cursor {
            Some(next) => cursor = Some(next),
            None => {
                warn!(pages, "Page reported more results without a cursor, stopping");
                break;
            }
        }
    }

    debug!(pages, total = items.len(), "Pagination complete");
    Ok(items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn page(range: std::ops::Range<u32>, next: Option<&str>) -> Page<u32> {
        Page {
            items: range.collect(),
            has_next_page: next.is_some(),
            end_cursor: next.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_collects_three_pages_in_order() {
        let seen = Mutex::new(Vec::new());

        let items = collect_all(|after| {
            seen.lock().unwrap().push(after.clone());
            async move {
                Ok::<_, ()>(match after.as_deref() {
                    None => page(0..50, Some("c1")),
                    Some("c1") => page(50..100, Some("c2")),
                    _ => page(100..107, None),
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 107);
        assert!(items.iter().copied().eq(0..107));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_missing_cursor_stops() {
        let calls = Mutex::new(0);

        let items = collect_all(|_| {
            *calls.lock().unwrap() += 1;
            async {
                Ok::<_, ()>(Page {
                    items: vec![1, 2],
                    has_next_page: true,
                    end_cursor: None,
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2]);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_error_is_returned() {
        let result = collect_all(|after| async move {
            match after {
                None => Ok(page(0..5, Some("c1"))),
                Some(_) => Err("boom"),
            }
        })
        .await;

        assert_eq!(result, Err("boom"));
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let items = collect_all(|_| async { Ok::<_, ()>(page(0..0, None)) })
            .await
            .unwrap();
        assert!(items.is_empty());
    }
}
