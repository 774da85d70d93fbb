//! Lazy access to paged listings.

use std::vec;

use futures::Stream;
use futures::stream;

use super::{BoxFuture, XmsError};
use crate::domain::Page;

/// Future returned by a page fetch function.
pub type PageFuture<'a, T> = BoxFuture<'a, Result<Page<T>, XmsError>>;

/// A paged listing, backed by a function that fetches one page by index.
///
/// Pages are never cached: every [`Pages::get`] call and every stream returned by
/// [`Pages::items`] issues its own requests.
pub struct Pages<'a, T> {
    fetch: Box<dyn Fn(usize) -> PageFuture<'a, T> + Send + Sync + 'a>,
}

struct Cursor<T> {
    next_page: usize,
    seen: usize,
    buffered: vec::IntoIter<T>,
    finished: bool,
}

impl<'a, T: 'a> Pages<'a, T> {
    pub fn new(fetch: impl Fn(usize) -> PageFuture<'a, T> + Send + Sync + 'a) -> Self {
        Self {
            fetch: Box::new(fetch),
        }
    }

    /// Fetch page `page` (zero-based). Issues exactly one request.
    pub async fn get(&self, page: usize) -> Result<Page<T>, XmsError> {
        (self.fetch)(page).await
    }

    /// Stream every item across all pages, starting at page 0.
    ///
    /// Pages are fetched one at a time, in order, only once the previous page is
    /// exhausted. The stream ends after a page with no items, or once the number
    /// of items produced reaches the total reported by the last page. A failed
    /// fetch is yielded as an error and ends the stream.
    pub fn items(&self) -> impl Stream<Item = Result<T, XmsError>> + '_ {
        let cursor = Cursor {
            next_page: 0,
            seen: 0,
            buffered: Vec::new().into_iter(),
            finished: false,
        };

        stream::unfold(cursor, move |mut cursor| async move {
            loop {
                if let Some(item) = cursor.buffered.next() {
                    return Some((Ok(item), cursor));
                }
                if cursor.finished {
                    return None;
                }

                match self.get(cursor.next_page).await {
                    Ok(page) => {
                        tracing::debug!(
                            page = page.page,
                            size = page.size,
                            total_size = page.total_size,
                            "fetched page"
                        );
                        cursor.next_page += 1;
                        cursor.seen += page.content.len();
                        cursor.finished = page.is_empty()
                            || page.content.is_empty()
                            || cursor.seen >= page.total_size;
                        cursor.buffered = page.content.into_iter();
                    }
                    Err(err) => {
                        cursor.finished = true;
                        return Some((Err(err), cursor));
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use futures::{StreamExt, TryStreamExt};

    use super::*;

    fn page(index: usize, content: Vec<u32>, total_size: usize) -> Page<u32> {
        Page {
            page: index,
            size: content.len(),
            total_size,
            content,
        }
    }

    /// Serves pages from a fixed list and records every requested index.
    fn scripted(
        pages: Vec<Result<Page<u32>, u16>>,
        requests: Arc<Mutex<Vec<usize>>>,
    ) -> Pages<'static, u32> {
        Pages::new(move |index| {
            requests.lock().unwrap().push(index);
            let result = match pages.get(index) {
                Some(Ok(page)) => Ok(page.clone()),
                Some(Err(status)) => Err(XmsError::UnexpectedResponse {
                    status: *status,
                    body: Vec::new(),
                }),
                None => panic!("page {index} should not be fetched"),
            };
            Box::pin(async move { result })
        })
    }

    #[tokio::test]
    async fn get_fetches_once_per_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let pages = Pages::new(move |index| {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move { Ok::<_, XmsError>(page(index, vec![1, 2], 10)) })
        });

        let first = pages.get(3).await.unwrap();
        assert_eq!(first.page, 3);
        pages.get(3).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn items_stop_after_empty_page() {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let pages = scripted(
            vec![Ok(page(0, vec![1, 2, 3], 7)), Ok(page(1, Vec::new(), 7))],
            requests.clone(),
        );

        let items: Vec<u32> = pages.items().try_collect().await.unwrap();
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(*requests.lock().unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn items_stop_at_total_size() {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let pages = scripted(
            vec![Ok(page(0, vec![1, 2], 4)), Ok(page(1, vec![3, 4], 4))],
            requests.clone(),
        );

        let items: Vec<u32> = pages.items().try_collect().await.unwrap();
        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(*requests.lock().unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn items_are_restartable() {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let pages = scripted(vec![Ok(page(0, vec![5], 1))], requests.clone());

        let first: Vec<u32> = pages.items().try_collect().await.unwrap();
        let second: Vec<u32> = pages.items().try_collect().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(*requests.lock().unwrap(), vec![0, 0]);
    }

    #[tokio::test]
    async fn items_are_fetched_lazily() {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let pages = scripted(
            vec![Ok(page(0, vec![1, 2], 4)), Ok(page(1, vec![3, 4], 4))],
            requests.clone(),
        );

        let first_two: Vec<u32> = pages
            .items()
            .take(2)
            .map(Result::unwrap)
            .collect()
            .await;
        assert_eq!(first_two, vec![1, 2]);
        assert_eq!(*requests.lock().unwrap(), vec![0]);
    }

    #[tokio::test]
    async fn items_end_after_fetch_error() {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let pages = scripted(vec![Ok(page(0, vec![1], 3)), Err(503)], requests.clone());

        let results: Vec<Result<u32, XmsError>> = pages.items().collect().await;
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0], Ok(1)));
        assert!(matches!(
            results[1],
            Err(XmsError::UnexpectedResponse { status: 503, .. })
        ));
        assert_eq!(*requests.lock().unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn empty_listing_yields_nothing() {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let pages = scripted(vec![Ok(page(0, Vec::new(), 0))], requests.clone());

        let items: Vec<u32> = pages.items().try_collect().await.unwrap();
        assert!(items.is_empty());
    }
}
