use crate::Result;
use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use std::collections::VecDeque;

/// Async iterator trait for paginated Last.fm data.
///
/// This trait provides a common interface for iterating over paginated data
/// from Last.fm, such as tracks, albums, and artists. Implementations stream
/// items lazily, fetching new pages on demand.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait AsyncPaginatedIterator<T> {
    /// Fetch the next item from the iterator.
    ///
    /// This method automatically handles pagination, fetching new pages as
    /// needed. Returns `None` when there are no more items available.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(item))` - Next item in the sequence
    /// - `Ok(None)` - No more items available
    /// - `Err(...)` - Network or parsing error occurred
    async fn next(&mut self) -> Result<Option<T>>;

    /// Collect all remaining items into a Vec.
    ///
    /// **Warning**: This method will fetch ALL remaining pages, which could
    /// be many thousands of items for large collections. Use
    /// [`take`](Self::take) for safer bounded collection.
    async fn collect_all(&mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Take up to n items from the iterator.
    ///
    /// This is the recommended way to collect a bounded number of items
    /// from potentially large datasets.
    async fn take(&mut self, n: usize) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for _ in 0..n {
            match self.next().await? {
                Some(item) => items.push(item),
                None => break,
            }
        }
        Ok(items)
    }

    /// Get the total number of pages, if known.
    fn total_pages(&self) -> Option<u32> {
        None
    }

    /// Get the total number of items across all pages, if known.
    fn total_items(&self) -> Option<u64> {
        None
    }
}

/// Callback that fetches one page of items by page number.
///
/// The closure owns everything it needs to issue the request (typically a
/// client clone plus the frozen request parameters), so the returned future
/// does not borrow from the iterator.
pub type PageFetcher<T> = Box<dyn FnMut(u32) -> LocalBoxFuture<'static, Result<Vec<T>>>>;

/// Internal pull-based item source. Implemented by the raw page chain and
/// by lazy `map` adapters, so a mapped iterator keeps the same fetch
/// behavior without forcing evaluation.
#[async_trait(?Send)]
trait ItemSource<T> {
    async fn next_item(&mut self) -> Result<Option<T>>;
}

/// Serves buffered first-page items, then pulls pages `next_page..=last_page`
/// through the fetch callback, one request per page boundary, in order.
struct PageChain<T> {
    buffer: VecDeque<T>,
    next_page: u32,
    last_page: u32,
    fetch: PageFetcher<T>,
}

#[async_trait(?Send)]
impl<T> ItemSource<T> for PageChain<T> {
    async fn next_item(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            if self.next_page > self.last_page {
                return Ok(None);
            }

            let page = self.next_page;
            self.next_page += 1;
            log::debug!("Fetching page {} of {}", page, self.last_page);
            let items = (self.fetch)(page).await?;
            // A page may legitimately come back empty; keep going until
            // the page range is used up.
            self.buffer.extend(items);
        }
    }
}

struct Mapped<T, U> {
    inner: Box<dyn ItemSource<T>>,
    transform: Box<dyn FnMut(T) -> Result<U>>,
}

#[async_trait(?Send)]
impl<T: 'static, U: 'static> ItemSource<U> for Mapped<T, U> {
    async fn next_item(&mut self) -> Result<Option<U>> {
        match self.inner.next_item().await? {
            Some(item) => (self.transform)(item).map(Some),
            None => Ok(None),
        }
    }
}

/// A lazily-evaluated sequence over items scattered across remote pages.
///
/// Wraps the items of an already-fetched first page together with a fetch
/// callback for the remaining pages. Items are yielded in page order; each
/// page boundary crossed triggers exactly one remote request, so pages the
/// consumer never reaches are never requested.
///
/// The total page and item counts come from the first page's envelope and
/// are available immediately, before any further fetch. When the sequence
/// was truncated by a caller-supplied limit, the reported totals are still
/// the *server's* totals, so [`len`](Self::len) may exceed the number of
/// items actually yielded.
///
/// A `PaginatedIterator` is **single-pass and not restartable**: it owns its
/// backing source exclusively, consumed items are gone, and a fresh
/// traversal requires issuing the request again.
pub struct PaginatedIterator<T> {
    pages: u32,
    total: u64,
    source: Box<dyn ItemSource<T>>,
}

impl<T> std::fmt::Debug for PaginatedIterator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedIterator")
            .field("pages", &self.pages)
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> PaginatedIterator<T> {
    /// Build a sequence from the first page plus a fetcher for pages
    /// `2..=last_page`.
    ///
    /// `pages` and `total` are the server-reported totals; `last_page`
    /// bounds what will actually be fetched (the truncation bound).
    pub fn new(
        pages: u32,
        total: u64,
        first_page: Vec<T>,
        last_page: u32,
        fetch: PageFetcher<T>,
    ) -> Self {
        Self {
            pages,
            total,
            source: Box::new(PageChain {
                buffer: first_page.into(),
                next_page: 2,
                last_page,
                fetch,
            }),
        }
    }

    /// A sequence with no pages and no items.
    pub fn empty() -> Self {
        Self {
            pages: 0,
            total: 0,
            source: Box::new(PageChain {
                buffer: VecDeque::new(),
                next_page: 2,
                last_page: 1,
                fetch: Box::new(|_| Box::pin(async { Ok(Vec::new()) })),
            }),
        }
    }

    /// Total number of items across all pages, as reported by the server.
    ///
    /// Available immediately after construction; never forces a fetch.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.total
    }

    /// Total number of pages, as reported by the server.
    pub fn pages(&self) -> u32 {
        self.pages
    }

    /// Return a new sequence with the same page/item counts and a lazily
    /// applied per-item transform.
    ///
    /// The transform runs as items are consumed; nothing is fetched or
    /// evaluated by this call itself.
    pub fn map<U: 'static, F>(self, mut transform: F) -> PaginatedIterator<U>
    where
        F: FnMut(T) -> U + 'static,
    {
        self.try_map(move |item| Ok(transform(item)))
    }

    /// Like [`map`](Self::map), for transforms that can fail. An item the
    /// transform rejects surfaces as an error from `next()`.
    pub fn try_map<U: 'static, F>(self, transform: F) -> PaginatedIterator<U>
    where
        F: FnMut(T) -> Result<U> + 'static,
    {
        PaginatedIterator {
            pages: self.pages,
            total: self.total,
            source: Box::new(Mapped {
                inner: self.source,
                transform: Box::new(transform),
            }),
        }
    }
}

#[async_trait(?Send)]
impl<T: 'static> AsyncPaginatedIterator<T> for PaginatedIterator<T> {
    async fn next(&mut self) -> Result<Option<T>> {
        self.source.next_item().await
    }

    fn total_pages(&self) -> Option<u32> {
        Some(self.pages)
    }

    fn total_items(&self) -> Option<u64> {
        Some(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Fetcher that serves two items per page and records which pages were
    /// requested.
    fn counting_fetcher(calls: Rc<RefCell<Vec<u32>>>) -> PageFetcher<u64> {
        Box::new(move |page| {
            calls.borrow_mut().push(page);
            Box::pin(async move { Ok(vec![u64::from(2 * page - 2), u64::from(2 * page - 1)]) })
        })
    }

    #[tokio::test]
    async fn test_totals_known_before_any_fetch() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let iter = PaginatedIterator::new(3, 6, vec![0, 1], 3, counting_fetcher(calls.clone()));

        assert_eq!(iter.len(), 6);
        assert_eq!(iter.pages(), 3);
        assert!(calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_exhaustion_yields_all_items_in_page_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut iter = PaginatedIterator::new(3, 6, vec![0, 1], 3, counting_fetcher(calls.clone()));

        let items = iter.collect_all().await.unwrap();
        assert_eq!(items, vec![0, 1, 2, 3, 4, 5]);
        // Exactly one request per remaining page, in increasing order
        assert_eq!(*calls.borrow(), vec![2, 3]);

        // Single-pass: a second traversal finds nothing
        assert_eq!(iter.next().await.unwrap(), None);
        assert_eq!(*calls.borrow(), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_page_fetched_only_when_buffer_crosses_boundary() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut iter = PaginatedIterator::new(3, 6, vec![0, 1], 3, counting_fetcher(calls.clone()));

        assert_eq!(iter.next().await.unwrap(), Some(0));
        assert_eq!(iter.next().await.unwrap(), Some(1));
        assert!(calls.borrow().is_empty());

        assert_eq!(iter.next().await.unwrap(), Some(2));
        assert_eq!(*calls.borrow(), vec![2]);
    }

    #[tokio::test]
    async fn test_last_page_bounds_fetching() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        // Server reports 10 pages, but the caller limit capped fetching at 1
        let mut iter =
            PaginatedIterator::new(10, 2000, vec![0, 1], 1, counting_fetcher(calls.clone()));

        let items = iter.collect_all().await.unwrap();
        assert_eq!(items, vec![0, 1]);
        assert!(calls.borrow().is_empty());

        // Reported totals stay the server's totals
        assert_eq!(iter.len(), 2000);
        assert_eq!(iter.pages(), 10);
    }

    #[tokio::test]
    async fn test_empty_page_does_not_end_iteration() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let fetch: PageFetcher<u64> = {
            let calls = calls.clone();
            Box::new(move |page| {
                calls.borrow_mut().push(page);
                Box::pin(async move {
                    if page == 2 {
                        Ok(Vec::new())
                    } else {
                        Ok(vec![u64::from(page)])
                    }
                })
            })
        };
        let mut iter = PaginatedIterator::new(3, 3, vec![1], 3, fetch);

        let items = iter.collect_all().await.unwrap();
        assert_eq!(items, vec![1, 3]);
        assert_eq!(*calls.borrow(), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_empty_iterator() {
        let mut iter = PaginatedIterator::<u64>::empty();
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.pages(), 0);
        assert_eq!(iter.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_map_preserves_totals_and_stays_lazy() {
        let applied = Rc::new(RefCell::new(0u32));
        let calls = Rc::new(RefCell::new(Vec::new()));
        let iter = PaginatedIterator::new(3, 6, vec![0, 1], 3, counting_fetcher(calls));

        let mut doubled = iter.map({
            let applied = applied.clone();
            move |n| {
                *applied.borrow_mut() += 1;
                n * 2
            }
        });

        assert_eq!(doubled.total_items(), Some(6));
        assert_eq!(doubled.total_pages(), Some(3));
        assert_eq!(*applied.borrow(), 0);

        assert_eq!(doubled.next().await.unwrap(), Some(0));
        assert_eq!(doubled.next().await.unwrap(), Some(2));
        assert_eq!(*applied.borrow(), 2);
    }

    #[tokio::test]
    async fn test_try_map_propagates_transform_errors() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let iter = PaginatedIterator::new(1, 2, vec![0, 1], 1, counting_fetcher(calls));

        let mut strict = iter.try_map(|n| {
            if n == 1 {
                Err(crate::LastFmError::Parse("bad item".to_string()))
            } else {
                Ok(n)
            }
        });

        assert_eq!(strict.next().await.unwrap(), Some(0));
        assert!(strict.next().await.is_err());
    }

    #[tokio::test]
    async fn test_take_bounds_consumption() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut iter = PaginatedIterator::new(3, 6, vec![0, 1], 3, counting_fetcher(calls.clone()));

        let items = iter.take(3).await.unwrap();
        assert_eq!(items, vec![0, 1, 2]);
        // Only the page actually crossed into was requested
        assert_eq!(*calls.borrow(), vec![2]);
    }
}
