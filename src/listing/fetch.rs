// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Fetch-once, replay-to-many caching
//!
//! A [`CachedFetcher`] owns one dataset's cache cell. The cell is either
//! empty, holds an in-flight fetch shared by every waiter, or holds the
//! settled item sequence. At most one fetch is in flight per cell at any
//! time; everyone who asked before it settled observes the same outcome.
//! Failures are never stored, so the next call retries from scratch.

use std::future::Future;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::debug;

use crate::error::{Error, Result};

type SharedFetch<T> = Shared<BoxFuture<'static, std::result::Result<Arc<Vec<T>>, Error>>>;

enum CacheState<T> {
    Empty,
    InFlight(SharedFetch<T>),
    Ready(Arc<Vec<T>>),
}

/// Replay/share cache for one remotely fetched item sequence
pub struct CachedFetcher<T> {
    state: Mutex<CacheState<T>>,
}

impl<T> Default for CachedFetcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CachedFetcher<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CacheState::Empty),
        }
    }

    /// Drop any cached value. The next fetch hits the remote source.
    pub fn invalidate(&self) {
        let mut state = self.state.lock().expect("cache lock poisoned");
        *state = CacheState::Empty;
    }
}

impl<T: Send + Sync + 'static> CachedFetcher<T> {
    /// Return the cached item sequence, fetching it via `load` if needed.
    ///
    /// - Cached and not forced: returns the shared sequence, no fetch.
    /// - A fetch is in flight: joins it, even when forced - the
    ///   at-most-one-in-flight invariant takes precedence.
    /// - Otherwise: starts `load`, shares it with every concurrent
    ///   caller, and stores the result only on success.
    pub async fn fetch<F>(&self, force_refresh: bool, load: F) -> Result<Arc<Vec<T>>>
    where
        F: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        let shared = {
            let mut state = self.state.lock().expect("cache lock poisoned");
            match &*state {
                CacheState::Ready(items) if !force_refresh => {
                    debug!(items = items.len(), "Cache hit");
                    return Ok(items.clone());
                }
                CacheState::InFlight(shared) => {
                    debug!("Joining in-flight fetch");
                    shared.clone()
                }
                _ => {
                    debug!(force_refresh, "Starting fetch");
                    let shared: SharedFetch<T> =
                        load.map(|res| res.map(Arc::new)).boxed().shared();
                    *state = CacheState::InFlight(shared.clone());
                    shared
                }
            }
        };

        // Lock is released while the fetch runs; concurrent callers find
        // the InFlight state and await the same shared future.
        let outcome = shared.clone().await;

        {
            let mut state = self.state.lock().expect("cache lock poisoned");
            // Settle the cell only if it still holds this fetch; a racing
            // invalidate() already emptied it and must win.
            if let CacheState::InFlight(current) = &*state
                && current.ptr_eq(&shared)
            {
                *state = match &outcome {
                    Ok(items) => CacheState::Ready(items.clone()),
                    Err(_) => CacheState::Empty,
                };
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counted_load(
        counter: &Arc<AtomicUsize>,
        items: Vec<u32>,
    ) -> impl Future<Output = Result<Vec<u32>>> + Send + 'static {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(items)
        }
    }

    fn failing_load(
        counter: &Arc<AtomicUsize>,
    ) -> impl Future<Output = Result<Vec<u32>>> + Send + 'static {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Err(Error::Transport("boom".to_string()))
        }
    }

    #[tokio::test]
    async fn test_second_fetch_hits_cache() {
        let fetcher = CachedFetcher::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = fetcher.fetch(false, counted_load(&calls, vec![1, 2, 3])).await.unwrap();
        let second = fetcher.fetch(false, counted_load(&calls, vec![9])).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*second, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_force_refresh_bypasses_cache() {
        let fetcher = CachedFetcher::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = fetcher.fetch(false, counted_load(&calls, vec![1])).await.unwrap();
        let second = fetcher.fetch(true, counted_load(&calls, vec![2])).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*first, vec![1]);
        assert_eq!(*second, vec![2]);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let fetcher = CachedFetcher::new();
        let calls = Arc::new(AtomicUsize::new(0));

        fetcher.fetch(false, counted_load(&calls, vec![1])).await.unwrap();
        fetcher.invalidate();
        let second = fetcher.fetch(false, counted_load(&calls, vec![2])).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*second, vec![2]);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let fetcher = Arc::new(CachedFetcher::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b, c) = tokio::join!(
            fetcher.fetch(false, counted_load(&calls, vec![7])),
            fetcher.fetch(false, counted_load(&calls, vec![8])),
            fetcher.fetch(false, counted_load(&calls, vec![9])),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&b, &c));
        assert_eq!(*a, vec![7]);
    }

    #[tokio::test]
    async fn test_failure_propagates_to_all_waiters_and_is_not_cached() {
        let fetcher = Arc::new(CachedFetcher::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            fetcher.fetch(false, failing_load(&calls)),
            fetcher.fetch(false, failing_load(&calls)),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.unwrap_err(), Error::Transport("boom".to_string()));
        assert_eq!(b.unwrap_err(), Error::Transport("boom".to_string()));

        // Failure was not cached - the next call retries and succeeds
        let third = fetcher.fetch(false, counted_load(&calls, vec![5])).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*third, vec![5]);
    }

    #[tokio::test]
    async fn test_force_refresh_joins_in_flight_fetch() {
        let fetcher = Arc::new(CachedFetcher::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            fetcher.fetch(false, counted_load(&calls, vec![1])),
            fetcher.fetch(true, counted_load(&calls, vec![2])),
        );

        // Forcing while a fetch is in flight must not start a second one
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
    }
}
