// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! The composed request/response cycle
//!
//! One [`DataProvider`] instance serves one resource URL. Each `get_data`
//! call runs the full pipeline: cached fetch (transport -> convert ->
//! visibility filter), filter narrowing, facet narrowing, pagination, and
//! facet summarization. Calls are single-shot: one result per call, no
//! continuous stream.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::kubernetes::{ListTransport, VisibilityPolicy};

use super::{
    CachedFetcher, DataConverter, Facet, FacetCollector, FacetMatcher, Filter, FilterMatcher,
    ListEntry,
};

/// One page of results plus the numbers the list view needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataProviderResult<T> {
    /// The requested page of the narrowed set
    pub items: Vec<T>,
    /// Size of the narrowed set before pagination (post-filter,
    /// post-facet-selection)
    pub total_count: usize,
    /// Facet summary over the filter-narrowed set, so the refinement
    /// control can still offer the other facets with counts
    pub facets: Vec<Facet>,
}

/// Cache-backed data provider for a single resource list endpoint
pub struct DataProvider<S, T> {
    resource_url: String,
    transport: Arc<dyn ListTransport<S>>,
    converter: Arc<dyn DataConverter<S, T>>,
    visibility: Arc<VisibilityPolicy>,
    fetcher: CachedFetcher<T>,
    filter_matcher: FilterMatcher,
    facet_matcher: FacetMatcher,
    facet_collector: FacetCollector,
}

impl<S, T> DataProvider<S, T>
where
    S: Send + 'static,
    T: ListEntry + Clone + Send + Sync + 'static,
{
    pub fn new(
        resource_url: impl Into<String>,
        transport: Arc<dyn ListTransport<S>>,
        converter: Arc<dyn DataConverter<S, T>>,
        visibility: VisibilityPolicy,
    ) -> Self {
        Self {
            resource_url: resource_url.into(),
            transport,
            converter,
            visibility: Arc::new(visibility),
            fetcher: CachedFetcher::new(),
            filter_matcher: FilterMatcher,
            facet_matcher: FacetMatcher,
            facet_collector: FacetCollector,
        }
    }

    /// Drop the cached dataset; the next `get_data` refetches.
    pub fn invalidate(&self) {
        self.fetcher.invalidate();
    }

    /// Fetch (or replay) the dataset and assemble one result page.
    ///
    /// `page_number` is 1-based; paging past the end of the narrowed set
    /// yields an empty page with the same `total_count`. With
    /// `force_refresh` the transport is always called again, regardless
    /// of cache state. Transport and conversion failures abort the call
    /// and are never cached.
    pub async fn get_data(
        &self,
        page_number: usize,
        page_size: usize,
        filters: &[Filter],
        facet_selections: &[String],
        force_refresh: bool,
    ) -> Result<DataProviderResult<T>> {
        if page_number == 0 {
            return Err(Error::InvalidPage(page_number));
        }

        let transport = Arc::clone(&self.transport);
        let converter = Arc::clone(&self.converter);
        let visibility = Arc::clone(&self.visibility);
        let url = self.resource_url.clone();

        let items = self
            .fetcher
            .fetch(force_refresh, async move {
                let list = transport.list(&url).await?;
                let fetched = list.items.len();

                // Visibility is applied once, at fetch time; later
                // exclusion-set changes do not invalidate this dataset.
                let mut visible = Vec::with_capacity(fetched);
                for raw in list.items {
                    let entry = converter.convert(raw)?;
                    if visibility.should_show(&entry) {
                        visible.push(entry);
                    }
                }

                debug!(
                    url = %url,
                    fetched,
                    visible = visible.len(),
                    "Fetched and converted resource list"
                );
                Ok(visible)
            })
            .await?;

        let filtered = self.filter_matcher.filter(items.iter(), filters);
        let faceted =
            self.facet_matcher
                .filter(filtered.iter().copied(), facet_selections, T::labels);

        // An offset too large for usize is necessarily past the end, which
        // yields an empty page rather than an error.
        let page: Vec<T> = match (page_number - 1).checked_mul(page_size) {
            Some(index) => faceted
                .iter()
                .skip(index)
                .take(page_size)
                .map(|e| (*e).clone())
                .collect(),
            None => Vec::new(),
        };

        // Facet counts reflect the filter-narrowed set, independent of
        // which facets are currently selected.
        let facets = self
            .facet_collector
            .collect(filtered.iter().copied(), T::labels);

        debug!(
            page_number,
            page_size,
            filtered = filtered.len(),
            total = faceted.len(),
            returned = page.len(),
            "Assembled result page"
        );

        Ok(DataProviderResult {
            items: page,
            total_count: faceted.len(),
            facets,
        })
    }
}
