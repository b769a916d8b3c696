// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! k8slist: cache-backed list data provider for Kubernetes resource views
//!
//! Sits between a UI list view and a remote resource API. One provider
//! instance owns one resource URL; each `get_data` call fetches the full
//! resource list (once, cached and replayed to every caller until
//! invalidated), converts raw records into view-models, hides entries per
//! a dynamic visibility policy, narrows by declarative filters and facet
//! selections, paginates, and summarizes the filtered set by label-derived
//! facets.
//!
//! The pipeline pieces are independently usable:
//! - [`listing::FilterMatcher`] / [`listing::FacetMatcher`]: pure,
//!   order-preserving narrowing
//! - [`listing::FacetCollector`]: label frequency summaries
//! - [`listing::CachedFetcher`]: fetch-once, replay-to-many caching
//! - [`kubernetes::VisibilityPolicy`]: system-namespace and lifecycle
//!   hiding driven by an asynchronously updated exclusion set
//! - [`listing::DataProvider`]: the composed request/response cycle

pub mod config;
pub mod error;
pub mod kubernetes;
pub mod listing;

pub use error::{Error, Result};
pub use listing::{
    CachedFetcher, Comparison, DataConverter, DataProvider, DataProviderResult, Facet,
    FacetCollector, FacetMatcher, Filter, FilterMatcher, IdentityConverter, Lifecycle, ListEntry,
};
