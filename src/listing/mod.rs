// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Generic list pipeline: filtering, faceting, caching, pagination
//!
//! Everything here is generic over the entry type; the only contract an
//! entry must satisfy is [`ListEntry`]. The Kubernetes binding lives in
//! `crate::kubernetes`.

mod facet;
mod fetch;
mod filter;
mod provider;

pub use facet::{Facet, FacetCollector, FacetMatcher, EXCLUDED_LABEL_PREFIX};
pub use fetch::CachedFetcher;
pub use filter::{Comparison, Filter, FilterMatcher};
pub use provider::{DataProvider, DataProviderResult};

use crate::error::Result;

/// Lifecycle facts for entities subject to visibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle<'a> {
    /// Identifying name, matched against the exclusion set.
    pub name: &'a str,
    /// Lifecycle phase, e.g. "Active" or "Terminating". Absent means the
    /// entity is treated as active.
    pub phase: Option<&'a str>,
}

/// View-model contract for entries flowing through the list pipeline.
///
/// Capabilities an entry may or may not have (labels, a visibility
/// lifecycle) are resolved here, at the type level, when the entry is
/// converted, never probed at use time.
pub trait ListEntry {
    /// Field lookup for declarative filters (e.g. "name", "status.phase").
    fn attribute(&self, field: &str) -> Option<String>;

    /// Labels for entries that carry them; None means the entry
    /// contributes nothing to facet matching or facet summaries.
    fn labels(&self) -> Option<&[String]> {
        None
    }

    /// Lifecycle facts for namespace-like entities. None means the entry
    /// is not subject to visibility rules and is always shown.
    fn lifecycle(&self) -> Option<Lifecycle<'_>> {
        None
    }
}

/// Maps a raw fetched record into the domain view-model.
///
/// Pure; injected per provider instance. A failed conversion aborts the
/// whole fetch cycle (no partial results).
pub trait DataConverter<S, T>: Send + Sync {
    fn convert(&self, raw: S) -> Result<T>;
}

/// Pass-through converter for providers whose raw records already are the
/// view-model type.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl<T> DataConverter<T, T> for IdentityConverter {
    fn convert(&self, raw: T) -> Result<T> {
        Ok(raw)
    }
}
