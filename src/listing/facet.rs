// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Facet matching and aggregation
//!
//! Facets drive a multi-select refinement control: each facet is a label
//! value together with the count of entries currently carrying it. The
//! label extractor is supplied by the caller so these algorithms stay
//! independent of the entry type; the provider passes
//! [`super::ListEntry::labels`].

use std::collections::BTreeMap;

/// Labels with this prefix are high-cardinality replica-set hashes and are
/// never included in facet summaries.
pub const EXCLUDED_LABEL_PREFIX: &str = "pod-template-hash";

/// A label value with the number of entries carrying it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    pub label: String,
    pub count: usize,
}

impl Facet {
    pub fn new(label: &str, count: usize) -> Self {
        Self {
            label: label.to_string(),
            count,
        }
    }
}

/// Narrows entries by facet selections; pure and order-preserving
#[derive(Debug, Clone, Copy, Default)]
pub struct FacetMatcher;

impl FacetMatcher {
    /// Retain entries whose labels intersect the selection (any-of match).
    ///
    /// An empty selection is the identity. Entries without labels never
    /// match a non-empty selection.
    pub fn filter<'a, T, I, F>(&self, entries: I, selections: &[String], extract: F) -> Vec<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        F: Fn(&T) -> Option<&[String]>,
    {
        if selections.is_empty() {
            return entries.into_iter().collect();
        }

        entries
            .into_iter()
            .filter(|entry| {
                extract(entry).is_some_and(|labels| {
                    labels.iter().any(|label| selections.contains(label))
                })
            })
            .collect()
    }
}

/// Aggregates label frequency counts into facet summaries
#[derive(Debug, Clone, Copy, Default)]
pub struct FacetCollector;

impl FacetCollector {
    /// Count every label across every entry.
    ///
    /// Entries without labels contribute nothing. Labels prefixed with
    /// [`EXCLUDED_LABEL_PREFIX`] are dropped regardless of count. Output
    /// is sorted by label, so it is deterministic for a fixed input.
    pub fn collect<'a, T, I, F>(&self, entries: I, extract: F) -> Vec<Facet>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T>,
        F: Fn(&T) -> Option<&[String]>,
    {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for entry in entries {
            let Some(labels) = extract(entry) else {
                continue;
            };
            for label in labels {
                if label.starts_with(EXCLUDED_LABEL_PREFIX) {
                    continue;
                }
                *counts.entry(label.as_str()).or_insert(0) += 1;
            }
        }

        counts
            .into_iter()
            .map(|(label, count)| Facet::new(label, count))
            .collect()
    }
}
