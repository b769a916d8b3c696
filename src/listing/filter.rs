// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Declarative attribute filters
//!
//! A [`Filter`] is a (field, comparison, value) predicate over entry
//! attributes, evaluated in-process. Filters compose by logical AND: an
//! entry survives only if it satisfies every supplied filter.

use super::ListEntry;

/// Comparison operator for a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Attribute equals the value
    Equals,
    /// Attribute differs from the value (absent attributes pass)
    NotEquals,
    /// Attribute contains the value as a substring
    Contains,
}

/// A single declarative predicate over an entry attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Attribute name resolved through [`ListEntry::attribute`]
    pub field: String,
    pub comparison: Comparison,
    /// Value to compare against. None or empty means the filter has no
    /// discriminating value and always passes.
    pub value: Option<String>,
}

impl Filter {
    pub fn new(field: &str, comparison: Comparison, value: &str) -> Self {
        Self {
            field: field.to_string(),
            comparison,
            value: Some(value.to_string()),
        }
    }

    /// Check a single entry against this filter
    fn matches<T: ListEntry>(&self, entry: &T) -> bool {
        let value = match self.value.as_deref() {
            Some(v) if !v.is_empty() => v,
            // No discriminating value - always pass
            _ => return true,
        };

        match (entry.attribute(&self.field), self.comparison) {
            (Some(attr), Comparison::Equals) => attr == value,
            (Some(attr), Comparison::NotEquals) => attr != value,
            (Some(attr), Comparison::Contains) => attr.contains(value),
            // Absent attribute: only a negative comparison can hold
            (None, Comparison::NotEquals) => true,
            (None, _) => false,
        }
    }
}

/// Evaluates filter lists against entries; pure and order-preserving
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterMatcher;

impl FilterMatcher {
    /// Narrow `entries` to those satisfying every filter.
    ///
    /// An empty filter list is the identity.
    pub fn filter<'a, T, I>(&self, entries: I, filters: &[Filter]) -> Vec<&'a T>
    where
        T: ListEntry,
        I: IntoIterator<Item = &'a T>,
    {
        entries
            .into_iter()
            .filter(|entry| filters.iter().all(|f| f.matches(*entry)))
            .collect()
    }
}
