// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Namespace records and their list view-model
//!
//! [`RawNamespace`] mirrors the fields of a v1/Namespace list item this
//! crate cares about; [`NamespaceConverter`] turns one into a
//! [`NamespaceItem`], resolving the label capability up front (labels are
//! rendered as `key=value` strings, the form the facet control displays).

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::listing::{DataConverter, Lifecycle, ListEntry};

/// As-fetched v1/Namespace list item (relevant fields only)
#[derive(Debug, Clone, Deserialize)]
pub struct RawNamespace {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: Option<NamespaceStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub labels: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamespaceStatus {
    #[serde(default)]
    pub phase: Option<String>,
}

/// Converted namespace view-model, immutable after conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceItem {
    pub name: String,
    /// Lifecycle phase; absent means treated as active
    pub phase: Option<String>,
    /// Labels as sorted `key=value` strings; None when the namespace
    /// carries none
    pub labels: Option<Vec<String>>,
}

impl ListEntry for NamespaceItem {
    fn attribute(&self, field: &str) -> Option<String> {
        match field {
            "name" | "metadata.name" => Some(self.name.clone()),
            "phase" | "status.phase" => self.phase.clone(),
            _ => None,
        }
    }

    fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    fn lifecycle(&self) -> Option<Lifecycle<'_>> {
        Some(Lifecycle {
            name: &self.name,
            phase: self.phase.as_deref(),
        })
    }
}

/// Converts raw namespace records into [`NamespaceItem`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespaceConverter;

impl DataConverter<RawNamespace, NamespaceItem> for NamespaceConverter {
    fn convert(&self, raw: RawNamespace) -> Result<NamespaceItem> {
        if raw.metadata.name.is_empty() {
            return Err(Error::Conversion(
                "namespace record has empty metadata.name".to_string(),
            ));
        }

        // BTreeMap keeps label order stable across fetches
        let labels = raw.metadata.labels.filter(|l| !l.is_empty()).map(|l| {
            l.into_iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect()
        });

        Ok(NamespaceItem {
            name: raw.metadata.name,
            phase: raw.status.and_then(|s| s.phase),
            labels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: serde_json::Value) -> RawNamespace {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_convert_full_record() {
        let item = NamespaceConverter
            .convert(raw(serde_json::json!({
                "metadata": {
                    "name": "default",
                    "labels": {"app": "foo", "tier": "web"}
                },
                "status": {"phase": "Active"}
            })))
            .unwrap();

        assert_eq!(item.name, "default");
        assert_eq!(item.phase.as_deref(), Some("Active"));
        assert_eq!(
            item.labels,
            Some(vec!["app=foo".to_string(), "tier=web".to_string()])
        );
    }

    #[test]
    fn test_convert_without_status_or_labels() {
        let item = NamespaceConverter
            .convert(raw(serde_json::json!({"metadata": {"name": "bare"}})))
            .unwrap();

        assert_eq!(item.name, "bare");
        assert!(item.phase.is_none());
        assert!(item.labels.is_none());
    }

    #[test]
    fn test_convert_empty_labels_map_means_no_labels() {
        let item = NamespaceConverter
            .convert(raw(serde_json::json!({
                "metadata": {"name": "x", "labels": {}}
            })))
            .unwrap();
        assert!(item.labels.is_none());
    }

    #[test]
    fn test_convert_rejects_empty_name() {
        let err = NamespaceConverter
            .convert(raw(serde_json::json!({"metadata": {"name": ""}})))
            .unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));
    }

    #[test]
    fn test_attribute_lookup() {
        let item = NamespaceItem {
            name: "default".to_string(),
            phase: Some("Active".to_string()),
            labels: None,
        };

        assert_eq!(item.attribute("name").as_deref(), Some("default"));
        assert_eq!(item.attribute("metadata.name").as_deref(), Some("default"));
        assert_eq!(item.attribute("status.phase").as_deref(), Some("Active"));
        assert_eq!(item.attribute("spec.finalizers"), None);
    }

    #[test]
    fn test_namespace_is_lifecycle_scoped() {
        let item = NamespaceItem {
            name: "default".to_string(),
            phase: None,
            labels: None,
        };
        let lifecycle = item.lifecycle().unwrap();
        assert_eq!(lifecycle.name, "default");
        assert!(lifecycle.phase.is_none());
    }
}
