// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Persisted user preferences
//!
//! The provider consumes preferences through the [`PreferenceStore`]
//! key-value contract so hosts can plug in whatever storage they have
//! (browser-shell storage, a settings service). A JSON-file-backed
//! [`Config`] is shipped for standalone use, stored under ~/.k8slist/.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Preference key controlling system-namespace visibility.
/// Only the exact string "true" disables system-namespace hiding.
pub const SHOW_SYSTEM_NAMESPACES_KEY: &str = "console.showSystemNamespaces";

/// Read-only key-value preference source.
pub trait PreferenceStore {
    /// Look up a preference value by key; absent keys return None.
    fn get(&self, key: &str) -> Option<String>;
}

/// Preferences the provider actually consumes, resolved from a store.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preferences {
    /// When true, system namespaces are never hidden and no exclusion-set
    /// subscription is created.
    pub show_system_namespaces: bool,
}

impl Preferences {
    /// Resolve preferences from a store.
    ///
    /// The value must be exactly "true"; anything else (including "TRUE"
    /// or "1") leaves hiding enabled.
    pub fn from_store(store: &dyn PreferenceStore) -> Self {
        let show_system_namespaces = store
            .get(SHOW_SYSTEM_NAMESPACES_KEY)
            .is_some_and(|v| v == "true");
        Self {
            show_system_namespaces,
        }
    }
}

/// Get the base k8slist directory (~/.k8slist/)
pub fn base_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".k8slist"))
        .context("Could not determine home directory")
}

/// File-backed preference storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Flat preference map, e.g. "console.showSystemNamespaces" -> "true"
    #[serde(default)]
    pub preferences: BTreeMap<String, String>,
}

impl Config {
    /// Load config from disk, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Get the config file path (~/.k8slist/config.json)
    pub fn config_path() -> Result<PathBuf> {
        Ok(base_dir()?.join("config.json"))
    }

    /// Update a preference value and save
    pub fn set_preference(&mut self, key: &str, value: &str) -> Result<()> {
        self.preferences.insert(key.to_string(), value.to_string());
        self.save()
    }
}

impl PreferenceStore for Config {
    fn get(&self, key: &str) -> Option<String> {
        self.preferences.get(key).cloned()
    }
}
