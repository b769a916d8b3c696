// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! System-namespace visibility policy
//!
//! The host shell announces which namespaces are infrastructure-internal
//! through an asynchronous configuration event. The policy reads that set
//! through an [`ExclusionSetProvider`]: either a fixed set, or a
//! watch-channel subscription whose updater replaces the set in full on
//! every event. Each read sees the entirely-old or entirely-new set,
//! never a partial update.

use std::collections::HashSet;

use serde::Deserialize;
use tokio::sync::watch;
use tracing::debug;

use crate::config::Preferences;
use crate::listing::ListEntry;

/// The only lifecycle phase in which a namespace is shown
const ACTIVE_PHASE: &str = "Active";

/// Configuration event payload from the host shell.
/// Only the `systemNamespaces` field is consumed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemNamespacesEvent {
    #[serde(default, rename = "systemNamespaces")]
    pub system_namespaces: Option<Vec<String>>,
}

/// Source of the names to hide
#[derive(Debug, Clone)]
pub enum ExclusionSetProvider {
    /// Fixed set, never updated
    Static(HashSet<String>),
    /// Subscription to an external feed; holds whatever the last event
    /// carried, empty until the first event arrives
    Subscribed(watch::Receiver<HashSet<String>>),
}

impl ExclusionSetProvider {
    /// A permanently empty set: nothing is hidden by name.
    pub fn empty() -> Self {
        Self::Static(HashSet::new())
    }

    /// A fixed set of names to hide.
    pub fn fixed<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Static(names.into_iter().map(Into::into).collect())
    }

    /// A subscription pair: feed events into the updater, read the
    /// current set through the provider.
    pub fn subscribed() -> (ExclusionSetUpdater, Self) {
        let (sender, receiver) = watch::channel(HashSet::new());
        (ExclusionSetUpdater { sender }, Self::Subscribed(receiver))
    }

    fn contains(&self, name: &str) -> bool {
        match self {
            Self::Static(set) => set.contains(name),
            Self::Subscribed(receiver) => receiver.borrow().contains(name),
        }
    }
}

/// Write side of a subscribed exclusion set
#[derive(Debug)]
pub struct ExclusionSetUpdater {
    sender: watch::Sender<HashSet<String>>,
}

impl ExclusionSetUpdater {
    /// Replace the exclusion set in full from an event payload.
    /// A payload without `systemNamespaces` clears the set.
    pub fn apply(&self, event: &SystemNamespacesEvent) {
        let set: HashSet<String> = event
            .system_namespaces
            .clone()
            .unwrap_or_default()
            .into_iter()
            .collect();
        debug!(system_namespaces = set.len(), "Exclusion set replaced");
        let _ = self.sender.send(set);
    }
}

/// Decides whether an individual entry appears in results.
///
/// Entries without a lifecycle (not namespace-like) are always shown.
/// A namespace-like entry is hidden when its name is in the exclusion
/// set, or when its phase is present and not "Active".
pub struct VisibilityPolicy {
    exclusions: ExclusionSetProvider,
}

impl VisibilityPolicy {
    pub fn new(exclusions: ExclusionSetProvider) -> Self {
        Self { exclusions }
    }

    /// Policy that hides nothing by name (lifecycle rules still apply).
    pub fn show_all() -> Self {
        Self::new(ExclusionSetProvider::empty())
    }

    /// Build the policy the way a console host would: if the user opted
    /// in to seeing system namespaces, the exclusion set is permanently
    /// empty and no subscription exists; otherwise the returned updater
    /// must be wired to the host's configuration event feed.
    pub fn from_preferences(prefs: &Preferences) -> (Self, Option<ExclusionSetUpdater>) {
        if prefs.show_system_namespaces {
            (Self::show_all(), None)
        } else {
            let (updater, provider) = ExclusionSetProvider::subscribed();
            (Self::new(provider), Some(updater))
        }
    }

    pub fn should_show<T: ListEntry>(&self, entry: &T) -> bool {
        let Some(lifecycle) = entry.lifecycle() else {
            // Not namespace-like: the policy does not apply
            return true;
        };

        if self.exclusions.contains(lifecycle.name) {
            return false;
        }

        lifecycle.phase.is_none_or(|phase| phase == ACTIVE_PHASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::Lifecycle;

    struct Ns {
        name: &'static str,
        phase: Option<&'static str>,
    }

    impl ListEntry for Ns {
        fn attribute(&self, _field: &str) -> Option<String> {
            None
        }

        fn lifecycle(&self) -> Option<Lifecycle<'_>> {
            Some(Lifecycle {
                name: self.name,
                phase: self.phase,
            })
        }
    }

    struct Unscoped;

    impl ListEntry for Unscoped {
        fn attribute(&self, _field: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_active_namespace_is_shown() {
        let policy = VisibilityPolicy::show_all();
        assert!(policy.should_show(&Ns {
            name: "default",
            phase: Some("Active"),
        }));
    }

    #[test]
    fn test_missing_phase_is_treated_as_active() {
        let policy = VisibilityPolicy::show_all();
        assert!(policy.should_show(&Ns {
            name: "default",
            phase: None,
        }));
    }

    #[test]
    fn test_terminating_namespace_is_hidden_even_if_not_excluded() {
        let policy = VisibilityPolicy::show_all();
        assert!(!policy.should_show(&Ns {
            name: "dying",
            phase: Some("Terminating"),
        }));
    }

    #[test]
    fn test_excluded_name_is_hidden() {
        let policy = VisibilityPolicy::new(ExclusionSetProvider::fixed(["kube-system"]));
        assert!(!policy.should_show(&Ns {
            name: "kube-system",
            phase: Some("Active"),
        }));
        assert!(policy.should_show(&Ns {
            name: "default",
            phase: Some("Active"),
        }));
    }

    #[test]
    fn test_non_namespace_like_entries_are_always_shown() {
        let policy = VisibilityPolicy::new(ExclusionSetProvider::fixed(["anything"]));
        assert!(policy.should_show(&Unscoped));
    }

    #[test]
    fn test_subscribed_set_is_empty_until_first_event() {
        let (_updater, provider) = ExclusionSetProvider::subscribed();
        let policy = VisibilityPolicy::new(provider);
        assert!(policy.should_show(&Ns {
            name: "kube-system",
            phase: Some("Active"),
        }));
    }

    #[test]
    fn test_event_replaces_set_in_full() {
        let (updater, provider) = ExclusionSetProvider::subscribed();
        let policy = VisibilityPolicy::new(provider);

        updater.apply(&SystemNamespacesEvent {
            system_namespaces: Some(vec!["kube-system".to_string(), "istio-system".to_string()]),
        });
        assert!(!policy.should_show(&Ns {
            name: "kube-system",
            phase: Some("Active"),
        }));

        // Next event replaces, not merges: kube-system is visible again
        updater.apply(&SystemNamespacesEvent {
            system_namespaces: Some(vec!["istio-system".to_string()]),
        });
        assert!(policy.should_show(&Ns {
            name: "kube-system",
            phase: Some("Active"),
        }));
        assert!(!policy.should_show(&Ns {
            name: "istio-system",
            phase: Some("Active"),
        }));
    }

    #[test]
    fn test_event_without_field_clears_set() {
        let (updater, provider) = ExclusionSetProvider::subscribed();
        let policy = VisibilityPolicy::new(provider);

        updater.apply(&SystemNamespacesEvent {
            system_namespaces: Some(vec!["kube-system".to_string()]),
        });
        updater.apply(&SystemNamespacesEvent::default());
        assert!(policy.should_show(&Ns {
            name: "kube-system",
            phase: Some("Active"),
        }));
    }

    #[test]
    fn test_event_deserialization() {
        let event: SystemNamespacesEvent =
            serde_json::from_str(r#"{"systemNamespaces": ["kube-system"]}"#).unwrap();
        assert_eq!(
            event.system_namespaces,
            Some(vec!["kube-system".to_string()])
        );

        let event: SystemNamespacesEvent = serde_json::from_str("{}").unwrap();
        assert!(event.system_namespaces.is_none());
    }

    #[test]
    fn test_preference_disables_subscription() {
        let prefs = Preferences {
            show_system_namespaces: true,
        };
        let (policy, updater) = VisibilityPolicy::from_preferences(&prefs);
        assert!(updater.is_none());
        assert!(policy.should_show(&Ns {
            name: "kube-system",
            phase: Some("Active"),
        }));
    }

    #[test]
    fn test_default_preference_creates_subscription() {
        let prefs = Preferences::default();
        let (policy, updater) = VisibilityPolicy::from_preferences(&prefs);
        let updater = updater.expect("subscription expected");

        updater.apply(&SystemNamespacesEvent {
            system_namespaces: Some(vec!["kube-system".to_string()]),
        });
        assert!(!policy.should_show(&Ns {
            name: "kube-system",
            phase: Some("Active"),
        }));
    }
}
