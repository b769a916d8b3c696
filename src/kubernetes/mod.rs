// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Kubernetes binding: wire types, HTTP transport, namespace view-models,
//! and the system-namespace visibility policy.

mod namespace;
mod transport;
mod visibility;

pub use namespace::{NamespaceConverter, NamespaceItem, NamespaceStatus, ObjectMeta, RawNamespace};
pub use transport::{HttpTransport, ListMeta, ListTransport, ResourceList};
pub use visibility::{
    ExclusionSetProvider, ExclusionSetUpdater, SystemNamespacesEvent, VisibilityPolicy,
};
