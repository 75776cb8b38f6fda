//! Collection and container identity.

use serde::{Deserialize, Serialize};

use crate::types::{ContainerId, ServiceId};

/// Identity of a collection or grouping node within a named service.
///
/// `service = None` addresses the default/local namespace and
/// `container = None` the root of that namespace. Equality and hashing are
/// field-wise identity, never path resolution. Locations are produced by
/// Photo Store enumeration and treated as immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    service: Option<ServiceId>,
    container: Option<ContainerId>,
}

impl Location {
    /// Root of the default/local namespace.
    pub fn local_root() -> Self {
        Self {
            service: None,
            container: None,
        }
    }

    /// Node `container` inside the default/local namespace.
    pub fn local(container: impl Into<ContainerId>) -> Self {
        Self {
            service: None,
            container: Some(container.into()),
        }
    }

    /// Root of the named publish-style service `service`.
    pub fn service_root(service: impl Into<ServiceId>) -> Self {
        Self {
            service: Some(service.into()),
            container: None,
        }
    }

    /// Node `container` inside service `service`.
    pub fn in_service(service: impl Into<ServiceId>, container: impl Into<ContainerId>) -> Self {
        Self {
            service: Some(service.into()),
            container: Some(container.into()),
        }
    }

    /// Service id, or `None` for the default/local namespace.
    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    /// Container id, or `None` for the namespace root.
    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }
}
