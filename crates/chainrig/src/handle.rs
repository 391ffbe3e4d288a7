//! Opaque handles for host-owned objects.
//!
//! The rig never owns host memory directly. Everything it creates is referred
//! to by one of these `Copy` newtypes:
//! - [`NodeId`]: any node in the host scene (the rig root, bodies, constraints)
//! - [`BodyHandle`]: a static or dynamic rigid body
//! - [`ConstraintHandle`]: a pin constraint between two bodies
//! - [`PrototypeHandle`]: an instantiable rigid-body template
//!
//! Body and constraint handles are scene nodes as well and convert into
//! [`NodeId`] for scene operations and destruction.
//!
//! # Example
//!
//! ```
//! use chainrig::handle::{BodyHandle, NodeId};
//!
//! let body = BodyHandle::new(NodeId::new(7));
//! let node: NodeId = body.into();
//!
//! assert_eq!(node.as_u64(), 7);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node in the host scene.
///
/// Hosts assign ids; the rig only stores and compares them. Ordering follows
/// the numeric value so hosts that allocate monotonically get creation order
/// for free.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new `NodeId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Handle to a rigid body created by a [`PhysicsWorld`](crate::host::PhysicsWorld).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(NodeId);

impl BodyHandle {
    /// Wraps the scene node backing a body.
    #[must_use]
    pub const fn new(node: NodeId) -> Self {
        Self(node)
    }

    /// Returns the scene node of this body.
    #[must_use]
    pub const fn node(self) -> NodeId {
        self.0
    }
}

impl From<BodyHandle> for NodeId {
    fn from(handle: BodyHandle) -> Self {
        handle.0
    }
}

/// Handle to a pin constraint created by a [`PhysicsWorld`](crate::host::PhysicsWorld).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConstraintHandle(NodeId);

impl ConstraintHandle {
    /// Wraps the scene node backing a constraint.
    #[must_use]
    pub const fn new(node: NodeId) -> Self {
        Self(node)
    }

    /// Returns the scene node of this constraint.
    #[must_use]
    pub const fn node(self) -> NodeId {
        self.0
    }
}

impl From<ConstraintHandle> for NodeId {
    fn from(handle: ConstraintHandle) -> Self {
        handle.0
    }
}

/// Handle to an instantiable segment template.
///
/// Prototypes are host resources, not scene nodes. Whether a prototype
/// actually produces a dynamic rigid body is only known when the host tries
/// to instantiate it.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrototypeHandle(u64);

impl PrototypeHandle {
    /// Creates a prototype handle from a raw host id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw host id.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for PrototypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrototypeHandle({})", self.0)
    }
}

impl fmt::Display for PrototypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prototype#{}", self.0)
    }
}
