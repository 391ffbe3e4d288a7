//! Headless world: node storage, scene attachment and impulse integration.
//!
//! The `World` stores every object a rig creates as a [`Node`] in a
//! `BTreeMap` keyed by [`NodeId`], so iteration follows creation order and is
//! deterministic. It provides:
//! - [`PhysicsWorld`]: bodies, pin joints, impulses, destruction
//! - [`SceneHost`]: parent/child attachment and translation-only world positions
//! - [`World::step`]: `position += velocity * dt` for awake dynamic bodies
//!
//! Pin joints are stored but never solved. The world exists to drive rigs in
//! tests, demos and benchmarks, not to simulate them faithfully.
//!
//! # Example
//!
//! ```
//! use chainrig::{ChainConfig, ChainRig};
//! use chainrig_headless::{PrototypeLibrary, World};
//! use glam::Vec2;
//!
//! let library = PrototypeLibrary::with_default_segment();
//! let mut world = World::new(library.clone());
//! let root = world.spawn_group("Chain", Vec2::new(100.0, 0.0));
//!
//! let mut rig = ChainRig::new(root, ChainConfig::default().with_segments(3));
//! assert!(rig.ready(&mut world, &library).is_complete());
//!
//! // Anchor + 3 segments + 3 joints + the root group.
//! assert_eq!(world.node_count(), 8);
//! ```

use std::collections::BTreeMap;

use chainrig::{
    BodyHandle, Collider, ConstraintHandle, HostError, NodeId, PhysicsWorld, PinParams,
    PrototypeHandle, SceneHost,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::body::{Body, PinJoint};
use crate::prototype::{Prototype, PrototypeLibrary};

/// Fixed timestep for [`World::step_fixed`] (1/60 second).
pub const FIXED_DT: f32 = 1.0 / 60.0;

// =============================================================================
// Nodes
// =============================================================================

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A plain grouping node with a local offset.
    Group {
        /// Local position.
        position: Vec2,
    },
    /// A rigid body.
    Body(Body),
    /// A pin joint.
    Pin(PinJoint),
}

/// A scene node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    name: String,
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl Node {
    /// Node id.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Debug name, empty until attached.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent node, if attached.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Node contents.
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Body contents, if this is a body.
    #[must_use]
    pub const fn as_body(&self) -> Option<&Body> {
        match &self.kind {
            NodeKind::Body(body) => Some(body),
            _ => None,
        }
    }

    /// Mutable body contents, if this is a body.
    #[must_use]
    pub fn as_body_mut(&mut self) -> Option<&mut Body> {
        match &mut self.kind {
            NodeKind::Body(body) => Some(body),
            _ => None,
        }
    }

    /// Joint contents, if this is a pin joint.
    #[must_use]
    pub const fn as_pin(&self) -> Option<&PinJoint> {
        match &self.kind {
            NodeKind::Pin(pin) => Some(pin),
            _ => None,
        }
    }

    fn local_position(&self) -> Vec2 {
        match &self.kind {
            NodeKind::Group { position } => *position,
            NodeKind::Body(body) => body.position,
            NodeKind::Pin(pin) => pin.position,
        }
    }
}

/// One impulse the world received.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpulseRecord {
    /// Tick the impulse arrived on.
    pub tick: u64,
    /// Target body.
    pub body: BodyHandle,
    /// Impulse vector.
    pub impulse: Vec2,
}

// =============================================================================
// World
// =============================================================================

/// In-memory host for chain rigs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    /// Monotonically increasing node id counter.
    next_id: u64,
    /// Node storage with deterministic iteration order.
    nodes: BTreeMap<NodeId, Node>,
    /// Templates for dynamic bodies.
    prototypes: PrototypeLibrary,
    /// Every impulse received, in arrival order.
    impulses: Vec<ImpulseRecord>,
    /// Number of completed steps.
    tick: u64,
}

impl World {
    /// Creates an empty world instantiating from `prototypes`.
    #[must_use]
    pub fn new(prototypes: PrototypeLibrary) -> Self {
        Self {
            prototypes,
            ..Self::default()
        }
    }

    /// Adds a top-level group node, typically a rig root.
    pub fn spawn_group(&mut self, name: &str, position: Vec2) -> NodeId {
        let id = self.insert(NodeKind::Group { position });
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = name.to_string();
        }
        id
    }

    /// Returns a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Returns a body by handle.
    #[must_use]
    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.nodes.get(&handle.node())?.as_body()
    }

    /// Returns a pin joint by handle.
    #[must_use]
    pub fn pin(&self, handle: ConstraintHandle) -> Option<&PinJoint> {
        self.nodes.get(&handle.node())?.as_pin()
    }

    /// Children of `parent` in creation order.
    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.nodes
            .values()
            .filter(move |node| node.parent == Some(parent))
    }

    /// All nodes in creation order.
    pub fn nodes_sorted(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Impulses received so far.
    #[must_use]
    pub fn impulse_log(&self) -> &[ImpulseRecord] {
        &self.impulses
    }

    /// Template library.
    #[must_use]
    pub fn prototypes(&self) -> &PrototypeLibrary {
        &self.prototypes
    }

    /// Mutable template library.
    pub fn prototypes_mut(&mut self) -> &mut PrototypeLibrary {
        &mut self.prototypes
    }

    /// Number of completed steps.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Advances every awake dynamic body by `dt` and bumps the tick.
    ///
    /// Returns the number of bodies that moved.
    pub fn step(&mut self, dt: f32) -> usize {
        let moved = self
            .nodes
            .values_mut()
            .filter_map(Node::as_body_mut)
            .map(|body| body.integrate(dt))
            .filter(|moved| *moved)
            .count();
        self.tick += 1;
        trace!(tick = self.tick, moved, "world stepped");
        moved
    }

    /// [`step`](Self::step) with [`FIXED_DT`].
    pub fn step_fixed(&mut self) -> usize {
        self.step(FIXED_DT)
    }

    fn insert(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                id,
                name: String::new(),
                parent: None,
                kind,
            },
        );
        id
    }

    /// True if `ancestor` is `node` or lies on its parent chain.
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(Node::parent);
        }
        false
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.nodes.get_mut(&handle.node())?.as_body_mut()
    }
}

impl PhysicsWorld for World {
    fn create_static_body(&mut self, position: Vec2, collider: Collider) -> BodyHandle {
        BodyHandle::new(self.insert(NodeKind::Body(Body::fixed(position, collider))))
    }

    fn create_dynamic_body(
        &mut self,
        prototype: PrototypeHandle,
        position: Vec2,
    ) -> Result<BodyHandle, HostError> {
        let body = match self.prototypes.get(prototype) {
            Some(Prototype::RigidBody { mass, collider }) => {
                Body::dynamic(position, *mass, Some(*collider))
            }
            Some(Prototype::Other { kind }) => {
                return Err(HostError::NotDynamicBody {
                    prototype,
                    kind: kind.clone(),
                })
            }
            None => return Err(HostError::UnknownPrototype(prototype)),
        };
        Ok(BodyHandle::new(self.insert(NodeKind::Body(body))))
    }

    fn create_pin_constraint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        position: Vec2,
        params: PinParams,
    ) -> ConstraintHandle {
        ConstraintHandle::new(self.insert(NodeKind::Pin(PinJoint {
            a,
            b,
            position,
            params,
        })))
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2) {
        let tick = self.tick;
        match self.body_mut(body) {
            Some(target) => {
                target.apply_impulse(impulse);
                self.impulses.push(ImpulseRecord {
                    tick,
                    body,
                    impulse,
                });
            }
            None => debug!(node = %body.node(), "impulse on unknown body ignored"),
        }
    }

    fn wake(&mut self, body: BodyHandle) {
        if let Some(target) = self.body_mut(body) {
            target.wake();
        }
    }

    fn destroy(&mut self, node: NodeId) {
        // Collect the subtree first so children go with their parent.
        let mut doomed = vec![node];
        let mut cursor = 0;
        while cursor < doomed.len() {
            let parent = doomed[cursor];
            doomed.extend(
                self.nodes
                    .values()
                    .filter(|n| n.parent == Some(parent))
                    .map(Node::id),
            );
            cursor += 1;
        }
        for id in doomed {
            if self.nodes.remove(&id).is_some() {
                trace!(node = %id, "node destroyed");
            }
        }
    }
}

impl SceneHost for World {
    fn attach_child(&mut self, parent: NodeId, child: NodeId, name: &str) {
        if !self.nodes.contains_key(&parent) {
            debug!(%parent, %child, "attach to unknown parent ignored");
            return;
        }
        if self.is_ancestor_or_self(child, parent) {
            debug!(%parent, %child, "attach would create a cycle, ignored");
            return;
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
            node.name = name.to_string();
        }
    }

    fn world_position(&self, node: NodeId) -> Option<Vec2> {
        let mut current = self.nodes.get(&node)?;
        let mut position = current.local_position();
        while let Some(parent) = current.parent.and_then(|id| self.nodes.get(&id)) {
            position += parent.local_position();
            current = parent;
        }
        Some(position)
    }
}

// =============================================================================
// Tests
// =============================================================================
