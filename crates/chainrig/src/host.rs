//! Capabilities the chain rig needs from its host engine.
//!
//! The rig builds nothing itself. Bodies, constraints and scene attachment
//! all go through these traits, which a game engine binding (or the headless
//! host in `chainrig-headless`) implements:
//!
//! - [`PhysicsWorld`]: creates and destroys bodies and pin constraints,
//!   receives impulses
//! - [`SceneHost`]: parent/child attachment and world-space positions
//! - [`ResourceLoader`]: resolves the well-known default segment template
//!
//! # Invariants
//!
//! - Hosts must hand out handles that stay valid until `destroy` is called
//!   on them.
//! - `destroy` on a handle the host no longer knows must be a no-op.
//! - A host may defer physical removal by a frame; the rig treats an issued
//!   `destroy` as final.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::handle::{BodyHandle, ConstraintHandle, NodeId, PrototypeHandle};

/// Collision shape for bodies the rig creates directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    /// Circle centered on the body origin.
    Circle {
        /// Circle radius in world units.
        radius: f32,
    },
}

/// Tuning for a pin constraint.
///
/// `bias` controls how fast positional error is corrected, `softness` how
/// much the pin is allowed to stretch. Both live in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinParams {
    /// Error correction rate.
    pub bias: f32,
    /// Constraint compliance.
    pub softness: f32,
}

impl PinParams {
    /// Default correction rate.
    pub const DEFAULT_BIAS: f32 = 0.3;
    /// Default compliance.
    pub const DEFAULT_SOFTNESS: f32 = 0.05;
}

impl Default for PinParams {
    fn default() -> Self {
        Self {
            bias: Self::DEFAULT_BIAS,
            softness: Self::DEFAULT_SOFTNESS,
        }
    }
}

/// Physics capabilities of the host.
///
/// Positions are local to the rig's root node.
pub trait PhysicsWorld {
    /// Creates a non-moving body.
    ///
    /// # Arguments
    ///
    /// * `position` - Body origin, local to the rig root
    /// * `collider` - Collision shape
    ///
    /// # Returns
    ///
    /// Handle of the new body. Creation cannot fail.
    fn create_static_body(&mut self, position: Vec2, collider: Collider) -> BodyHandle;

    /// Instantiates `prototype` as a dynamic rigid body at `position`.
    ///
    /// The body may start asleep; the rig calls [`wake`](Self::wake) once it
    /// is linked.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the prototype is unknown or does not produce
    /// a dynamic rigid body. The host must not leave anything behind in that
    /// case.
    fn create_dynamic_body(
        &mut self,
        prototype: PrototypeHandle,
        position: Vec2,
    ) -> Result<BodyHandle, HostError>;

    /// Pins two bodies together.
    ///
    /// # Arguments
    ///
    /// * `a` - Body closer to the anchor
    /// * `b` - Body being attached
    /// * `position` - Pin location, local to the rig root
    /// * `params` - Solver tuning
    fn create_pin_constraint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        position: Vec2,
        params: PinParams,
    ) -> ConstraintHandle;

    /// Applies an instantaneous impulse through the body's center of mass.
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2);

    /// Clears the body's sleeping state so the solver picks it up.
    fn wake(&mut self, body: BodyHandle);

    /// Removes a body or constraint.
    ///
    /// Unknown nodes are ignored.
    fn destroy(&mut self, node: NodeId);
}

/// Scene-graph capabilities of the host.
pub trait SceneHost {
    /// Attaches `child` under `parent` with a debug name.
    fn attach_child(&mut self, parent: NodeId, child: NodeId, name: &str);

    /// World-space position of `node`, if the host knows it.
    fn world_position(&self, node: NodeId) -> Option<Vec2>;
}

/// Resolves resource paths to segment templates.
pub trait ResourceLoader {
    /// Loads the template at `path`, or `None` if no such resource exists.
    fn load_prototype(&self, path: &str) -> Option<PrototypeHandle>;
}
