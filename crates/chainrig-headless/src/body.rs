//! Rigid bodies and pin joints stored by the headless [`World`](crate::World).

use bitflags::bitflags;
use chainrig::{BodyHandle, Collider, PinParams};
use glam::Vec2;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Per-body state flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct BodyFlags: u8 {
        /// Never moves; impulses are ignored.
        const STATIC = 1;
        /// Skipped by integration until woken.
        const SLEEPING = 1 << 1;
    }
}

/// A rigid body.
///
/// Positions are local to the body's parent node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Local position.
    pub position: Vec2,
    /// Linear velocity.
    pub velocity: Vec2,
    /// Mass; zero for static bodies.
    pub mass: f32,
    /// Collision shape, if any.
    pub collider: Option<Collider>,
    /// State flags.
    pub flags: BodyFlags,
}

impl Body {
    /// Creates a static body.
    #[must_use]
    pub fn fixed(position: Vec2, collider: Collider) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass: 0.0,
            collider: Some(collider),
            flags: BodyFlags::STATIC,
        }
    }

    /// Creates a dynamic body. New dynamic bodies start asleep.
    #[must_use]
    pub fn dynamic(position: Vec2, mass: f32, collider: Option<Collider>) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass,
            collider,
            flags: BodyFlags::SLEEPING,
        }
    }

    /// True for static bodies.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(BodyFlags::STATIC)
    }

    /// True while the body is skipped by integration.
    #[must_use]
    pub fn is_sleeping(&self) -> bool {
        self.flags.contains(BodyFlags::SLEEPING)
    }

    /// Clears the sleeping flag.
    pub fn wake(&mut self) {
        self.flags.remove(BodyFlags::SLEEPING);
    }

    /// Changes velocity by `impulse / mass` and wakes the body.
    ///
    /// Static and massless bodies ignore impulses.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if self.is_static() || self.mass <= 0.0 {
            return;
        }
        self.velocity += impulse / self.mass;
        self.wake();
    }

    /// Advances the position by `velocity * dt` if the body is awake and dynamic.
    ///
    /// Returns true if the body moved.
    pub fn integrate(&mut self, dt: f32) -> bool {
        if self.is_static() || self.is_sleeping() || self.velocity == Vec2::ZERO {
            return false;
        }
        self.position += self.velocity * dt;
        true
    }
}

/// A pin joint between two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinJoint {
    /// First body.
    pub a: BodyHandle,
    /// Second body.
    pub b: BodyHandle,
    /// Pin position, local to the joint's parent.
    pub position: Vec2,
    /// Tuning.
    pub params: PinParams,
}
