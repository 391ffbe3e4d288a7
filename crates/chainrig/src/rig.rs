//! The chain rig: an anchored, pin-jointed sequence of rigid segments.
//!
//! A [`ChainRig`] owns everything it asks the host to create: one static
//! anchor, up to `segment_count` dynamic segments, and one pin link per
//! linked segment. It is either **Empty** or **Built**:
//!
//! - [`ChainRig::initialize`] is the only Empty → Built transition (it tears
//!   down first, so calling it on a built chain rebuilds)
//! - [`ChainRig::teardown`] is the only Built → Empty transition
//!
//! # Construction Order
//!
//! Segments sit along [`CHAIN_AXIS`] at `(slot + 1) * spacing` from the
//! anchor. Each new segment is pinned to the previous element at the midpoint
//! of both rest positions: the anchor for slot 0, otherwise the last segment
//! that was actually created. A slot whose instantiation fails is skipped with
//! a warning; construction carries on, so a chain may end up with fewer
//! segments than configured and, when slot 0 is lost, one unlinked segment.
//!
//! # Host Access
//!
//! The rig never stores its host. Every operation that touches the world
//! takes it by `&mut`, which keeps all mutation on the caller's thread and
//! lets one host serve many rigs.
//!
//! # Example
//!
//! ```ignore
//! use chainrig::{ChainConfig, ChainRig};
//!
//! let mut rig = ChainRig::new(root, ChainConfig::default().with_prototype(prototype));
//! let outcome = rig.initialize(&mut host);
//! assert!(outcome.is_complete());
//!
//! rig.apply_impulse(&mut host, 2, glam::Vec2::new(40.0, 0.0))?;
//! rig.teardown(&mut host);
//! ```

use glam::Vec2;
use tracing::{debug, trace, warn};

use crate::config::ChainConfig;
use crate::error::ChainError;
use crate::handle::{BodyHandle, ConstraintHandle, NodeId};
use crate::host::{Collider, PhysicsWorld, ResourceLoader, SceneHost};

/// Direction segments hang from the anchor, in rig-local space.
pub const CHAIN_AXIS: Vec2 = Vec2::Y;

/// Rest position of the segment built for `slot`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rest_position(slot: usize, spacing: f32) -> Vec2 {
    CHAIN_AXIS * ((slot + 1) as f32 * spacing)
}

// =============================================================================
// Chain Elements
// =============================================================================

/// Lifecycle state of a rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// Nothing exists in the host.
    Empty,
    /// Anchor, segments and links exist in the host.
    Built,
}

/// One dynamic body of the chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    body: BodyHandle,
    slot: usize,
    rest_position: Vec2,
}

impl Segment {
    /// Host body of this segment.
    #[must_use]
    pub const fn body(&self) -> BodyHandle {
        self.body
    }

    /// Configured slot this segment was built for.
    ///
    /// Equal to the segment's index unless an earlier slot was skipped.
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.slot
    }

    /// Position the segment was created at, relative to the rig root.
    #[must_use]
    pub const fn rest_position(&self) -> Vec2 {
        self.rest_position
    }
}

/// The element a link starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEnd {
    /// The rig's static anchor.
    Anchor,
    /// A previously created segment, by index.
    Segment(usize),
}

/// A pin constraint terminating at one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    constraint: ConstraintHandle,
    source: LinkEnd,
    target: usize,
    position: Vec2,
}

impl Link {
    /// Host constraint backing this link.
    #[must_use]
    pub const fn constraint(&self) -> ConstraintHandle {
        self.constraint
    }

    /// Element the link starts from.
    #[must_use]
    pub const fn source(&self) -> LinkEnd {
        self.source
    }

    /// Index of the segment the link terminates at.
    #[must_use]
    pub const fn target(&self) -> usize {
        self.target
    }

    /// Pin position, relative to the rig root.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }
}

/// Result of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Nothing was built.
    Empty,
    /// Every configured slot produced a linked segment.
    Complete {
        /// Number of segments built.
        segments: usize,
    },
    /// Some slots were skipped or some segments are unlinked.
    Partial {
        /// Number of segments built.
        segments: usize,
        /// Number of links built.
        links: usize,
        /// Slots whose instantiation failed.
        skipped: Vec<usize>,
    },
}

impl BuildOutcome {
    /// True for [`BuildOutcome::Complete`].
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// True for [`BuildOutcome::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

// =============================================================================
// Chain Rig
// =============================================================================

/// Anchored chain of pin-jointed rigid segments.
///
/// See the [module documentation](self) for the construction rules.
#[derive(Debug, Clone)]
pub struct ChainRig {
    /// Scene node everything is attached under.
    root: NodeId,
    /// Sanitized configuration.
    config: ChainConfig,
    /// Static anchor, present only while built.
    anchor: Option<BodyHandle>,
    /// Segments in creation order.
    segments: Vec<Segment>,
    /// Links in creation order.
    links: Vec<Link>,
}

impl ChainRig {
    /// Creates an empty rig attached under `root`.
    ///
    /// The configuration is [sanitized](ChainConfig::sanitized) first.
    #[must_use]
    pub fn new(root: NodeId, config: ChainConfig) -> Self {
        Self {
            root,
            config: config.sanitized(),
            anchor: None,
            segments: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Creates an empty rig, rejecting an invalid configuration instead of
    /// repairing it.
    ///
    /// # Arguments
    ///
    /// * `root` - Scene node the chain is attached under
    /// * `config` - Settings checked with [`ChainConfig::validate`]
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Config`] with the first offending field.
    pub fn try_new(root: NodeId, config: ChainConfig) -> Result<Self, ChainError> {
        config.validate()?;
        Ok(Self::new(root, config))
    }

    /// Host "ready" hook.
    ///
    /// Resolves the default prototype through `loader` when none is
    /// assigned, then builds the chain.
    pub fn ready<H, L>(&mut self, host: &mut H, loader: &L) -> BuildOutcome
    where
        H: PhysicsWorld + SceneHost + ?Sized,
        L: ResourceLoader + ?Sized,
    {
        if self.config.segment_prototype.is_none() {
            if let Some(prototype) = loader.load_prototype(&self.config.prototype_path) {
                debug!(
                    path = %self.config.prototype_path,
                    %prototype,
                    "loaded default chain segment prototype"
                );
                self.config.segment_prototype = Some(prototype);
            }
        }
        self.initialize(host)
    }

    /// Builds the chain, tearing down any previous one first.
    ///
    /// Never fails: a missing prototype leaves the rig empty and a failed
    /// segment is skipped. Both are logged and reflected in the returned
    /// [`BuildOutcome`].
    ///
    /// # Arguments
    ///
    /// * `host` - World the anchor, segments and pins are created in
    ///
    /// # Returns
    ///
    /// - [`BuildOutcome::Complete`] when every slot produced a linked segment
    /// - [`BuildOutcome::Partial`] when some slots were skipped or a segment
    ///   could not be linked
    /// - [`BuildOutcome::Empty`] when no prototype is assigned or no segment
    ///   could be created; nothing is left in the host in that case
    pub fn initialize<H>(&mut self, host: &mut H) -> BuildOutcome
    where
        H: PhysicsWorld + SceneHost + ?Sized,
    {
        self.teardown(host);

        let Some(prototype) = self.config.segment_prototype else {
            warn!(root = %self.root, "chain segment prototype is not assigned");
            return BuildOutcome::Empty;
        };

        let anchor = host.create_static_body(
            Vec2::ZERO,
            Collider::Circle {
                radius: self.config.anchor_radius,
            },
        );
        host.attach_child(self.root, anchor.into(), "Anchor");
        self.anchor = Some(anchor);

        let spacing = self.config.segment_spacing;
        let mut skipped = Vec::new();
        let mut unlinked = 0;

        for slot in 0..self.config.segment_count {
            let position = rest_position(slot, spacing);
            let body = match host.create_dynamic_body(prototype, position) {
                Ok(body) => body,
                Err(err) => {
                    warn!(slot, error = %err, "skipping chain segment");
                    skipped.push(slot);
                    continue;
                }
            };
            host.attach_child(self.root, body.into(), &format!("Segment_{slot}"));

            // Resolve the previous element before this segment joins the list.
            let index = self.segments.len();
            let previous = if slot == 0 {
                Some((LinkEnd::Anchor, anchor, Vec2::ZERO))
            } else {
                self.segments
                    .last()
                    .map(|prev| (LinkEnd::Segment(index - 1), prev.body, prev.rest_position))
            };

            self.segments.push(Segment {
                body,
                slot,
                rest_position: position,
            });
            trace!(slot, index, ?position, "created chain segment");

            if let Some((from, from_body, from_position)) = previous {
                let pin_at = (from_position + position) * 0.5;
                let constraint =
                    host.create_pin_constraint(from_body, body, pin_at, self.config.pin);
                host.attach_child(self.root, constraint.into(), &format!("Joint_{slot}"));
                self.links.push(Link {
                    constraint,
                    source: from,
                    target: index,
                    position: pin_at,
                });
            } else {
                warn!(slot, "no earlier chain segment to link to, leaving segment unlinked");
                unlinked += 1;
            }

            host.wake(body);
        }

        if self.segments.is_empty() {
            warn!(
                slots = self.config.segment_count,
                "no chain segment could be instantiated"
            );
            self.teardown(host);
            return BuildOutcome::Empty;
        }

        if self.config.seed_impulse > 0.0 {
            if let Some(last) = self.segments.last() {
                host.apply_impulse(last.body, CHAIN_AXIS * self.config.seed_impulse);
            }
        }

        debug!(
            root = %self.root,
            segments = self.segments.len(),
            links = self.links.len(),
            skipped = skipped.len(),
            "chain built"
        );

        if skipped.is_empty() && unlinked == 0 {
            BuildOutcome::Complete {
                segments: self.segments.len(),
            }
        } else {
            BuildOutcome::Partial {
                segments: self.segments.len(),
                links: self.links.len(),
                skipped,
            }
        }
    }

    /// Destroys links, then segments, then the anchor.
    ///
    /// Idempotent: on an empty rig this issues no host calls.
    pub fn teardown<H>(&mut self, host: &mut H)
    where
        H: PhysicsWorld + ?Sized,
    {
        if self.anchor.is_none() && self.segments.is_empty() && self.links.is_empty() {
            return;
        }

        let links = self.links.len();
        let segments = self.segments.len();
        for link in self.links.drain(..) {
            host.destroy(link.constraint.into());
        }
        for segment in self.segments.drain(..) {
            host.destroy(segment.body.into());
        }
        if let Some(anchor) = self.anchor.take() {
            host.destroy(anchor.into());
        }
        debug!(root = %self.root, links, segments, "chain torn down");
    }

    /// Replaces the configuration and rebuilds.
    ///
    /// A configuration without a segment prototype keeps the one the rig
    /// already has, including one resolved by [`ready`](Self::ready).
    pub fn reconfigure<H>(&mut self, host: &mut H, config: ChainConfig) -> BuildOutcome
    where
        H: PhysicsWorld + SceneHost + ?Sized,
    {
        let previous = self.config.segment_prototype;
        self.config = config.sanitized();
        if self.config.segment_prototype.is_none() {
            self.config.segment_prototype = previous;
        }
        self.initialize(host)
    }

    /// Forwards `impulse` unchanged to segment `index`.
    ///
    /// # Arguments
    ///
    /// * `host` - World that owns the segment bodies
    /// * `index` - Position in [`segments`](Self::segments), not the configured slot
    /// * `impulse` - Impulse in rig-local space
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::SegmentOutOfRange`] (after logging a warning)
    /// when `index` is not a built segment. The host is not touched.
    pub fn apply_impulse<H>(
        &self,
        host: &mut H,
        index: usize,
        impulse: Vec2,
    ) -> Result<(), ChainError>
    where
        H: PhysicsWorld + ?Sized,
    {
        let Some(segment) = self.segments.get(index) else {
            let len = self.segments.len();
            warn!(index, len, "chain segment index out of range");
            return Err(ChainError::SegmentOutOfRange { index, len });
        };
        host.apply_impulse(segment.body, impulse);
        Ok(())
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ChainState {
        if self.anchor.is_some() {
            ChainState::Built
        } else {
            ChainState::Empty
        }
    }

    /// Scene node the chain is attached under.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Static anchor, if built.
    #[must_use]
    pub const fn anchor(&self) -> Option<BodyHandle> {
        self.anchor
    }

    /// Segments in creation order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segment at `index`, if built.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Links in creation order.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Number of built segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of built links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// World-space positions of the segments the host still knows about.
    #[must_use]
    pub fn segment_world_positions<S>(&self, scene: &S) -> Vec<Vec2>
    where
        S: SceneHost + ?Sized,
    {
        self.segments
            .iter()
            .filter_map(|segment| scene.world_position(segment.body.into()))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
