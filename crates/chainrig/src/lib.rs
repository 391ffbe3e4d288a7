//! # Chainrig
//!
//! Pin-jointed chain rig for 2D physics hosts.
//!
//! This crate builds and manages a rope/chain made of one static anchor,
//! a row of dynamic segments and the pin constraints between them. The
//! physics solver, renderer and scene graph belong to the host engine and are
//! reached only through the traits in [`host`].
//!
//! ## Architecture
//!
//! - **Rig**: [`ChainRig`] owns the ordered segment and link lists
//! - **Host seam**: [`PhysicsWorld`], [`SceneHost`], [`ResourceLoader`]
//! - **Configuration**: [`ChainConfig`], validated strictly on load and
//!   sanitized leniently on use
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chainrig::{ChainConfig, ChainRig};
//!
//! let config = ChainConfig::load("chain.json")?;
//! let mut rig = ChainRig::new(root, config);
//! rig.ready(&mut host, &loader);
//!
//! // every frame, from the host's update callback
//! host.step(dt);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handle;
pub mod host;
pub mod rig;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use config::ChainConfig;
pub use error::{ChainError, ConfigError, HostError};
pub use handle::{BodyHandle, ConstraintHandle, NodeId, PrototypeHandle};
pub use host::{Collider, PhysicsWorld, PinParams, ResourceLoader, SceneHost};
pub use rig::{BuildOutcome, ChainRig, ChainState, Link, LinkEnd, Segment, CHAIN_AXIS};
