//! # Chainrig Headless
//!
//! In-memory host for [`chainrig`] rigs.
//!
//! Implements the rig's host traits without an engine so chains can be
//! built, poked and stepped in tests, the `chain_demo` driver and benchmarks.
//! Constraints are recorded, never solved.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod body;
pub mod prototype;
pub mod world;

// Re-exports for convenience
pub use body::{Body, BodyFlags, PinJoint};
pub use prototype::{LibraryError, Prototype, PrototypeLibrary};
pub use world::{ImpulseRecord, Node, NodeKind, World, FIXED_DT};
