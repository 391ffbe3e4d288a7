//! Test support and cross-cutting tests for the chain rig.
//!
//! - `helpers.rs`: a recording host, a stub resource loader and a warning counter
//! - `properties.rs`: property tests over arbitrary configurations

mod helpers;

// Re-export for convenience
pub use helpers::*;
