//! Error types for the chain rig and its host seam.
//!
//! None of these are fatal. The rig logs them and falls back to an empty
//! chain, a skipped segment or a no-op; they are returned so callers that
//! care can react.

use thiserror::Error;

use crate::handle::PrototypeHandle;

/// Errors reported by a host while creating objects for the rig.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host has no template registered under this handle.
    #[error("unknown prototype {0}")]
    UnknownPrototype(PrototypeHandle),

    /// The template instantiated into something that is not a dynamic rigid body.
    #[error("{prototype} instantiates `{kind}`, not a dynamic rigid body")]
    NotDynamicBody {
        /// The template that was instantiated.
        prototype: PrototypeHandle,
        /// Host-specific name of what it produced.
        kind: String,
    },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A chain needs at least one segment.
    #[error("segment_count must be >= 1")]
    ZeroSegments,

    /// Spacing must be finite and strictly positive.
    #[error("invalid segment_spacing: {0} (must be finite and > 0)")]
    InvalidSpacing(f32),

    /// Anchor radius must be finite and strictly positive.
    #[error("invalid anchor_radius: {0} (must be finite and > 0)")]
    InvalidAnchorRadius(f32),

    /// Seed impulse must be finite and non-negative.
    #[error("invalid seed_impulse: {0} (must be finite and >= 0)")]
    InvalidSeedImpulse(f32),

    /// Pin tuning values live in `[0, 1]`.
    #[error("invalid pin {field}: {value} (must be within [0, 1])")]
    InvalidPin {
        /// Which pin parameter.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// Reading a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document did not parse.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors returned by [`ChainRig`](crate::rig::ChainRig) operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The requested segment does not exist in the current chain.
    #[error("segment index {index} out of range (chain has {len} segments)")]
    SegmentOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of built segments.
        len: usize,
    },

    /// Configuration rejected by [`ChainRig::try_new`](crate::rig::ChainRig::try_new).
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
