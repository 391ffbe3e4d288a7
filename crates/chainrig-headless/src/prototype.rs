//! Segment templates and the resource table that serves them.
//!
//! A [`PrototypeLibrary`] maps [`PrototypeHandle`]s to [`Prototype`]s and,
//! optionally, resource paths to handles. It implements
//! [`ResourceLoader`] so a rig can resolve its default template from it.
//!
//! # Example
//!
//! ```
//! use chainrig::ResourceLoader;
//! use chainrig::config::DEFAULT_SEGMENT_PROTOTYPE_PATH;
//! use chainrig_headless::PrototypeLibrary;
//!
//! let library = PrototypeLibrary::with_default_segment();
//! assert!(library.load_prototype(DEFAULT_SEGMENT_PROTOTYPE_PATH).is_some());
//! assert!(library.load_prototype("res://missing").is_none());
//! ```

use std::collections::{BTreeMap, HashMap};

use chainrig::config::DEFAULT_SEGMENT_PROTOTYPE_PATH;
use chainrig::{Collider, PrototypeHandle, ResourceLoader};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mass of the built-in segment template.
pub const DEFAULT_SEGMENT_MASS: f32 = 1.0;

/// Collider radius of the built-in segment template.
pub const DEFAULT_SEGMENT_RADIUS: f32 = 8.0;

/// Something a prototype instantiates into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Prototype {
    /// A dynamic rigid body.
    RigidBody {
        /// Body mass.
        mass: f32,
        /// Collision shape.
        collider: Collider,
    },
    /// Anything else (areas, decorations). Cannot serve as a segment.
    Other {
        /// Descriptive kind, reported in errors.
        kind: String,
    },
}

impl Prototype {
    /// The built-in chain segment.
    #[must_use]
    pub fn segment() -> Self {
        Self::RigidBody {
            mass: DEFAULT_SEGMENT_MASS,
            collider: Collider::Circle {
                radius: DEFAULT_SEGMENT_RADIUS,
            },
        }
    }
}

/// Errors from registering prototypes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// Another prototype already lives at this path.
    #[error("resource path already registered: {0}")]
    DuplicatePath(String),
}

/// Registry of prototypes, addressable by handle or resource path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrototypeLibrary {
    /// Monotonically increasing handle counter.
    next_id: u64,
    /// Prototypes by handle.
    prototypes: BTreeMap<PrototypeHandle, Prototype>,
    /// Resource paths.
    paths: HashMap<String, PrototypeHandle>,
}

impl PrototypeLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a library serving [`Prototype::segment`] at the default
    /// segment path.
    #[must_use]
    pub fn with_default_segment() -> Self {
        let mut library = Self::new();
        let handle = library.register(Prototype::segment());
        library
            .paths
            .insert(DEFAULT_SEGMENT_PROTOTYPE_PATH.to_string(), handle);
        library
    }

    /// Registers a prototype without a path.
    pub fn register(&mut self, prototype: Prototype) -> PrototypeHandle {
        let handle = PrototypeHandle::new(self.next_id);
        self.next_id += 1;
        self.prototypes.insert(handle, prototype);
        handle
    }

    /// Registers a prototype reachable at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::DuplicatePath`] if `path` is taken; nothing is
    /// registered in that case.
    pub fn register_at(
        &mut self,
        path: &str,
        prototype: Prototype,
    ) -> Result<PrototypeHandle, LibraryError> {
        if self.paths.contains_key(path) {
            return Err(LibraryError::DuplicatePath(path.to_string()));
        }
        let handle = self.register(prototype);
        self.paths.insert(path.to_string(), handle);
        Ok(handle)
    }

    /// Looks up a prototype.
    #[must_use]
    pub fn get(&self, handle: PrototypeHandle) -> Option<&Prototype> {
        self.prototypes.get(&handle)
    }

    /// Number of registered prototypes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}

impl ResourceLoader for PrototypeLibrary {
    fn load_prototype(&self, path: &str) -> Option<PrototypeHandle> {
        self.paths.get(path).copied()
    }
}
