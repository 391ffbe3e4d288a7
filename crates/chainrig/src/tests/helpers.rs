//! Test helpers: a host that records every call, a stub resource loader and
//! a warning counter.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glam::Vec2;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use crate::config::DEFAULT_SEGMENT_PROTOTYPE_PATH;
use crate::error::HostError;
use crate::handle::{BodyHandle, ConstraintHandle, NodeId, PrototypeHandle};
use crate::host::{Collider, PhysicsWorld, PinParams, ResourceLoader, SceneHost};

// =============================================================================
// Recording Host
// =============================================================================

/// One call the rig made into the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    CreateStatic(BodyHandle),
    CreateDynamic {
        body: BodyHandle,
        position: Vec2,
    },
    CreatePin {
        constraint: ConstraintHandle,
        a: BodyHandle,
        b: BodyHandle,
        position: Vec2,
    },
    Attach {
        parent: NodeId,
        child: NodeId,
    },
    Impulse {
        body: BodyHandle,
        impulse: Vec2,
    },
    Wake(BodyHandle),
    Destroy(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ObjectKind {
    Static,
    Dynamic,
    Pin { a: BodyHandle, b: BodyHandle },
}

#[derive(Debug, Clone)]
struct HostObject {
    kind: ObjectKind,
    position: Vec2,
    name: String,
    parent: Option<NodeId>,
}

/// In-memory host that keeps live objects and an ordered call log.
///
/// Node 0 is the rig root and is not counted as a live object.
#[derive(Debug, Default)]
pub struct RecordingHost {
    next_id: u64,
    objects: BTreeMap<NodeId, HostObject>,
    calls: Vec<HostCall>,
    dynamic_calls: usize,
    failing_calls: BTreeSet<usize>,
}

impl RecordingHost {
    /// The only prototype this host can instantiate.
    pub const SEGMENT: PrototypeHandle = PrototypeHandle::new(1);

    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Makes the n-th `create_dynamic_body` calls fail (0-based, over the
    /// host's lifetime).
    pub fn failing_on(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.failing_calls.extend(calls);
        self
    }

    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn live_count(&self) -> usize {
        self.objects.len()
    }

    pub fn is_live(&self, node: NodeId) -> bool {
        self.objects.contains_key(&node)
    }

    pub fn static_bodies(&self) -> usize {
        self.objects
            .values()
            .filter(|o| o.kind == ObjectKind::Static)
            .count()
    }

    pub fn dynamic_bodies(&self) -> usize {
        self.objects
            .values()
            .filter(|o| o.kind == ObjectKind::Dynamic)
            .count()
    }

    pub fn impulse_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::Impulse { .. }))
            .count()
    }

    pub fn impulses_on(&self, body: BodyHandle) -> Vec<Vec2> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Impulse { body: b, impulse } if *b == body => Some(*impulse),
                _ => None,
            })
            .collect()
    }

    pub fn pin_bodies(&self, constraint: ConstraintHandle) -> Option<(BodyHandle, BodyHandle)> {
        match self.objects.get(&constraint.node())?.kind {
            ObjectKind::Pin { a, b } => Some((a, b)),
            _ => None,
        }
    }

    pub fn child_names(&self, parent: NodeId) -> Vec<&str> {
        self.objects
            .values()
            .filter(|o| o.parent == Some(parent))
            .map(|o| o.name.as_str())
            .collect()
    }

    fn insert(&mut self, kind: ObjectKind, position: Vec2) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.objects.insert(
            id,
            HostObject {
                kind,
                position,
                name: String::new(),
                parent: None,
            },
        );
        id
    }
}

impl PhysicsWorld for RecordingHost {
    fn create_static_body(&mut self, position: Vec2, _collider: Collider) -> BodyHandle {
        let body = BodyHandle::new(self.insert(ObjectKind::Static, position));
        self.calls.push(HostCall::CreateStatic(body));
        body
    }

    fn create_dynamic_body(
        &mut self,
        prototype: PrototypeHandle,
        position: Vec2,
    ) -> Result<BodyHandle, HostError> {
        let call = self.dynamic_calls;
        self.dynamic_calls += 1;

        if prototype != Self::SEGMENT {
            return Err(HostError::UnknownPrototype(prototype));
        }
        if self.failing_calls.contains(&call) {
            return Err(HostError::NotDynamicBody {
                prototype,
                kind: "area".to_string(),
            });
        }

        let body = BodyHandle::new(self.insert(ObjectKind::Dynamic, position));
        self.calls.push(HostCall::CreateDynamic { body, position });
        Ok(body)
    }

    fn create_pin_constraint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        position: Vec2,
        _params: PinParams,
    ) -> ConstraintHandle {
        let constraint = ConstraintHandle::new(self.insert(ObjectKind::Pin { a, b }, position));
        self.calls.push(HostCall::CreatePin {
            constraint,
            a,
            b,
            position,
        });
        constraint
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2) {
        self.calls.push(HostCall::Impulse { body, impulse });
    }

    fn wake(&mut self, body: BodyHandle) {
        self.calls.push(HostCall::Wake(body));
    }

    fn destroy(&mut self, node: NodeId) {
        self.objects.remove(&node);
        self.calls.push(HostCall::Destroy(node));
    }
}

impl SceneHost for RecordingHost {
    fn attach_child(&mut self, parent: NodeId, child: NodeId, name: &str) {
        if let Some(object) = self.objects.get_mut(&child) {
            object.parent = Some(parent);
            object.name = name.to_string();
        }
        self.calls.push(HostCall::Attach { parent, child });
    }

    fn world_position(&self, node: NodeId) -> Option<Vec2> {
        self.objects.get(&node).map(|o| o.position)
    }
}

// =============================================================================
// Stub Loader
// =============================================================================

/// Resource loader backed by a fixed path table.
#[derive(Debug, Default)]
pub struct StubLoader {
    resources: HashMap<String, PrototypeHandle>,
}

impl StubLoader {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Serves `prototype` at the default segment path.
    pub fn with_default(prototype: PrototypeHandle) -> Self {
        let mut resources = HashMap::new();
        resources.insert(DEFAULT_SEGMENT_PROTOTYPE_PATH.to_string(), prototype);
        Self { resources }
    }
}

impl ResourceLoader for StubLoader {
    fn load_prototype(&self, path: &str) -> Option<PrototypeHandle> {
        self.resources.get(path).copied()
    }
}

// =============================================================================
// Warning Counter
// =============================================================================

struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Runs `f` and returns its result with the number of warnings it logged.
pub fn count_warnings<R>(f: impl FnOnce() -> R) -> (R, usize) {
    let counter = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&counter)));
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, counter.load(Ordering::SeqCst))
}
