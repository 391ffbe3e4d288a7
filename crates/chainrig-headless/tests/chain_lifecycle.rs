//! End-to-end chain lifecycle against the headless world.

use chainrig::config::DEFAULT_SEGMENT_PROTOTYPE_PATH;
use chainrig::{
    BuildOutcome, ChainConfig, ChainError, ChainRig, ChainState, LinkEnd, PrototypeHandle,
    ResourceLoader, CHAIN_AXIS,
};
use chainrig_headless::{Prototype, PrototypeLibrary, World};
use glam::Vec2;

fn setup() -> (World, PrototypeLibrary, chainrig::NodeId) {
    let library = PrototypeLibrary::with_default_segment();
    let mut world = World::new(library.clone());
    let root = world.spawn_group("PhysicsChain", Vec2::ZERO);
    (world, library, root)
}

fn default_segment(library: &PrototypeLibrary) -> PrototypeHandle {
    library
        .load_prototype(DEFAULT_SEGMENT_PROTOTYPE_PATH)
        .expect("default segment registered")
}

#[test]
fn three_segment_chain_in_world() {
    let (mut world, library, root) = setup();
    let config = ChainConfig::default()
        .with_segments(3)
        .with_spacing(30.0)
        .with_prototype(default_segment(&library));
    let mut rig = ChainRig::new(root, config);

    let outcome = rig.initialize(&mut world);

    assert_eq!(outcome, BuildOutcome::Complete { segments: 3 });
    let names: Vec<&str> = world.children(root).map(|n| n.name()).collect();
    assert_eq!(
        names,
        vec![
            "Anchor",
            "Segment_0",
            "Joint_0",
            "Segment_1",
            "Joint_1",
            "Segment_2",
            "Joint_2"
        ]
    );

    // Exactly one seed impulse, on the last segment, along the axis.
    let log = world.impulse_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].body, rig.segments()[2].body());
    assert_eq!(log[0].impulse, CHAIN_AXIS * 80.0);

    let anchor = world.body(rig.anchor().unwrap()).unwrap();
    assert!(anchor.is_static());

    let pin = world.pin(rig.links()[0].constraint()).unwrap();
    assert_eq!(pin.a, rig.anchor().unwrap());
    assert_eq!(pin.b, rig.segments()[0].body());
    assert_eq!(pin.position, Vec2::new(0.0, 15.0));
}

#[test]
fn segments_are_awake_after_build() {
    let (mut world, library, root) = setup();
    let mut rig = ChainRig::new(root, ChainConfig::default().with_segments(4));
    rig.ready(&mut world, &library);

    for segment in rig.segments() {
        assert!(!world.body(segment.body()).unwrap().is_sleeping());
    }
}

#[test]
fn seeded_segment_moves_when_stepped() {
    let (mut world, library, root) = setup();
    let mut rig = ChainRig::new(root, ChainConfig::default().with_segments(2));
    rig.ready(&mut world, &library);

    let before = rig.segment_world_positions(&world);
    world.step(0.5);
    let after = rig.segment_world_positions(&world);

    // Mass 1: the seed impulse becomes the velocity.
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], before[1] + CHAIN_AXIS * 40.0);
}

#[test]
fn impulse_reaches_selected_segment() {
    let (mut world, library, root) = setup();
    let mut rig = ChainRig::new(
        root,
        ChainConfig::default().with_segments(3).with_seed_impulse(0.0),
    );
    rig.ready(&mut world, &library);

    rig.apply_impulse(&mut world, 1, Vec2::new(10.0, 0.0)).unwrap();
    world.step(1.0);

    let body = world.body(rig.segments()[1].body()).unwrap();
    assert_eq!(body.velocity, Vec2::new(10.0, 0.0));
    assert_eq!(body.position, Vec2::new(10.0, 60.0));
}

#[test]
fn out_of_range_impulse_is_rejected() {
    let (mut world, library, root) = setup();
    let mut rig = ChainRig::new(root, ChainConfig::default().with_segments(3));
    rig.ready(&mut world, &library);
    let logged = world.impulse_log().len();

    let result = rig.apply_impulse(&mut world, 5, Vec2::X);

    assert!(matches!(
        result,
        Err(ChainError::SegmentOutOfRange { index: 5, len: 3 })
    ));
    assert_eq!(world.impulse_log().len(), logged);
}

#[test]
fn teardown_leaves_only_root() {
    let (mut world, library, root) = setup();
    let mut rig = ChainRig::new(root, ChainConfig::default());
    rig.ready(&mut world, &library);

    rig.teardown(&mut world);
    rig.teardown(&mut world);

    assert_eq!(rig.state(), ChainState::Empty);
    assert_eq!(world.node_count(), 1);
    assert!(world.get(root).is_some());
}

#[test]
fn missing_resource_leaves_world_untouched() {
    let library = PrototypeLibrary::new();
    let mut world = World::new(library.clone());
    let root = world.spawn_group("PhysicsChain", Vec2::ZERO);
    let mut rig = ChainRig::new(root, ChainConfig::default());

    let outcome = rig.ready(&mut world, &library);

    assert_eq!(outcome, BuildOutcome::Empty);
    assert_eq!(world.node_count(), 1);
}

#[test]
fn non_body_prototype_builds_nothing() {
    let mut library = PrototypeLibrary::new();
    library
        .register_at(
            DEFAULT_SEGMENT_PROTOTYPE_PATH,
            Prototype::Other {
                kind: "area".to_string(),
            },
        )
        .unwrap();
    let mut world = World::new(library.clone());
    let root = world.spawn_group("PhysicsChain", Vec2::ZERO);
    let mut rig = ChainRig::new(root, ChainConfig::default().with_segments(3));

    let outcome = rig.ready(&mut world, &library);

    assert_eq!(outcome, BuildOutcome::Empty);
    assert_eq!(rig.state(), ChainState::Empty);
    assert_eq!(world.node_count(), 1);
}

#[test]
fn reconfigure_replaces_every_node() {
    let (mut world, library, root) = setup();
    let mut rig = ChainRig::new(root, ChainConfig::default().with_segments(2));
    rig.ready(&mut world, &library);
    let old_anchor = rig.anchor().unwrap();

    let config = ChainConfig::default()
        .with_segments(6)
        .with_prototype(default_segment(&library));
    let outcome = rig.reconfigure(&mut world, config);

    assert_eq!(outcome, BuildOutcome::Complete { segments: 6 });
    assert!(world.get(old_anchor.node()).is_none());
    // Root + anchor + 6 segments + 6 joints.
    assert_eq!(world.node_count(), 14);
    assert_eq!(rig.links()[5].source(), LinkEnd::Segment(4));
}

#[test]
fn reconfigure_keeps_prototype_from_ready() {
    let (mut world, library, root) = setup();
    let mut rig = ChainRig::new(root, ChainConfig::default().with_segments(3));
    assert!(rig.ready(&mut world, &library).is_complete());

    let outcome = rig.reconfigure(&mut world, ChainConfig::default().with_segments(6));

    assert_eq!(outcome, BuildOutcome::Complete { segments: 6 });
    assert_eq!(rig.segment_count(), 6);
    assert_eq!(world.node_count(), 14);
}

#[test]
fn rigs_share_a_world() {
    let (mut world, library, root_a) = setup();
    let root_b = world.spawn_group("Rope", Vec2::new(200.0, 0.0));
    let mut a = ChainRig::new(root_a, ChainConfig::default().with_segments(2));
    let mut b = ChainRig::new(root_b, ChainConfig::default().with_segments(3));

    a.ready(&mut world, &library);
    b.ready(&mut world, &library);
    a.teardown(&mut world);

    assert_eq!(world.children(root_a).count(), 0);
    assert_eq!(world.children(root_b).count(), 1 + 3 + 3);
    assert_eq!(
        b.segment_world_positions(&world)[0],
        Vec2::new(200.0, 30.0)
    );
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn world_holds_exactly_the_rig(segments in 1usize..40, spacing in 1.0f32..100.0) {
            let (mut world, library, root) = setup();
            let config = ChainConfig::default().with_segments(segments).with_spacing(spacing);
            let mut rig = ChainRig::new(root, config);

            rig.ready(&mut world, &library);
            // Root + anchor + one body and one joint per segment.
            prop_assert_eq!(world.node_count(), 2 + 2 * segments);

            rig.teardown(&mut world);
            prop_assert_eq!(world.node_count(), 1);
        }

        #[test]
        fn unseeded_chain_stays_at_rest(segments in 1usize..20, frames in 1usize..30) {
            let (mut world, library, root) = setup();
            let config = ChainConfig::default().with_segments(segments).with_seed_impulse(0.0);
            let mut rig = ChainRig::new(root, config);
            rig.ready(&mut world, &library);

            for _ in 0..frames {
                prop_assert_eq!(world.step_fixed(), 0);
            }
            let rest: Vec<Vec2> = rig.segments().iter().map(|s| s.rest_position()).collect();
            prop_assert_eq!(rig.segment_world_positions(&world), rest);
        }
    }
}
