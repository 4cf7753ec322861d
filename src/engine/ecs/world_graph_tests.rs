use glam::{Mat4, Vec3};

use crate::engine::EngineError;
use crate::engine::ecs::component::{OrbitingBody, RenderableComponent};
use crate::engine::ecs::{BodyId, World};

fn add(world: &mut World, name: &str, body: OrbitingBody, parent: Option<BodyId>) -> BodyId {
    world
        .add_body(name, body, RenderableComponent::default(), parent)
        .unwrap()
}

/// sun -> earth -> moon, with the spins the scenario pins down.
fn sun_earth_moon(world: &mut World) -> (BodyId, BodyId, BodyId) {
    let sun = add(
        world,
        "sun",
        OrbitingBody::new()
            .with_orbit_radius(0.0)
            .with_orbit_spin_rate(0.0)
            .with_axis_spin_rate(0.3),
        None,
    );
    let earth = add(
        world,
        "earth",
        OrbitingBody::new()
            .with_orbit_radius(4.0)
            .with_orbit_spin_rate(0.5)
            .with_axis_spin_rate(1.0)
            .with_axis_tilt(23.4_f32.to_radians()),
        Some(sun),
    );
    let moon = add(
        world,
        "moon",
        OrbitingBody::new()
            .with_orbit_radius(2.0)
            .with_orbit_spin_rate(2.0)
            .with_axis_spin_rate(0.0),
        Some(earth),
    );
    (sun, earth, moon)
}

#[test]
fn add_body_links_parent_and_children() {
    let mut w = World::new();
    let (sun, earth, moon) = sun_earth_moon(&mut w);

    assert_eq!(w.parent_of(sun), None);
    assert_eq!(w.parent_of(earth), Some(sun));
    assert_eq!(w.parent_of(moon), Some(earth));
    assert_eq!(w.children_of(sun), &[earth]);
    assert_eq!(w.children_of(earth), &[moon]);
    assert!(w.children_of(moon).is_empty());
    assert_eq!(w.roots(), &[sun]);
    assert_eq!(w.find_by_name("moon"), Some(moon));
}

#[test]
fn unknown_parent_is_rejected() {
    let mut w = World::new();
    let stray = {
        let mut other = World::new();
        add(&mut other, "stray", OrbitingBody::new(), None)
    };

    let err = w
        .add_body("orphan", OrbitingBody::new(), RenderableComponent::default(), Some(stray))
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownBody(id) if id == stray));
    assert!(w.is_empty());
}

#[test]
fn update_order_puts_parents_first() {
    let mut w = World::new();
    let stars = add(&mut w, "stars", OrbitingBody::new(), None);
    let (sun, earth, moon) = sun_earth_moon(&mut w);
    let mars = add(&mut w, "mars", OrbitingBody::new().with_orbit_radius(6.0), Some(sun));
    let phobos = add(&mut w, "phobos", OrbitingBody::new(), Some(mars));

    let order = w.update_order().to_vec();
    assert_eq!(order.len(), 6);

    let pos = |id: BodyId| order.iter().position(|&o| o == id).unwrap();
    for (child, parent) in [(earth, sun), (moon, earth), (mars, sun), (phobos, mars)] {
        assert!(pos(parent) < pos(child));
    }
    assert!(order.contains(&stars));
}

#[test]
fn inserted_body_is_placed_immediately() {
    let mut w = World::new();
    let sun = add(&mut w, "sun", OrbitingBody::new(), None);
    let earth = add(
        &mut w,
        "earth",
        OrbitingBody::new().with_orbit_radius(4.0),
        Some(sun),
    );

    let pos = w.body(earth).unwrap().world_position();
    assert!(pos.abs_diff_eq(Vec3::new(4.0, 0.0, 0.0), 1e-5));
}

#[test]
fn scenario_one_second() {
    let mut w = World::new();
    let (_sun, earth, moon) = sun_earth_moon(&mut w);

    w.advance_all(1.0);

    let earth_body = w.body(earth).unwrap();
    let moon_body = w.body(moon).unwrap();
    assert!((earth_body.orbit_angle() - 0.5).abs() < 1e-5);
    assert!((moon_body.orbit_angle() - 2.0).abs() < 1e-5);

    let earth_center = earth_body.world_position();
    let moon_center = moon_body.world_position();
    assert!((moon_center.distance(earth_center) - 2.0).abs() < 1e-4);
    assert!((earth_center.length() - 4.0).abs() < 1e-4);
    // Not simply 2 away from the sun.
    assert!((moon_center.length() - 2.0).abs() > 0.1);
}

#[test]
fn children_see_parent_pose_of_same_frame() {
    let mut w = World::new();
    let (_sun, earth, moon) = sun_earth_moon(&mut w);

    for _ in 0..25 {
        w.advance_all(0.13);
    }

    let earth_pose = w.body(earth).unwrap().pose();
    let moon_body = w.body(moon).unwrap();
    let recomputed = moon_body.compute_world_matrix(Some(&earth_pose));
    assert!(moon_body.world_matrix().abs_diff_eq(recomputed, 1e-6));
}

#[test]
fn reset_all_restores_initial_pose() {
    let mut w = World::new();
    let (sun, earth, moon) = sun_earth_moon(&mut w);
    let initial: Vec<Mat4> = [sun, earth, moon]
        .iter()
        .map(|&id| *w.body(id).unwrap().world_matrix())
        .collect();

    for _ in 0..40 {
        w.advance_all(0.29);
    }
    w.reset_all();

    for (id, expected) in [sun, earth, moon].into_iter().zip(initial) {
        let body = w.body(id).unwrap();
        assert_eq!(body.axis_angle(), 0.0);
        assert_eq!(body.orbit_angle(), 0.0);
        assert!(body.world_matrix().abs_diff_eq(expected, 1e-5));
    }
}

#[test]
fn advance_body_uses_parent_pose() {
    let mut w = World::new();
    let (_sun, earth, moon) = sun_earth_moon(&mut w);

    w.advance_body(moon, 0.5).unwrap();
    let earth_pose = w.body(earth).unwrap().pose();
    let moon_body = w.body(moon).unwrap();
    assert!(
        moon_body
            .world_matrix()
            .abs_diff_eq(moon_body.compute_world_matrix(Some(&earth_pose)), 1e-6)
    );
}
