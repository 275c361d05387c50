use approx::{assert_abs_diff_eq, assert_relative_eq};
use nalgebra::{Point3, Vector3};
use rust_orrery::file::ScenarioConfig;
use rust_orrery::model::orrery::{AttractorRef, BodyInfo, BodySpec, CentralBody, PointMass};
use rust_orrery::model::{BodyID, Orrery, OrreryBuilder};

fn info(name: &str) -> BodyInfo {
    BodyInfo {
        name: name.to_owned(),
        size: 1.0,
        color: Point3::new(1.0, 1.0, 1.0),
    }
}

fn spec(name: &str, position: Point3<f64>, velocity: Vector3<f64>) -> BodySpec {
    BodySpec {
        info: info(name),
        mass: 1.0,
        rotation_period: 1.0,
        position,
        velocity,
        attractor: None,
        trail_window: 5.0,
    }
}

/// A single planet on a circular orbit of radius 10 and speed 10.
fn lone_planet() -> (Orrery, BodyID) {
    let mut builder = OrreryBuilder::new(CentralBody::new(info("Sun"), 1000.0));
    let planet = builder
        .add_circular_orbit(info("Planet"), 1.0, 1.0, AttractorRef::Central, Vector3::x() * 10.0)
        .unwrap();
    (builder.build().unwrap(), planet)
}

/// Star -> planet -> moon, with the moon added first so that the update
/// order has to be worked out rather than read off the insertion order.
#[test]
fn test_satellite_sees_parent_after_update() {
    let mut builder = OrreryBuilder::new(CentralBody::new(info("Star"), 1000.0));
    let moon = builder
        .add_body(spec("Moon", Point3::new(11.0, 0.0, 0.0), Vector3::new(0.0, 11.0, 0.0)))
        .unwrap();
    let planet = builder
        .add_circular_orbit(info("Planet"), 1.0, 1.0, AttractorRef::Central, Vector3::x() * 10.0)
        .unwrap();
    builder.bind_attractor(moon, AttractorRef::Body(planet)).unwrap();
    let mut orrery = builder.build().unwrap();
    assert_eq!(orrery.update_order(), &[planet, moon]);

    let dt = 0.1;
    orrery.step(dt, 1.0);

    // Planet: a = 1000 / 10^2, toward the star
    assert_relative_eq!(orrery.get_body(planet).velocity(), Vector3::new(-1.0, 10.0, 0.0));
    assert_relative_eq!(orrery.get_body(planet).position(), Point3::new(9.9, 1.0, 0.0));

    // Moon: pulled toward where the planet is *now*
    let to_planet = Point3::new(9.9, 1.0, 0.0) - Point3::new(11.0, 0.0, 0.0);
    let r = to_planet.norm();
    let acceleration = to_planet * (1.0 / (r * r * r));
    let velocity = Vector3::new(0.0, 11.0, 0.0) + acceleration * dt;
    assert_relative_eq!(orrery.get_body(moon).velocity(), velocity, epsilon = 1e-12);
    assert_relative_eq!(
        orrery.get_body(moon).position(),
        Point3::new(11.0, 0.0, 0.0) + velocity * dt,
        epsilon = 1e-12
    );
}

#[test]
fn test_circular_orbit_holds_radius() {
    let (mut orrery, planet) = lone_planet();
    assert_relative_eq!(orrery.get_body(planet).velocity(), Vector3::new(0.0, 10.0, 0.0));

    // One full revolution is 2 pi seconds
    let dt = 0.001;
    for _ in 0..6283 {
        orrery.step(dt, 1.0);
        let r = orrery.get_body(planet).position().coords.norm();
        assert_relative_eq!(r, 10.0, max_relative = 0.01);
    }

    // And it came back around to where it started
    assert_abs_diff_eq!(
        orrery.get_body(planet).position(),
        Point3::new(10.0, 0.0, 0.0),
        epsilon = 0.1
    );
}

#[test]
fn test_speed_is_a_time_scale() {
    let (mut fast, planet) = lone_planet();
    let (mut slow, _) = lone_planet();

    fast.step(0.01, 2.0);
    slow.step(0.02, 1.0);

    assert_relative_eq!(fast.get_body(planet).position(), slow.get_body(planet).position());
    assert_relative_eq!(fast.simulated_time(), slow.simulated_time());
    // Trails age with wall-clock time, not simulated time
    assert_relative_eq!(fast.elapsed(), 0.01);
    assert_relative_eq!(slow.elapsed(), 0.02);
}

#[test]
fn test_coincident_attractor_is_ignored() {
    let mut builder = OrreryBuilder::new(CentralBody::new(info("Sun"), 1000.0));
    let mut body = spec("Stuck", Point3::new(5.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
    body.attractor = Some(AttractorRef::Fixed(PointMass::new(
        Point3::new(5.0, 0.0, 0.0),
        100.0,
    )));
    let id = builder.add_body(body).unwrap();
    let mut orrery = builder.build().unwrap();

    orrery.step(0.5, 1.0);
    let body = orrery.get_body(id);
    assert_eq!(body.velocity(), Vector3::new(1.0, 0.0, 0.0));
    assert_relative_eq!(body.position(), Point3::new(5.5, 0.0, 0.0));

    // Once apart, the pull is back
    orrery.step(0.5, 1.0);
    let body = orrery.get_body(id);
    assert!(body.velocity().x < 1.0);
    assert!(body.position().coords.iter().all(|x| x.is_finite()));
}

#[test]
fn test_zero_speed_freezes_motion() {
    let (mut orrery, planet) = lone_planet();
    for _ in 0..3 {
        orrery.step(1.0, 1.0);
    }
    let frozen_position = orrery.get_body(planet).position();
    let frozen_velocity = orrery.get_body(planet).velocity();
    let frozen_phase = orrery.get_body(planet).rotation_phase();

    for _ in 0..10 {
        orrery.step(1.0, 0.0);
    }

    let body = orrery.get_body(planet);
    assert_eq!(body.position(), frozen_position);
    assert_eq!(body.velocity(), frozen_velocity);
    assert_eq!(body.rotation_phase(), frozen_phase);

    // The trail kept aging, so the moving part of it has faded away
    let render = body.trail().render();
    assert_eq!(render.count, 6);
    assert!(render.positions.iter().all(|p| *p == frozen_position));
    assert_eq!(render.opacities.first(), Some(&0.0));
    assert_eq!(render.opacities.last(), Some(&1.0));
}

#[test]
fn test_zero_delta_still_records() {
    let (mut orrery, planet) = lone_planet();
    orrery.step(0.5, 1.0);
    let position = orrery.get_body(planet).position();

    orrery.step(0.0, 1.0);
    let trail = orrery.get_body(planet).trail();
    assert_eq!(trail.len(), 2);
    assert_eq!(orrery.get_body(planet).position(), position);

    let render = trail.render();
    assert_eq!(render.positions[0], render.positions[1]);
    assert_eq!(render.opacities, vec![1.0, 1.0]);
}

#[test]
fn test_trail_window_through_orrery() {
    let (mut orrery, planet) = lone_planet();
    for _ in 0..10 {
        orrery.step(1.0, 1.0);
    }

    let trail = orrery.get_body(planet).trail();
    let times: Vec<f64> = trail.samples().map(|s| s.time).collect();
    assert_eq!(times, vec![5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);

    let render = trail.render();
    assert_eq!(render.count, 6);
    for (opacity, expected) in render.opacities.iter().zip([0.0, 0.2, 0.4, 0.6, 0.8, 1.0]) {
        assert_relative_eq!(*opacity, expected, epsilon = 1e-12);
    }
}

#[test]
fn test_builtin_solar_system_runs() {
    let mut orrery = ScenarioConfig::solar_system().build().unwrap();
    let earth = orrery.find_body("Earth").unwrap().id;
    let moon = orrery.find_body("Moon").unwrap().id;

    // Earth has to go before the Moon
    let order = orrery.update_order();
    let earth_idx = order.iter().position(|id| *id == earth).unwrap();
    let moon_idx = order.iter().position(|id| *id == moon).unwrap();
    assert!(earth_idx < moon_idx);

    let initial_radius = orrery.get_body(earth).position().coords.norm();
    for _ in 0..60 {
        orrery.step(1.0 / 60.0, 1.0);
    }

    for body in orrery.bodies() {
        assert!(body.position().coords.iter().all(|x| x.is_finite()));
        assert_eq!(body.trail().len(), 60);
    }
    assert_relative_eq!(
        orrery.get_body(earth).position().coords.norm(),
        initial_radius,
        max_relative = 0.01
    );
}
