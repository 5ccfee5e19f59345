use solsim::simulation::clock::{SimulationClock, SPEED_MULTIPLIERS};
use solsim::simulation::engine::Engine;
use solsim::simulation::forces::{Attractor, NewtonianGravity};
use solsim::simulation::integrator::{integrate_batch, semi_implicit_step};
use solsim::simulation::params;
use solsim::simulation::scenario::{self, Scenario, UserBodyRequest};
use solsim::simulation::scheduler::{apply_result, policy_attractors, StepResult};
use solsim::simulation::states::{Body, BodyId, BodyKind, NVec2, Satellite, ScaleTier, System};
use solsim::configuration::config::{
    BodyConfig, BodyKindConfig, SatelliteConfig, ScaleConfig, ScenarioConfig, SimulationConfig,
};

const SUN_MASS: f64 = 1.989e30;
const EARTH_MASS: f64 = 5.9722e24;

/// Build a body at rest at an absolute position
fn body_at(name: &str, kind: BodyKind, mass: f64, pos: NVec2) -> Body {
    Body::new(name, kind, mass, pos, NVec2::zeros(), 100.0, ScaleTier::Standard)
        .expect("test body mass must be positive")
}

/// Sun at the origin plus one major body at distance `r` along +x, at rest
fn sun_and_planet(r: f64) -> System {
    let mut system = System::default();
    system.push_body(body_at("sun", BodyKind::Primary, SUN_MASS, NVec2::zeros()));
    system.push_body(body_at("earth", BodyKind::Major, EARTH_MASS, NVec2::new(r, 0.0)));
    system
}

/// Scenario config with the sun, two majors, and two satellites
fn stock_config() -> ScenarioConfig {
    ScenarioConfig {
        simulation: SimulationConfig {
            frames: 10,
            slider_index: 0,
            zoom_factor: 1.0,
        },
        bodies: vec![
            BodyConfig {
                name: "sun".into(),
                kind: BodyKindConfig::Primary,
                mass: SUN_MASS,
                orbit_radius_au: 0.0,
                size: 400.0,
                scale: ScaleConfig::Standard,
            },
            BodyConfig {
                name: "earth".into(),
                kind: BodyKindConfig::Major,
                mass: EARTH_MASS,
                orbit_radius_au: 1.2,
                size: 150.0,
                scale: ScaleConfig::Standard,
            },
            BodyConfig {
                name: "jupiter".into(),
                kind: BodyKindConfig::Major,
                mass: 1.898e27,
                orbit_radius_au: 5.2,
                size: 180.0,
                scale: ScaleConfig::Compressed,
            },
        ],
        satellites: vec![
            SatelliteConfig {
                name: "moon".into(),
                mass: 7.346e22,
                orbit_radius_au: 0.002694,
                size: 20.0,
                parent: "earth".into(),
            },
            SatelliteConfig {
                name: "io".into(),
                mass: 8.931e22,
                orbit_radius_au: 0.0028195588481728,
                size: 25.0,
                parent: "jupiter".into(),
            },
        ],
    }
}

fn stock_engine(slider_index: i32, zoom_factor: f64) -> Engine {
    let scenario = Scenario::build_scenario(stock_config());
    Engine::new(scenario, SimulationClock::new(slider_index, zoom_factor))
}

// ==================================================================================
// Force model
// ==================================================================================

#[test]
fn gravity_newton_third_law() {
    let gravity = NewtonianGravity::default();
    let (m_a, pos_a) = (2.0e24, NVec2::new(-1.0e10, 3.0e9));
    let (m_b, pos_b) = (7.0e23, NVec2::new(4.0e10, -2.0e9));

    let f_ab = gravity.attraction(m_a, pos_a, m_b, pos_b);
    let f_ba = gravity.attraction(m_b, pos_b, m_a, pos_a);

    let net = f_ab + f_ba;
    assert!(net.norm() < f_ab.norm() * 1e-12, "forces not equal and opposite: {net:?}");

    let d = (pos_b - pos_a).norm();
    let expected = params::G * m_a * m_b / (d * d);
    assert!(
        (f_ab.norm() - expected).abs() < expected * 1e-12,
        "magnitude {} != G m_a m_b / d^2 = {}",
        f_ab.norm(),
        expected
    );
    assert!(
        (f_ba.norm() - expected).abs() < expected * 1e-12,
        "reverse magnitude {} != {}",
        f_ba.norm(),
        expected
    );
}

#[test]
fn gravity_points_toward_other_body() {
    let gravity = NewtonianGravity::default();
    let pos_a = NVec2::new(0.0, 0.0);
    let pos_b = NVec2::new(3.0e10, 4.0e10);

    let f = gravity.attraction(1.0e24, pos_a, 1.0e24, pos_b);
    assert!(f.dot(&(pos_b - pos_a)) > 0.0, "force is not toward the other body");
}

#[test]
fn gravity_zero_at_coincident_positions() {
    let gravity = NewtonianGravity::default();
    let pos = NVec2::new(5.0e10, -1.0e10);

    // self-attraction and two distinct bodies at the same point both hit
    // the d == 0 guard
    let f_self = gravity.attraction(1.0e24, pos, 1.0e24, pos);
    let f_pair = gravity.attraction(1.0e24, pos, 3.0e22, pos);

    assert_eq!(f_self, NVec2::zeros());
    assert_eq!(f_pair, NVec2::zeros());
}

// ==================================================================================
// Integrator
// ==================================================================================

#[test]
fn rest_body_gains_exactly_gm_over_r2_dt() {
    let gravity = NewtonianGravity::default();
    let r = params::AU;
    let dt = params::TIMESTEP_MAJOR * 0.1;
    let attractors = [Attractor {
        mass: SUN_MASS,
        position: NVec2::zeros(),
    }];

    let (_, velocity) = integrate_batch(
        &gravity,
        EARTH_MASS,
        NVec2::new(r, 0.0),
        NVec2::zeros(),
        &attractors,
        1,
        dt,
    );

    let expected = params::G * SUN_MASS / (r * r) * dt;
    assert!(
        (velocity.norm() - expected).abs() < expected * 1e-12,
        "|v| = {} expected {}",
        velocity.norm(),
        expected
    );
    // pull is along -x, toward the attractor
    assert!(velocity.x < 0.0 && velocity.y == 0.0);
}

#[test]
fn velocity_updates_before_position() {
    // one step from rest must already move the position: x uses the new
    // velocity, not the old zero
    let (position, velocity) = semi_implicit_step(
        NVec2::zeros(),
        NVec2::zeros(),
        NVec2::new(2.0, 0.0),
        1.0,
        0.5,
    );
    assert_eq!(velocity, NVec2::new(1.0, 0.0));
    assert_eq!(position, NVec2::new(0.5, 0.0));
}

#[test]
fn circular_orbit_closes_after_one_period() {
    let gravity = NewtonianGravity::default();
    let r = params::AU;
    let start = NVec2::new(r, 0.0);
    let velocity = scenario::circular_orbit_velocity(params::G, SUN_MASS, start);

    // one full period at an hour per step
    let period = 2.0 * std::f64::consts::PI * (r * r * r / (params::G * SUN_MASS)).sqrt();
    let dt = 3600.0;
    let steps = (period / dt).round() as u32;

    let attractors = [Attractor {
        mass: SUN_MASS,
        position: NVec2::zeros(),
    }];
    let (end, _) = integrate_batch(&gravity, EARTH_MASS, start, velocity, &attractors, steps, dt);

    let miss = (end - start).norm();
    assert!(
        miss < 0.02 * r,
        "orbit did not close: missed start by {:.3e} m ({:.4} r)",
        miss,
        miss / r
    );
}

// ==================================================================================
// Hierarchical coordinates
// ==================================================================================

#[test]
fn satellite_absolute_state_never_drifts_from_parent_plus_relative() {
    let mut engine = stock_engine(0, 1.0);

    for _ in 0..20 {
        engine.begin_frame();
        engine.settle();

        for satellite in &engine.system.satellites {
            let parent = engine
                .system
                .body(satellite.parent)
                .expect("satellite parent must exist");
            assert_eq!(
                satellite.sim_pos,
                parent.sim_pos + satellite.rel_pos,
                "absolute position drifted from parent + relative for {}",
                satellite.name
            );
            assert_eq!(
                satellite.velocity,
                parent.velocity + satellite.rel_vel,
                "absolute velocity drifted from parent + relative for {}",
                satellite.name
            );
        }
    }
}

#[test]
fn satellite_orbits_its_parent() {
    let mut engine = stock_engine(0, 1.0);
    let moon_r0 = engine.system.satellites[0].rel_pos.norm();

    for _ in 0..50 {
        engine.begin_frame();
        engine.settle();
    }

    let moon = &engine.system.satellites[0];
    let r = moon.rel_pos.norm();
    // circular orbit: the separation stays near the initial radius even
    // while the parent travels
    assert!(
        (r - moon_r0).abs() < 0.05 * moon_r0,
        "moon orbit radius wandered: {r:.3e} vs {moon_r0:.3e}"
    );
    assert!(moon.rel_pos != NVec2::new(moon_r0, 0.0), "moon never moved");
}

// ==================================================================================
// Update protocol
// ==================================================================================

#[test]
fn stale_result_is_dropped() {
    let mut system = sun_and_planet(params::AU);
    let earth = BodyId(1);

    // two dispatches happened; only the second is current
    system.bodies[earth.0].update_seq = 2;

    let newer = StepResult::Body {
        id: earth,
        seq: 2,
        position: NVec2::new(1.0e11, 5.0e9),
        velocity: NVec2::new(0.0, 3.0e4),
    };
    let older = StepResult::Body {
        id: earth,
        seq: 1,
        position: NVec2::new(-7.0e11, 0.0),
        velocity: NVec2::new(1.0e5, 1.0e5),
    };

    assert!(apply_result(&mut system, newer).is_some());
    let pos_after_newer = system.bodies[earth.0].sim_pos;
    let vel_after_newer = system.bodies[earth.0].velocity;

    // the delayed older result must leave the state untouched
    assert!(apply_result(&mut system, older).is_none());
    assert_eq!(system.bodies[earth.0].sim_pos, pos_after_newer);
    assert_eq!(system.bodies[earth.0].velocity, vel_after_newer);
}

#[test]
fn result_for_removed_slot_is_dropped() {
    let mut system = sun_and_planet(params::AU);

    let ghost = StepResult::Body {
        id: BodyId(17),
        seq: 1,
        position: NVec2::zeros(),
        velocity: NVec2::zeros(),
    };
    assert!(apply_result(&mut system, ghost).is_none());
}

#[test]
fn scheduler_round_trip_applies_results() {
    let mut engine = stock_engine(0, 1.0);
    let earth_before = engine.system.bodies[1].sim_pos;
    let live = engine.system.bodies.len() + engine.system.satellites.len();

    engine.begin_frame();
    let events = engine.settle();

    // every live body delivered exactly one fresh result
    assert_eq!(events.len(), live);
    assert!(engine.system.bodies[1].sim_pos != earth_before, "earth did not move");
}

// ==================================================================================
// Attraction policy
// ==================================================================================

#[test]
fn attraction_policy_is_asymmetric_by_design() {
    let mut system = sun_and_planet(params::AU);
    system.push_body(body_at("mars", BodyKind::Major, 6.417e23, NVec2::new(2.0 * params::AU, 0.0)));
    system.push_body(body_at("probe-a", BodyKind::User, 1.0e4, NVec2::new(0.0, params::AU)));
    system.push_body(body_at("probe-b", BodyKind::User, 1.0e4, NVec2::new(0.0, -params::AU)));

    // the primary feels only the user bodies
    assert_eq!(policy_attractors(&system, 0).len(), 2);
    // a major feels the primary plus the user bodies, never another major
    assert_eq!(policy_attractors(&system, 1).len(), 3);
    // a user body feels the primary plus the other user body
    assert_eq!(policy_attractors(&system, 3).len(), 2);
}

// ==================================================================================
// Simulation clock
// ==================================================================================

#[test]
fn slider_maps_through_multiplier_table() {
    let mut clock = SimulationClock::new(0, 1.0);
    assert_eq!(clock.multiplier(), 1.0);

    clock.set_slider_index(-13);
    assert_eq!(clock.multiplier(), 0.0);

    clock.set_slider_index(13);
    assert_eq!(clock.multiplier(), 30.0);

    // out-of-range values clamp to the table ends
    clock.set_slider_index(99);
    assert_eq!(clock.multiplier(), 30.0);

    assert_eq!(SPEED_MULTIPLIERS.len(), 27);
}

#[test]
fn base_rate_is_inverse_to_zoom() {
    let clock = SimulationClock::new(0, 1.0);
    assert!((clock.base_rate() - 0.1).abs() < 1e-15);

    // zoomed far out, simulated time runs faster
    let clock = SimulationClock::new(0, 0.01);
    assert!((clock.base_rate() - 1.0).abs() < 1e-12);
    assert!((clock.simulation_speed() - 1.0).abs() < 1e-12);
}

// ==================================================================================
// Satellite lifecycle
// ==================================================================================

#[test]
fn satellites_removed_above_threshold_and_regenerated_below() {
    // zoom 0.01 gives base rate 1.0, so the slider multiplier maps straight
    // to the simulation speed: slider 7 selects multiplier 6, above the
    // removal threshold of 5
    let mut engine = stock_engine(0, 0.01);
    let original_count = engine.system.satellites.len();
    assert_eq!(original_count, 2);

    // warm the sequence counters so regeneration continuity is observable
    engine.begin_frame();
    engine.settle();
    let seq_before = engine.system.satellites[0].update_seq;
    assert!(seq_before > 0);

    engine.clock.set_slider_index(7);
    assert!(engine.clock.simulation_speed() > params::SATELLITE_SPEED_THRESHOLD);
    engine.begin_frame();
    engine.settle();
    assert_eq!(engine.system.satellites.len(), 0, "satellites survived above threshold");

    engine.clock.set_slider_index(0);
    engine.begin_frame();
    assert_eq!(
        engine.system.satellites.len(),
        original_count,
        "satellites not regenerated below threshold"
    );

    // fresh circular orbital elements around the parent, read before the
    // dispatched batches land
    for satellite in &engine.system.satellites {
        let parent = engine.system.body(satellite.parent).expect("parent exists");
        let expected = (params::G * parent.mass / satellite.rel_pos.norm()).sqrt();
        assert!(
            (satellite.rel_vel.norm() - expected).abs() < expected * 1e-12,
            "{} regenerated without circular orbital velocity",
            satellite.name
        );
        // sequence counters continue past the removal instead of resetting
        assert!(satellite.update_seq > seq_before);
    }

    engine.settle();
}

// ==================================================================================
// User bodies
// ==================================================================================

fn launch_request(mass: &str) -> UserBodyRequest {
    UserBodyRequest {
        name: "asteroid".into(),
        mass: mass.into(),
        size: "40".into(),
        speed: "2.5e4".into(),
        origin: NVec2::new(params::AU, params::AU),
        drag_target: NVec2::new(2.0 * params::AU, params::AU),
    }
}

#[test]
fn empty_mass_field_creates_no_body() {
    let mut engine = stock_engine(0, 1.0);
    let before = engine.system.bodies.len();

    assert!(engine.create_user_body(&launch_request("")).is_none());
    assert_eq!(engine.system.bodies.len(), before);
}

#[test]
fn non_positive_mass_creates_no_body() {
    let mut engine = stock_engine(0, 1.0);
    let before = engine.system.bodies.len();

    assert!(engine.create_user_body(&launch_request("0")).is_none());
    assert!(engine.create_user_body(&launch_request("-5.0e20")).is_none());
    assert_eq!(engine.system.bodies.len(), before);
}

#[test]
fn launch_velocity_follows_drag_vector() {
    let body = scenario::create_user_body(&launch_request("1.0e21")).expect("request is valid");
    assert_eq!(body.kind, BodyKind::User);
    // drag points along +x, so the launch velocity does too
    assert_eq!(body.velocity, NVec2::new(2.5e4, 0.0));
}

#[test]
fn coincident_drag_points_launch_at_rest() {
    let mut req = launch_request("1.0e21");
    req.drag_target = req.origin;

    let body = scenario::create_user_body(&req).expect("request is valid");
    assert_eq!(body.velocity, NVec2::zeros());
}

#[test]
fn clearing_user_bodies_keeps_stock_bodies() {
    let mut engine = stock_engine(0, 1.0);
    let stock = engine.system.bodies.len();

    engine.create_user_body(&launch_request("1.0e21")).expect("valid");
    engine.create_user_body(&launch_request("2.0e21")).expect("valid");
    assert_eq!(engine.system.user_body_count(), 2);

    engine.clear_user_bodies();
    assert_eq!(engine.system.user_body_count(), 0);
    assert_eq!(engine.system.bodies.len(), stock);
}

// ==================================================================================
// Validation at construction
// ==================================================================================

#[test]
fn bodies_reject_non_positive_mass() {
    assert!(Body::new(
        "ghost",
        BodyKind::Major,
        0.0,
        NVec2::zeros(),
        NVec2::zeros(),
        10.0,
        ScaleTier::Standard
    )
    .is_none());

    let parent = body_at("earth", BodyKind::Major, EARTH_MASS, NVec2::zeros());
    assert!(Satellite::new(
        "ghost",
        -1.0,
        BodyId(0),
        &parent,
        NVec2::new(1.0e8, 0.0),
        NVec2::zeros(),
        10.0
    )
    .is_none());
}
