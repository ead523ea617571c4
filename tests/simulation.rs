use approx::assert_relative_eq;
use nalgebra::Vector3;

use exterior_ballistics::{
    integrator, AccelerationModel, Atmosphere, DragFamily, ProjectileState, Simulator,
};

const DT_S: f64 = 1.0e-3;

fn test_projectile() -> ProjectileState {
    // 168 gr .308 bullet with a G7 BC of 0.223
    ProjectileState::new(0.010886, 0.00782, 0.031, 0.223, DragFamily::G7)
}

fn level_launch(speed_mps: f64, spin_rad_s: f64) -> ProjectileState {
    test_projectile().with_flight(
        Vector3::zeros(),
        Vector3::new(speed_mps, 0.0, 0.0),
        spin_rad_s,
    )
}

#[test]
fn test_kinetic_energy_never_rises_without_gravity() {
    let mut sim = Simulator::new(level_launch(800.0, 0.0));
    sim.set_model(AccelerationModel {
        gravity_mps2: Vector3::zeros(),
        ..AccelerationModel::default()
    });
    sim.simulate(400.0, DT_S, 10.0);

    let points = sim.trajectory().points();
    assert!(points.len() > 100, "expected a real flight, got {} points", points.len());

    let mut previous = f64::INFINITY;
    for point in points {
        let energy = point.kinetic_energy_j();
        assert!(
            energy <= previous,
            "kinetic energy rose from {} J to {} J",
            previous,
            energy
        );
        previous = energy;
    }
}

#[test]
fn test_opposite_spin_mirrors_the_drift() {
    let mut right_twist = Simulator::new(level_launch(800.0, 18_000.0));
    let mut left_twist = Simulator::new(level_launch(800.0, -18_000.0));
    right_twist.simulate(300.0, DT_S, 10.0);
    left_twist.simulate(300.0, DT_S, 10.0);

    let right = right_twist.trajectory().points();
    let left = left_twist.trajectory().points();
    assert_eq!(right.len(), left.len());

    for (r, l) in right.iter().zip(left) {
        assert_relative_eq!(
            r.state.position_m.y,
            -l.state.position_m.y,
            epsilon = 1.0e-12
        );
        assert_relative_eq!(r.state.position_m.z, l.state.position_m.z, epsilon = 1.0e-12);
    }

    // The drift itself has to be there for the mirror check to mean anything.
    let final_drift = right_twist.trajectory().last().unwrap().state.position_m.y;
    assert!(final_drift.abs() > 1.0e-6, "no spin drift accumulated: {}", final_drift);
}

#[test]
fn test_still_air_zero_puts_the_shot_back_on_target() {
    let mut sim = Simulator::new(test_projectile());
    let result = sim.compute_zero(800.0, Vector3::new(100.0, 0.0, 0.0), DT_S, 20, 0.01);

    assert!(result.is_converged(), "zero failed: miss {} m", result.miss_distance_m);
    assert!(result.miss_distance_m < 0.01);
    assert!(result.elevation_rad > 0.0 && result.elevation_rad < 0.01);

    // The solved launch state is installed; re-flying it lands on the target.
    sim.simulate(110.0, DT_S, 5.0);
    let hit = sim
        .trajectory()
        .at_distance(100.0)
        .expect("zeroed flight should reach the target range");
    assert!(hit.state.position_m.z.abs() < 0.01);
    assert!(hit.state.position_m.y.abs() < 0.01);
}

#[test]
fn test_lag_filter_carries_through_each_step() {
    let model = AccelerationModel::default();
    let air_density = Atmosphere::standard().air_density();
    let wind = Vector3::new(0.0, -5.0, 0.0);
    let state0 = level_launch(800.0, 18_000.0);

    let step1 = integrator::step(&model, &state0, &wind, air_density, DT_S);
    assert_eq!(
        step1.lag_angles(),
        midpoint_lag(&model, &state0, &wind, air_density)
    );
    assert_ne!(step1.lag_angles(), (0.0, 0.0));

    // The second step filters onward from the first step's retained state.
    let step2 = integrator::step(&model, &step1, &wind, air_density, DT_S);
    assert_eq!(
        step2.lag_angles(),
        midpoint_lag(&model, &step1, &wind, air_density)
    );
    assert_ne!(step2.lag_angles(), step1.lag_angles());
}

/// Replays the midpoint evaluation of one integrator step and returns the lag
/// state it produces, which is the lag the stepped state must retain.
fn midpoint_lag(
    model: &AccelerationModel,
    state: &ProjectileState,
    wind: &Vector3<f64>,
    air_density: f64,
) -> (f64, f64) {
    let start = model.evaluate(state, wind, air_density, DT_S);
    let v_half = state.velocity_mps + start.acceleration_mps2 * (0.5 * DT_S);
    let x_half = state.position_m + v_half * (0.5 * DT_S);
    let midpoint_state = state.with_flight(x_half, v_half, state.spin_rate_rad_s);
    let midpoint = model.evaluate(&midpoint_state, wind, air_density, DT_S);
    (midpoint.lag_right, midpoint.lag_up)
}

#[test]
fn test_thinner_air_flattens_the_arc() {
    let launch = level_launch(800.0, 0.0);

    let mut sea_level = Simulator::new(launch);
    let mut mountain = Simulator::new(launch);
    mountain.set_atmosphere(Atmosphere::standard().at_altitude(3000.0));

    sea_level.simulate(300.0, DT_S, 10.0);
    mountain.simulate(300.0, DT_S, 10.0);

    let low = sea_level.trajectory().at_distance(300.0).expect("reaches 300 m");
    let high = mountain.trajectory().at_distance(300.0).expect("reaches 300 m");

    // Less drag at altitude: the shot arrives faster and has dropped less.
    assert!(high.speed_mps() > low.speed_mps());
    assert!(high.state.position_m.z > low.state.position_m.z);
}
