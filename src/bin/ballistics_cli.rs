use std::error::Error;

use clap::{Args, Parser, Subcommand, ValueEnum};
use nalgebra::Vector3;
use serde::Serialize;

use exterior_ballistics::conversions;
use exterior_ballistics::{
    simulate_group, Atmosphere, DispersionConfig, DragFamily, ProjectileState, SegmentedWind,
    Simulator, WindSegment, WindSource,
};

#[derive(Parser)]
#[command(name = "ballistics")]
#[command(version = "0.1.0")]
#[command(about = "Exterior ballistics calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fly one shot and print the trajectory
    Trajectory {
        /// Muzzle speed (m/s)
        #[arg(short = 'v', long)]
        velocity: f64,

        /// Launch elevation (degrees above horizontal)
        #[arg(short = 'a', long, default_value = "0.0")]
        elevation: f64,

        /// Maximum range (meters)
        #[arg(long, default_value = "1000.0")]
        max_range: f64,

        /// Maximum flight time (seconds)
        #[arg(long, default_value = "10.0")]
        max_time: f64,

        /// Show every integration point instead of a sampled table
        #[arg(long)]
        full: bool,

        #[command(flatten)]
        projectile: ProjectileArgs,

        #[command(flatten)]
        conditions: ConditionArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        format: OutputFormat,
    },

    /// Solve the launch angles that put a shot on target
    Zero {
        /// Muzzle speed (m/s)
        #[arg(short = 'v', long)]
        velocity: f64,

        /// Target distance (meters)
        #[arg(short = 'r', long, default_value = "100.0")]
        range: f64,

        /// Acceptable miss at the target (meters)
        #[arg(long, default_value = "0.01")]
        tolerance: f64,

        /// Iteration budget
        #[arg(long, default_value = "20")]
        max_iterations: usize,

        #[command(flatten)]
        projectile: ProjectileArgs,

        #[command(flatten)]
        conditions: ConditionArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        format: OutputFormat,
    },

    /// Fire a dispersed group and report its statistics
    Group {
        /// Nominal muzzle speed (m/s)
        #[arg(short = 'v', long)]
        velocity: f64,

        /// Target distance (meters)
        #[arg(short = 'r', long, default_value = "100.0")]
        range: f64,

        /// Number of shots
        #[arg(short = 'n', long, default_value = "20")]
        shots: usize,

        /// Muzzle speed standard deviation (m/s)
        #[arg(long, default_value = "2.0")]
        velocity_sd: f64,

        /// Rifle accuracy scatter radius (mrad)
        #[arg(long, default_value = "0.3")]
        accuracy: f64,

        /// Per-axis wind standard deviation (m/s)
        #[arg(long, default_value = "1.0")]
        wind_sd: f64,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        #[command(flatten)]
        projectile: ProjectileArgs,

        #[command(flatten)]
        conditions: ConditionArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct ProjectileArgs {
    /// Mass (grains)
    #[arg(short = 'm', long, default_value = "168.0")]
    mass: f64,

    /// Diameter (inches)
    #[arg(short = 'd', long, default_value = "0.308")]
    diameter: f64,

    /// Length (inches)
    #[arg(long, default_value = "1.22")]
    length: f64,

    /// Ballistic coefficient (in the chosen drag family)
    #[arg(short = 'b', long, default_value = "0.223")]
    bc: f64,

    /// Drag family (g1 or g7)
    #[arg(long, default_value = "g7")]
    drag_family: DragFamily,

    /// Barrel twist (inches per turn, negative for left-hand)
    #[arg(long, default_value = "10.0")]
    twist: f64,
}

#[derive(Args)]
struct ConditionArgs {
    /// Temperature (Celsius)
    #[arg(long, default_value = "15.0")]
    temperature: f64,

    /// Altitude (meters)
    #[arg(long, default_value = "0.0")]
    altitude: f64,

    /// Relative humidity (fraction, 0-1)
    #[arg(long, default_value = "0.5")]
    humidity: f64,

    /// Wind speed (m/s)
    #[arg(long, default_value = "0.0")]
    wind_speed: f64,

    /// Bearing the wind blows from (degrees clockwise from downrange)
    #[arg(long, default_value = "90.0")]
    wind_direction: f64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct TrajectorySummary {
    total_distance_m: f64,
    total_time_s: f64,
    max_height_m: f64,
    impact_speed_mps: f64,
    impact_energy_j: f64,
    impact_angle_deg: f64,
    points: usize,
}

#[derive(Debug, Serialize)]
struct ZeroSummary {
    converged: bool,
    iterations: usize,
    miss_distance_m: f64,
    elevation_mrad: f64,
    elevation_moa: f64,
    azimuth_mrad: f64,
    azimuth_moa: f64,
}

#[derive(Debug, Serialize)]
struct GroupSummary {
    shots_attempted: usize,
    impacts: usize,
    zero_converged: bool,
    center_crossrange_m: f64,
    center_vertical_m: f64,
    mean_radius_m: f64,
    extreme_spread_m: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Trajectory {
            velocity,
            elevation,
            max_range,
            max_time,
            full,
            projectile,
            conditions,
            format,
        } => run_trajectory(
            velocity, elevation, max_range, max_time, full, &projectile, &conditions, format,
        ),

        Commands::Zero {
            velocity,
            range,
            tolerance,
            max_iterations,
            projectile,
            conditions,
            format,
        } => run_zero(
            velocity, range, tolerance, max_iterations, &projectile, &conditions, format,
        ),

        Commands::Group {
            velocity,
            range,
            shots,
            velocity_sd,
            accuracy,
            wind_sd,
            seed,
            projectile,
            conditions,
            format,
        } => run_group(
            velocity, range, shots, velocity_sd, accuracy, wind_sd, seed, &projectile,
            &conditions, format,
        ),
    }
}

/// Integration timestep shared by all subcommands (s).
const TIME_STEP_S: f64 = 1.0e-3;

fn build_projectile(args: &ProjectileArgs) -> ProjectileState {
    ProjectileState::new(
        conversions::grains_to_kg(args.mass),
        conversions::inches_to_meters(args.diameter),
        conversions::inches_to_meters(args.length),
        args.bc,
        args.drag_family,
    )
}

fn build_atmosphere(args: &ConditionArgs) -> Result<Atmosphere, Box<dyn Error>> {
    Ok(Atmosphere::new(
        args.temperature + 273.15,
        args.altitude,
        args.humidity,
    )?)
}

fn build_wind(args: &ConditionArgs) -> SegmentedWind {
    SegmentedWind::new(vec![WindSegment {
        speed_mps: args.wind_speed,
        direction_deg: args.wind_direction,
        until_distance_m: f64::INFINITY,
    }])
}

fn spin_rate(args: &ProjectileArgs, speed_mps: f64) -> f64 {
    let pitch_m = conversions::twist_inches_to_pitch_m(args.twist.abs(), args.twist >= 0.0);
    ProjectileState::spin_rate_from_twist(speed_mps, pitch_m)
}

#[allow(clippy::too_many_arguments)]
fn run_trajectory(
    velocity: f64,
    elevation_deg: f64,
    max_range: f64,
    max_time: f64,
    full: bool,
    projectile: &ProjectileArgs,
    conditions: &ConditionArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let elevation = elevation_deg.to_radians();
    let launch_velocity = Vector3::new(
        velocity * elevation.cos(),
        0.0,
        velocity * elevation.sin(),
    );
    let launch = build_projectile(projectile).with_flight(
        Vector3::zeros(),
        launch_velocity,
        spin_rate(projectile, velocity),
    );

    let mut sim = Simulator::new(launch);
    sim.set_atmosphere(build_atmosphere(conditions)?);
    let wind = build_wind(conditions);
    sim.simulate_with(&wind, max_range, TIME_STEP_S, max_time);

    let trajectory = sim.trajectory();
    let summary = TrajectorySummary {
        total_distance_m: trajectory.total_distance_m(),
        total_time_s: trajectory.total_time_s(),
        max_height_m: trajectory.max_height_m(),
        impact_speed_mps: trajectory.impact_speed_mps(),
        impact_energy_j: trajectory.last().map_or(0.0, |p| p.kinetic_energy_j()),
        impact_angle_deg: trajectory.impact_angle_rad().to_degrees(),
        points: trajectory.len(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║           TRAJECTORY SUMMARY           ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Total Range:       {:>9.2} m         ║", summary.total_distance_m);
            println!("║ Time of Flight:    {:>9.3} s         ║", summary.total_time_s);
            println!("║ Max Height:        {:>9.2} m         ║", summary.max_height_m);
            println!("║ Impact Speed:      {:>9.2} m/s       ║", summary.impact_speed_mps);
            println!("║ Impact Energy:     {:>9.1} J         ║", summary.impact_energy_j);
            println!("║ Impact Angle:      {:>9.2} deg       ║", summary.impact_angle_deg);
            println!("╚════════════════════════════════════════╝");

            println!("┌──────────┬──────────┬──────────┬──────────┬──────────┐");
            println!("│ Time (s) │  X (m)   │  Y (m)   │  Z (m)   │ V (m/s)  │");
            println!("├──────────┼──────────┼──────────┼──────────┼──────────┤");
            let stride = if full {
                1
            } else {
                (trajectory.len() / 10).max(1)
            };
            for (i, p) in trajectory.iter().enumerate() {
                if i % stride == 0 || i == trajectory.len() - 1 {
                    println!(
                        "│ {:>8.3} │ {:>8.2} │ {:>8.3} │ {:>8.3} │ {:>8.2} │",
                        p.time_s,
                        p.state.position_m.x,
                        p.state.position_m.y,
                        p.state.position_m.z,
                        p.speed_mps()
                    );
                }
            }
            println!("└──────────┴──────────┴──────────┴──────────┴──────────┘");
        }
    }
    Ok(())
}

fn run_zero(
    velocity: f64,
    range: f64,
    tolerance: f64,
    max_iterations: usize,
    projectile: &ProjectileArgs,
    conditions: &ConditionArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let template = build_projectile(projectile).with_flight(
        Vector3::zeros(),
        Vector3::zeros(),
        spin_rate(projectile, velocity),
    );
    let mut sim = Simulator::new(template);
    sim.set_atmosphere(build_atmosphere(conditions)?);
    sim.set_wind(build_wind(conditions).sample(&Vector3::zeros(), 0.0));

    let result = sim.compute_zero(
        velocity,
        Vector3::new(range, 0.0, 0.0),
        TIME_STEP_S,
        max_iterations,
        tolerance,
    );
    if !result.is_converged() {
        eprintln!(
            "warning: zero did not converge in {} iterations (miss {:.3} m)",
            result.iterations, result.miss_distance_m
        );
    }

    let summary = ZeroSummary {
        converged: result.is_converged(),
        iterations: result.iterations,
        miss_distance_m: result.miss_distance_m,
        elevation_mrad: conversions::radians_to_mrad(result.elevation_rad),
        elevation_moa: conversions::radians_to_moa(result.elevation_rad),
        azimuth_mrad: conversions::radians_to_mrad(result.azimuth_rad),
        azimuth_moa: conversions::radians_to_moa(result.azimuth_rad),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║             ZERO SOLUTION              ║");
            println!("╠════════════════════════════════════════╣");
            println!(
                "║ Converged:         {:>9}           ║",
                if summary.converged { "yes" } else { "no" }
            );
            println!("║ Iterations:        {:>9}           ║", summary.iterations);
            println!("║ Miss:              {:>9.4} m         ║", summary.miss_distance_m);
            println!("║ Elevation:         {:>9.3} mrad      ║", summary.elevation_mrad);
            println!("║                    {:>9.3} MOA       ║", summary.elevation_moa);
            println!("║ Azimuth:           {:>9.3} mrad      ║", summary.azimuth_mrad);
            println!("║                    {:>9.3} MOA       ║", summary.azimuth_moa);
            println!("╚════════════════════════════════════════╝");
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_group(
    velocity: f64,
    range: f64,
    shots: usize,
    velocity_sd: f64,
    accuracy_mrad: f64,
    wind_sd: f64,
    seed: u64,
    projectile: &ProjectileArgs,
    conditions: &ConditionArgs,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let template = build_projectile(projectile).with_flight(
        Vector3::zeros(),
        Vector3::zeros(),
        spin_rate(projectile, velocity),
    );
    let config = DispersionConfig {
        shot_count: shots,
        target_range_m: range,
        nominal_muzzle_speed_mps: velocity,
        muzzle_speed_sd_mps: velocity_sd,
        accuracy_radius_rad: conversions::mrad_to_radians(accuracy_mrad),
        wind_speed_sd_mps: wind_sd,
        seed,
        dt_s: TIME_STEP_S,
    };
    let group = simulate_group(&template, build_atmosphere(conditions)?, &config)?;
    if !group.zero.is_converged() {
        eprintln!(
            "warning: pre-zero did not converge (miss {:.3} m)",
            group.zero.miss_distance_m
        );
    }

    let summary = GroupSummary {
        shots_attempted: group.attempted,
        impacts: group.impacts.len(),
        zero_converged: group.zero.is_converged(),
        center_crossrange_m: group.center_crossrange_m,
        center_vertical_m: group.center_vertical_m,
        mean_radius_m: group.mean_radius_m,
        extreme_spread_m: group.extreme_spread_m,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║            GROUP STATISTICS            ║");
            println!("╠════════════════════════════════════════╣");
            println!(
                "║ Impacts:           {:>5} of {:<5}       ║",
                summary.impacts, summary.shots_attempted
            );
            println!("║ Center (cross):    {:>9.3} m         ║", summary.center_crossrange_m);
            println!("║ Center (vert):     {:>9.3} m         ║", summary.center_vertical_m);
            println!("║ Mean Radius:       {:>9.3} m         ║", summary.mean_radius_m);
            println!("║ Extreme Spread:    {:>9.3} m         ║", summary.extreme_spread_m);
            println!("╚════════════════════════════════════════╝");

            println!("┌──────┬───────────┬───────────┬──────────┬──────────┐");
            println!("│ Shot │ Cross (m) │ Vert (m)  │ Time (s) │ V (m/s)  │");
            println!("├──────┼───────────┼───────────┼──────────┼──────────┤");
            for impact in &group.impacts {
                println!(
                    "│ {:>4} │ {:>9.3} │ {:>9.3} │ {:>8.3} │ {:>8.2} │",
                    impact.shot,
                    impact.crossrange_m,
                    impact.vertical_m,
                    impact.time_s,
                    impact.speed_mps
                );
            }
            println!("└──────┴───────────┴───────────┴──────────┴──────────┘");
        }
    }
    Ok(())
}
