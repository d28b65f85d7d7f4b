use aeroflow_core::{FlowConfig, FlowSimulation, KilometersPerHour, VehicleEnvelope};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Airflow visualization demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "aeroflow-demo")]
#[command(about = "Headless vehicle airflow simulation demo", long_about = None)]
struct Args {
    /// Simulation duration in seconds
    #[arg(short, long, default_value_t = 10.0)]
    duration: f32,

    /// Frame time in seconds
    #[arg(long, default_value_t = 0.016)]
    dt: f32,

    /// Number of flow lines
    #[arg(short, long, default_value_t = 1000)]
    lines: usize,

    /// Vehicle speed in km/h
    #[arg(short, long, default_value_t = 250.0)]
    speed: f32,

    /// Open the DRS flap for the whole run
    #[arg(long)]
    drs: bool,

    /// Wingtip vortex intensity (0-2)
    #[arg(long, default_value_t = 2.0)]
    vortex_intensity: f32,

    /// Keep laid-down trails fixed in world space instead of following the car
    #[arg(long)]
    world_frame: bool,

    /// Color by zone instead of by pressure
    #[arg(long)]
    zone_colors: bool,

    /// Vehicle length in meters
    #[arg(long, default_value_t = 5.7)]
    length: f32,

    /// Vehicle width in meters
    #[arg(long, default_value_t = 2.0)]
    width: f32,

    /// Vehicle height in meters
    #[arg(long, default_value_t = 1.0)]
    height: f32,

    /// Random seed (omit for system entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Report interval in seconds
    #[arg(short, long, default_value_t = 1.0)]
    report_interval: f32,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    println!("=== Airflow Visualization Demo ===\n");

    let config = FlowConfig {
        num_lines: args.lines,
        relative_dynamics: !args.world_frame,
        visualize_pressure: !args.zone_colors,
        vortex_intensity: args.vortex_intensity,
        ..FlowConfig::default()
    };
    let envelope = VehicleEnvelope::new(args.length, args.width, args.height);

    let mut sim = match args.seed {
        Some(seed) => FlowSimulation::with_seed(config, envelope, seed),
        None => FlowSimulation::new(config, envelope),
    };
    sim.set_vehicle_speed(args.speed);
    sim.set_drs(args.drs);

    let stats = sim.placement_stats();
    println!(
        "Seeded {} entities ({} vortices) around a {:.1}x{:.1}x{:.1}m envelope",
        sim.entities().len(),
        sim.entities().iter().filter(|e| e.is_vortex).count(),
        args.length,
        args.width,
        args.height
    );
    if stats.spacing_misses > 0 {
        println!("Placement accepted {} entities below minimum spacing", stats.spacing_misses);
    }
    println!(
        "Speed: {:.0} km/h, DRS: {}, frame: {}\n",
        args.speed,
        if args.drs { "open" } else { "closed" },
        if args.world_frame { "world" } else { "vehicle-relative" }
    );

    println!("Time(s) | Points | Trails | MinLife | MaxLife | Car z(m)");
    println!("--------|--------|--------|---------|---------|---------");

    let mut time = 0.0;
    let mut position = 0.0;
    let mut next_report = 0.0;
    let speed_ms = KilometersPerHour::new(args.speed).meters_per_second();

    while time < args.duration {
        position += speed_ms * args.dt;
        sim.set_vehicle_position(position);
        sim.step(args.dt);
        time += args.dt;

        if time >= next_report {
            let (mut min_life, mut max_life) = (f32::INFINITY, 0.0f32);
            for e in sim.entities() {
                min_life = min_life.min(e.life);
                max_life = max_life.max(e.life);
            }
            println!(
                "{:7.1} | {:6} | {:6} | {:7.2} | {:7.2} | {:8.1}",
                time,
                sim.positions().len(),
                sim.line_ranges().len(),
                min_life,
                max_life,
                position
            );
            next_report += args.report_interval;
        }
    }

    println!("\n=== Simulation Complete ===");
    println!("Final time: {time:.1}s, distance covered: {position:.1}m");
    println!("Trail points in final frame: {}", sim.positions().len());
    let full = sim
        .entities()
        .iter()
        .filter(|e| e.trail.len() == sim.config().points_per_line)
        .count();
    println!("Trails at full length: {}/{}", full, sim.entities().len());
}
