//! Emission zone placement with best-effort minimum spacing.
//!
//! Each zone draws up to a fixed number of candidate positions per entity and
//! accepts the first one far enough from everything placed so far. This is
//! plain rejection sampling, not Poisson-disc: under high density the attempt
//! budget runs out and the last candidate is accepted anyway, so clustering
//! can occur. `PlacementStats` counts those degradations instead of hiding
//! them.
//!
//! The running position set is shared across zones in pass order, so later
//! zones avoid earlier zones' placements but not vice versa.

use tracing::debug;

use crate::color::{flow_color, ColorMode};
use crate::config::FlowConfig;
use crate::core_types::{FlowEntity, Vec3, VehicleState, Zone};
use crate::sampling::UniformSampler;

/// Candidate draws per entity before giving up on spacing.
const MAX_ATTEMPTS: usize = 10;

/// Outcome counters for one placement pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementStats {
    /// Entities placed (always the full zone allocation).
    pub placed: usize,
    /// Entities whose attempt budget ran out and were placed at their last
    /// candidate regardless of spacing.
    pub spacing_misses: usize,
}

/// Zone pass order. Determines both placement awareness and the entity
/// iteration order for the rest of the simulation's lifetime.
fn zone_allocations(config: &FlowConfig) -> [(Zone, usize); 5] {
    let budget = config.num_lines as f32;
    let w = &config.zone_weights;
    [
        (Zone::FrontWing, (budget * w.front_wing) as usize),
        (Zone::Top, (budget * w.top) as usize),
        (Zone::Side, (budget * w.side) as usize),
        (Zone::RearWing, (budget * w.rear_wing) as usize),
        (Zone::Floor, (budget * w.floor) as usize),
    ]
}

/// Draw a candidate position in the zone's emission box, vehicle-local.
fn sample_offset(zone: Zone, index: usize, vehicle: &VehicleState, s: &mut UniformSampler) -> Vec3 {
    let env = &vehicle.envelope;
    match zone {
        Zone::FrontWing => Vec3::new(
            s.uniform(-env.width * 0.6, env.width * 0.6),
            s.uniform(0.05, env.front_wing_height()),
            env.front_wing_z() - s.uniform(0.0, 0.2),
        ),
        Zone::Top => Vec3::new(
            s.uniform(-env.width * 0.25, env.width * 0.25),
            env.height + s.uniform(0.0, 0.2),
            s.uniform(-env.length * 0.3, env.length * 0.3),
        ),
        Zone::Side => Vec3::new(
            if index % 2 == 0 {
                env.width * 0.25
            } else {
                -env.width * 0.25
            },
            s.uniform(0.2, env.height * 0.5),
            s.uniform(-env.length * 0.2, env.length * 0.2),
        ),
        Zone::RearWing => Vec3::new(
            s.uniform(-env.width * 0.45, env.width * 0.45),
            s.uniform(env.rear_wing_height() * 0.5, env.rear_wing_height()),
            env.rear_wing_z(),
        ),
        // Floor sits in a thin sheet just above the ground plane. Vortex
        // entities are placed by the vortex generator, never here.
        Zone::Floor | Zone::Vortex => Vec3::new(
            s.uniform(-env.width * 0.4, env.width * 0.4),
            0.05,
            s.uniform(-env.length * 0.3, env.length * 0.3),
        ),
    }
}

/// Draw the zone-characteristic flow attributes: heading, pressure, and
/// velocity magnitude. Rear wing attributes depend on the DRS state at
/// placement time.
fn sample_attributes(
    zone: Zone,
    index: usize,
    drs_open: bool,
    s: &mut UniformSampler,
) -> (Vec3, f32, f32) {
    match zone {
        Zone::FrontWing => (Vec3::z(), s.uniform(0.7, 1.0), s.uniform(5.0, 8.0)),
        Zone::Top => (Vec3::z(), s.uniform(0.3, 0.6), s.uniform(7.0, 10.0)),
        Zone::Side => {
            let lateral = if index % 2 == 0 { 0.2 } else { -0.2 };
            (
                Vec3::new(lateral, 0.0, 1.0).normalize(),
                s.uniform(0.4, 0.7),
                s.uniform(6.0, 9.0),
            )
        }
        Zone::RearWing => {
            if drs_open {
                // DRS open: less drag, straighter and faster flow.
                (
                    Vec3::new(0.0, 0.05, 1.0).normalize(),
                    s.uniform(0.1, 0.3),
                    s.uniform(5.0, 8.0),
                )
            } else {
                (
                    Vec3::new(0.0, 0.1, 1.0).normalize(),
                    s.uniform(0.1, 0.4),
                    s.uniform(4.0, 6.0),
                )
            }
        }
        Zone::Floor | Zone::Vortex => (
            Vec3::new(0.0, -0.05, 1.0).normalize(),
            s.uniform(0.1, 0.3),
            s.uniform(8.0, 12.0),
        ),
    }
}

/// Minimum spacing in effect for a zone.
fn scaled_min_distance(config: &FlowConfig, zone: Zone) -> f32 {
    if config.adaptive_density {
        config.min_distance * zone.spacing_scale()
    } else {
        config.min_distance
    }
}

fn respects_spacing(candidate: Vec3, existing: &[Vec3], min_distance: f32) -> bool {
    existing
        .iter()
        .all(|placed| (candidate - placed).norm() >= min_distance)
}

/// Place the full non-vortex population around the vehicle.
///
/// Entities come back in zone pass order, then within-zone creation order,
/// which is the deterministic order `step` iterates in forever after.
pub fn seed_entities(
    config: &FlowConfig,
    vehicle: &VehicleState,
    sampler: &mut UniformSampler,
) -> (Vec<FlowEntity>, PlacementStats) {
    let mode = if config.visualize_pressure {
        ColorMode::Pressure
    } else {
        ColorMode::Zone
    };

    let mut entities = Vec::with_capacity(config.num_lines);
    let mut existing: Vec<Vec3> = Vec::with_capacity(config.num_lines);
    let mut stats = PlacementStats::default();

    for (zone, count) in zone_allocations(config) {
        let min_distance = scaled_min_distance(config, zone);

        for index in 0..count {
            let mut offset = sample_offset(zone, index, vehicle, sampler);
            let mut world = offset + Vec3::new(0.0, 0.0, vehicle.position);
            let mut accepted = respects_spacing(world, &existing, min_distance);

            let mut attempt = 1;
            while !accepted && attempt < MAX_ATTEMPTS {
                offset = sample_offset(zone, index, vehicle, sampler);
                world = offset + Vec3::new(0.0, 0.0, vehicle.position);
                accepted = respects_spacing(world, &existing, min_distance);
                attempt += 1;
            }
            if !accepted {
                // Best effort: keep the last candidate rather than dropping
                // the entity.
                stats.spacing_misses += 1;
                debug!(?zone, index, "placement attempts exhausted, accepting candidate");
            }

            let (direction, pressure, velocity) =
                sample_attributes(zone, index, vehicle.drs_open, sampler);
            let life = sampler.uniform(3.0, 5.0);
            let color = flow_color(pressure, velocity, 1.0, 0.0, zone, mode);

            entities.push(FlowEntity {
                trail: vec![world],
                colors: vec![color],
                life,
                initial_life: life,
                base_life: life,
                max_points: config.points_per_line,
                zone,
                emission_offset: offset,
                last_vehicle_position: vehicle.position,
                speed: velocity * vehicle.speed_factor(),
                velocity,
                pressure,
                direction,
                is_vortex: false,
                vortex_strength: 0.0,
                vortex_phase: 0.0,
                vortex_anchor: Vec3::zeros(),
            });
            existing.push(world);
            stats.placed += 1;
        }
    }

    (entities, stats)
}
