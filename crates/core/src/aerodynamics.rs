//! Layered empirical force field for general (non-vortex) flow.
//!
//! Not a fluid solver: each effect is a hand-tuned displacement contribution
//! evaluated in vehicle-local coordinates and composed additively. The
//! composition order is part of the contract, since later multiplicative
//! effects (ground effect) act on the sum so far.

use crate::config::FieldTuning;
use crate::core_types::{FlowEntity, Vec3, VehicleState, Zone};
use crate::sampling::UniformSampler;

/// Displacement of the entity's head for one tick.
///
/// Mutates the entity only to decay the floor-zone pressure attribute while
/// the point is inside the floor footprint; everything else is read-only.
pub fn evaluate(
    entity: &mut FlowEntity,
    vehicle: &VehicleState,
    tuning: &FieldTuning,
    dt: f32,
    sampler: &mut UniformSampler,
) -> Vec3 {
    let Some(head) = entity.head() else {
        return Vec3::zeros();
    };
    let env = &vehicle.envelope;
    let speed_factor = vehicle.speed_factor();
    let rel = head - Vec3::new(0.0, 0.0, vehicle.position);

    // 1. Base advance along the entity's heading. `speed` is already scaled
    // by vehicle speed over the 250 km/h reference.
    let mut displacement = entity.direction * (entity.speed * dt);

    // 2. Wake curvature behind the car: exponential decay with distance,
    // pulling toward the centerline with upwash on top.
    let wake_start = env.length * 0.3;
    if rel.z > wake_start {
        let wake =
            tuning.wake_strength * (-(rel.z - wake_start) / tuning.wake_falloff.max(0.1)).exp();
        let speed_mult = 0.8 + speed_factor * 0.4;

        if rel.x > 0.0 {
            displacement.x -= wake * speed_mult;
        } else {
            displacement.x += wake * speed_mult;
        }

        // DRS open flattens the upwash directly behind the rear wing.
        let upwash = if vehicle.drs_open && rel.x.abs() < env.width * 0.3 && rel.z < env.length * 0.6
        {
            0.3
        } else {
            0.5
        };
        displacement.y += wake * upwash * speed_mult;
    }

    // 3. Ground effect inside the floor footprint: accelerate the travel
    // axis, damp the vertical, and starve floor-zone pressure.
    if rel.y < env.height * 0.2 && rel.x.abs() < env.width * 0.4 && rel.z.abs() < env.length * 0.4 {
        let speed_effect = 1.0 + speed_factor * 0.5;
        displacement.z *= tuning.ground_accel * speed_effect;
        displacement.y *= tuning.ground_damp;

        if entity.zone == Zone::Floor {
            entity.pressure = (entity.pressure * 0.5).clamp(0.05, 0.2);
        }
    }

    // 4. Wingtip vortex seeding: a small rotating perturbation near either
    // wingtip lateral extent, phase derived from position and vehicle speed.
    let tip = env.wingtip_x();
    let tip_distance = (rel.x - tip).abs().min((rel.x + tip).abs());
    if tip_distance < tuning.wingtip_range {
        let mut strength =
            tuning.wingtip_strength * (1.0 - tip_distance / tuning.wingtip_range.max(f32::EPSILON));
        if vehicle.drs_open && rel.z > 0.0 {
            strength *= 0.5;
        }
        let phase = rel.z * 2.0 + speed_factor * 4.0;
        displacement.x += strength * phase.cos();
        displacement.y += strength * phase.sin();
    }

    // 5. Turbulence on all three axes, growing with vehicle speed.
    let turbulence = tuning.turbulence * (0.5 + speed_factor * 0.5);
    displacement + sampler.jitter(turbulence)
}
