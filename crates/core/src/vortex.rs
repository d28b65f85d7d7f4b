//! Wingtip vortex population.
//!
//! A small dedicated sub-population of entities orbits fixed wingtip anchor
//! points instead of following the general field. The population is torn
//! down and rebuilt whenever the DRS state or the vortex intensity changes,
//! because both alter the anchor set and its strengths.

use std::f32::consts::TAU;

use crate::color::vortex_color;
use crate::config::{FieldTuning, FlowConfig};
use crate::core_types::{FlowEntity, Vec3, VehicleState, Zone};
use crate::sampling::UniformSampler;

/// One fixed anchor a group of vortex entities spirals around.
#[derive(Debug, Clone, Copy)]
pub struct VortexAnchor {
    /// Anchor point in vehicle-local coordinates.
    pub position: Vec3,
    /// Base spiral strength at this anchor.
    pub strength: f32,
    /// Wing the anchor belongs to; selects the vortex palette.
    pub zone: Zone,
}

/// Anchor set for the current DRS state: four wingtips always, plus the
/// DRS-flap trailing-edge anchors only while the flap is closed.
pub fn anchors(vehicle: &VehicleState) -> Vec<VortexAnchor> {
    let env = &vehicle.envelope;
    let span = env.wing_span();
    let front_y = env.front_wing_height() * 0.7;
    let rear_y = env.rear_wing_height() * 0.9;
    let front_z = env.front_wing_z();
    let rear_z = env.rear_wing_z();

    // Rear tip vortices weaken when the flap opens.
    let rear_strength = if vehicle.drs_open { 0.5 } else { 1.0 };

    let mut anchors = vec![
        VortexAnchor {
            position: Vec3::new(span * 0.5, front_y, front_z),
            strength: 0.8,
            zone: Zone::FrontWing,
        },
        VortexAnchor {
            position: Vec3::new(-span * 0.5, front_y, front_z),
            strength: 0.8,
            zone: Zone::FrontWing,
        },
        VortexAnchor {
            position: Vec3::new(span * 0.45, rear_y, rear_z),
            strength: rear_strength,
            zone: Zone::RearWing,
        },
        VortexAnchor {
            position: Vec3::new(-span * 0.45, rear_y, rear_z),
            strength: rear_strength,
            zone: Zone::RearWing,
        },
    ];

    if !vehicle.drs_open {
        let flap_y = env.rear_wing_height();
        anchors.push(VortexAnchor {
            position: Vec3::new(0.0, flap_y * 0.95, rear_z + 0.1),
            strength: 0.9,
            zone: Zone::RearWing,
        });
        anchors.push(VortexAnchor {
            position: Vec3::new(span * 0.3, flap_y * 0.93, rear_z + 0.05),
            strength: 0.7,
            zone: Zone::RearWing,
        });
        anchors.push(VortexAnchor {
            position: Vec3::new(-span * 0.3, flap_y * 0.93, rear_z + 0.05),
            strength: 0.7,
            zone: Zone::RearWing,
        });
    }

    anchors
}

/// Total vortex entity budget: the zone-weight reserve share of the line
/// budget per unit intensity, capped at a hard 20% of the budget.
pub fn vortex_count(config: &FlowConfig) -> usize {
    let budget = config.num_lines as f32;
    let reserve = config.zone_weights.vortex_reserve();
    let raw = budget * reserve * config.vortex_intensity.clamp(0.0, 2.0);
    raw.min(budget * 0.2).round() as usize
}

/// Build a fresh vortex population for the current vehicle state.
///
/// The total budget is split evenly across anchors with at least one entity
/// per anchor; an intensity of zero produces no vortices at all.
pub fn spawn_vortices(
    config: &FlowConfig,
    vehicle: &VehicleState,
    sampler: &mut UniformSampler,
) -> Vec<FlowEntity> {
    spawn_filtered(config, vehicle, sampler, None, vortex_count(config))
}

/// Rebuild only the rear-wing part of the vortex population, used when the
/// DRS state flips: rear anchors and strengths change, front wingtip
/// vortices are deliberately left untouched. The caller passes the budget
/// left over after the surviving front population, so the total population
/// cap keeps holding across repeated flips.
pub fn spawn_rear_vortices(
    config: &FlowConfig,
    vehicle: &VehicleState,
    sampler: &mut UniformSampler,
    budget: usize,
) -> Vec<FlowEntity> {
    spawn_filtered(config, vehicle, sampler, Some(Zone::RearWing), budget)
}

fn spawn_filtered(
    config: &FlowConfig,
    vehicle: &VehicleState,
    sampler: &mut UniformSampler,
    only_zone: Option<Zone>,
    total: usize,
) -> Vec<FlowEntity> {
    if total == 0 {
        return Vec::new();
    }

    let mut anchors = anchors(vehicle);
    if let Some(zone) = only_zone {
        anchors.retain(|a| a.zone == zone);
    }
    if anchors.is_empty() {
        return Vec::new();
    }
    let base = total / anchors.len();
    let remainder = total % anchors.len();

    let mut entities = Vec::with_capacity(total.max(anchors.len()));
    for (i, anchor) in anchors.iter().enumerate() {
        let per_anchor = (base + usize::from(i < remainder)).max(1);

        for _ in 0..per_anchor {
            let strength = (anchor.strength * (1.0 + sampler.uniform(-0.2, 0.2))).max(0.0);
            let offset = anchor.position + sampler.jitter(0.05);
            let world = offset + Vec3::new(0.0, 0.0, vehicle.position);

            let pressure = match (anchor.zone, vehicle.drs_open) {
                (Zone::FrontWing, _) => sampler.uniform(0.2, 0.4),
                (_, true) => sampler.uniform(0.1, 0.2),
                (_, false) => sampler.uniform(0.3, 0.5),
            };
            let velocity = sampler.uniform(6.0, 10.0);
            let life = sampler.uniform(4.0, 6.0);
            let color = vortex_color(anchor.zone, vehicle.drs_open, strength);

            entities.push(FlowEntity {
                trail: vec![world],
                colors: vec![color],
                life,
                initial_life: life,
                base_life: life,
                max_points: config.points_per_line,
                zone: anchor.zone,
                emission_offset: offset,
                last_vehicle_position: vehicle.position,
                speed: velocity * vehicle.speed_factor(),
                velocity,
                pressure,
                direction: Vec3::z(),
                is_vortex: true,
                vortex_strength: strength,
                vortex_phase: sampler.phase(),
                vortex_anchor: anchor.position,
            });
        }
    }

    entities
}

/// Spiral displacement for a vortex entity, distinct from the general field:
/// forward motion plus a rotation whose radius tightens away from the anchor
/// and whose phase advances with vehicle speed.
pub fn advance(
    entity: &mut FlowEntity,
    vehicle: &VehicleState,
    tuning: &FieldTuning,
    intensity: f32,
    dt: f32,
    sampler: &mut UniformSampler,
) -> Vec3 {
    let Some(head) = entity.head() else {
        return Vec3::zeros();
    };
    let speed_factor = vehicle.speed_factor();
    let rel = head - Vec3::new(0.0, 0.0, vehicle.position);

    let mut displacement = Vec3::new(0.0, 0.0, entity.speed * dt);

    // Phase grows with speed and wraps so long sessions don't accumulate an
    // unbounded float.
    entity.vortex_phase =
        (entity.vortex_phase + tuning.vortex_phase_rate * speed_factor).rem_euclid(TAU);

    let from_anchor = Vec3::new(
        rel.x - entity.vortex_anchor.x,
        rel.y - entity.vortex_anchor.y,
        0.0,
    )
    .norm();
    let radius = entity.vortex_strength
        * tuning.vortex_radius
        * intensity
        * (1.0 - (from_anchor / 2.0).min(1.0));

    let rotation_speed = 0.5 + speed_factor * 0.5;
    displacement.x += radius * (entity.vortex_phase * rotation_speed).cos();
    displacement.y += radius * (entity.vortex_phase * rotation_speed).sin();

    let turbulence = tuning.vortex_turbulence * (0.5 + speed_factor * 0.5);
    displacement.x += sampler.uniform(-turbulence, turbulence);
    displacement.y += sampler.uniform(-turbulence, turbulence);

    displacement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::VehicleEnvelope;

    fn vehicle() -> VehicleState {
        VehicleState::new(VehicleEnvelope::default())
    }

    #[test]
    fn test_anchor_count_tracks_drs() {
        let mut v = vehicle();
        assert_eq!(anchors(&v).len(), 7, "closed DRS adds flap anchors");
        v.drs_open = true;
        assert_eq!(anchors(&v).len(), 4, "open DRS keeps only the wingtips");
    }

    #[test]
    fn test_rear_anchors_weaken_with_drs_open() {
        let mut v = vehicle();
        let closed: Vec<f32> = anchors(&v)
            .iter()
            .filter(|a| a.zone == Zone::RearWing)
            .map(|a| a.strength)
            .collect();
        v.drs_open = true;
        let open: Vec<f32> = anchors(&v)
            .iter()
            .filter(|a| a.zone == Zone::RearWing)
            .map(|a| a.strength)
            .collect();
        assert!(open.iter().all(|s| *s <= 0.5));
        assert!(closed.iter().any(|s| *s >= 0.9));
    }

    #[test]
    fn test_front_anchors_unaffected_by_drs() {
        let mut v = vehicle();
        let closed: Vec<VortexAnchor> = anchors(&v)
            .into_iter()
            .filter(|a| a.zone == Zone::FrontWing)
            .collect();
        v.drs_open = true;
        let open: Vec<VortexAnchor> = anchors(&v)
            .into_iter()
            .filter(|a| a.zone == Zone::FrontWing)
            .collect();
        assert_eq!(closed.len(), open.len());
        for (c, o) in closed.iter().zip(&open) {
            assert_eq!(c.strength, o.strength);
            assert!((c.position - o.position).norm() < 1e-6);
        }
    }

    #[test]
    fn test_vortex_count_scales_and_caps() {
        let config = |intensity| FlowConfig {
            num_lines: 100,
            vortex_intensity: intensity,
            ..FlowConfig::default()
        };
        assert_eq!(vortex_count(&config(0.0)), 0);
        assert_eq!(vortex_count(&config(1.0)), 10);
        assert_eq!(vortex_count(&config(2.0)), 20);
        // Cap holds even if intensity were somehow above range.
        assert_eq!(vortex_count(&config(5.0)), 20);
    }

    #[test]
    fn test_vortex_count_follows_zone_weight_reserve() {
        use crate::config::ZoneWeights;

        // Shrinking the floor share grows the vortex reserve to 25%, which
        // the hard 20% ceiling then caps.
        let mut config = FlowConfig {
            num_lines: 100,
            vortex_intensity: 1.0,
            ..FlowConfig::default()
        };
        config.zone_weights = ZoneWeights {
            floor: 0.05,
            ..ZoneWeights::default()
        };
        assert!((config.zone_weights.vortex_reserve() - 0.25).abs() < 1e-5);
        assert_eq!(vortex_count(&config), 20);
    }

    #[test]
    fn test_rear_respawn_fits_its_budget() {
        let v = vehicle();
        let config = FlowConfig {
            num_lines: 100,
            ..FlowConfig::default()
        };
        let mut sampler = UniformSampler::seeded(6);

        let rear = spawn_rear_vortices(&config, &v, &mut sampler, 14);
        assert_eq!(rear.len(), 14);
        assert!(rear.iter().all(|e| e.is_vortex && e.zone == Zone::RearWing));

        assert!(spawn_rear_vortices(&config, &v, &mut sampler, 0).is_empty());
    }

    #[test]
    fn test_spawn_covers_every_anchor() {
        let v = vehicle();
        let config = FlowConfig {
            num_lines: 100,
            vortex_intensity: 0.3,
            ..FlowConfig::default()
        };
        let mut sampler = UniformSampler::seeded(2);
        let vortices = spawn_vortices(&config, &v, &mut sampler);
        // Budget (3) is below the anchor count (7); at-least-one wins.
        assert_eq!(vortices.len(), 7);
        assert!(vortices.iter().all(|e| e.is_vortex));
    }

    #[test]
    fn test_zero_intensity_spawns_nothing() {
        let v = vehicle();
        let config = FlowConfig {
            vortex_intensity: 0.0,
            ..FlowConfig::default()
        };
        let mut sampler = UniformSampler::seeded(2);
        assert!(spawn_vortices(&config, &v, &mut sampler).is_empty());
    }

    #[test]
    fn test_phase_stays_wrapped() {
        let v = vehicle();
        let config = FlowConfig::default();
        let mut sampler = UniformSampler::seeded(3);
        let mut vortices = spawn_vortices(&config, &v, &mut sampler);
        let entity = &mut vortices[0];
        for _ in 0..10_000 {
            advance(
                entity,
                &v,
                &config.field,
                config.vortex_intensity,
                0.016,
                &mut sampler,
            );
            assert!(
                (0.0..TAU).contains(&entity.vortex_phase),
                "phase escaped wrap: {}",
                entity.vortex_phase
            );
        }
    }

    #[test]
    fn test_spiral_radius_tightens_away_from_anchor() {
        let v = vehicle();
        let config = FlowConfig::default();
        let mut sampler = UniformSampler::seeded(4);
        let vortices = spawn_vortices(&config, &v, &mut sampler);

        let quiet = FieldTuning {
            vortex_turbulence: 0.0,
            ..FieldTuning::default()
        };

        let mut on_anchor = vortices[0].clone();
        on_anchor.trail[0] = on_anchor.vortex_anchor;
        on_anchor.vortex_phase = 0.0;
        on_anchor.speed = 0.0;
        let d_near = advance(&mut on_anchor, &v, &quiet, 2.0, 0.016, &mut sampler);

        let mut far = vortices[0].clone();
        far.trail[0] = far.vortex_anchor + Vec3::new(3.0, 0.0, 0.0);
        far.vortex_phase = 0.0;
        far.speed = 0.0;
        let d_far = advance(&mut far, &v, &quiet, 2.0, 0.016, &mut sampler);

        assert!(
            d_near.norm() > d_far.norm(),
            "spiral should vanish far from anchor: {} vs {}",
            d_near.norm(),
            d_far.norm()
        );
        assert!(d_far.norm() < 1e-6, "radius should clamp to zero: {d_far:?}");
    }
}
