//! Simulation driver.
//!
//! Owns the entity population, the shared random generator, and the flat
//! point/color buffers the external renderer reads. One `step(dt)` call per
//! rendered frame advances every entity in a deterministic pass order (zone
//! placement order, then within-zone creation order, vortices last).

use tracing::{debug, info};

use crate::aerodynamics;
use crate::color::{flow_color, vortex_color, ColorMode};
use crate::config::FlowConfig;
use crate::core_types::{FlowEntity, KilometersPerHour, Vec3, VehicleEnvelope, VehicleState, Zone};
use crate::placement::{self, PlacementStats};
use crate::sampling::UniformSampler;
use crate::vortex;

/// Positional jitter applied when a reset reseats an entity.
const RESET_JITTER: f32 = 0.05;

/// Streamline/particle flow simulation around a parametric vehicle envelope.
///
/// All state lives in memory and is re-derived each run; there is no
/// persistence and no I/O. The caller supplies `dt` and is responsible for
/// clamping frame-time spikes before they reach the field.
#[derive(Debug)]
pub struct FlowSimulation {
    config: FlowConfig,
    vehicle: VehicleState,
    entities: Vec<FlowEntity>,
    sampler: UniformSampler,
    placement_stats: PlacementStats,
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    line_ranges: Vec<(usize, usize)>,
}

impl FlowSimulation {
    /// Build a simulation seeded from system entropy.
    #[must_use]
    pub fn new(config: FlowConfig, envelope: VehicleEnvelope) -> Self {
        Self::build(config, envelope, UniformSampler::from_entropy())
    }

    /// Build a simulation with a deterministic random seed, for replayable
    /// tests.
    #[must_use]
    pub fn with_seed(config: FlowConfig, envelope: VehicleEnvelope, seed: u64) -> Self {
        Self::build(config, envelope, UniformSampler::seeded(seed))
    }

    fn build(config: FlowConfig, envelope: VehicleEnvelope, mut sampler: UniformSampler) -> Self {
        let config = config.sanitized();
        let vehicle = VehicleState::new(envelope);

        let (mut entities, placement_stats) =
            placement::seed_entities(&config, &vehicle, &mut sampler);
        entities.extend(vortex::spawn_vortices(&config, &vehicle, &mut sampler));

        info!(
            entities = entities.len(),
            spacing_misses = placement_stats.spacing_misses,
            "flow simulation seeded"
        );

        let capacity = entities.len() * config.points_per_line;
        FlowSimulation {
            config,
            vehicle,
            entities,
            sampler,
            placement_stats,
            positions: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
            line_ranges: Vec::new(),
        }
    }

    /// Advance the whole population by one tick.
    ///
    /// `dt` is taken as supplied; spikes propagate directly into displacement
    /// magnitude by design.
    pub fn step(&mut self, dt: f32) {
        let mode = self.color_mode();
        let FlowSimulation {
            config,
            vehicle,
            entities,
            sampler,
            ..
        } = self;

        for entity in entities.iter_mut() {
            entity.life -= dt;

            if entity.life <= 0.0 {
                reset_entity(entity, vehicle, sampler, mode);
                continue;
            }

            // Reseat existing trail geometry in the vehicle-following frame
            // before the new head is computed.
            if config.relative_dynamics {
                let delta = vehicle.position - entity.last_vehicle_position;
                entity.translate_travel_axis(delta);
            }
            entity.last_vehicle_position = vehicle.position;

            // Keep the advance speed fresh against the current vehicle speed.
            entity.speed = entity.velocity * vehicle.speed_factor();

            let displacement = if entity.is_vortex {
                vortex::advance(
                    entity,
                    vehicle,
                    &config.field,
                    config.vortex_intensity,
                    dt,
                    sampler,
                )
            } else {
                aerodynamics::evaluate(entity, vehicle, &config.field, dt, sampler)
            };

            let Some(head) = entity.head() else { continue };
            let new_head = head + displacement;
            let color = if entity.is_vortex {
                vortex_color(entity.zone, vehicle.drs_open, entity.vortex_strength)
            } else {
                flow_color(
                    entity.pressure,
                    entity.velocity,
                    entity.life_ratio(),
                    0.0,
                    entity.zone,
                    mode,
                )
            };
            entity.push_head(new_head, color);
        }

        self.rebuild_buffers();
    }

    /// Reset every entity against the current vehicle position and rebuild
    /// the vortex population.
    pub fn reset_all(&mut self) {
        let mode = self.color_mode();
        let FlowSimulation {
            vehicle,
            entities,
            sampler,
            ..
        } = self;
        for entity in entities.iter_mut() {
            reset_entity(entity, vehicle, sampler, mode);
        }
        self.regenerate_vortices();
    }

    // ------------------------------------------------------------------
    // Parameter setters. Out-of-range input clamps, never errors.
    // ------------------------------------------------------------------

    /// Set vehicle speed in km/h; negative values clamp to zero.
    pub fn set_vehicle_speed(&mut self, kmh: f32) {
        self.vehicle.speed = KilometersPerHour::new(kmh);
    }

    /// Set the vehicle's travel-axis displacement.
    pub fn set_vehicle_position(&mut self, position: f32) {
        if position.is_finite() {
            self.vehicle.position = position;
        }
    }

    /// Open or close the DRS flap. A state change rebuilds the rear-wing
    /// vortex population, whose anchor set and strengths differ per flap
    /// state; front wingtip vortices are unaffected.
    pub fn set_drs(&mut self, open: bool) {
        if self.vehicle.drs_open != open {
            self.vehicle.drs_open = open;
            self.regenerate_rear_vortices();
        }
    }

    /// Toggle the vehicle-following reference frame.
    pub fn set_relative_dynamics(&mut self, enable: bool) {
        self.config.relative_dynamics = enable;
    }

    /// Toggle pressure-gradient coloring (off = fixed color per zone).
    pub fn set_pressure_visualization(&mut self, enable: bool) {
        self.config.visualize_pressure = enable;
    }

    /// Set vortex intensity, clamped to [0, 2], and rebuild the vortex
    /// population at the new size.
    pub fn set_vortex_intensity(&mut self, intensity: f32) {
        self.config.vortex_intensity = intensity;
        self.config = self.config.sanitized();
        self.regenerate_vortices();
    }

    /// Set the base minimum spacing used by placement passes.
    pub fn set_density(&mut self, min_distance: f32) {
        self.config.min_distance = min_distance;
        self.config = self.config.sanitized();
    }

    /// Toggle per-zone spacing scales during placement.
    pub fn set_adaptive_density(&mut self, enable: bool) {
        self.config.adaptive_density = enable;
    }

    // ------------------------------------------------------------------
    // Read accessors for the external renderer and for tests.
    // ------------------------------------------------------------------

    /// Flattened trail points for the current frame, in pass order.
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Flattened RGB colors, parallel to `positions()`.
    #[inline]
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// `(start, len)` into the flat buffers for each entity's line strip.
    #[inline]
    pub fn line_ranges(&self) -> &[(usize, usize)] {
        &self.line_ranges
    }

    /// Placement outcome of the construction pass.
    #[inline]
    pub fn placement_stats(&self) -> PlacementStats {
        self.placement_stats
    }

    /// Current entity population (non-vortex plus vortex).
    #[inline]
    pub fn entities(&self) -> &[FlowEntity] {
        &self.entities
    }

    /// Current vehicle state as the simulation sees it.
    #[inline]
    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    /// Active configuration after clamping.
    #[inline]
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    fn color_mode(&self) -> ColorMode {
        if self.config.visualize_pressure {
            ColorMode::Pressure
        } else {
            ColorMode::Zone
        }
    }

    /// Drop and respawn the whole vortex sub-population; the general
    /// population is untouched.
    fn regenerate_vortices(&mut self) {
        self.entities.retain(|e| !e.is_vortex);
        let fresh = vortex::spawn_vortices(&self.config, &self.vehicle, &mut self.sampler);
        debug!(
            vortices = fresh.len(),
            drs_open = self.vehicle.drs_open,
            intensity = self.config.vortex_intensity,
            "vortex population rebuilt"
        );
        self.entities.extend(fresh);
    }

    /// Respawn rear-wing vortices only, leaving front wingtip vortices
    /// exactly as they were. The rear gets whatever budget the surviving
    /// front population leaves, so the total vortex cap holds across flips.
    fn regenerate_rear_vortices(&mut self) {
        self.entities
            .retain(|e| !(e.is_vortex && e.zone == Zone::RearWing));
        let surviving = self.entities.iter().filter(|e| e.is_vortex).count();
        let budget = vortex::vortex_count(&self.config).saturating_sub(surviving);
        let fresh =
            vortex::spawn_rear_vortices(&self.config, &self.vehicle, &mut self.sampler, budget);
        debug!(
            rear_vortices = fresh.len(),
            drs_open = self.vehicle.drs_open,
            "rear vortex population rebuilt"
        );
        self.entities.extend(fresh);
    }

    fn rebuild_buffers(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.line_ranges.clear();

        for entity in &self.entities {
            let start = self.positions.len();
            self.positions.extend_from_slice(&entity.trail);
            self.colors.extend_from_slice(&entity.colors);
            self.line_ranges.push((start, entity.trail.len()));
        }
    }
}

/// Atomic lifecycle reset: cleared trail, reseated position, fresh life.
///
/// Runs to completion within the tick that observed `life <= 0`; the entity
/// is never visible in a dead state. The freshly reset entity skips its
/// advance for that tick, so it re-emerges as a single head point.
fn reset_entity(
    entity: &mut FlowEntity,
    vehicle: &VehicleState,
    sampler: &mut UniformSampler,
    mode: ColorMode,
) {
    entity.trail.clear();
    entity.colors.clear();

    // Life jitter scales the immutable base drawn at placement, so repeated
    // resets cannot drift the lifetime or break `life <= initial_life`.
    let mut life_scale = sampler.uniform(0.8, 1.2);
    if entity.zone == Zone::Floor && !entity.is_vortex {
        // Floor flow recycles faster at speed.
        let speed_cut = 1.0 - 0.15 * (vehicle.speed_factor() - 1.0).max(0.0);
        life_scale *= speed_cut.clamp(0.5, 1.0);
    }
    entity.initial_life = entity.base_life * life_scale;
    entity.life = entity.initial_life;

    let mut position = entity.emission_offset + sampler.jitter(RESET_JITTER);
    position.z += vehicle.position;
    entity.last_vehicle_position = vehicle.position;
    entity.speed = entity.velocity * vehicle.speed_factor();

    let color = if entity.is_vortex {
        entity.vortex_phase = sampler.phase();
        vortex_color(entity.zone, vehicle.drs_open, entity.vortex_strength)
    } else {
        flow_color(entity.pressure, entity.velocity, 1.0, 0.0, entity.zone, mode)
    };

    entity.trail.push(position);
    entity.colors.push(color);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_sim() -> FlowSimulation {
        let config = FlowConfig {
            num_lines: 60,
            points_per_line: 10,
            ..FlowConfig::default()
        };
        FlowSimulation::with_seed(config, VehicleEnvelope::default(), 17)
    }

    #[test]
    fn test_buffers_parallel_and_ranged() {
        let mut sim = small_sim();
        for _ in 0..20 {
            sim.step(0.016);
        }
        assert_eq!(sim.positions().len(), sim.colors().len());
        let total: usize = sim.line_ranges().iter().map(|(_, len)| len).sum();
        assert_eq!(total, sim.positions().len());

        // Ranges tile the buffer without gaps or overlap.
        let mut cursor = 0;
        for (start, len) in sim.line_ranges() {
            assert_eq!(*start, cursor);
            cursor += len;
        }
    }

    #[test]
    fn test_expired_entity_resets_to_single_point() {
        let mut sim = small_sim();
        sim.step(0.016);

        // Force an entity to the end of its life.
        sim.entities[0].life = 0.001;
        let base_life = sim.entities[0].base_life;
        sim.step(0.016);

        let e = &sim.entities[0];
        assert!(e.life > 0.0, "reset entity must come back alive: {}", e.life);
        assert_eq!(e.trail.len(), 1, "reset entity must be a single head point");
        assert!(e.life <= e.initial_life);
        assert!(
            (0.8 * base_life..=1.2 * base_life).contains(&e.initial_life),
            "life jitter out of range: {}",
            e.initial_life
        );
    }

    #[test]
    fn test_reset_reseats_at_current_vehicle_position() {
        let mut sim = small_sim();
        sim.set_vehicle_position(123.0);
        sim.entities[0].life = 0.0;
        sim.step(0.016);

        let e = &sim.entities[0];
        let expected = e.emission_offset + Vec3::new(0.0, 0.0, 123.0);
        assert!(
            (e.trail[0] - expected).norm() <= RESET_JITTER * 3.0_f32.sqrt() + 1e-5,
            "reset too far from emission point: {:?}",
            e.trail[0]
        );
    }

    #[test]
    fn test_trails_grow_until_bounded() {
        let mut sim = small_sim();
        for _ in 0..30 {
            sim.step(0.016);
        }
        for e in sim.entities() {
            assert!(e.trail.len() <= 10, "trail exceeded bound: {}", e.trail.len());
            assert_eq!(e.trail.len(), e.colors.len());
        }
        assert!(
            sim.entities().iter().any(|e| e.trail.len() == 10),
            "long-lived trails should reach the bound"
        );
    }

    #[test]
    fn test_vortex_intensity_clamped_and_rebuilds() {
        let mut sim = small_sim();
        sim.set_vortex_intensity(99.0);
        assert_eq!(sim.config().vortex_intensity, 2.0);
        let at_max = sim.entities().iter().filter(|e| e.is_vortex).count();

        sim.set_vortex_intensity(0.0);
        let at_zero = sim.entities().iter().filter(|e| e.is_vortex).count();
        assert_eq!(at_zero, 0);
        assert!(at_max > 0, "max intensity should produce vortices");
    }

    #[test]
    fn test_speed_setter_clamps_negative() {
        let mut sim = small_sim();
        sim.set_vehicle_speed(-50.0);
        assert_eq!(*sim.vehicle().speed, 0.0);
        // A zero-speed step still produces a valid frame.
        sim.step(0.016);
        assert!(sim.positions().iter().all(|p| p.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn test_world_frame_leaves_trails_behind() {
        let mut sim = small_sim();
        sim.set_relative_dynamics(false);
        sim.step(0.016);

        let probe = sim
            .entities()
            .iter()
            .position(|e| !e.is_vortex)
            .expect("general entity exists");
        let tail_z = sim.entities()[probe].trail.last().map(|p| p.z);

        sim.set_vehicle_position(10.0);
        sim.step(0.016);
        let tail_z_after = sim.entities()[probe].trail.last().map(|p| p.z);
        // Without relative dynamics, existing points do not follow the car.
        assert_eq!(tail_z, tail_z_after);
    }
}
