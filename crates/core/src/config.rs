//! Tunable simulation configuration.
//!
//! Every hand-tuned magnitude in the force field is exposed here so visual
//! tuning does not require touching the evaluator. Defaults reproduce the
//! reference look; relative magnitudes matter more than exact values.

use serde::{Deserialize, Serialize};

/// Fraction of the entity budget allocated to each emission zone.
///
/// The remainder after the five named zones is reserved for the vortex
/// population (10% at default weights, capped at 20% by the generator).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneWeights {
    /// Front wing share.
    pub front_wing: f32,
    /// Airbox / engine cover share.
    pub top: f32,
    /// Side pod share.
    pub side: f32,
    /// Rear wing share.
    pub rear_wing: f32,
    /// Floor / diffuser share.
    pub floor: f32,
}

impl Default for ZoneWeights {
    fn default() -> Self {
        ZoneWeights {
            front_wing: 0.25,
            top: 0.15,
            side: 0.15,
            rear_wing: 0.15,
            floor: 0.20,
        }
    }
}

impl ZoneWeights {
    /// Budget fraction left over for vortex entities.
    #[inline]
    pub fn vortex_reserve(&self) -> f32 {
        let named = self.front_wing + self.top + self.side + self.rear_wing + self.floor;
        (1.0 - named).max(0.0)
    }
}

/// Hand-tuned force-field magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldTuning {
    /// Peak inward pull of the wake, right at the wake boundary.
    pub wake_strength: f32,
    /// E-folding distance of the wake decay behind the car, meters.
    pub wake_falloff: f32,
    /// Travel-axis acceleration multiplier inside the floor footprint.
    pub ground_accel: f32,
    /// Vertical damping multiplier inside the floor footprint.
    pub ground_damp: f32,
    /// Rotating perturbation magnitude near the wingtip lateral extents.
    pub wingtip_strength: f32,
    /// Lateral capture range of the wingtip perturbation, meters.
    pub wingtip_range: f32,
    /// Per-axis turbulence jitter for general flow.
    pub turbulence: f32,
    /// Per-axis turbulence jitter for vortex flow (xy only).
    pub vortex_turbulence: f32,
    /// Base spiral radius per unit vortex strength and intensity.
    pub vortex_radius: f32,
    /// Spiral phase advance per tick at the reference speed, radians.
    pub vortex_phase_rate: f32,
}

impl Default for FieldTuning {
    fn default() -> Self {
        FieldTuning {
            wake_strength: 0.05,
            wake_falloff: 2.0,
            ground_accel: 1.2,
            ground_damp: 0.8,
            wingtip_strength: 0.008,
            wingtip_range: 0.15,
            turbulence: 0.01,
            vortex_turbulence: 0.005,
            vortex_radius: 0.1,
            vortex_phase_rate: 0.1,
        }
    }
}

/// Complete simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Entity budget, fixed at construction.
    pub num_lines: usize,
    /// Trail point bound per entity; 1 gives pure particles.
    pub points_per_line: usize,
    /// Base minimum spacing between freshly placed entities, meters.
    pub min_distance: f32,
    /// Scale the minimum spacing per zone (tighter under the floor and at
    /// the front wing). Disabled, every zone uses the base minimum.
    pub adaptive_density: bool,
    /// Reseat trails in the vehicle-following frame as the car moves.
    pub relative_dynamics: bool,
    /// Color by pressure gradient; disabled, color by zone.
    pub visualize_pressure: bool,
    /// Vortex population intensity in [0, 2].
    pub vortex_intensity: f32,
    /// Entity budget split across emission zones.
    pub zone_weights: ZoneWeights,
    /// Empirical force-field magnitudes.
    pub field: FieldTuning,
}

impl Default for FlowConfig {
    fn default() -> Self {
        FlowConfig {
            num_lines: 1000,
            points_per_line: 80,
            min_distance: 0.05,
            adaptive_density: true,
            relative_dynamics: true,
            visualize_pressure: true,
            vortex_intensity: 2.0,
            zone_weights: ZoneWeights::default(),
            field: FieldTuning::default(),
        }
    }
}

impl FlowConfig {
    /// Clamp the user-tweakable fields into their valid ranges. Construction
    /// and setters both funnel through this, so out-of-range inputs degrade
    /// instead of rejecting.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.num_lines = self.num_lines.max(1);
        self.points_per_line = self.points_per_line.max(1);
        self.min_distance = if self.min_distance.is_finite() {
            self.min_distance.max(0.0)
        } else {
            0.0
        };
        self.vortex_intensity = if self.vortex_intensity.is_finite() {
            self.vortex_intensity.clamp(0.0, 2.0)
        } else {
            0.0
        };
        self
    }
}
