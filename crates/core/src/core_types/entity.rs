//! Flow entity: one particle or poly-line trail.

use super::vec3::Vec3;
use super::zone::Zone;

/// One simulated flow entity.
///
/// The trail is ordered head-first: index 0 is the most recently emitted
/// point. Trails are bounded by `max_points`; a `max_points` of 1 gives pure
/// particle behavior. `colors` is always parallel to `trail`.
#[derive(Debug, Clone)]
pub struct FlowEntity {
    /// Trail points, head at index 0, world coordinates.
    pub trail: Vec<Vec3>,
    /// RGB color per trail point, parallel to `trail`.
    pub colors: Vec<Vec3>,
    /// Remaining time to live in seconds.
    pub life: f32,
    /// Time to live this cycle started with. Invariant: `life <= initial_life`.
    pub initial_life: f32,
    /// Life drawn at placement; reset jitter scales this immutable base so
    /// repeated resets cannot drift the lifetime.
    pub base_life: f32,
    /// Trail length bound.
    pub max_points: usize,
    /// Emission zone, fixed after creation.
    pub zone: Zone,
    /// Position relative to the vehicle reference at creation/reset time.
    pub emission_offset: Vec3,
    /// Vehicle reference position last time this entity advanced.
    pub last_vehicle_position: f32,
    /// Advance speed this tick, `velocity` scaled by the vehicle speed factor.
    pub speed: f32,
    /// Entity-local flow velocity magnitude, drawn at placement.
    pub velocity: f32,
    /// Normalized pressure attribute in [0, 1], drives coloring.
    pub pressure: f32,
    /// General flow heading, unit vector. Unused by vortex entities.
    pub direction: Vec3,
    /// Whether this entity orbits a wingtip anchor instead of following the
    /// general field.
    pub is_vortex: bool,
    /// Spiral strength, >= 0. Zero for non-vortex entities.
    pub vortex_strength: f32,
    /// Spiral phase in radians, kept in [0, 2*pi).
    pub vortex_phase: f32,
    /// Vehicle-local anchor the spiral tightens around.
    pub vortex_anchor: Vec3,
}

impl FlowEntity {
    /// Current head position, if the trail is non-empty.
    #[inline]
    pub fn head(&self) -> Option<Vec3> {
        self.trail.first().copied()
    }

    /// Remaining-life fraction in [0, 1].
    #[inline]
    pub fn life_ratio(&self) -> f32 {
        if self.initial_life > f32::EPSILON {
            (self.life / self.initial_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Prepend a new head point, dropping the tail first when the trail is at
    /// capacity (FIFO at the tail, LIFO-prepend at the head).
    pub fn push_head(&mut self, point: Vec3, color: Vec3) {
        if self.trail.len() >= self.max_points {
            self.trail.pop();
            self.colors.pop();
        }
        self.trail.insert(0, point);
        self.colors.insert(0, color);
    }

    /// Shift every trail point along the travel axis, reseating the trail in
    /// the vehicle-following reference frame.
    pub fn translate_travel_axis(&mut self, delta: f32) {
        for point in &mut self.trail {
            point.z += delta;
        }
    }
}
