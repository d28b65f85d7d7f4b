//! Emission zones on the vehicle envelope.

use serde::{Deserialize, Serialize};

/// Named emission region a flow entity originates from.
///
/// The zone is fixed at creation (vortex entities carry the wing zone their
/// anchor belongs to) and selects placement geometry, spacing scale, and the
/// zone-mode color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Front wing leading edge, high pressure.
    FrontWing,
    /// Airbox and engine cover.
    Top,
    /// Side pods, left/right alternating.
    Side,
    /// Rear wing, DRS-sensitive.
    RearWing,
    /// Floor and diffuser, low pressure.
    Floor,
    /// Dedicated wingtip vortex population.
    Vortex,
}

impl Zone {
    /// Spacing scale applied to the base minimum distance when adaptive
    /// density is enabled. Floor and front-wing flow is naturally denser.
    #[inline]
    pub fn spacing_scale(self) -> f32 {
        match self {
            Zone::FrontWing => 0.8,
            Zone::Floor => 0.7,
            _ => 1.0,
        }
    }
}
