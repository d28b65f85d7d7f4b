//! Vehicle envelope and per-frame vehicle state.
//!
//! All force-field geometry (wing boxes, floor footprint, wingtip extents) is
//! derived from the three envelope dimensions as fixed fractions, so the same
//! field works for any car the renderer loads.

use serde::{Deserialize, Serialize};

use super::units::KilometersPerHour;

/// Parametric vehicle body dimensions in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleEnvelope {
    /// Body length along the travel axis (z).
    pub length: f32,
    /// Body width (x).
    pub width: f32,
    /// Body height (y).
    pub height: f32,
}

impl VehicleEnvelope {
    /// Create an envelope. Dimensions are clamped to a small positive
    /// minimum so derived geometry never degenerates.
    #[must_use]
    pub fn new(length: f32, width: f32, height: f32) -> Self {
        const MIN_DIM: f32 = 0.1;
        VehicleEnvelope {
            length: length.max(MIN_DIM),
            width: width.max(MIN_DIM),
            height: height.max(MIN_DIM),
        }
    }

    /// Front wing plane, ahead of the reference origin.
    #[inline]
    pub fn front_wing_z(&self) -> f32 {
        -self.length * 0.5
    }

    /// Rear wing plane, behind the reference origin.
    #[inline]
    pub fn rear_wing_z(&self) -> f32 {
        self.length * 0.4
    }

    /// Wing span used for tip vortex anchors.
    #[inline]
    pub fn wing_span(&self) -> f32 {
        self.width * 0.9
    }

    /// Front wing element height.
    #[inline]
    pub fn front_wing_height(&self) -> f32 {
        self.height * 0.3
    }

    /// Rear wing element height.
    #[inline]
    pub fn rear_wing_height(&self) -> f32 {
        self.height * 0.9
    }

    /// Lateral extent of the wingtips, where tip vortices shed.
    #[inline]
    pub fn wingtip_x(&self) -> f32 {
        self.width * 0.4
    }
}

impl Default for VehicleEnvelope {
    /// Dimensions of the reference F1 body the field was tuned against.
    fn default() -> Self {
        VehicleEnvelope {
            length: 5.7,
            width: 2.0,
            height: 1.0,
        }
    }
}

/// Mutable per-frame vehicle state the simulation reacts to.
///
/// Holds no rendering or camera data; the driver mutates this through the
/// simulation's setters and every subsystem reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Fixed body dimensions.
    pub envelope: VehicleEnvelope,
    /// Current vehicle speed.
    pub speed: KilometersPerHour,
    /// Scalar displacement along the travel axis.
    pub position: f32,
    /// Drag-reduction-system flap state.
    pub drs_open: bool,
}

impl VehicleState {
    /// State at rest on the start line, travelling at the reference speed.
    #[must_use]
    pub fn new(envelope: VehicleEnvelope) -> Self {
        VehicleState {
            envelope,
            speed: KilometersPerHour::REFERENCE,
            position: 0.0,
            drs_open: false,
        }
    }

    /// Speed normalized against the 250 km/h reference; every empirical
    /// effect magnitude scales with this factor.
    #[inline]
    pub fn speed_factor(&self) -> f32 {
        *self.speed / *KilometersPerHour::REFERENCE
    }
}
