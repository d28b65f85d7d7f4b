//! Semantic unit type for vehicle speed.
//!
//! A newtype wrapper keeps km/h values from being mixed with the m/s and
//! unitless scalars used elsewhere in the force field. Negative inputs are
//! clamped to zero rather than rejected, matching the engine-wide policy of
//! always producing a valid frame.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// Vehicle speed in kilometers per hour.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KilometersPerHour(f32);

impl Eq for KilometersPerHour {}

impl PartialOrd for KilometersPerHour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KilometersPerHour {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for KilometersPerHour {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl fmt::Display for KilometersPerHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} km/h", self.0)
    }
}

impl KilometersPerHour {
    /// Reference speed the whole force field is normalized against.
    pub const REFERENCE: KilometersPerHour = KilometersPerHour(250.0);

    /// Create a new speed. Negative or non-finite values clamp to zero.
    #[inline]
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_finite() && value > 0.0 {
            KilometersPerHour(value)
        } else {
            KilometersPerHour(0.0)
        }
    }

    /// Speed in meters per second, for integrating vehicle displacement.
    #[inline]
    pub fn meters_per_second(self) -> f32 {
        self.0 / 3.6
    }
}
