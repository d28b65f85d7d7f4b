//! Pressure/velocity color mapping.
//!
//! Pure functions of the entity's scalar attributes; the same inputs always
//! produce the same RGB output, and every channel is clamped to [0, 1] before
//! it reaches the output buffers.

use serde::{Deserialize, Serialize};

use crate::core_types::{Vec3, Zone};

/// Base color selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorMode {
    /// Piecewise-linear gradient over the pressure attribute.
    #[default]
    Pressure,
    /// Fixed color per emission zone.
    Zone,
}

#[inline]
fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

#[inline]
fn clamp_channels(c: Vec3) -> Vec3 {
    Vec3::new(
        c.x.clamp(0.0, 1.0),
        c.y.clamp(0.0, 1.0),
        c.z.clamp(0.0, 1.0),
    )
}

/// Pressure gradient: deep blue through teal, green, yellow, and orange to
/// red, each sub-range a linear blend over its local fraction.
fn pressure_color(pressure: f32) -> Vec3 {
    let p = if pressure.is_finite() {
        pressure.clamp(0.0, 1.0)
    } else {
        0.0
    };
    if p < 0.2 {
        Vec3::new(0.0, 0.3, 1.0)
    } else if p < 0.4 {
        let t = (p - 0.2) / 0.2;
        lerp(Vec3::new(0.0, 0.3, 1.0), Vec3::new(0.0, 0.7, 0.7), t)
    } else if p < 0.6 {
        let t = (p - 0.4) / 0.2;
        lerp(Vec3::new(0.0, 0.7, 0.3), Vec3::new(0.7, 0.7, 0.0), t)
    } else if p < 0.8 {
        let t = (p - 0.6) / 0.2;
        lerp(Vec3::new(0.7, 0.7, 0.0), Vec3::new(1.0, 0.5, 0.0), t)
    } else {
        let t = (p - 0.8) / 0.2;
        lerp(Vec3::new(1.0, 0.5, 0.0), Vec3::new(1.0, 0.0, 0.0), t)
    }
}

/// Fixed zone palette used when pressure visualization is off.
fn zone_color(zone: Zone) -> Vec3 {
    match zone {
        Zone::FrontWing => Vec3::new(0.9, 0.2, 0.2),
        Zone::Top => Vec3::new(0.2, 0.7, 0.2),
        Zone::Side => Vec3::new(0.2, 0.5, 0.9),
        Zone::RearWing => Vec3::new(0.9, 0.7, 0.2),
        Zone::Floor => Vec3::new(0.9, 0.2, 0.9),
        Zone::Vortex => Vec3::new(0.7, 0.7, 0.7),
    }
}

/// Color for one trail point of a general flow entity.
///
/// `trail_fraction` is the point's position along the trail (0 = head,
/// 1 = tail); brightness fades with remaining life and toward the tail, and
/// scales with the velocity attribute.
pub fn flow_color(
    pressure: f32,
    velocity: f32,
    life_ratio: f32,
    trail_fraction: f32,
    zone: Zone,
    mode: ColorMode,
) -> Vec3 {
    let base = match mode {
        ColorMode::Pressure => pressure_color(pressure),
        ColorMode::Zone => zone_color(zone),
    };

    let velocity_factor = if velocity.is_finite() {
        (velocity / 10.0).clamp(0.5, 1.5)
    } else {
        0.5
    };
    let fade = (life_ratio.clamp(0.0, 1.0) * (1.0 - trail_fraction.clamp(0.0, 1.0)))
        .clamp(0.1, 1.0);

    clamp_channels(base * velocity_factor * fade)
}

/// Dedicated vortex palette, visually separated from the pressure map: front
/// wing blue-cyan, rear wing gold with DRS open and red-orange closed, scaled
/// by vortex strength.
pub fn vortex_color(zone: Zone, drs_open: bool, strength: f32) -> Vec3 {
    let base = if zone == Zone::FrontWing {
        Vec3::new(0.2, 0.5, 1.0)
    } else if drs_open {
        Vec3::new(1.0, 0.8, 0.2)
    } else {
        Vec3::new(1.0, 0.4, 0.1)
    };

    let strength = if strength.is_finite() {
        strength.max(0.0)
    } else {
        0.0
    };
    let intensity = 0.7 + strength * 0.3;

    clamp_channels(base * intensity * 0.9)
}
