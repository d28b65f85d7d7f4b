//! Vector type alias for 3D positions and directions.

use nalgebra::Vector3;

/// 3D vector type for positions, displacements, and RGB colors.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`, used throughout the
/// simulation. Axis convention: +z is the travel axis, +y is up, x is
/// lateral.
pub type Vec3 = Vector3<f32>;
