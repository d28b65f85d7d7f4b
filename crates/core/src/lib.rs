//! Aeroflow simulation core.
//!
//! A stylized real-time airflow visualization engine for a moving vehicle
//! body: thousands of flow entities (particles or poly-line trails) are
//! placed around a parametric envelope, advanced through a layered empirical
//! force field, aged, reset, and colored every frame. The engine reacts to
//! vehicle speed, a DRS toggle, and vehicle displacement over time, and can
//! reseat trails in a vehicle-following reference frame.
//!
//! This is not a fluid solver. The field is a deterministic-up-to-randomness,
//! hand-tuned composition of effect zones (wake, ground effect, wingtip
//! vortices, turbulence) whose goal is plausible, readable motion.
//!
//! The crate is pure simulation: no window, camera, mesh, or GPU code.
//! A renderer consumes the flat [`FlowSimulation::positions`] /
//! [`FlowSimulation::colors`] buffers and draws one line strip per
//! [`FlowSimulation::line_ranges`] entry.

pub mod aerodynamics;
pub mod color;
pub mod config;
pub mod core_types;
pub mod placement;
pub mod sampling;
pub mod simulation;
pub mod vortex;

pub use color::{flow_color, vortex_color, ColorMode};
pub use config::{FieldTuning, FlowConfig, ZoneWeights};
pub use core_types::{FlowEntity, KilometersPerHour, Vec3, VehicleEnvelope, VehicleState, Zone};
pub use placement::PlacementStats;
pub use sampling::UniformSampler;
pub use simulation::FlowSimulation;
