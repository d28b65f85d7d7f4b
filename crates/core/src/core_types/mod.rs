//! Core data types shared by every subsystem.

pub mod entity;
pub mod units;
pub mod vec3;
pub mod vehicle;
pub mod zone;

pub use entity::FlowEntity;
pub use units::KilometersPerHour;
pub use vec3::Vec3;
pub use vehicle::{VehicleEnvelope, VehicleState};
pub use zone::Zone;
