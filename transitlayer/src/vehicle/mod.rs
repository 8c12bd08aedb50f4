//! Vehicle identity, position records, and the snapshot set.

mod position;
mod set;

pub use position::{VehicleId, VehiclePosition};
pub use set::VehicleSet;
