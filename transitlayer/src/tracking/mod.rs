//! Tracked-vehicle selection and view-follow logic.

mod controller;
mod state;

pub use controller::TrackingController;
pub use state::{CenterRequest, TrackingState};
