pub mod errors;
mod gates;
pub mod measurements;
mod random;
mod state;
pub mod utils;

pub use gates::Gate;
pub use measurements::MeasurementOutcome;
pub use random::{RandomSource, RngSource};
pub use state::{NORM_TOLERANCE, StateVector, ket_one, ket_zero};
