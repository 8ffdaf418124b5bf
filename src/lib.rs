//! State-vector simulation of the quantum teleportation protocol.
//!
//! [`Teleporter`] drives the four protocol phases over a three-qubit
//! [`StateVector`]; the `core` types are usable on their own for other small
//! registers.
//!
//! ```no_run
//! use qteleport::{RngSource, Teleporter};
//!
//! let mut teleporter = Teleporter::with_source(RngSource::seeded(7));
//! let report = teleporter.run("0.6", "0.8")?;
//! assert!(report.teleported);
//! # Ok::<(), qteleport::ProtocolError>(())
//! ```

mod core;
pub mod protocols;
mod sampler;

pub use crate::core::{
    Gate, MeasurementOutcome, NORM_TOLERANCE, RandomSource, RngSource, StateVector, errors,
    ket_one, ket_zero, measurements, utils,
};
pub use crate::protocols::errors::ProtocolError;
pub use crate::protocols::teleportation::{
    Amplitudes, ClassicalBits, CorrectionReport, ProtocolPhase, Session, TeleportConfig,
    Teleporter,
};
pub use crate::sampler::Sampler;
