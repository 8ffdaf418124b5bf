//! Quantum teleportation of one qubit from Alice to Bob.
//!
//! Register layout: qubit 0 holds the state to teleport, qubits 1 and 2 the
//! shared Bell pair (Alice keeps 1, Bob holds 2). The protocol runs four
//! phases in strict order:
//!
//! 1. [`Teleporter::initialize`] prepares `ψ ⊗ (|00> + |11>)/√2`.
//! 2. [`Teleporter::alice_ops`] applies CNOT(0 → 1) and then H on qubit 0.
//! 3. [`Teleporter::measure`] measures qubits 0 and 1, yielding bits `(a, b)`.
//! 4. [`Teleporter::bob_correction`] applies `Z^a X^b` to qubit 2 and reads
//!    out Bob's qubit.
//!
//! Calling a phase out of order returns an error and leaves the session as
//! it was. [`Teleporter::initialize`] may be called at any time and replaces
//! the session.

use crate::core::errors::StateError;
use crate::core::measurements;
use crate::core::{Gate, RandomSource, RngSource, StateVector};
use crate::protocols::errors::ProtocolError;
use ndarray::array;
use num_complex::Complex64;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Qubits measured by Alice.
pub const ALICE_QUBITS: [usize; 2] = [0, 1];
/// Bob's half of the Bell pair.
pub const BOB_QUBIT: usize = 2;

/// Driver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeleportConfig {
    /// Seed for measurement sampling; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Maximum `1 - fidelity` for a run to count as a successful teleport.
    pub tolerance: f64,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tolerance: 1e-9,
        }
    }
}

/// Position of a session in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolPhase {
    Uninitialized,
    Initialized,
    AliceOpsApplied,
    Measured,
    Corrected,
}

impl fmt::Display for ProtocolPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProtocolPhase::Uninitialized => "uninitialized",
            ProtocolPhase::Initialized => "initialized",
            ProtocolPhase::AliceOpsApplied => "alice-ops-applied",
            ProtocolPhase::Measured => "measured",
            ProtocolPhase::Corrected => "corrected",
        };
        f.write_str(name)
    }
}

/// The two classical bits Alice sends to Bob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassicalBits {
    /// Outcome on qubit 0.
    pub a: bool,
    /// Outcome on qubit 1.
    pub b: bool,
}

impl ClassicalBits {
    pub fn new(a: bool, b: bool) -> Self {
        Self { a, b }
    }

    /// Outcome index over `ALICE_QUBITS`, `a` being the high bit.
    pub fn index(&self) -> usize {
        (usize::from(self.a) << 1) | usize::from(self.b)
    }

    fn from_index(index: usize) -> Self {
        Self {
            a: index & 0b10 != 0,
            b: index & 0b01 != 0,
        }
    }

    /// Unitary Bob applies to his qubit.
    pub fn correction(&self) -> Gate {
        Gate::correction(self.a, self.b)
    }
}

impl fmt::Display for ClassicalBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", u8::from(self.a), u8::from(self.b))
    }
}

/// Typed `(α, β)` pair for the qubit to teleport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amplitudes {
    pub alpha: Complex64,
    pub beta: Complex64,
}

impl Amplitudes {
    pub fn new(alpha: Complex64, beta: Complex64) -> Self {
        Self { alpha, beta }
    }

    /// Parses both amplitudes from text, see [`parse_amplitude`].
    pub fn parse(alpha: &str, beta: &str) -> Result<Self, ProtocolError> {
        Ok(Self {
            alpha: parse_amplitude(alpha)?,
            beta: parse_amplitude(beta)?,
        })
    }
}

/// Parses a real or complex literal such as `0.6`, `-1.5`, `1+2j`, `0.3-0.4i`
/// or `(0-0.8j)`. Surrounding whitespace and one pair of parentheses are
/// accepted; the imaginary unit may be written `i` or `j`.
pub fn parse_amplitude(text: &str) -> Result<Complex64, ProtocolError> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(trimmed)
        .trim();

    if inner.is_empty() {
        return Err(ProtocolError::invalid_amplitude(text, "empty input"));
    }

    let value: Complex64 = inner
        .replace(['j', 'J'], "i")
        .parse()
        .map_err(|_| ProtocolError::invalid_amplitude(text, "not a real or complex number"))?;

    if !value.re.is_finite() || !value.im.is_finite() {
        return Err(ProtocolError::invalid_amplitude(text, "amplitude must be finite"));
    }

    Ok(value)
}

/// Builds `ψ = normalize(α|0> + β|1>)` and the joint register `ψ ⊗ Bell`.
pub fn prepare(amplitudes: Amplitudes) -> Result<(StateVector, StateVector), StateError> {
    let psi = StateVector::qubit(amplitudes.alpha, amplitudes.beta)?;
    let state = psi.tensor(&StateVector::bell_pair());
    Ok((psi, state))
}

/// Alice's entangling operations: CNOT (control 0, target 1) then H on 0.
pub fn alice_operations(state: &StateVector) -> Result<StateVector, StateError> {
    let mut next = state.clone();
    next.apply(&Gate::cnot(), &ALICE_QUBITS)?;
    next.apply(&Gate::h(), &[ALICE_QUBITS[0]])?;
    Ok(next)
}

/// Reads Bob's qubit out of a register collapsed onto `bits`.
///
/// Bob's qubit is the least significant one, so after the collapse his two
/// amplitudes are the last two slots of the surviving block at
/// `4a + 2b`. For `(1, 1)` that block is the tail of the vector. This mapping
/// only holds for the three-qubit teleportation layout.
pub fn bob_qubit(state: &StateVector, bits: ClassicalBits) -> Result<StateVector, StateError> {
    if state.num_qubits() != 3 {
        return Err(StateError::DimensionMismatch {
            expected: 8,
            got: state.dim(),
        });
    }
    let base = bits.index() << 1;
    let amps = state.amplitudes();
    StateVector::from_unnormalized(array![amps[base], amps[base + 1]])
}

/// Mutable state of one protocol run.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    psi: StateVector,
    state: StateVector,
    bits: Option<ClassicalBits>,
    phase: ProtocolPhase,
}

impl Session {
    /// The normalized qubit being teleported.
    pub fn psi(&self) -> &StateVector {
        &self.psi
    }

    /// Current three-qubit register.
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    /// Alice's measurement result, once measured.
    pub fn bits(&self) -> Option<ClassicalBits> {
        self.bits
    }

    pub fn phase(&self) -> ProtocolPhase {
        self.phase
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Initialization {
    pub psi: StateVector,
    pub state: StateVector,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AliceOpsReport {
    pub state: StateVector,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementReport {
    pub bits: ClassicalBits,
    /// Probability of the sampled outcome.
    pub probability: f64,
    pub state: StateVector,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionReport {
    pub bits: ClassicalBits,
    /// Bob's qubit after the correction.
    pub bob: StateVector,
    /// The normalized qubit Alice started with.
    pub original: StateVector,
    /// `|<original|bob>|^2`.
    pub fidelity: f64,
    /// Whether `1 - fidelity` is within the configured tolerance.
    pub teleported: bool,
    pub state: StateVector,
}

/// Drives the teleportation protocol and owns its session.
///
/// The random source used for Alice's measurement is injectable so runs can
/// be reproduced or forced onto a given outcome.
#[derive(Debug)]
pub struct Teleporter<S: RandomSource = RngSource<StdRng>> {
    session: Option<Session>,
    source: S,
    config: TeleportConfig,
}

impl Teleporter {
    /// Teleporter sampling from OS entropy.
    pub fn new() -> Self {
        Self::with_config(TeleportConfig::default())
    }

    /// Teleporter seeded from `config.seed` when set.
    pub fn with_config(config: TeleportConfig) -> Self {
        let source = RngSource::from_seed_option(config.seed);
        Self::with_source_and_config(source, config)
    }
}

impl Default for Teleporter {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RandomSource> Teleporter<S> {
    pub fn with_source(source: S) -> Self {
        Self::with_source_and_config(source, TeleportConfig::default())
    }

    pub fn with_source_and_config(source: S, config: TeleportConfig) -> Self {
        Self {
            session: None,
            source,
            config,
        }
    }

    pub fn config(&self) -> &TeleportConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> ProtocolPhase {
        self.session
            .as_ref()
            .map_or(ProtocolPhase::Uninitialized, Session::phase)
    }

    /// The session, provided it is exactly in `required`.
    fn require(
        &self,
        operation: &'static str,
        required: ProtocolPhase,
    ) -> Result<&Session, ProtocolError> {
        match &self.session {
            None => {
                warn!(operation, "rejected: protocol not initialized");
                Err(ProtocolError::UninitializedState { operation })
            }
            Some(session) if session.phase == required => Ok(session),
            Some(session) => {
                warn!(operation, current = %session.phase, %required, "rejected: out of order");
                Err(ProtocolError::PhaseOrder {
                    operation,
                    required,
                    current: session.phase,
                })
            }
        }
    }

    /// Parses `alpha`/`beta` and starts a new session.
    ///
    /// On a parse failure the previous session, if any, is kept.
    pub fn initialize(&mut self, alpha: &str, beta: &str) -> Result<Initialization, ProtocolError> {
        let amplitudes = Amplitudes::parse(alpha, beta)?;
        self.initialize_with(amplitudes)
    }

    /// Starts a new session from typed amplitudes, discarding any previous one.
    pub fn initialize_with(
        &mut self,
        amplitudes: Amplitudes,
    ) -> Result<Initialization, ProtocolError> {
        let (psi, state) = prepare(amplitudes).map_err(|err| match err {
            StateError::ZeroNorm => ProtocolError::invalid_amplitude(
                &format!("({}, {})", amplitudes.alpha, amplitudes.beta),
                "alpha and beta cannot both be zero",
            ),
            other => other.into(),
        })?;

        info!(%psi, "initialized teleportation session");
        self.session = Some(Session {
            psi: psi.clone(),
            state: state.clone(),
            bits: None,
            phase: ProtocolPhase::Initialized,
        });

        Ok(Initialization { psi, state })
    }

    /// Alice's CNOT and Hadamard.
    pub fn alice_ops(&mut self) -> Result<AliceOpsReport, ProtocolError> {
        let mut next = self
            .require("alice_ops", ProtocolPhase::Initialized)?
            .clone();

        next.state = alice_operations(&next.state)?;
        next.phase = ProtocolPhase::AliceOpsApplied;

        info!("alice applied CNOT and Hadamard");
        let report = AliceOpsReport {
            state: next.state.clone(),
        };
        self.session = Some(next);
        Ok(report)
    }

    /// Alice measures her two qubits, collapsing the register.
    pub fn measure(&mut self) -> Result<MeasurementReport, ProtocolError> {
        let mut next = self
            .require("measure", ProtocolPhase::AliceOpsApplied)?
            .clone();

        let outcome = measurements::measure(&next.state, &ALICE_QUBITS, &mut self.source)?;
        let bits = ClassicalBits::from_index(outcome.index);

        next.state = outcome.state;
        next.bits = Some(bits);
        next.phase = ProtocolPhase::Measured;

        info!(%bits, probability = outcome.probability, "alice measured");
        let report = MeasurementReport {
            bits,
            probability: outcome.probability,
            state: next.state.clone(),
        };
        self.session = Some(next);
        Ok(report)
    }

    /// Bob applies the correction selected by Alice's bits and reads his qubit.
    pub fn bob_correction(&mut self) -> Result<CorrectionReport, ProtocolError> {
        let operation = "bob_correction";
        let mut next = self.require(operation, ProtocolPhase::Measured)?.clone();
        let Some(bits) = next.bits else {
            return Err(ProtocolError::PhaseOrder {
                operation,
                required: ProtocolPhase::Measured,
                current: next.phase,
            });
        };

        next.state.apply(&bits.correction(), &[BOB_QUBIT])?;
        let bob = bob_qubit(&next.state, bits)?;
        let fidelity = bob.fidelity(&next.psi)?;
        let teleported = 1.0 - fidelity <= self.config.tolerance;
        next.phase = ProtocolPhase::Corrected;

        debug!(%bob, original = %next.psi, "bob corrected his qubit");
        info!(%bits, fidelity, teleported, "teleportation finished");
        let report = CorrectionReport {
            bits,
            bob,
            original: next.psi.clone(),
            fidelity,
            teleported,
            state: next.state.clone(),
        };
        self.session = Some(next);
        Ok(report)
    }

    /// Runs all four phases on `alpha`/`beta`.
    pub fn run(&mut self, alpha: &str, beta: &str) -> Result<CorrectionReport, ProtocolError> {
        self.initialize(alpha, beta)?;
        self.alice_ops()?;
        self.measure()?;
        self.bob_correction()
    }
}
