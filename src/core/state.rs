use crate::core::Gate;
use crate::core::errors::StateError;
use crate::core::utils::{self, tensor_states};
use ndarray::{Array1, array};
use num_complex::Complex64;
use std::fmt;

/// Tolerance on $\sum |a_i|^2 = 1$ for externally supplied vectors.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Basis ket |0>.
pub fn ket_zero() -> Array1<Complex64> {
    array![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)]
}

/// Basis ket |1>.
pub fn ket_one() -> Array1<Complex64> {
    array![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)]
}

/// Pure state of an n-qubit register as $2^n$ complex amplitudes.
///
/// Amplitude `i` belongs to the basis state whose binary digits are the qubit
/// values, qubit 0 first. The vector is normalized whenever it is observable
/// from outside this crate.
#[derive(Clone, Debug, PartialEq)]
pub struct StateVector {
    amplitudes: Array1<Complex64>,
    num_qubits: usize,
}

impl StateVector {
    /// Creates a new register initialized to |0...0>.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = Array1::<Complex64>::zeros(1 << num_qubits);
        amplitudes[0] = Complex64::new(1.0, 0.0);

        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Validates that the input vector is a valid quantum state.
    fn check_vector_state(vector: &Array1<Complex64>) -> Result<(), StateError> {
        // Dimension must be a power of 2
        if !vector.len().is_power_of_two() {
            return Err(StateError::InvalidDimensions);
        }

        let norm_sqr: f64 = vector.iter().map(|c| c.norm_sqr()).sum();
        if (norm_sqr - 1.0).abs() > NORM_TOLERANCE {
            return Err(StateError::NotNormalized(norm_sqr));
        }

        Ok(())
    }

    /// Wraps a vector the caller has already normalized.
    pub(crate) fn from_normalized(amplitudes: Array1<Complex64>) -> Self {
        let num_qubits = amplitudes.len().trailing_zeros() as usize;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Creates a state from an already normalized amplitude vector.
    pub fn from_amplitudes(vector: Array1<Complex64>) -> Result<Self, StateError> {
        Self::check_vector_state(&vector)?;
        Ok(Self::from_normalized(vector))
    }

    /// Normalizes `vector` and wraps it. Rejects the zero vector.
    pub fn from_unnormalized(vector: Array1<Complex64>) -> Result<Self, StateError> {
        if !vector.len().is_power_of_two() {
            return Err(StateError::InvalidDimensions);
        }
        if utils::norm(&vector) == 0.0 {
            return Err(StateError::ZeroNorm);
        }
        Ok(Self::from_normalized(utils::normalize(&vector)))
    }

    /// Single qubit `normalize(alpha|0> + beta|1>)`.
    pub fn qubit(alpha: Complex64, beta: Complex64) -> Result<Self, StateError> {
        Self::from_unnormalized(ket_zero() * alpha + ket_one() * beta)
    }

    /// Bell pair `normalize(|00> + |11>)`.
    pub fn bell_pair() -> Self {
        let zero = ket_zero();
        let one = ket_one();
        let sum = tensor_states(&[&zero, &zero]) + tensor_states(&[&one, &one]);
        Self::from_normalized(utils::normalize(&sum))
    }

    /// Joint state `self ⊗ other`; `self` supplies the leading qubits.
    pub fn tensor(&self, other: &StateVector) -> StateVector {
        Self::from_normalized(tensor_states(&[&self.amplitudes, &other.amplitudes]))
    }

    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn norm(&self) -> f64 {
        utils::norm(&self.amplitudes)
    }

    /// $|a_i|^2$ for every basis index.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|c| c.norm_sqr()).collect()
    }

    /// Probabilities labelled by basis state, e.g. `("|010>", 0.25)`.
    pub fn basis_probabilities(&self) -> Vec<(String, f64)> {
        self.probabilities()
            .into_iter()
            .enumerate()
            .map(|(i, p)| (format!("|{:0width$b}>", i, width = self.num_qubits), p))
            .collect()
    }

    /// Fidelity $|\langle self | other \rangle|^2$ between two pure states.
    ///
    /// Insensitive to global phase: 1 means the states are physically identical.
    pub fn fidelity(&self, other: &StateVector) -> Result<f64, StateError> {
        if self.dim() != other.dim() {
            return Err(StateError::DimensionMismatch {
                expected: self.dim(),
                got: other.dim(),
            });
        }
        let overlap: Complex64 = self
            .amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum();
        Ok(overlap.norm_sqr())
    }

    /// Checks if a given index is within the register's range
    fn validate_qubit_index(&self, index: usize) -> Result<(), StateError> {
        if index >= self.num_qubits {
            return Err(StateError::IndexOutOfBounds {
                index,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    pub(crate) fn validate_qubits(&self, qubits: &[usize]) -> Result<(), StateError> {
        for &q in qubits {
            self.validate_qubit_index(q)?;
        }
        if let Some(dup) = utils::find_duplicate(qubits) {
            return Err(StateError::DuplicateQubit(dup));
        }
        Ok(())
    }

    /// Applies non controlled quantum gate
    pub fn apply(&mut self, gate: &Gate, target_qubits: &[usize]) -> Result<(), StateError> {
        self.apply_controlled(gate, target_qubits, &[])
    }

    /// Embeds `gate` on `target_qubits` (identity elsewhere, gated on every
    /// qubit in `control_qubits` being 1) and left-multiplies the state.
    pub fn apply_controlled(
        &mut self,
        gate: &Gate,
        target_qubits: &[usize],
        control_qubits: &[usize],
    ) -> Result<(), StateError> {
        for &q in target_qubits.iter().chain(control_qubits) {
            self.validate_qubit_index(q)?;
        }

        let full = Gate::expand_gate(self.num_qubits, gate, target_qubits, control_qubits)?;
        self.amplitudes = full.matrix.dot(&self.amplitudes);

        Ok(())
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{amp:.4}")?;
        }
        write!(f, "]")
    }
}
