use crate::core::errors::GateError;
use crate::core::utils;
use ndarray::{Array2, arr2};
use num_complex::Complex64;

const UNITARY_TOLERANCE: f64 = 1e-9;

/// Represents a quantum gate.
///
/// A gate is defined by its unitary matrix and the number of qubits it acts on.
#[derive(Clone, Debug, PartialEq)]
pub struct Gate {
    /// The unitary matrix of the gate.
    pub matrix: Array2<Complex64>,
    /// The number of qubits the gate acts on.
    pub num_qubits: usize,
}

impl Gate {
    /// Creates a new `Gate` from a unitary matrix.
    ///
    /// # Errors
    ///
    /// Returns a `GateError` if:
    /// - The matrix is not square.
    /// - The matrix dimensions are not a power of 2.
    /// - The matrix is not unitary.
    pub fn new(matrix: Array2<Complex64>) -> Result<Self, GateError> {
        let (rows, cols) = matrix.dim();

        if rows != cols {
            return Err(GateError::NotSquareMatrix);
        }

        if !rows.is_power_of_two() {
            return Err(GateError::InvalidDimensions);
        }

        if !utils::is_unitary(&matrix, UNITARY_TOLERANCE) {
            return Err(GateError::NonUnitary);
        }

        let num_qubits = rows.trailing_zeros() as usize;

        Ok(Self { matrix, num_qubits })
    }

    /// Wraps a matrix that is unitary by construction.
    fn from_literal(rows: [[f64; 2]; 2]) -> Gate {
        let matrix = arr2(&rows).mapv(|re| Complex64::new(re, 0.0));
        Gate {
            matrix,
            num_qubits: 1,
        }
    }

    /// Expands a gate to act on a larger register.
    ///
    /// The result applies `gate` to `targets` (only where all `controls` are 1)
    /// and identity on every other qubit.
    ///
    /// # Errors
    ///
    /// Returns `GateError` if:
    /// - The number of targets differs from the gate's arity.
    /// - A target or control index is `>= num_total_qubits`.
    /// - Duplicate indices are found in `targets` or `controls`.
    /// - A qubit is used as both control and target.
    pub fn expand_gate(
        num_total_qubits: usize,
        gate: &Gate,
        targets: &[usize],
        controls: &[usize],
    ) -> Result<Gate, GateError> {
        if targets.len() != gate.num_qubits {
            return Err(GateError::InvalidDimensions);
        }

        if let Some(&index) = targets
            .iter()
            .chain(controls)
            .find(|&&q| q >= num_total_qubits)
        {
            return Err(GateError::QubitOutOfRange {
                index,
                num_qubits: num_total_qubits,
            });
        }

        if let Some(dup) = utils::find_duplicate(targets) {
            return Err(GateError::DuplicateQubit(dup));
        }

        if let Some(dup) = utils::find_duplicate(controls) {
            return Err(GateError::DuplicateQubit(dup));
        }

        if let Some(&c) = controls.iter().find(|c| targets.contains(c)) {
            return Err(GateError::ControlTargetOverlap(c));
        }

        Ok(Gate {
            matrix: utils::expand_operator(num_total_qubits, &gate.matrix, targets, controls),
            num_qubits: num_total_qubits,
        })
    }

    /// Matrix product `self · other`: `other` acts first, then `self`.
    pub fn compose(&self, other: &Gate) -> Result<Gate, GateError> {
        if self.num_qubits != other.num_qubits {
            return Err(GateError::InvalidDimensions);
        }
        Ok(Gate {
            matrix: self.matrix.dot(&other.matrix),
            num_qubits: self.num_qubits,
        })
    }

    /// Bob's correction for Alice's classical bits `(a, b)`: `Z^a · X^b`.
    ///
    /// | a | b | correction |
    /// |---|---|---|
    /// | 0 | 0 | I |
    /// | 0 | 1 | X |
    /// | 1 | 0 | Z |
    /// | 1 | 1 | Z·X |
    pub fn correction(a: bool, b: bool) -> Gate {
        match (a, b) {
            (false, false) => Gate::i(),
            (false, true) => Gate::x(),
            (true, false) => Gate::z(),
            (true, true) => Gate::from_literal([[0.0, 1.0], [-1.0, 0.0]]),
        }
    }

    // --- Standard Gates ---

    /// Creates an Identity gate.
    pub fn i() -> Gate {
        Gate::from_literal([[1.0, 0.0], [0.0, 1.0]])
    }

    /// Creates a Pauli-X gate (NOT gate).
    pub fn x() -> Gate {
        Gate::from_literal([[0.0, 1.0], [1.0, 0.0]])
    }

    /// Creates a Pauli-Z gate.
    pub fn z() -> Gate {
        Gate::from_literal([[1.0, 0.0], [0.0, -1.0]])
    }

    /// Creates a Hadamard gate.
    pub fn h() -> Gate {
        let factor = 1.0 / 2.0_f64.sqrt();
        Gate::from_literal([[factor, factor], [factor, -factor]])
    }

    /// Creates a CNOT (Controlled-NOT) gate, control on the first qubit.
    pub fn cnot() -> Gate {
        Gate {
            matrix: utils::expand_operator(2, &Gate::x().matrix, &[1], &[0]),
            num_qubits: 2,
        }
    }
}
