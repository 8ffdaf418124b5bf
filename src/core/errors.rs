use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    #[error("Matrix is not Unitary (U†U != I)")]
    NonUnitary,

    #[error("Matrix must be square")]
    NotSquareMatrix,

    #[error("Invalid Dimensions")]
    InvalidDimensions,

    #[error("Qubit {0} cannot be both control and target")]
    ControlTargetOverlap(usize),

    #[error("Duplicate qubit index found: {0}")]
    DuplicateQubit(usize),

    #[error("Qubit index {index} out of range for a {num_qubits}-qubit operator")]
    QubitOutOfRange { index: usize, num_qubits: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error("Vector is not normalized. Norm squared: {0}")]
    NotNormalized(f64),

    #[error("State has zero norm and cannot describe a qubit")]
    ZeroNorm,

    #[error("Invalid dimensions: length must be a power of two")]
    InvalidDimensions,

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Qubit index {index} out of bounds for a {num_qubits}-qubit state")]
    IndexOutOfBounds { index: usize, num_qubits: usize },

    #[error("Duplicate qubit index found: {0}")]
    DuplicateQubit(usize),

    #[error("Gate error: {0}")]
    Gate(#[from] GateError),
}
