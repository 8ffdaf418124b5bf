//! Linear-algebra helpers for state-vector simulation.
//!
//! This module contains helper functions for:
//! - Kronecker (tensor) products of matrices and state vectors.
//! - Normalization of state vectors.
//! - Expansion of local operators to the full register.
//! - Bit manipulation for basis-state indices.
//!
//! Qubit 0 is always the most significant bit of a basis index, so the basis
//! state `|q0 q1 q2>` lives at index `q0*4 + q1*2 + q2`.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// Computes the Kronecker (Tensor) product of two matrices.
///
/// If `A` is an $m \times n$ matrix and `B` is a $p \times q$ matrix,
/// the result is an $mp \times nq$ matrix.
pub fn kronecker_product(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    let (m, n) = a.dim();
    let (p, q) = b.dim();

    Array2::from_shape_fn((m * p, n * q), |(row, col)| {
        a[[row / p, col / q]] * b[[row % p, col % q]]
    })
}

/// Kronecker product of two state vectors.
fn kronecker_vector(a: &Array1<Complex64>, b: &Array1<Complex64>) -> Array1<Complex64> {
    let width = b.len();
    Array1::from_shape_fn(a.len() * width, |i| a[i / width] * b[i % width])
}

/// Iterated Kronecker product of `factors`, left to right.
///
/// A single factor is returned unchanged. An empty list yields the $1 \times 1$
/// identity, the unit of the product.
pub fn tensor(factors: &[&Array2<Complex64>]) -> Array2<Complex64> {
    match factors.split_first() {
        None => Array2::eye(1),
        Some((first, rest)) => rest
            .iter()
            .fold((*first).clone(), |acc, m| kronecker_product(&acc, m)),
    }
}

/// Iterated Kronecker product of state vectors, left to right.
pub fn tensor_states(factors: &[&Array1<Complex64>]) -> Array1<Complex64> {
    match factors.split_first() {
        None => Array1::from_elem(1, Complex64::new(1.0, 0.0)),
        Some((first, rest)) => rest
            .iter()
            .fold((*first).clone(), |acc, v| kronecker_vector(&acc, v)),
    }
}

/// Largest $|a_i|$. `Complex64::norm` goes through `hypot`, so it stays
/// finite for any finite amplitude.
fn max_magnitude(vector: &Array1<Complex64>) -> f64 {
    vector.iter().map(|c| c.norm()).fold(0.0, f64::max)
}

/// Euclidean norm $\|v\|_2$, scaled by the largest magnitude so squaring
/// neither overflows for huge amplitudes nor flushes tiny ones to zero.
pub fn norm(vector: &Array1<Complex64>) -> f64 {
    let scale = max_magnitude(vector);
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let scaled_sqr: f64 = vector.iter().map(|c| (*c / scale).norm_sqr()).sum();
    scale * scaled_sqr.sqrt()
}

/// Returns `vector / ‖vector‖`.
///
/// A vector whose norm is exactly zero is returned unchanged, as is one with a
/// non-finite component.
pub fn normalize(vector: &Array1<Complex64>) -> Array1<Complex64> {
    let scale = max_magnitude(vector);
    if scale == 0.0 || !scale.is_finite() {
        return vector.clone();
    }
    let scaled = vector.mapv(|c| c / scale);
    let norm = norm(&scaled);
    scaled.mapv(|c| c / norm)
}

/// Generates the full operator matrix ($2^N \times 2^N$) for the whole register.
///
/// The local `matrix` acts on `targets` (in the given order, `targets[0]` being
/// the most significant qubit of the local operator) and only on basis states
/// where every qubit in `controls` is 1. Identity everywhere else. For
/// contiguous ascending targets and no controls this equals
/// `tensor(I, .., matrix, .., I)`.
///
/// Callers validate indices and duplicates beforehand, as
/// [`Gate::expand_gate`](crate::Gate::expand_gate) does.
///
/// # Panics
///
/// Panics if any index in `targets` or `controls` is `>= num_total_qubits`.
pub fn expand_operator(
    num_total_qubits: usize,
    matrix: &Array2<Complex64>,
    targets: &[usize],
    controls: &[usize],
) -> Array2<Complex64> {
    let dim = 1 << num_total_qubits;
    let mut full_matrix = Array2::<Complex64>::zeros((dim, dim));

    let control_mask = controls
        .iter()
        .fold(0usize, |mask, &c| mask | qubit_mask(num_total_qubits, c));
    let target_mask = targets
        .iter()
        .fold(0usize, |mask, &t| mask | qubit_mask(num_total_qubits, t));
    let passive_mask = !target_mask;

    for col_idx in 0..dim {
        if (col_idx & control_mask) != control_mask {
            full_matrix[[col_idx, col_idx]] = Complex64::new(1.0, 0.0);
            continue;
        }

        let small_col = extract_bits(col_idx, num_total_qubits, targets);
        for small_row in 0..matrix.nrows() {
            let row_idx =
                (col_idx & passive_mask) | deposit_bits(small_row, num_total_qubits, targets);
            full_matrix[[row_idx, col_idx]] = matrix[[small_row, small_col]];
        }
    }
    full_matrix
}

/// Single-bit mask of qubit `qubit` inside a basis index of a `num_qubits` register.
pub(crate) fn qubit_mask(num_qubits: usize, qubit: usize) -> usize {
    1 << (num_qubits - 1 - qubit)
}

/// Gathers the bits of `value` at the positions of `qubits` into a compact
/// index, `qubits[0]` becoming the most significant bit.
pub(crate) fn extract_bits(value: usize, num_qubits: usize, qubits: &[usize]) -> usize {
    let width = qubits.len();
    qubits
        .iter()
        .enumerate()
        .filter(|&(_, &q)| value & qubit_mask(num_qubits, q) != 0)
        .fold(0, |acc, (i, _)| acc | 1 << (width - 1 - i))
}

/// Inverse of [`extract_bits`]: scatters `compact_value` onto the positions of `qubits`.
pub(crate) fn deposit_bits(compact_value: usize, num_qubits: usize, qubits: &[usize]) -> usize {
    let width = qubits.len();
    qubits
        .iter()
        .enumerate()
        .filter(|&(i, _)| (compact_value >> (width - 1 - i)) & 1 == 1)
        .fold(0, |acc, (_, &q)| acc | qubit_mask(num_qubits, q))
}

/// Find duplicate in a slice of usize
pub fn find_duplicate(indices: &[usize]) -> Option<usize> {
    let mut seen = std::collections::HashSet::new();
    indices.iter().find(|&&idx| !seen.insert(idx)).copied()
}

/// Checks $U U^\dagger = I$ within `tol`.
pub fn is_unitary(matrix: &Array2<Complex64>, tol: f64) -> bool {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return false;
    }
    let eye = Array2::<Complex64>::eye(rows);
    let u_dagger = matrix.t().mapv(|x| x.conj());
    matrix
        .dot(&u_dagger)
        .iter()
        .zip(eye.iter())
        .all(|(a, b)| (a - b).norm() < tol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    fn assert_close(a: &Array2<Complex64>, b: &Array2<Complex64>) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).norm() < 1e-12, "{x} != {y}");
        }
    }

    #[test]
    fn test_kronecker_dimensions_and_blocks() {
        let a = array![[c(1.0), c(2.0)], [c(3.0), c(4.0)]];
        let b = array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]];
        let k = kronecker_product(&a, &b);

        assert_eq!(k.dim(), (4, 4));
        // Top-right block is 2 * b
        assert_eq!(k[[0, 3]], c(2.0));
        assert_eq!(k[[1, 2]], c(2.0));
        // Bottom-left block is 3 * b
        assert_eq!(k[[2, 1]], c(3.0));
        assert_eq!(k[[3, 3]], c(0.0));
    }

    #[test]
    fn test_tensor_single_factor_is_identity_operation() {
        let a = array![[c(1.0), c(2.0)], [c(3.0), c(4.0)]];
        assert_close(&tensor(&[&a]), &a);
    }

    #[test]
    fn test_tensor_is_associative() {
        let a = array![[c(1.0), c(2.0)], [c(3.0), c(4.0)]];
        let b = array![[c(0.5), Complex64::new(0.0, 1.0)], [c(-1.0), c(2.0)]];
        let d = array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]];

        let left = kronecker_product(&kronecker_product(&a, &b), &d);
        let right = kronecker_product(&a, &kronecker_product(&b, &d));
        assert_close(&left, &right);
        assert_close(&tensor(&[&a, &b, &d]), &left);
    }

    #[test]
    fn test_tensor_states_orders_qubit_zero_first() {
        let zero = array![c(1.0), c(0.0)];
        let one = array![c(0.0), c(1.0)];
        let state = tensor_states(&[&one, &zero, &zero]);
        assert_eq!(state.len(), 8);
        assert_eq!(state[4], c(1.0));
        assert_eq!(norm(&state), 1.0);
    }

    #[test]
    fn test_normalize_zero_vector_is_unchanged() {
        let zeros = Array1::<Complex64>::zeros(4);
        assert_eq!(normalize(&zeros), zeros);
    }

    #[test]
    fn test_normalize_scales_to_unit_norm() {
        let v = array![c(3.0), Complex64::new(0.0, 4.0)];
        let n = normalize(&v);
        assert!((norm(&n) - 1.0).abs() < 1e-12);
        assert!((n[0] - c(0.6)).norm() < 1e-12);
        assert!((n[1] - Complex64::new(0.0, 0.8)).norm() < 1e-12);
    }

    #[test]
    fn test_normalize_huge_finite_amplitudes() {
        let v = array![Complex64::new(1e200, 0.0), Complex64::new(0.0, 1e200)];
        let n = normalize(&v);
        let h = 1.0 / 2.0_f64.sqrt();
        assert!((norm(&n) - 1.0).abs() < 1e-12);
        assert!((n[0] - c(h)).norm() < 1e-12);
        assert!((n[1] - Complex64::new(0.0, h)).norm() < 1e-12);

        let extreme = array![c(1e308), c(-1e308)];
        assert!((norm(&normalize(&extreme)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_tiny_amplitudes() {
        let v = array![c(3e-200), c(4e-200)];
        let n = normalize(&v);
        assert!((n[0] - c(0.6)).norm() < 1e-12);
        assert!((n[1] - c(0.8)).norm() < 1e-12);
    }

    #[test]
    fn test_norm_does_not_overflow() {
        let v = array![c(3e300), c(4e300)];
        let n = norm(&v);
        assert!(n.is_finite());
        assert!((n / 5e300 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_expand_matches_identity_padding() {
        let h = 1.0 / 2.0_f64.sqrt();
        let hadamard = array![[c(h), c(h)], [c(h), c(-h)]];
        let eye: Array2<Complex64> = Array2::eye(2);

        assert_close(
            &expand_operator(3, &hadamard, &[0], &[]),
            &tensor(&[&hadamard, &eye, &eye]),
        );
        assert_close(
            &expand_operator(3, &hadamard, &[2], &[]),
            &tensor(&[&eye, &eye, &hadamard]),
        );
    }

    #[test]
    fn test_expand_controlled_x_builds_cnot() {
        let x = array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]];
        let cnot = expand_operator(2, &x, &[1], &[0]);
        let expected = array![
            [c(1.0), c(0.0), c(0.0), c(0.0)],
            [c(0.0), c(1.0), c(0.0), c(0.0)],
            [c(0.0), c(0.0), c(0.0), c(1.0)],
            [c(0.0), c(0.0), c(1.0), c(0.0)]
        ];
        assert_close(&cnot, &expected);
    }

    #[test]
    fn test_expand_two_qubit_gate_on_reversed_targets() {
        let x = array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]];
        let cnot = expand_operator(2, &x, &[1], &[0]);
        // CNOT with control on qubit 2 and target qubit 0 of a 3-qubit register
        let full = expand_operator(3, &cnot, &[2, 0], &[]);
        assert!(is_unitary(&full, 1e-12));
        // |001> -> |101>
        assert_eq!(full[[5, 1]], c(1.0));
        // |100> stays put
        assert_eq!(full[[4, 4]], c(1.0));
    }

    #[test]
    fn test_bit_helpers_round_trip() {
        let qubits = [2, 0];
        let compact = extract_bits(0b101, 3, &qubits);
        assert_eq!(compact, 0b11);
        assert_eq!(extract_bits(0b001, 3, &qubits), 0b10);
        assert_eq!(deposit_bits(0b10, 3, &qubits), 0b001);
    }

    #[test]
    fn test_find_duplicate() {
        assert_eq!(find_duplicate(&[0, 1, 2]), None);
        assert_eq!(find_duplicate(&[0, 1, 0]), Some(0));
    }
}
