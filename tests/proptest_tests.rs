//! Property-based tests for the simulation engine.
//!
//! These use proptest to check norm preservation, tensor associativity and
//! teleportation fidelity across arbitrary inputs.

use ndarray::Array2;
use num_complex::Complex64;
use proptest::prelude::*;
use qteleport::utils::{kronecker_product, tensor};
use qteleport::{Amplitudes, Gate, RngSource, StateVector, Teleporter};

fn complex_strategy() -> impl Strategy<Value = Complex64> {
    (-10.0..10.0f64, -10.0..10.0f64).prop_map(|(re, im)| Complex64::new(re, im))
}

// At least one amplitude kept clear of zero so the qubit is well defined
fn amplitudes_strategy() -> impl Strategy<Value = Amplitudes> {
    (complex_strategy(), complex_strategy())
        .prop_filter("non-zero qubit", |(a, b)| a.norm() + b.norm() > 1e-3)
        .prop_map(|(alpha, beta)| Amplitudes::new(alpha, beta))
}

fn matrix_strategy(rows: usize, cols: usize) -> impl Strategy<Value = Array2<Complex64>> {
    prop::collection::vec(complex_strategy(), rows * cols)
        .prop_map(move |data| Array2::from_shape_vec((rows, cols), data).unwrap())
}

fn gate_strategy() -> impl Strategy<Value = Gate> {
    prop_oneof![
        Just(Gate::i()),
        Just(Gate::x()),
        Just(Gate::z()),
        Just(Gate::h()),
        Just(Gate::correction(true, true)),
    ]
}

proptest! {
    /// Property: initialization yields unit-norm ψ and register
    #[test]
    fn initialize_is_normalized(amplitudes in amplitudes_strategy()) {
        let mut teleporter = Teleporter::with_source(RngSource::seeded(0));
        let init = teleporter.initialize_with(amplitudes).unwrap();
        prop_assert!((init.psi.norm() - 1.0).abs() < 1e-9);
        prop_assert!((init.state.norm() - 1.0).abs() < 1e-9);
        prop_assert_eq!(init.state.dim(), 8);
    }

    /// Property: tensor(tensor(A, B), C) == tensor(A, tensor(B, C))
    #[test]
    fn tensor_is_associative(
        a in matrix_strategy(2, 2),
        b in matrix_strategy(1, 2),
        c in matrix_strategy(2, 1),
    ) {
        let left = kronecker_product(&kronecker_product(&a, &b), &c);
        let right = kronecker_product(&a, &kronecker_product(&b, &c));
        let iterated = tensor(&[&a, &b, &c]);
        prop_assert_eq!(left.dim(), right.dim());
        for ((l, r), t) in left.iter().zip(right.iter()).zip(iterated.iter()) {
            prop_assert!((l - r).norm() < 1e-9);
            prop_assert!((l - t).norm() < 1e-9);
        }
    }

    /// Property: single-qubit gates on any qubit and CNOT on any ordered pair preserve the norm
    #[test]
    fn gates_preserve_norm(
        amplitudes in amplitudes_strategy(),
        gate in gate_strategy(),
        target in 0usize..3,
        control in 0usize..3,
        offset in 1usize..3,
    ) {
        let psi = StateVector::qubit(amplitudes.alpha, amplitudes.beta).unwrap();
        let mut state = psi.tensor(&StateVector::bell_pair());

        state.apply(&gate, &[target]).unwrap();
        state.apply(&Gate::cnot(), &[control, (control + offset) % 3]).unwrap();
        prop_assert!((state.norm() - 1.0).abs() < 1e-9);
    }

    /// Property: teleportation reproduces ψ up to global phase for any seed
    #[test]
    fn teleportation_has_unit_fidelity(amplitudes in amplitudes_strategy(), seed in any::<u64>()) {
        let mut teleporter = Teleporter::with_source(RngSource::seeded(seed));
        teleporter.initialize_with(amplitudes).unwrap();
        teleporter.alice_ops().unwrap();
        teleporter.measure().unwrap();
        let report = teleporter.bob_correction().unwrap();

        prop_assert!((report.fidelity - 1.0).abs() < 1e-9, "fidelity {}", report.fidelity);
        prop_assert!(report.teleported);
    }
}
