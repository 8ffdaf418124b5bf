//! Partial measurement in the computational basis.
//!
//! Measuring a subset of qubits groups the $2^n$ basis indices by the values of
//! the measured qubits, samples one group with probability equal to its summed
//! $|a_i|^2$, then zeroes every amplitude outside that group and renormalizes.

use crate::core::errors::StateError;
use crate::core::random::RandomSource;
use crate::core::state::StateVector;
use crate::core::utils::{extract_bits, normalize};
use tracing::debug;

/// Result of measuring a subset of qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementOutcome {
    /// Outcome index; bit `k-1-i` holds the value of the `i`-th measured qubit.
    pub index: usize,
    /// Number of measured qubits.
    pub num_measured: usize,
    /// Probability the sampled outcome had before the collapse.
    pub probability: f64,
    /// Collapsed, renormalized state.
    pub state: StateVector,
}

impl MeasurementOutcome {
    /// Value of the `i`-th measured qubit (in the order the targets were given),
    /// or `None` when fewer than `i + 1` qubits were measured.
    pub fn bit(&self, i: usize) -> Option<bool> {
        (i < self.num_measured).then(|| (self.index >> (self.num_measured - 1 - i)) & 1 == 1)
    }

    /// Outcome as a bitstring, first measured qubit leftmost.
    pub fn bitstring(&self) -> String {
        format!("{:0width$b}", self.index, width = self.num_measured)
    }
}

/// Probability of every outcome of measuring `targets`, indexed like
/// [`MeasurementOutcome::index`].
///
/// The probabilities are renormalized to sum to 1 so floating point drift in
/// the state cannot skew sampling.
pub fn outcome_probabilities(
    state: &StateVector,
    targets: &[usize],
) -> Result<Vec<f64>, StateError> {
    state.validate_qubits(targets)?;

    let num_qubits = state.num_qubits();
    let mut probs = vec![0.0; 1 << targets.len()];
    for (idx, p) in state.probabilities().into_iter().enumerate() {
        probs[extract_bits(idx, num_qubits, targets)] += p;
    }

    let total: f64 = probs.iter().sum();
    if total <= 0.0 {
        return Err(StateError::ZeroNorm);
    }
    for p in &mut probs {
        *p /= total;
    }

    Ok(probs)
}

/// Selects an index of `probs` for the uniform `roll` in `[0, 1)` by walking
/// the cumulative distribution.
///
/// Rounding can leave the cumulative sum just below 1; a roll past the end
/// falls back to the last outcome with nonzero probability.
pub fn pick_outcome(probs: &[f64], roll: f64) -> usize {
    let mut cumulative = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumulative += p;
        if roll < cumulative {
            return i;
        }
    }
    probs
        .iter()
        .rposition(|&p| p > 0.0)
        .unwrap_or_else(|| probs.len().saturating_sub(1))
}

/// Measures `targets` of `state`, returning the sampled outcome and the
/// collapsed state. `state` itself is not modified.
pub fn measure<S: RandomSource + ?Sized>(
    state: &StateVector,
    targets: &[usize],
    source: &mut S,
) -> Result<MeasurementOutcome, StateError> {
    let probs = outcome_probabilities(state, targets)?;
    let index = pick_outcome(&probs, source.next_unit());

    debug!(?probs, outcome = index, "sampled measurement outcome");

    let num_qubits = state.num_qubits();
    let mut projected = state.amplitudes().clone();
    for (idx, amp) in projected.iter_mut().enumerate() {
        if extract_bits(idx, num_qubits, targets) != index {
            *amp = num_complex::Complex64::new(0.0, 0.0);
        }
    }

    Ok(MeasurementOutcome {
        index,
        num_measured: targets.len(),
        probability: probs[index],
        state: StateVector::from_normalized(normalize(&projected)),
    })
}
