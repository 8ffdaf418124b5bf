use crate::core::errors::StateError;
use crate::core::measurements::{outcome_probabilities, pick_outcome};
use crate::core::{RandomSource, StateVector};
use std::collections::HashMap;

/// Repeated-shot sampling of a fixed state.
///
/// Each shot measures a fresh copy of the state, so the result is the outcome
/// histogram of the measurement rather than a sequence of collapses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sampler;

impl Sampler {
    pub fn new() -> Self {
        Self
    }

    /// Measures `targets` of `state` `num_shots` times.
    ///
    /// # Returns
    ///
    /// Counts keyed by outcome bitstring (first target leftmost). Outcomes that
    /// never occurred are absent.
    pub fn run<S: RandomSource + ?Sized>(
        &self,
        state: &StateVector,
        targets: &[usize],
        num_shots: usize,
        source: &mut S,
    ) -> Result<HashMap<String, usize>, StateError> {
        let probs = outcome_probabilities(state, targets)?;

        let mut raw_counts = vec![0usize; probs.len()];
        for _ in 0..num_shots {
            raw_counts[pick_outcome(&probs, source.next_unit())] += 1;
        }

        let width = targets.len();
        Ok(raw_counts
            .into_iter()
            .enumerate()
            .filter(|&(_, count)| count > 0)
            .map(|(idx, count)| (format!("{idx:0width$b}"), count))
            .collect())
    }
}
