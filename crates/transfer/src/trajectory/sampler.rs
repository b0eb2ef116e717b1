//! Epoch-ordered state sampling along an evaluated trajectory.

use mga_core::state::StateVector;

use super::TransferError;
use super::legs::LegSolution;

/// Sample epochs for one leg.
///
/// The first leg includes both of its endpoints; later legs skip their
/// departure epoch, which is the arrival epoch of the previous leg.
pub fn leg_sample_epochs(
    start_s: f64,
    end_s: f64,
    samples: usize,
    include_start: bool,
) -> Vec<f64> {
    let span = end_s - start_s;
    if include_start {
        match samples {
            0 => Vec::new(),
            1 => vec![start_s],
            _ => (0..samples)
                .map(|k| {
                    if k + 1 == samples {
                        end_s
                    } else {
                        start_s + span * k as f64 / (samples - 1) as f64
                    }
                })
                .collect(),
        }
    } else {
        (0..samples)
            .map(|k| {
                if k + 1 == samples {
                    end_s
                } else {
                    start_s + span * (k + 1) as f64 / samples as f64
                }
            })
            .collect()
    }
}

/// States of the spacecraft at `samples_per_leg` epochs of every leg, in
/// increasing epoch order.
pub fn sample_legs(
    legs: &[LegSolution],
    samples_per_leg: usize,
) -> Result<Vec<(f64, StateVector)>, TransferError> {
    let mut samples = Vec::with_capacity(samples_per_leg * legs.len());
    for (leg_index, leg) in legs.iter().enumerate() {
        let epochs = leg_sample_epochs(
            leg.departure_epoch_s,
            leg.arrival_epoch_s,
            samples_per_leg,
            leg_index == 0,
        );
        for epoch in epochs {
            let state = leg
                .state_at(epoch)
                .map_err(|source| TransferError::LegComputation {
                    leg_index,
                    source: source.into(),
                })?;
            samples.push((epoch, state));
        }
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_leg_includes_both_endpoints() {
        let epochs = leg_sample_epochs(0.0, 100.0, 5, true);
        assert_eq!(epochs.len(), 5);
        assert_relative_eq!(epochs[0], 0.0);
        assert_relative_eq!(epochs[2], 50.0);
        assert_relative_eq!(epochs[4], 100.0);
    }

    #[test]
    fn later_legs_skip_their_departure_epoch() {
        let epochs = leg_sample_epochs(100.0, 200.0, 4, false);
        assert_eq!(epochs, vec![125.0, 150.0, 175.0, 200.0]);
    }

    #[test]
    fn single_sample_on_first_leg_is_the_start() {
        assert_eq!(leg_sample_epochs(10.0, 20.0, 1, true), vec![10.0]);
        assert_eq!(leg_sample_epochs(10.0, 20.0, 1, false), vec![20.0]);
    }
}
