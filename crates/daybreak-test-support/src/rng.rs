//! Scripted random sources for chatter and dialogue-pick tests.

use std::collections::VecDeque;

use daybreak_core::rng::DeterministicRng;

/// Always draws the low end of the range and `0.0` for floats. Chatter
/// built on it picks the first line and fires on every check.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// Replays queued picks in order, ignoring the requested range.
///
/// Running out of integer picks is a test bug and panics. Float draws stick
/// on the last queued value.
#[derive(Debug, Default)]
pub struct SequenceRng {
    picks: VecDeque<u32>,
    taken: usize,
    floats: VecDeque<f64>,
}

impl SequenceRng {
    #[must_use]
    pub fn new(picks: Vec<u32>) -> Self {
        Self {
            picks: picks.into(),
            ..Self::default()
        }
    }

    /// Queues the values returned by `next_f64`.
    #[must_use]
    pub fn with_floats(mut self, floats: Vec<f64>) -> Self {
        self.floats = floats.into();
        self
    }

    /// Integer picks consumed so far.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.taken
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        let pick = self.picks.pop_front().unwrap_or_else(|| {
            panic!("SequenceRng ran dry after {} picks (range {min}..={max})", self.taken)
        });
        self.taken += 1;
        pick
    }

    fn next_f64(&mut self) -> f64 {
        if self.floats.len() > 1 {
            self.floats.pop_front().unwrap_or_default()
        } else {
            self.floats.front().copied().unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_rng_replays_picks_and_counts_draws() {
        // Arrange
        let mut rng = SequenceRng::new(vec![3, 1]);

        // Act
        let first = rng.next_u32_range(0, 9);
        let second = rng.next_u32_range(0, 9);

        // Assert
        assert_eq!((first, second), (3, 1));
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn test_sequence_rng_floats_stick_on_last_value() {
        // Arrange
        let mut rng = SequenceRng::new(vec![]).with_floats(vec![0.2, 0.7]);

        // Act
        let draws: Vec<f64> = (0..4).map(|_| rng.next_f64()).collect();

        // Assert
        assert_eq!(draws, vec![0.2, 0.7, 0.7, 0.7]);
    }

    #[test]
    fn test_sequence_rng_without_floats_draws_zero() {
        assert!(SequenceRng::new(vec![]).next_f64().abs() < f64::EPSILON);
    }

    #[test]
    #[should_panic(expected = "ran dry")]
    fn test_sequence_rng_panics_when_exhausted() {
        SequenceRng::new(vec![]).next_u32_range(0, 1);
    }
}
