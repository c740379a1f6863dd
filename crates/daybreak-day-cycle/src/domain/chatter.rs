//! Ambient chatter: random lines spoken at random intervals, never the same
//! line twice in a row.

use daybreak_core::assets::DialogueLine;
use daybreak_core::rng::DeterministicRng;
use serde::{Deserialize, Serialize};

/// Draws allowed before giving up on finding a different line.
pub const MAX_REJECTION_DRAWS: usize = 16;

/// Chatter lines and their timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatterConfig {
    /// Shortest gap between lines, in seconds.
    #[serde(default = "default_min_interval")]
    pub min_interval: f32,
    /// Longest gap between lines, in seconds.
    #[serde(default = "default_max_interval")]
    pub max_interval: f32,
    /// Candidate lines.
    #[serde(default)]
    pub lines: Vec<DialogueLine>,
}

const fn default_min_interval() -> f32 {
    8.0
}

const fn default_max_interval() -> f32 {
    15.0
}

impl Default for ChatterConfig {
    fn default() -> Self {
        Self {
            min_interval: default_min_interval(),
            max_interval: default_max_interval(),
            lines: Vec::new(),
        }
    }
}

/// Running chatter timer with last-line memory.
#[derive(Debug, Clone)]
pub struct Chatter {
    config: ChatterConfig,
    last: Option<usize>,
    until_next: f32,
}

impl Chatter {
    /// Starts the timer with a freshly sampled interval.
    #[must_use]
    pub fn new(config: ChatterConfig, rng: &mut dyn DeterministicRng) -> Self {
        let mut chatter = Self {
            config,
            last: None,
            until_next: 0.0,
        };
        chatter.until_next = chatter.sample_interval(rng);
        chatter
    }

    /// Uniform interval in `[min_interval, max_interval]`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample_interval(&self, rng: &mut dyn DeterministicRng) -> f32 {
        let lo = self.config.min_interval.min(self.config.max_interval).max(0.0);
        let hi = self.config.max_interval.max(self.config.min_interval).max(0.0);
        let t = rng.next_f64().clamp(0.0, 1.0) as f32;
        (hi - lo).mul_add(t, lo)
    }

    /// Picks the index of the next line.
    ///
    /// With two or more candidates the previous index is rejected and
    /// redrawn, up to `MAX_REJECTION_DRAWS` times, after which the line
    /// following the previous one is used.
    pub fn pick(&mut self, rng: &mut dyn DeterministicRng) -> Option<usize> {
        let count = self.config.lines.len();
        let index = match (count, self.last) {
            (0, _) => return None,
            (1, _) => 0,
            (_, None) => draw(rng, count),
            (_, Some(last)) => (0..MAX_REJECTION_DRAWS)
                .map(|_| draw(rng, count))
                .find(|index| *index != last)
                .unwrap_or((last + 1) % count),
        };
        self.last = Some(index);
        Some(index)
    }

    /// Counts down by `dt`. Returns `true` when the interval ran out, after
    /// re-arming the timer. The caller decides whether a line is spoken.
    pub fn tick(&mut self, dt: f32, rng: &mut dyn DeterministicRng) -> bool {
        self.until_next -= dt.max(0.0);
        if self.until_next > 0.0 {
            return false;
        }
        self.until_next = self.sample_interval(rng);
        true
    }

    /// Picks the line to speak now and remembers it as the previous one.
    pub fn next_line(&mut self, rng: &mut dyn DeterministicRng) -> Option<DialogueLine> {
        let index = self.pick(rng)?;
        self.config.lines.get(index).cloned()
    }

    /// Seconds until the next line.
    #[must_use]
    pub const fn until_next(&self) -> f32 {
        self.until_next
    }

    /// Index of the most recent line, if any.
    #[must_use]
    pub const fn last(&self) -> Option<usize> {
        self.last
    }
}

fn draw(rng: &mut dyn DeterministicRng, count: usize) -> usize {
    let max = u32::try_from(count - 1).unwrap_or(u32::MAX);
    usize::try_from(rng.next_u32_range(0, max)).map_or(count - 1, |i| i.min(count - 1))
}

#[cfg(test)]
mod tests {
    use daybreak_test_support::{MockRng, SequenceRng};

    use super::*;

    fn config(lines: usize) -> ChatterConfig {
        ChatterConfig {
            min_interval: 4.0,
            max_interval: 8.0,
            lines: (0..lines)
                .map(|i| DialogueLine::new(format!("line {i}"), 2.0))
                .collect(),
        }
    }

    #[test]
    fn test_interval_is_sampled_between_bounds() {
        let mut rng = SequenceRng::new(vec![]).with_floats(vec![0.5]);

        let chatter = Chatter::new(config(3), &mut rng);

        assert!((chatter.until_next() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_previous_line_is_rejected_and_redrawn() {
        // Arrange: first pick 1, then the rng offers 1 twice before 2.
        let mut rng = SequenceRng::new(vec![1, 1, 1, 2]);
        let mut chatter = Chatter::new(config(3), &mut MockRng);

        // Act
        let first = chatter.pick(&mut rng);
        let second = chatter.pick(&mut rng);

        // Assert
        assert_eq!(first, Some(1));
        assert_eq!(second, Some(2));
        assert_eq!(rng.draws(), 4);
    }

    #[test]
    fn test_rejection_gives_up_after_cap() {
        // Arrange: an rng stuck on index 0.
        let mut rng = SequenceRng::new(vec![0; 1 + MAX_REJECTION_DRAWS]);
        let mut chatter = Chatter::new(config(3), &mut MockRng);
        chatter.pick(&mut rng);

        // Act
        let next = chatter.pick(&mut rng);

        // Assert
        assert_eq!(next, Some(1));
        assert_eq!(rng.draws(), 1 + MAX_REJECTION_DRAWS);
    }

    #[test]
    fn test_single_line_repeats_without_drawing() {
        let mut rng = SequenceRng::new(vec![]);
        let mut chatter = Chatter::new(config(1), &mut MockRng);

        assert_eq!(chatter.pick(&mut rng), Some(0));
        assert_eq!(chatter.pick(&mut rng), Some(0));
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_no_lines_means_no_pick() {
        let mut chatter = Chatter::new(config(0), &mut MockRng);

        assert_eq!(chatter.pick(&mut MockRng), None);
    }

    #[test]
    fn test_tick_speaks_when_interval_elapses() {
        // Arrange: MockRng gives interval 4.0 and index 0.
        let mut rng = MockRng;
        let mut chatter = Chatter::new(config(2), &mut rng);

        // Act
        let early = chatter.tick(3.0, &mut rng);
        let due = chatter.tick(1.0, &mut rng);
        let line = chatter.next_line(&mut rng);

        // Assert
        assert!(!early);
        assert!(due);
        assert_eq!(line.map(|l| l.text), Some("line 0".to_owned()));
        assert!((chatter.until_next() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_elapsed_interval_without_a_line_keeps_the_previous_pick() {
        // Arrange
        let mut rng = MockRng;
        let mut chatter = Chatter::new(config(2), &mut rng);
        chatter.tick(4.0, &mut rng);
        chatter.next_line(&mut rng);

        // Act
        let due = chatter.tick(4.0, &mut rng);

        // Assert
        assert!(due);
        assert_eq!(chatter.last(), Some(0));
    }

    #[test]
    fn test_seeded_chatter_never_repeats_consecutively() {
        let mut rng = daybreak_core::rng::SeededRng::new(7);
        let mut chatter = Chatter::new(config(4), &mut rng);

        let picks: Vec<usize> = (0..200).filter_map(|_| chatter.pick(&mut rng)).collect();

        assert!(picks.windows(2).all(|w| w[0] != w[1]));
    }
}
