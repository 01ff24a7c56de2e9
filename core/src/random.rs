use rand::Rng;

/// Source of uniform values in `[0, 1)` used for every random decision the
/// responder makes. Swap in [`SequenceRandom`] to make replies deterministic.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform index into a collection of `len` elements. `len` must be > 0.
    fn pick_index(&mut self, len: usize) -> usize {
        let idx = (self.next_unit() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }

    /// Uniform integer in `low..=high`.
    fn int_in_range(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        let span = i64::from(high) - i64::from(low) + 1;
        let offset = ((self.next_unit() * span as f64) as i64).min(span - 1);
        (i64::from(low) + offset) as i32
    }
}

/// Thread-local OS-seeded generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        rand::thread_rng().r#gen::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    position: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values: Vec<f64> = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 0.999_999_999))
            .collect();
        Self {
            values,
            position: 0,
        }
    }

    /// Always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::{RandomSource, SequenceRandom, ThreadRandom};

    #[test]
    fn sequence_cycles_through_values() {
        let mut rng = SequenceRandom::new(vec![0.1, 0.5]);
        assert_eq!(rng.next_unit(), 0.1);
        assert_eq!(rng.next_unit(), 0.5);
        assert_eq!(rng.next_unit(), 0.1);
    }

    #[test]
    fn pick_index_stays_in_bounds() {
        let mut rng = SequenceRandom::new(vec![0.0, 0.5, 0.999_999]);
        assert_eq!(rng.pick_index(4), 0);
        assert_eq!(rng.pick_index(4), 2);
        assert_eq!(rng.pick_index(4), 3);
    }

    #[test]
    fn int_in_range_covers_both_ends() {
        let mut low = SequenceRandom::constant(0.0);
        let mut high = SequenceRandom::constant(1.0);
        assert_eq!(low.int_in_range(-20, 30), -20);
        assert_eq!(high.int_in_range(-20, 30), 30);
    }

    #[test]
    fn thread_random_produces_unit_values() {
        let mut rng = ThreadRandom;
        for _ in 0..1_000 {
            let value = rng.next_unit();
            assert!((0.0..1.0).contains(&value));
        }
    }
}
