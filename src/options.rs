/// Default chance that a node gets promoted one more level.
pub const DEFAULT_PROBABILITY: f64 = 0.25;

/// The capacity the default max level is sized for.
pub const DEFAULT_CAPACITY: usize = 100_000;

/// Hard cap on the max level. With p = 0.5 this is sized for 2^33 items; a
/// bigger value would only waste sentinel and cursor space.
pub const MAX_LEVEL_CAP: usize = 32;

/// Construction parameters shared by every container in the crate.
///
/// `max_level` is the highest level a node can be drawn at (levels are 0
/// based, so sentinels have `max_level + 1` lanes). The fields are only set
/// through the constructors, which validate them:
///
/// ```compile_fail
/// use skiplists::Options;
///
/// let options = Options { probability: 1.5, max_level: 1000 };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
    probability: f64,
    max_level: usize,
}

impl Options {
    /// # Panics
    ///
    /// Panics if `probability` is not strictly between 0 and 1 or if
    /// `max_level` is larger than [`MAX_LEVEL_CAP`].
    pub fn new(probability: f64, max_level: usize) -> Self {
        assert!(
            probability > 0.0 && probability < 1.0,
            "probability must be in (0, 1), got {}",
            probability
        );
        assert!(
            max_level <= MAX_LEVEL_CAP,
            "max level {} is above the cap of {}",
            max_level,
            MAX_LEVEL_CAP
        );
        Options { probability, max_level }
    }

    /// Chance that a node gets promoted one more level.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Options with the default probability and a max level sized for about
    /// `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::sized(DEFAULT_PROBABILITY, capacity)
    }

    /// Options with the given probability, sized for the default capacity.
    pub fn with_probability(probability: f64) -> Self {
        Self::sized(probability, DEFAULT_CAPACITY)
    }

    /// `max_level = ceil(ln(capacity) / ln(1/p)) - 1`.
    pub fn sized(probability: f64, capacity: usize) -> Self {
        let checked = Self::new(probability, 0);
        if capacity <= 1 {
            return checked;
        }
        let levels = ((capacity as f64).ln() / (1.0 / probability).ln()).ceil() as usize;
        let max_level = levels.saturating_sub(1).min(MAX_LEVEL_CAP);
        Options { max_level, ..checked }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sized_for_capacity() {
        let opts = Options::default();
        assert_eq!(opts.probability(), 0.25);
        // ln(100000) / ln(4) = 8.3, rounded up, minus one.
        assert_eq!(opts.max_level(), 8);
    }

    #[test]
    fn tiny_capacities() {
        assert_eq!(Options::with_capacity(0).max_level(), 0);
        assert_eq!(Options::with_capacity(1).max_level(), 0);
        assert_eq!(Options::sized(0.5, 2).max_level(), 0);
        assert_eq!(Options::sized(0.5, 1000).max_level(), 9);
    }

    #[test]
    fn huge_capacity_is_capped() {
        assert_eq!(Options::sized(0.99, usize::max_value()).max_level(), MAX_LEVEL_CAP);
    }

    #[test]
    #[should_panic]
    fn bad_probability() {
        Options::new(1.0, 4);
    }

    #[test]
    #[should_panic]
    fn max_level_over_the_cap() {
        Options::new(0.5, MAX_LEVEL_CAP + 1);
    }

    #[test]
    fn accessors() {
        let opts = Options::new(0.5, MAX_LEVEL_CAP);
        assert_eq!(opts.probability(), 0.5);
        assert_eq!(opts.max_level(), MAX_LEVEL_CAP);
    }
}
