//! Dispersion statistics for weight groups.
//!
//! Every balance decision in this crate reduces to a population standard
//! deviation, either of one group or of all groups pooled together. The
//! functions here compute it with numerically stable algorithms so that
//! heavy animals (large weights with small differences) do not lose
//! precision to catastrophic cancellation.
//!
//! # Algorithms
//!
//! - **Variance**: Welford's online algorithm, with Chan's pairwise merge
//!   for pooling several groups without re-reading their samples.
//!   Reference: Welford (1962), *Technometrics* 4(3); Chan, Golub &
//!   LeVeque (1979), "Updating Formulae and a Pairwise Algorithm for
//!   Computing Sample Variances".

/// Population standard deviation used as the balance metric of a group.
///
/// An empty group has dispersion `0.0` rather than no value: a group with
/// zero or one animal is perfectly balanced by definition.
///
/// Non-finite samples propagate as NaN.
///
/// # Examples
/// ```
/// use animal_grouper::stats::dispersion;
/// assert_eq!(dispersion(&[]), 0.0);
/// assert_eq!(dispersion(&[31.5]), 0.0);
/// assert!((dispersion(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-12);
/// ```
pub fn dispersion(data: &[f64]) -> f64 {
    DispersionAccumulator::from_slice(data).population_std_dev()
}

/// Population standard deviation of all `groups` pooled together,
/// ignoring group boundaries.
///
/// Each group is accumulated on its own and the accumulators are merged,
/// so the result matches [`dispersion`] of the concatenated samples up to
/// rounding in the last few bits.
///
/// # Examples
/// ```
/// use animal_grouper::stats::{dispersion, pooled_dispersion};
/// let groups = vec![vec![10.0, 14.0], vec![12.0], vec![]];
/// let flat = [10.0, 14.0, 12.0];
/// assert!((pooled_dispersion(&groups) - dispersion(&flat)).abs() < 1e-12);
/// ```
pub fn pooled_dispersion<G: AsRef<[f64]>>(groups: &[G]) -> f64 {
    groups
        .iter()
        .map(|g| DispersionAccumulator::from_slice(g.as_ref()))
        .fold(DispersionAccumulator::new(), |mut acc, next| {
            acc.merge(&next);
            acc
        })
        .population_std_dev()
}

// ---------------------------------------------------------------------------
// Welford accumulator
// ---------------------------------------------------------------------------

/// Streaming mean/variance accumulator with a parallel-friendly merge.
///
/// # Examples
/// ```
/// use animal_grouper::stats::DispersionAccumulator;
/// let mut female = DispersionAccumulator::from_slice(&[2.0, 4.0, 4.0, 4.0]);
/// let male = DispersionAccumulator::from_slice(&[5.0, 5.0, 7.0, 9.0]);
/// female.merge(&male);
/// assert_eq!(female.count(), 8);
/// assert!((female.population_std_dev() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DispersionAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
}

impl DispersionAccumulator {
    /// Creates a new empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an accumulator over every value of `data`.
    pub fn from_slice(data: &[f64]) -> Self {
        let mut acc = Self::new();
        for &x in data {
            acc.update(x);
        }
        acc
    }

    /// Feeds a new sample into the accumulator.
    pub fn update(&mut self, value: f64) {
        let n1 = self.count;
        self.count += 1;

        if n1 == 0 {
            self.mean_acc = value;
            return;
        }

        let delta = value - self.mean_acc;
        self.mean_acc += delta / self.count as f64;
        self.m2 += delta * (value - self.mean_acc);
    }

    /// Returns the number of samples seen so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the population variance, or `None` if no samples have been
    /// added.
    pub fn population_variance(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            let var = self.m2 / self.count as f64;
            // m2 can dip below zero by a few ulps on constant input.
            Some(if var < 0.0 { 0.0 } else { var })
        }
    }

    /// Returns the population standard deviation, `0.0` when empty.
    pub fn population_std_dev(&self) -> f64 {
        self.population_variance().map_or(0.0, f64::sqrt)
    }

    /// Merges another accumulator into this one (Chan's pairwise update).
    pub fn merge(&mut self, other: &DispersionAccumulator) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }
        let na = self.count as f64;
        let nb = other.count as f64;
        let total = self.count + other.count;
        let n = total as f64;
        let delta = other.mean_acc - self.mean_acc;

        self.mean_acc += delta * (nb / n);
        self.m2 += other.m2 + delta * delta * na * nb / n;
        self.count = total;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
