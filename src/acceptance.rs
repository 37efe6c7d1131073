//! Dispersion acceptance test.
//!
//! A partition is balanced enough when no group spreads out more than the
//! herd as a whole, scaled by the operator's threshold:
//!
//! ```text
//! accept  ⇔  ∀ i: σ(groupᵢ) ≤ σ(all samples pooled) × threshold
//! ```
//!
//! Both the single-pipeline and the sex-aware pipeline call [`accepts`]
//! so the two paths cannot drift apart.

use crate::partition::Partition;
use crate::stats::{dispersion, pooled_dispersion};

/// Relative slack on the bound. Per-group and pooled dispersions are
/// accumulated in different orders and can disagree in the last few bits
/// for groups of identical composition.
const RELATIVE_TOLERANCE: f64 = 1e-12;

/// Per-group dispersions of one candidate and the bound they are held to.
#[derive(Debug, Clone, PartialEq)]
pub struct DispersionReport {
    /// Population std of each group, in group order.
    pub group_dispersions: Vec<f64>,
    /// Population std of every sample pooled across groups.
    pub reference: f64,
    /// `reference × threshold`.
    pub bound: f64,
}

impl DispersionReport {
    /// Computes the report for `partition` against `threshold`.
    pub fn evaluate(partition: &Partition, threshold: f64) -> Self {
        let groups = partition.groups();
        let reference = pooled_dispersion(groups);
        Self {
            group_dispersions: groups.iter().map(|g| dispersion(g)).collect(),
            reference,
            bound: reference * threshold,
        }
    }

    /// `true` when every group stays within the bound.
    ///
    /// A NaN dispersion never satisfies the bound.
    pub fn accepted(&self) -> bool {
        self.first_violation().is_none()
    }

    /// Largest group dispersion, `0.0` when there are no groups.
    pub fn worst(&self) -> f64 {
        self.group_dispersions.iter().copied().fold(0.0, f64::max)
    }

    /// Index of the first group exceeding the bound, if any.
    pub fn first_violation(&self) -> Option<usize> {
        let limit = self.bound + self.bound.abs() * RELATIVE_TOLERANCE;
        self.group_dispersions.iter().position(|&sd| !(sd <= limit))
    }
}

/// Decides whether `partition` is balanced enough for `threshold`.
///
/// # Examples
/// ```
/// use animal_grouper::acceptance::accepts;
/// use animal_grouper::partition::Partition;
/// let interleaved = Partition::new(vec![vec![10.0, 13.0], vec![11.0, 12.0]]);
/// assert!(accepts(&interleaved, 1.5));
/// let split = Partition::new(vec![vec![10.0, 10.0], vec![13.0, 99.0]]);
/// assert!(!accepts(&split, 1.0));
/// ```
pub fn accepts(partition: &Partition, threshold: f64) -> bool {
    DispersionReport::evaluate(partition, threshold).accepted()
}
