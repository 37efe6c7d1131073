//! Random partitioning of weights into near-even groups.
//!
//! # Algorithm
//!
//! The input is copied, shuffled uniformly at random, and dealt out
//! round-robin: the element at shuffled position `i` goes to group
//! `i mod group_amount`. Group sizes are therefore `⌊n/g⌋` or `⌈n/g⌉`
//! and membership does not depend on the original ordering.

use rand::Rng;
use serde::Serialize;

use crate::error::GroupingError;
use crate::random::shuffled;

/// An ordered sequence of groups that together cover a set of weights.
///
/// # Examples
/// ```
/// use animal_grouper::partition::Partition;
/// let p = Partition::new(vec![vec![20.0, 21.0], vec![22.0]]);
/// assert_eq!(p.group_count(), 2);
/// assert_eq!(p.sample_count(), 3);
/// assert_eq!(p.sizes(), vec![2, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Partition {
    groups: Vec<Vec<f64>>,
}

impl Partition {
    pub fn new(groups: Vec<Vec<f64>>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[Vec<f64>] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of samples across all groups.
    pub fn sample_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Vec::len).collect()
    }

    /// Every sample, group by group.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.groups.iter().flatten().copied()
    }
}

/// Deals `values` out to `group_amount` groups in order, round-robin.
///
/// # Errors
/// Returns [`GroupingError::InvalidConfig`] if `group_amount` is zero.
///
/// # Examples
/// ```
/// use animal_grouper::partition::distribute_round_robin;
/// let p = distribute_round_robin(&[1.0, 2.0, 3.0, 4.0, 5.0], 2).unwrap();
/// assert_eq!(p.groups(), &[vec![1.0, 3.0, 5.0], vec![2.0, 4.0]]);
/// ```
pub fn distribute_round_robin(
    values: &[f64],
    group_amount: usize,
) -> Result<Partition, GroupingError> {
    if group_amount == 0 {
        return Err(GroupingError::InvalidConfig(
            "group amount must be at least 1".to_string(),
        ));
    }
    let per_group = values.len().div_ceil(group_amount);
    let mut groups: Vec<Vec<f64>> = (0..group_amount)
        .map(|_| Vec::with_capacity(per_group))
        .collect();
    for (i, &value) in values.iter().enumerate() {
        groups[i % group_amount].push(value);
    }
    Ok(Partition::new(groups))
}

/// Produces a random candidate partition of `values` into `group_amount`
/// groups of near-equal size.
///
/// Consumes one shuffle from `rng`. The caller's slice is never
/// reordered; repeated calls are independent draws.
///
/// # Errors
/// Returns [`GroupingError::InvalidConfig`] if `group_amount` is zero.
///
/// # Examples
/// ```
/// use animal_grouper::partition::partition_randomly;
/// use animal_grouper::random::create_rng;
/// let weights = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0];
/// let mut rng = create_rng(42);
/// let p = partition_randomly(&weights, 3, &mut rng).unwrap();
/// assert_eq!(p.group_count(), 3);
/// assert_eq!(p.sizes(), vec![3, 2, 2]);
/// ```
pub fn partition_randomly<R: Rng + ?Sized>(
    values: &[f64],
    group_amount: usize,
    rng: &mut R,
) -> Result<Partition, GroupingError> {
    if group_amount == 0 {
        return Err(GroupingError::InvalidConfig(
            "group amount must be at least 1".to_string(),
        ));
    }
    distribute_round_robin(&shuffled(values, rng), group_amount)
}
