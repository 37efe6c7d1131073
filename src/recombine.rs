//! Sex-aware recombination.
//!
//! Females and males are first balanced independently. The two accepted
//! partitions are then merged group for group through a random one-to-one
//! matching, and the merged partition must pass the same dispersion test.
//! Finding a good matching is itself a search problem; it is solved with
//! the same bounded random retry as single-sex grouping.

use rand::Rng;
use tracing::info;

use crate::config::RetryPolicy;
use crate::error::{GroupingError, SearchStage};
use crate::partition::Partition;
use crate::random::random_matching;
use crate::search::{retry_until_accepted, search, Accepted};

/// Accepted partitions of both sexes and their accepted merge.
#[derive(Debug, Clone, PartialEq)]
pub struct SexAwareGrouping {
    pub female: Accepted,
    pub male: Accepted,
    pub combined: Accepted,
}

/// Concatenates `left[i]` with `right[matching[i]]` for every position.
///
/// # Errors
/// Returns [`GroupingError::GroupCountMismatch`] if the partitions differ
/// in group count or `matching` is not a permutation of their indices.
///
/// # Examples
/// ```
/// use animal_grouper::partition::Partition;
/// use animal_grouper::recombine::merge_matched;
/// let female = Partition::new(vec![vec![20.0], vec![22.0, 23.0]]);
/// let male = Partition::new(vec![vec![30.0], vec![31.0]]);
/// let merged = merge_matched(&female, &male, &[1, 0]).unwrap();
/// assert_eq!(merged.groups(), &[vec![20.0, 31.0], vec![22.0, 23.0, 30.0]]);
/// ```
pub fn merge_matched(
    left: &Partition,
    right: &Partition,
    matching: &[usize],
) -> Result<Partition, GroupingError> {
    let n = left.group_count();
    if right.group_count() != n {
        return Err(GroupingError::GroupCountMismatch {
            left: n,
            right: right.group_count(),
        });
    }
    let mut used = vec![false; n];
    let is_permutation = matching.len() == n
        && matching
            .iter()
            .all(|&j| j < n && !std::mem::replace(&mut used[j], true));
    if !is_permutation {
        return Err(GroupingError::GroupCountMismatch {
            left: n,
            right: matching.len(),
        });
    }

    let groups = left
        .groups()
        .iter()
        .zip(matching)
        .map(|(own, &j)| {
            let mut merged = own.clone();
            merged.extend_from_slice(&right.groups()[j]);
            merged
        })
        .collect();
    Ok(Partition::new(groups))
}

/// Searches for a random matching of `female` and `male` groups whose
/// merged partition passes `threshold`.
///
/// # Errors
/// - [`GroupingError::GroupCountMismatch`] if the partitions differ in
///   group count.
/// - [`GroupingError::RetryExhausted`] with
///   [`SearchStage::Recombination`] after `policy.max_attempts` rejected
///   matchings.
pub fn recombine_partitions<R: Rng + ?Sized>(
    female: &Partition,
    male: &Partition,
    threshold: f64,
    policy: &RetryPolicy,
    rng: &mut R,
) -> Result<Accepted, GroupingError> {
    if female.group_count() != male.group_count() {
        return Err(GroupingError::GroupCountMismatch {
            left: female.group_count(),
            right: male.group_count(),
        });
    }
    let n = female.group_count();
    retry_until_accepted(SearchStage::Recombination, threshold, policy, || {
        merge_matched(female, male, &random_matching(n, rng))
    })
}

/// Balances each sex on its own, then merges the two groupings.
///
/// Total work is one female search, one male search, and at most
/// `policy.max_attempts` matchings; the single-sex searches are never
/// repeated when a matching is rejected.
///
/// # Errors
/// Any error of [`search`] (stage `Female` or `Male`) or of
/// [`recombine_partitions`].
///
/// # Examples
/// ```
/// use animal_grouper::config::RetryPolicy;
/// use animal_grouper::random::create_rng;
/// use animal_grouper::recombine::recombine;
/// let female = [20.0; 6];
/// let male = [30.0; 3];
/// let mut rng = create_rng(5);
/// let out = recombine(3, 1.5, &female, &male, &RetryPolicy::default(), &mut rng).unwrap();
/// assert_eq!(out.combined.partition.sizes(), vec![3, 3, 3]);
/// ```
pub fn recombine<R: Rng + ?Sized>(
    group_amount: usize,
    threshold: f64,
    female_weights: &[f64],
    male_weights: &[f64],
    policy: &RetryPolicy,
    rng: &mut R,
) -> Result<SexAwareGrouping, GroupingError> {
    let female = search(
        female_weights,
        group_amount,
        threshold,
        policy,
        SearchStage::Female,
        rng,
    )?;
    let male = search(
        male_weights,
        group_amount,
        threshold,
        policy,
        SearchStage::Male,
        rng,
    )?;
    let combined = recombine_partitions(&female.partition, &male.partition, threshold, policy, rng)?;

    info!(
        female_attempts = female.attempts,
        male_attempts = male.attempts,
        matching_attempts = combined.attempts,
        "sex-aware grouping accepted"
    );
    Ok(SexAwareGrouping {
        female,
        male,
        combined,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn recombined_sizes_preserved(
            seed in 0_u64..10000,
            female in proptest::collection::vec(15.0_f64..25.0, 3..24),
            male in proptest::collection::vec(25.0_f64..40.0, 3..24),
            groups in 1_usize..4,
        ) {
            let mut rng = create_rng(seed);
            if let Ok(out) = recombine(groups, 3.0, &female, &male, &RetryPolicy::default(), &mut rng) {
                prop_assert_eq!(out.combined.partition.group_count(), groups);
                prop_assert_eq!(out.combined.partition.sample_count(), female.len() + male.len());
                let f = out.female.partition.sizes();
                let m = out.male.partition.sizes();
                let mut expected: Vec<usize> = Vec::new();
                let mut got = out.combined.partition.sizes();
                for a in &f {
                    for b in &m {
                        expected.push(a + b);
                    }
                }
                got.sort();
                for size in got {
                    prop_assert!(expected.contains(&size));
                }
            }
        }
    }
}
