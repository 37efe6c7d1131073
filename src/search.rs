//! Bounded random retry search.
//!
//! Draws fresh random partitions until one passes the dispersion test or
//! the retry ceiling is reached. There is no backoff and no reuse of
//! rejected candidates: every attempt is an independent draw, so the
//! worst case costs `max_attempts` partitions plus their evaluations.

use rand::Rng;
use tracing::{debug, trace, warn};

use crate::acceptance::DispersionReport;
use crate::config::RetryPolicy;
use crate::error::{GroupingError, SearchStage};
use crate::partition::{partition_randomly, Partition};

/// A partition that passed the dispersion test.
#[derive(Debug, Clone, PartialEq)]
pub struct Accepted {
    pub partition: Partition,
    /// 1-based index of the attempt that was accepted.
    pub attempts: usize,
    pub report: DispersionReport,
}

/// Repeats `candidate` until `threshold` accepts it or `policy` runs out.
///
/// Shared by the partition search and the recombination search.
pub(crate) fn retry_until_accepted<F>(
    stage: SearchStage,
    threshold: f64,
    policy: &RetryPolicy,
    mut candidate: F,
) -> Result<Accepted, GroupingError>
where
    F: FnMut() -> Result<Partition, GroupingError>,
{
    for attempt in 1..=policy.max_attempts {
        let partition = candidate()?;
        let report = DispersionReport::evaluate(&partition, threshold);
        if report.accepted() {
            debug!(
                %stage,
                attempt,
                worst = report.worst(),
                bound = report.bound,
                "candidate accepted"
            );
            return Ok(Accepted {
                partition,
                attempts: attempt,
                report,
            });
        }
        trace!(
            %stage,
            attempt,
            group = report.first_violation(),
            worst = report.worst(),
            bound = report.bound,
            "candidate rejected"
        );
    }

    warn!(%stage, attempts = policy.max_attempts, threshold, "retry ceiling reached");
    Err(GroupingError::RetryExhausted {
        stage,
        attempts: policy.max_attempts,
    })
}

/// Searches for a random partition of `values` into `group_amount` groups
/// whose dispersion passes `threshold`.
///
/// # Errors
/// - [`GroupingError::RetryExhausted`] after `policy.max_attempts`
///   rejected candidates.
/// - [`GroupingError::InvalidConfig`] if `group_amount` is zero.
///
/// # Examples
/// ```
/// use animal_grouper::config::RetryPolicy;
/// use animal_grouper::error::SearchStage;
/// use animal_grouper::random::create_rng;
/// use animal_grouper::search::search;
/// let weights = [10.0; 8];
/// let mut rng = create_rng(1);
/// let found = search(&weights, 4, 1.0, &RetryPolicy::default(), SearchStage::Combined, &mut rng).unwrap();
/// assert_eq!(found.attempts, 1);
/// assert_eq!(found.partition.sizes(), vec![2, 2, 2, 2]);
/// ```
pub fn search<R: Rng + ?Sized>(
    values: &[f64],
    group_amount: usize,
    threshold: f64,
    policy: &RetryPolicy,
    stage: SearchStage,
    rng: &mut R,
) -> Result<Accepted, GroupingError> {
    retry_until_accepted(stage, threshold, policy, || {
        partition_randomly(values, group_amount, rng)
    })
}
