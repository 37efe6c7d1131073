use serde::{Deserialize, Serialize};

use crate::error::GroupingError;

/// Fixed number of candidates a bounded search may evaluate.
pub const MAX_RETRIES: usize = 1000;

/// Retry budget shared by every bounded search of one request.
///
/// The budget is per search call: each call starts from zero attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of candidates evaluated before giving up.
    pub max_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
        }
    }
}

/// Parameters of one grouping request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// Number of groups to form.
    pub group_amount: usize,
    /// Multiplier applied to the pooled dispersion; a group is balanced
    /// when its own dispersion stays under `pooled × threshold`.
    pub threshold: f64,
    /// Balance each sex separately, then merge.
    pub is_based_on_gender: bool,
    /// Ceiling on candidates per search; defaults to [`MAX_RETRIES`].
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl GroupingConfig {
    /// Creates a validated configuration with the default retry policy.
    ///
    /// # Errors
    /// Returns [`GroupingError::InvalidConfig`] if `group_amount` is zero or
    /// `threshold` is not a positive finite number.
    ///
    /// # Examples
    /// ```
    /// use animal_grouper::config::GroupingConfig;
    /// let cfg = GroupingConfig::new(5, 1.3, true).unwrap();
    /// assert_eq!(cfg.retry.max_attempts, 1000);
    /// assert!(GroupingConfig::new(0, 1.3, true).is_err());
    /// assert!(GroupingConfig::new(5, -1.0, false).is_err());
    /// ```
    pub fn new(
        group_amount: usize,
        threshold: f64,
        is_based_on_gender: bool,
    ) -> Result<Self, GroupingError> {
        let config = Self {
            group_amount,
            threshold,
            is_based_on_gender,
            retry: RetryPolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Replaces the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Checks every field against its constraints.
    ///
    /// Deserialized configurations bypass [`GroupingConfig::new`], so the
    /// orchestrator calls this again before running.
    pub fn validate(&self) -> Result<(), GroupingError> {
        if self.group_amount == 0 {
            return Err(GroupingError::InvalidConfig(
                "group amount must be at least 1".to_string(),
            ));
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(GroupingError::InvalidConfig(format!(
                "threshold must be a positive number, got {}",
                self.threshold
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(GroupingError::InvalidConfig(
                "retry ceiling must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
