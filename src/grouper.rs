//! Request orchestration.
//!
//! [`AnimalGrouper::group`] validates the dataset against the
//! configuration, dispatches to the single or sex-aware pipeline, and
//! materializes the accepted partitions. Validation always finishes
//! before the first random draw, so a malformed request leaves the
//! generator untouched.

use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::config::GroupingConfig;
use crate::dataset::{Dataset, SEX_COLUMN, WEIGHT_COLUMN};
use crate::error::{GroupingError, SearchStage};
use crate::recombine::recombine;
use crate::search::{search, Accepted};
use crate::table::{to_table, GroupedTable};

/// Number of candidates each stage evaluated before acceptance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttemptLog {
    pub combined: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub female: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub male: Option<usize>,
}

/// Tables produced by one successful request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupingOutcome {
    /// Final groups.
    pub output: GroupedTable,
    /// Female-only groups (sex-aware requests only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_female: Option<GroupedTable>,
    /// Male-only groups (sex-aware requests only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_male: Option<GroupedTable>,
    pub attempts: AttemptLog,
    /// Rows left out because their sex label was not `F` or `M`.
    pub dropped_rows: usize,
}

/// Groups animals according to a [`GroupingConfig`].
///
/// # Examples
/// ```
/// use animal_grouper::config::GroupingConfig;
/// use animal_grouper::dataset::Dataset;
/// use animal_grouper::grouper::AnimalGrouper;
/// use animal_grouper::random::create_rng;
///
/// let data = Dataset::from_json_str(
///     r#"[{"Weight": 10}, {"Weight": 10}, {"Weight": 10}, {"Weight": 10}]"#,
/// ).unwrap();
/// let grouper = AnimalGrouper::new(GroupingConfig::new(2, 1.0, false).unwrap());
/// let outcome = grouper.group(&data, &mut create_rng(42)).unwrap();
/// assert_eq!(outcome.output.column_names(), vec!["Group 1", "Group 2"]);
/// assert!(outcome.output_female.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct AnimalGrouper {
    config: GroupingConfig,
}

impl AnimalGrouper {
    pub fn new(config: GroupingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    /// Runs one grouping request over `dataset`.
    ///
    /// # Errors
    /// - [`GroupingError::InvalidConfig`] for an invalid configuration.
    /// - [`GroupingError::Schema`] if `Weight` (or `Sex` in sex-aware mode)
    ///   is missing.
    /// - [`GroupingError::InvalidWeight`] for malformed weight cells.
    /// - [`GroupingError::InsufficientSamples`] if a subset to be grouped
    ///   has fewer samples than groups.
    /// - [`GroupingError::RetryExhausted`] if any bounded search gives up.
    pub fn group<R: Rng + ?Sized>(
        &self,
        dataset: &Dataset,
        rng: &mut R,
    ) -> Result<GroupingOutcome, GroupingError> {
        self.config.validate()?;
        if self.config.is_based_on_gender {
            dataset.require_columns(&[WEIGHT_COLUMN, SEX_COLUMN])?;
            self.group_by_sex(dataset, rng)
        } else {
            dataset.require_columns(&[WEIGHT_COLUMN])?;
            self.group_all(dataset, rng)
        }
    }

    fn group_all<R: Rng + ?Sized>(
        &self,
        dataset: &Dataset,
        rng: &mut R,
    ) -> Result<GroupingOutcome, GroupingError> {
        let cfg = &self.config;
        let weights = dataset.weights()?;
        self.check_enough(SearchStage::Combined, weights.len())?;
        info!(
            samples = weights.len(),
            groups = cfg.group_amount,
            threshold = cfg.threshold,
            "grouping without regard to sex"
        );

        let accepted = search(
            &weights,
            cfg.group_amount,
            cfg.threshold,
            &cfg.retry,
            SearchStage::Combined,
            rng,
        )?;
        Ok(GroupingOutcome {
            output: self.materialize(&accepted)?,
            output_female: None,
            output_male: None,
            attempts: AttemptLog {
                combined: accepted.attempts,
                female: None,
                male: None,
            },
            dropped_rows: 0,
        })
    }

    fn group_by_sex<R: Rng + ?Sized>(
        &self,
        dataset: &Dataset,
        rng: &mut R,
    ) -> Result<GroupingOutcome, GroupingError> {
        let cfg = &self.config;
        let subsets = dataset.split_by_sex()?;
        self.check_enough(SearchStage::Female, subsets.female.len())?;
        self.check_enough(SearchStage::Male, subsets.male.len())?;
        info!(
            females = subsets.female.len(),
            males = subsets.male.len(),
            groups = cfg.group_amount,
            threshold = cfg.threshold,
            "grouping by sex"
        );

        let grouping = recombine(
            cfg.group_amount,
            cfg.threshold,
            &subsets.female,
            &subsets.male,
            &cfg.retry,
            rng,
        )?;
        Ok(GroupingOutcome {
            output: self.materialize(&grouping.combined)?,
            output_female: Some(self.materialize(&grouping.female)?),
            output_male: Some(self.materialize(&grouping.male)?),
            attempts: AttemptLog {
                combined: grouping.combined.attempts,
                female: Some(grouping.female.attempts),
                male: Some(grouping.male.attempts),
            },
            dropped_rows: subsets.dropped,
        })
    }

    fn check_enough(&self, subset: SearchStage, available: usize) -> Result<(), GroupingError> {
        let group_amount = self.config.group_amount;
        if available < group_amount {
            return Err(GroupingError::InsufficientSamples {
                subset,
                available,
                group_amount,
            });
        }
        Ok(())
    }

    fn materialize(&self, accepted: &Accepted) -> Result<GroupedTable, GroupingError> {
        to_table(&accepted.partition, self.config.group_amount)
    }
}
