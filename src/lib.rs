//! # animal-grouper
//!
//! Splits a herd of weighed animals into a fixed number of groups whose
//! weight dispersion is balanced, optionally balancing each sex before
//! merging them.
//!
//! The search is a bounded random retry: candidate partitions are drawn
//! uniformly at random and tested against a dispersion bound until one
//! passes or the retry ceiling is reached. It does not look for an optimal
//! partition; it guarantees a bounded amount of work and a distinct
//! failure when the budget runs out.
//!
//! ## Modules
//!
//! - [`stats`]: Population dispersion with numerical stability guarantees
//! - [`random`]: Seeded RNGs, shuffles, and random matchings
//! - [`partition`]: Random near-even partitioning
//! - [`acceptance`]: The dispersion acceptance test
//! - [`search`]: Bounded retry search
//! - [`recombine`]: Sex-aware recombination
//! - [`table`]: Labelled result tables
//! - [`dataset`]: Tabular input and schema checks
//! - [`grouper`]: Request orchestration
//!
//! ## Example
//!
//! ```
//! use animal_grouper::{AnimalGrouper, Dataset, GroupingConfig};
//! use animal_grouper::random::create_rng;
//!
//! let data = Dataset::from_json_str(r#"[
//!     {"Weight": 21.0, "Sex": "F"}, {"Weight": 22.5, "Sex": "F"},
//!     {"Weight": 23.0, "Sex": "F"}, {"Weight": 20.5, "Sex": "F"},
//!     {"Weight": 30.0, "Sex": "M"}, {"Weight": 31.5, "Sex": "M"},
//!     {"Weight": 29.0, "Sex": "M"}, {"Weight": 32.0, "Sex": "M"}
//! ]"#).unwrap();
//!
//! let config = GroupingConfig::new(2, 2.0, true).unwrap();
//! let outcome = AnimalGrouper::new(config).group(&data, &mut create_rng(7)).unwrap();
//! assert_eq!(outcome.output.columns().len(), 2);
//! assert!(outcome.output_female.is_some());
//! ```

pub mod acceptance;
pub mod config;
pub mod dataset;
pub mod error;
pub mod grouper;
pub mod partition;
pub mod random;
pub mod recombine;
pub mod search;
pub mod stats;
pub mod table;

pub use config::{GroupingConfig, RetryPolicy, MAX_RETRIES};
pub use dataset::{Dataset, Sex, WeightSample};
pub use error::{GroupingError, SearchStage};
pub use grouper::{AnimalGrouper, GroupingOutcome};
pub use partition::Partition;
pub use table::GroupedTable;
