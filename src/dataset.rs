//! Tabular input: rows of named cells with a weight and an optional sex.
//!
//! Rows are JSON objects, e.g. `{"Weight": 21.4, "Sex": "F", "Tag": 17}`.
//! Only the [`WEIGHT_COLUMN`] and [`SEX_COLUMN`] cells are read; every
//! other column is carried along untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::GroupingError;

pub const WEIGHT_COLUMN: &str = "Weight";
pub const SEX_COLUMN: &str = "Sex";

/// One input row.
pub type Row = Map<String, Value>;

/// Sex label of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
}

impl Sex {
    /// Parses the exact labels `"F"` and `"M"`; anything else is `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "F" => Some(Sex::Female),
            "M" => Some(Sex::Male),
            _ => None,
        }
    }
}

/// A weight tagged with the sex of its animal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightSample {
    pub weight: f64,
    pub sex: Sex,
}

/// Weights split by sex. Rows with any other sex label are only counted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SexSubsets {
    pub female: Vec<f64>,
    pub male: Vec<f64>,
    /// Rows whose sex cell was missing or not exactly `F`/`M`.
    pub dropped: usize,
}

/// Ordered collection of input rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    /// Parses a JSON array of row objects.
    ///
    /// # Examples
    /// ```
    /// use animal_grouper::dataset::Dataset;
    /// let ds = Dataset::from_json_str(r#"[{"Weight": 20.5, "Sex": "F"}, {"Weight": "22"}]"#).unwrap();
    /// assert_eq!(ds.len(), 2);
    /// assert_eq!(ds.weights().unwrap(), vec![20.5, 22.0]);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.rows.iter().any(|row| row.contains_key(name))
    }

    /// Fails with [`GroupingError::Schema`] listing every absent column.
    pub fn require_columns(&self, names: &[&str]) -> Result<(), GroupingError> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(GroupingError::Schema { missing })
        }
    }

    /// Every row's weight, in row order.
    ///
    /// # Errors
    /// [`GroupingError::InvalidWeight`] for the first row whose weight is
    /// missing, non-numeric, or non-finite.
    pub fn weights(&self) -> Result<Vec<f64>, GroupingError> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| parse_weight(i + 1, row.get(WEIGHT_COLUMN)))
            .collect()
    }

    /// Every row labelled exactly `F` or `M`, in row order.
    ///
    /// The weight cell of any other row is never read.
    ///
    /// # Errors
    /// [`GroupingError::InvalidWeight`] for the first labelled row whose
    /// weight is missing, non-numeric, or non-finite.
    pub fn sexed_samples(&self) -> Result<Vec<WeightSample>, GroupingError> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                let sex = row
                    .get(SEX_COLUMN)
                    .and_then(Value::as_str)
                    .and_then(Sex::from_label)?;
                let sample = parse_weight(i + 1, row.get(WEIGHT_COLUMN))
                    .map(|weight| WeightSample { weight, sex });
                Some(sample)
            })
            .collect()
    }

    /// Splits the weights into female and male subsets.
    ///
    /// Rows labelled anything but exactly `F` or `M` join neither subset.
    ///
    /// # Examples
    /// ```
    /// use animal_grouper::dataset::Dataset;
    /// let ds = Dataset::from_json_str(
    ///     r#"[{"Weight": 20, "Sex": "F"}, {"Weight": 31, "Sex": "M"}, {"Weight": 25, "Sex": "f"}]"#,
    /// ).unwrap();
    /// let subsets = ds.split_by_sex().unwrap();
    /// assert_eq!(subsets.female, vec![20.0]);
    /// assert_eq!(subsets.male, vec![31.0]);
    /// assert_eq!(subsets.dropped, 1);
    /// ```
    pub fn split_by_sex(&self) -> Result<SexSubsets, GroupingError> {
        let samples = self.sexed_samples()?;
        let mut subsets = SexSubsets {
            dropped: self.rows.len() - samples.len(),
            ..SexSubsets::default()
        };
        for sample in samples {
            match sample.sex {
                Sex::Female => subsets.female.push(sample.weight),
                Sex::Male => subsets.male.push(sample.weight),
            }
        }
        if subsets.dropped > 0 {
            warn!(
                dropped = subsets.dropped,
                "rows without an F/M sex label excluded from grouping"
            );
        }
        Ok(subsets)
    }
}

fn parse_weight(row: usize, cell: Option<&Value>) -> Result<f64, GroupingError> {
    let invalid = |reason: String| GroupingError::InvalidWeight { row, reason };
    let weight = match cell {
        None | Some(Value::Null) => return Err(invalid("missing".to_string())),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| invalid(format!("{n} is not representable")))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(format!("{s:?} is not a number")))?,
        Some(other) => return Err(invalid(format!("{other} is not a number"))),
    };
    if !weight.is_finite() {
        return Err(invalid(format!("{weight} is not finite")));
    }
    Ok(weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset(value: Value) -> Dataset {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_has_column_checks_every_row() {
        let ds = dataset(json!([{"Weight": 1, "Tag": "a"}, {"Weight": 2, "Sex": "M"}]));
        assert!(ds.has_column("Sex"));
        assert!(ds.has_column("Tag"));
        assert!(!ds.has_column("Mass"));
    }

    #[test]
    fn test_require_columns_lists_all_missing() {
        let ds = dataset(json!([{"Mass": 1}]));
        let err = ds.require_columns(&[WEIGHT_COLUMN, SEX_COLUMN]).unwrap_err();
        assert_eq!(
            err,
            GroupingError::Schema {
                missing: vec!["Weight".to_string(), "Sex".to_string()]
            }
        );
    }

    #[test]
    fn test_empty_dataset_has_no_columns() {
        let ds = Dataset::default();
        assert!(ds.is_empty());
        assert!(ds.require_columns(&[WEIGHT_COLUMN]).is_err());
    }

    #[test]
    fn test_weight_errors_name_the_row() {
        let ds = dataset(json!([{"Weight": 1}, {"Weight": "heavy"}]));
        match ds.weights().unwrap_err() {
            GroupingError::InvalidWeight { row, reason } => {
                assert_eq!(row, 2);
                assert!(reason.contains("heavy"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_and_null_weights_rejected() {
        assert!(dataset(json!([{"Weight": null}])).weights().is_err());
        assert!(dataset(json!([{"Weight": 3}, {"Sex": "F"}])).weights().is_err());
        assert!(dataset(json!([{"Weight": true}])).weights().is_err());
    }

    #[test]
    fn test_string_weights_parsed() {
        let ds = dataset(json!([{"Weight": " 18.25 "}, {"Weight": "inf"}]));
        let err = ds.weights().unwrap_err();
        assert!(matches!(err, GroupingError::InvalidWeight { row: 2, .. }));
    }

    #[test]
    fn test_sex_labels_are_exact() {
        assert_eq!(Sex::from_label("F"), Some(Sex::Female));
        assert_eq!(Sex::from_label("M"), Some(Sex::Male));
        assert_eq!(Sex::from_label("m"), None);
        assert_eq!(Sex::from_label("Female"), None);
    }

    #[test]
    fn test_split_counts_unlabelled_rows() {
        let ds = dataset(json!([
            {"Weight": 10, "Sex": "F"},
            {"Weight": 11, "Sex": "M"},
            {"Weight": 12},
            {"Weight": 13, "Sex": null},
            {"Weight": 14, "Sex": "X"},
            {"Weight": 15, "Sex": "F"},
        ]));
        let subsets = ds.split_by_sex().unwrap();
        assert_eq!(subsets.female, vec![10.0, 15.0]);
        assert_eq!(subsets.male, vec![11.0]);
        assert_eq!(subsets.dropped, 3);
    }

    #[test]
    fn test_unlabelled_row_weight_is_not_read() {
        let ds = dataset(json!([
            {"Weight": 20, "Sex": "F"},
            {"Weight": "n/a", "Sex": "?"},
            {"Sex": "X"},
            {"Weight": 30, "Sex": "M"},
        ]));
        let subsets = ds.split_by_sex().unwrap();
        assert_eq!(subsets.female, vec![20.0]);
        assert_eq!(subsets.male, vec![30.0]);
        assert_eq!(subsets.dropped, 2);
    }

    #[test]
    fn test_labelled_row_with_bad_weight_still_fails() {
        let ds = dataset(json!([{"Weight": 20, "Sex": "F"}, {"Weight": "n/a", "Sex": "M"}]));
        assert!(matches!(
            ds.split_by_sex().unwrap_err(),
            GroupingError::InvalidWeight { row: 2, .. }
        ));
    }
}
