//! Materialization of an accepted partition as a labelled table.
//!
//! Group `i` (0-based) becomes the column `"Group {i+1}"`. Columns of
//! unequal length are padded with `None` when read row by row.

use std::fmt;

use serde::Serialize;

use crate::error::GroupingError;
use crate::partition::Partition;

/// One labelled group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// A partition laid out as one named column per group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedTable {
    columns: Vec<Column>,
}

/// Builds the table for `partition`, expecting `group_amount` groups.
///
/// # Errors
/// [`GroupingError::Shape`] if the partition has fewer groups than
/// `group_amount`.
///
/// # Examples
/// ```
/// use animal_grouper::partition::Partition;
/// use animal_grouper::table::to_table;
/// let p = Partition::new(vec![vec![20.0, 21.0], vec![22.0]]);
/// let table = to_table(&p, 2).unwrap();
/// assert_eq!(table.column_names(), vec!["Group 1", "Group 2"]);
/// assert_eq!(table.rows()[1], vec![Some(21.0), None]);
/// assert!(to_table(&p, 5).is_err());
/// ```
pub fn to_table(partition: &Partition, group_amount: usize) -> Result<GroupedTable, GroupingError> {
    let actual = partition.group_count();
    if actual < group_amount {
        return Err(GroupingError::Shape {
            expected: group_amount,
            actual,
        });
    }
    let columns = partition
        .groups()
        .iter()
        .enumerate()
        .map(|(i, group)| Column {
            name: format!("Group {}", i + 1),
            values: group.clone(),
        })
        .collect();
    Ok(GroupedTable { columns })
}

impl GroupedTable {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Length of the longest column.
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }

    /// Row-major view; shorter columns yield `None` past their end.
    pub fn rows(&self) -> Vec<Vec<Option<f64>>> {
        (0..self.row_count())
            .map(|r| self.columns.iter().map(|c| c.values.get(r).copied()).collect())
            .collect()
    }
}

impl fmt::Display for GroupedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .columns
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max(10);
        let header: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{:>width$}", c.name))
            .collect();
        writeln!(f, "{}", header.join("  "))?;
        for row in self.rows() {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Some(v) => format!("{v:>width$}"),
                    None => format!("{:>width$}", ""),
                })
                .collect();
            writeln!(f, "{}", cells.join("  ").trim_end())?;
        }
        Ok(())
    }
}
