use serde_json::{json, Value};

use animal_grouper::random::create_rng;
use animal_grouper::search::search;
use animal_grouper::table::to_table;
use animal_grouper::{
    AnimalGrouper, Dataset, GroupingConfig, GroupingError, Partition, RetryPolicy, SearchStage,
    MAX_RETRIES,
};

fn dataset(value: Value) -> Dataset {
    serde_json::from_value(value).unwrap()
}

fn herd(females: &[f64], males: &[f64]) -> Dataset {
    let rows: Vec<Value> = females
        .iter()
        .map(|w| json!({"Weight": w, "Sex": "F"}))
        .chain(males.iter().map(|w| json!({"Weight": w, "Sex": "M"})))
        .collect();
    dataset(Value::Array(rows))
}

fn sorted(mut v: Vec<f64>) -> Vec<f64> {
    v.sort_by(|a, b| a.partial_cmp(b).unwrap());
    v
}

#[test]
fn uniform_weights_produce_four_by_two_table() {
    let data = dataset(json!([
        {"Weight": 10}, {"Weight": 10}, {"Weight": 10}, {"Weight": 10},
        {"Weight": 10}, {"Weight": 10}, {"Weight": 10}, {"Weight": 10},
    ]));
    let grouper = AnimalGrouper::new(GroupingConfig::new(4, 1.0, false).unwrap());
    let outcome = grouper.group(&data, &mut create_rng(2024)).unwrap();

    assert_eq!(
        outcome.output.column_names(),
        vec!["Group 1", "Group 2", "Group 3", "Group 4"]
    );
    assert_eq!(outcome.output.row_count(), 2);
    assert!(outcome
        .output
        .rows()
        .iter()
        .flatten()
        .all(|cell| *cell == Some(10.0)));
    assert_eq!(outcome.attempts.combined, 1);
}

#[test]
fn missing_sex_column_fails_schema_check() {
    let data = dataset(json!([{"Weight": 12.0}, {"Weight": 13.0}]));
    let grouper = AnimalGrouper::new(GroupingConfig::new(2, 1.0, true).unwrap());
    let err = grouper.group(&data, &mut create_rng(0)).unwrap_err();
    assert!(matches!(err, GroupingError::Schema { ref missing } if missing == &["Sex"]));
}

#[test]
fn missing_weight_column_fails_schema_check() {
    let data = dataset(json!([{"Mass": 12.0, "Sex": "F"}]));
    let grouper = AnimalGrouper::new(GroupingConfig::new(1, 1.0, false).unwrap());
    let err = grouper.group(&data, &mut create_rng(0)).unwrap_err();
    assert_eq!(
        err,
        GroupingError::Schema {
            missing: vec!["Weight".to_string()]
        }
    );
}

#[test]
fn pathological_threshold_exhausts_exactly_at_ceiling() {
    let skewed: Vec<f64> = (0..24)
        .map(|i| if i % 3 == 0 { 2.0 + i as f64 } else { 800.0 + 5.0 * i as f64 })
        .collect();
    let err = search(
        &skewed,
        4,
        0.0001,
        &RetryPolicy::default(),
        SearchStage::Combined,
        &mut create_rng(31),
    )
    .unwrap_err();
    assert_eq!(
        err,
        GroupingError::RetryExhausted {
            stage: SearchStage::Combined,
            attempts: MAX_RETRIES,
        }
    );
    assert!(err.to_string().contains("tried 1000 times"));
}

#[test]
fn sex_aware_grouping_preserves_every_animal() {
    let females = [18.5, 19.0, 19.5, 20.0, 20.5, 21.0, 21.5, 22.0, 22.5];
    let males = [27.0, 28.0, 29.0, 30.0, 31.0, 32.0];
    let data = herd(&females, &males);
    let grouper = AnimalGrouper::new(GroupingConfig::new(3, 2.0, true).unwrap());
    let outcome = grouper.group(&data, &mut create_rng(8)).unwrap();

    let female_table = outcome.output_female.as_ref().unwrap();
    let male_table = outcome.output_male.as_ref().unwrap();
    assert_eq!(female_table.columns().len(), 3);
    assert_eq!(male_table.columns().len(), 3);
    assert!(female_table.columns().iter().all(|c| c.values.len() == 3));
    assert!(male_table.columns().iter().all(|c| c.values.len() == 2));

    assert_eq!(outcome.output.columns().len(), 3);
    for column in outcome.output.columns() {
        assert_eq!(column.values.len(), 5);
    }
    let all: Vec<f64> = outcome
        .output
        .columns()
        .iter()
        .flat_map(|c| c.values.iter().copied())
        .collect();
    let expected: Vec<f64> = females.iter().chain(males.iter()).copied().collect();
    assert_eq!(sorted(all), sorted(expected));
}

#[test]
fn seeded_requests_are_reproducible() {
    let data = herd(&[20.0, 21.0, 22.0, 23.0, 24.0, 25.0], &[30.0, 31.0, 32.0, 33.0]);
    let grouper = AnimalGrouper::new(GroupingConfig::new(2, 2.0, true).unwrap());
    let a = grouper.group(&data, &mut create_rng(55)).unwrap();
    let b = grouper.group(&data, &mut create_rng(55)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn unlabelled_rows_are_dropped_from_sex_aware_grouping() {
    let mut rows: Vec<Value> = [20.0, 20.0, 30.0, 30.0]
        .iter()
        .zip(["F", "F", "M", "M"])
        .map(|(w, s)| json!({"Weight": w, "Sex": s}))
        .collect();
    rows.push(json!({"Weight": 99.0, "Sex": "unknown"}));
    rows.push(json!({"Weight": 98.0}));
    let grouper = AnimalGrouper::new(GroupingConfig::new(2, 1.5, true).unwrap());
    let outcome = grouper
        .group(&dataset(Value::Array(rows)), &mut create_rng(4))
        .unwrap();
    assert_eq!(outcome.dropped_rows, 2);
    let total: usize = outcome.output.columns().iter().map(|c| c.values.len()).sum();
    assert_eq!(total, 4);
}

#[test]
fn materialization_rejects_short_partition() {
    let p = Partition::new(vec![vec![1.0, 2.0], vec![3.0]]);
    assert_eq!(
        to_table(&p, 5).unwrap_err(),
        GroupingError::Shape {
            expected: 5,
            actual: 2
        }
    );
}

#[test]
fn json_report_shape() {
    let data = herd(&[20.0, 20.0], &[30.0, 30.0]);
    let grouper = AnimalGrouper::new(GroupingConfig::new(2, 1.0, true).unwrap());
    let outcome = grouper.group(&data, &mut create_rng(1)).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["output"]["columns"][0]["name"], "Group 1");
    assert!(json["output_female"].is_object());
    assert_eq!(json["attempts"]["female"], 1);
    assert_eq!(json["dropped_rows"], 0);
}
