mod common;

use fraudlens_lib::charts::{generate, ChartFormat, ChartJob, CHART_NAMES};
use fraudlens_lib::errors::FraudLensError;
use fraudlens_lib::evaluation::{SPLIT_SEED, TEST_FRACTION};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn job_for(dir: &Path, model: &Value) -> ChartJob {
    let dataset = dir.join("loan_land_fraud.csv");
    common::write_dataset(&dataset, 120);
    let (model, scaler) = common::write_artifacts(dir, model);

    ChartJob {
        dataset,
        model,
        scaler,
        output_dir: dir.join("charts"),
        format: ChartFormat::Svg,
        test_fraction: TEST_FRACTION,
        seed: SPLIT_SEED,
    }
}

fn assert_all_charts_written(job: &ChartJob) {
    let written = generate(job).expect("generate charts");
    assert_eq!(written.len(), CHART_NAMES.len());

    for name in CHART_NAMES {
        let path = job.output_dir.join(format!("{name}.svg"));
        assert!(written.contains(&path), "{name} missing from {written:?}");
        let svg = fs::read_to_string(&path).expect("read chart");
        assert!(svg.contains("<svg"), "{name} is not an SVG document");
    }
}

#[test]
fn forest_artifacts_produce_all_nine_charts() {
    let tmp = TempDir::new().expect("create temp dir");
    let job = job_for(tmp.path(), &common::ltv_credit_forest());
    assert_all_charts_written(&job);

    // A second run overwrites in place.
    assert_all_charts_written(&job);
    assert_eq!(fs::read_dir(&job.output_dir).expect("list charts").count(), 9);
}

#[test]
fn logistic_artifacts_produce_all_nine_charts() {
    let tmp = TempDir::new().expect("create temp dir");
    let job = job_for(tmp.path(), &common::logistic_model());
    assert_all_charts_written(&job);
}

#[test]
fn missing_dataset_is_fatal() {
    let tmp = TempDir::new().expect("create temp dir");
    let mut job = job_for(tmp.path(), &common::ltv_credit_forest());
    job.dataset = tmp.path().join("absent.csv");

    let err = generate(&job).expect_err("missing dataset must fail");
    assert!(matches!(err, FraudLensError::Dataset { .. }));
    assert!(!job.output_dir.exists());
}
