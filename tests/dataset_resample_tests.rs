//! Integration tests for resampling datasets

use chrono::{Duration, NaiveDate, NaiveDateTime};
use labeled_resample::prelude::*;
use ndarray::ArrayD;
use serde_json::json;

fn times(n: usize) -> Vec<NaiveDateTime> {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start date");
    (0..n as i64).map(|i| start + Duration::days(i)).collect()
}

/// `temp` along time, `precip` along time and x, `elevation` along x only.
fn weather() -> Result<Dataset> {
    let temp = Variable::new(&["time"], ArrayD::from_shape_vec(vec![100], (0..100).map(f64::from).collect())?)?
        .with_attrs(Attrs::from([("units".to_string(), json!("K"))]));
    let precip = Variable::new(
        &["time", "x"],
        ArrayD::from_shape_vec(vec![100, 2], (0..200).map(|i| f64::from(i % 2)).collect())?,
    )?;
    let elevation = Variable::new(&["x"], ArrayD::from_shape_vec(vec![2], vec![120.0, 340.0])?)?;

    Dataset::new()
        .with_variable("temp", temp)?
        .with_variable("precip", precip)?
        .with_variable("elevation", elevation)?
        .with_coord("time", Coordinate::new("time", CoordValues::Time(times(100))))?
        .with_coord("x", Coordinate::new("x", CoordValues::Text(vec!["west".into(), "east".into()])))
        .map(|ds| ds.with_attrs(Attrs::from([("source".to_string(), json!("station"))])))
}

fn quarter_labels() -> Vec<Label> {
    (0..100).map(|i| Label::Int(i / 25)).collect()
}

fn values(variable: &Variable) -> Vec<f64> {
    variable.data().iter().copied().collect()
}

#[test]
fn test_identity_apply_returns_original() -> Result<()> {
    let ds = weather()?;
    let resampled = ds.resample("time", &quarter_labels())?;

    let same = resampled.apply(Ok)?;
    assert_eq!(same, ds);
    assert!(!same.has_dim(RESAMPLE_DIM));
    Ok(())
}

#[test]
fn test_shortcut_flag_is_ignored() -> Result<()> {
    let ds = weather()?;
    let resampled = ds.resample("time", &quarter_labels())?;
    assert_eq!(resampled.apply_with_shortcut(Ok, true)?, resampled.apply(Ok)?);
    Ok(())
}

#[test]
fn test_mean_renames_proxy_dimension() -> Result<()> {
    let ds = weather()?;
    let means = ds.resample("time", &quarter_labels())?.mean()?;

    assert_eq!(means.dim_len("time"), Some(4));
    assert!(!means.has_dim(RESAMPLE_DIM));
    assert_eq!(values(means.variable("temp")?), vec![12.0, 37.0, 62.0, 87.0]);
    assert_eq!(means.variable("precip")?.dims(), &["time".to_string(), "x".to_string()]);
    assert_eq!(values(means.variable("precip")?), vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
    assert_eq!(means.coord("time")?.values(), &CoordValues::Int(vec![0, 1, 2, 3]));
    assert!(means.coord("x")?.runs_along("x"));
    assert!(means.attrs().is_empty());
    assert!(means.variable("temp")?.attrs().is_empty());
    Ok(())
}

#[test]
fn test_members_without_the_dimension_are_stacked() -> Result<()> {
    let ds = weather()?;
    let maxes = ds.resample("time", &quarter_labels())?.max()?;
    let elevation = maxes.variable("elevation")?;
    assert_eq!(elevation.dims(), &["time".to_string(), "x".to_string()]);
    assert_eq!(elevation.shape(), &[4, 2]);
    assert_eq!(&values(elevation)[6..], &[120.0, 340.0]);
    Ok(())
}

#[test]
fn test_reduce_keep_attrs() -> Result<()> {
    let ds = weather()?;
    let resampled = ds.resample("time", &quarter_labels())?;
    let kernel = |data: &ArrayD<f64>, axis: usize| data.reduce_along_axis(axis, StatOperation::Sum);

    let kept = resampled.reduce(kernel, Some("ignored"), true)?;
    assert_eq!(kept.attrs().get("source"), Some(&json!("station")));
    assert_eq!(kept.variable("temp")?.attrs().get("units"), Some(&json!("K")));
    assert_eq!(values(kept.variable("temp")?), vec![300.0, 925.0, 1550.0, 2175.0]);
    Ok(())
}

#[test]
fn test_equal_dimension_names_fail() -> Result<()> {
    let group = Coordinate::from_labels("time", &quarter_labels())?;
    match DatasetResample::new(weather()?, &group, "time", "time") {
        Err(ResampleError::ProxyDimensionConflict { dim, resample_dim }) => {
            assert_eq!(dim, "time");
            assert_eq!(resample_dim, "time");
            Ok(())
        }
        other => panic!("Expected ProxyDimensionConflict, got {:?}", other),
    }
}

#[test]
fn test_group_must_run_along_resampled_dimension() -> Result<()> {
    let across_x = Coordinate::from_labels("x", &[Label::Int(0), Label::Int(1)])?;
    assert!(matches!(
        DatasetResample::new(weather()?, &across_x, "time", RESAMPLE_DIM),
        Err(ResampleError::IncompatibleDimensions { .. })
    ));
    Ok(())
}

#[test]
fn test_user_errors_propagate_unchanged() -> Result<()> {
    let resampled = weather()?.resample("time", &quarter_labels())?;
    let result = resampled.apply(|group| group.variable("missing").map(|_| group.clone()));
    match result {
        Err(ResampleError::VariableNotFound { var }) => assert_eq!(var, "missing"),
        other => panic!("Expected VariableNotFound, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_group_anomalies_against_array_means() -> Result<()> {
    let ds = weather()?;
    let labels = quarter_labels();
    let temp_means = ds.get("temp")?.resample("time", &labels)?.mean()?;

    let anomalies = ds.resample("time", &labels)?.sub(&temp_means)?;
    assert_eq!(anomalies.dim_len("time"), Some(100));
    let temp = anomalies.variable("temp")?;
    assert_eq!(values(temp)[0], -12.0);
    assert_eq!(values(temp)[99], 12.0);
    assert_eq!(anomalies.coord("time")?, ds.coord("time")?);
    Ok(())
}

#[test]
fn test_operand_along_other_dimension_skips_members_without_it() -> Result<()> {
    let ds = weather()?;
    let offsets = DataArray::new(ArrayD::from_shape_vec(vec![2], vec![1.0, 2.0])?, &["x"])?;

    let shifted = ds.resample("time", &quarter_labels())?.sub(&offsets)?;
    assert_eq!(shifted.dim_len("time"), Some(100));
    assert_eq!(shifted.variable("temp")?, ds.variable("temp")?);
    assert_eq!(&values(shifted.variable("precip")?)[..4], &[-1.0, -1.0, -1.0, -1.0]);
    assert_eq!(values(shifted.variable("elevation")?), vec![119.0, 338.0]);
    Ok(())
}
