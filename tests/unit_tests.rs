//! Unit tests for the supporting modules of labeled_resample
//!
//! These tests cover errors, parallel configuration, the reduction table and
//! the datetime accessor.

use chrono::{NaiveDate, NaiveDateTime};
use labeled_resample::{
    accessors::DateField,
    coords::{CoordValues, Coordinate, Label},
    errors::{ResampleError, Result},
    parallel::ParallelConfig,
    statistics::{StatOperation, StatisticalReduction},
};
use ndarray::ArrayD;

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(6, 30, 0))
        .expect("valid test timestamp")
}

#[test]
fn test_error_types() {
    // Test generic error
    let generic_err = ResampleError::Generic("Test error".to_string());
    assert_eq!(format!("{}", generic_err), "Test error");

    // Test variable not found error
    let var_err = ResampleError::VariableNotFound {
        var: "temp".to_string(),
    };
    assert!(format!("{}", var_err).contains("Variable 'temp' not found"));

    // Test dimension not found error
    let dim_err = ResampleError::DimensionNotFound {
        var: "temp".to_string(),
        dim: "time".to_string(),
    };
    assert!(format!("{}", dim_err).contains("Dimension 'time' not found in variable 'temp'"));

    let from_str: ResampleError = "boom".into();
    assert!(matches!(from_str, ResampleError::Generic(ref msg) if msg == "boom"));
}

#[test]
fn test_parallel_config() {
    // Test default configuration
    let default_config = ParallelConfig::new_default();
    assert!(default_config.num_threads.is_none());
    assert_eq!(default_config, ParallelConfig::default());

    // Test with specific threads
    let config_4 = ParallelConfig::with_threads(4);
    assert_eq!(config_4.num_threads, Some(4));

    // Test all cores configuration
    let all_cores_config = ParallelConfig::all_cores();
    assert!(all_cores_config.num_threads.is_some_and(|n| n > 0));
}

#[test]
fn test_install_uses_dedicated_pool() -> Result<()> {
    let threads = ParallelConfig::with_threads(3).install(rayon::current_num_threads)?;
    assert_eq!(threads, 3);
    Ok(())
}

#[test]
fn test_stat_operation() {
    assert_eq!(StatOperation::Mean, StatOperation::Mean);
    assert_ne!(StatOperation::Mean, StatOperation::Sum);

    // Test debug formatting
    let mean_op = StatOperation::Mean;
    assert_eq!(format!("{:?}", mean_op), "Mean");
    assert_eq!(StatOperation::from_name("argmax"), Some(StatOperation::ArgMax));
}

#[test]
fn test_reduction_table() -> Result<()> {
    // rows: [4, 1, NaN], [0, 0, 2]
    let data = ArrayD::from_shape_vec(vec![2, 3], vec![4.0, 1.0, f64::NAN, 0.0, 0.0, 2.0])?;
    let expected: [(StatOperation, [f64; 2]); 11] = [
        (StatOperation::Sum, [5.0, 2.0]),
        (StatOperation::Mean, [2.5, 2.0 / 3.0]),
        (StatOperation::Min, [1.0, 0.0]),
        (StatOperation::Max, [4.0, 2.0]),
        (StatOperation::Prod, [4.0, 0.0]),
        (StatOperation::Var, [2.25, 8.0 / 9.0]),
        (StatOperation::Median, [2.5, 0.0]),
        (StatOperation::Count, [2.0, 3.0]),
        (StatOperation::ArgMin, [1.0, 0.0]),
        (StatOperation::ArgMax, [0.0, 2.0]),
        (StatOperation::Any, [1.0, 1.0]),
    ];
    for (op, want) in expected {
        let got = data.reduce_along_axis(1, op)?;
        assert_eq!(got.shape(), &[2], "{}", op.as_str());
        for (g, w) in got.iter().zip(want) {
            assert!((g - w).abs() < 1e-12, "{}: got {}, want {}", op.as_str(), g, w);
        }
    }
    let all = data.reduce_along_axis(1, StatOperation::All)?;
    assert_eq!(all.iter().copied().collect::<Vec<_>>(), vec![1.0, 0.0]);
    Ok(())
}

#[test]
fn test_datetime_accessor_fields() -> Result<()> {
    let coord = Coordinate::new(
        "time",
        CoordValues::Time(vec![at(2000, 2, 29), at(2001, 2, 28), at(2001, 12, 31)]),
    );
    let dt = coord.dt()?;

    assert_eq!(dt.year().values(), &CoordValues::Int(vec![2000, 2001, 2001]));
    assert_eq!(dt.days_in_month().values(), &CoordValues::Int(vec![29, 28, 31]));
    assert_eq!(dt.daysinmonth(), dt.days_in_month());
    assert_eq!(dt.quarter().values(), &CoordValues::Int(vec![1, 1, 4]));
    assert_eq!(dt.dayofyear().values(), &CoordValues::Int(vec![60, 59, 365]));
    assert_eq!(dt.hour().values(), &CoordValues::Int(vec![6, 6, 6]));
    assert_eq!(dt.minute().values(), &CoordValues::Int(vec![30, 30, 30]));
    // 2000-02-29 was a Tuesday, 2001-12-31 a Monday
    assert_eq!(dt.dayofweek().values(), &CoordValues::Int(vec![1, 2, 0]));
    assert_eq!(
        dt.weekday_name().values(),
        &CoordValues::Text(vec!["Tuesday".into(), "Wednesday".into(), "Monday".into()])
    );
    assert_eq!(dt.field(DateField::Month).dim(), Some("time"));
    assert_eq!(
        dt.month().labels()?,
        vec![Label::Int(2), Label::Int(2), Label::Int(12)]
    );
    Ok(())
}

#[test]
fn test_datetime_accessor_rejects_other_values() {
    let coord = Coordinate::new("time", CoordValues::Int(vec![1, 2, 3]));
    match coord.dt() {
        Err(err @ ResampleError::NotDatetimeLike { .. }) => {
            assert!(err.to_string().contains("'dt' accessor"));
            assert!(err.to_string().contains("integer"));
        }
        other => panic!("Expected NotDatetimeLike, got {:?}", other),
    }
}
