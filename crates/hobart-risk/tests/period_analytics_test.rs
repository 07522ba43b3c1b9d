//! Integration tests for the period and portfolio analytics chain

use approx::assert_abs_diff_eq;
use chrono::{Datelike, NaiveDate};
use hobart_data::{AssetName, AssetSeries};
use hobart_risk::{
    MinVarianceSolver, Portfolio, PortfolioSeries, RiskConfig, RiskError, divide_in_periods,
    min_variance_weights,
};
use std::sync::Arc;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Deterministic pseudo-random walk so tests do not depend on an RNG crate.
fn walk(name: AssetName, start: f64, seed: u64, dates: &[NaiveDate]) -> AssetSeries {
    let mut state = seed;
    let mut price = start;
    let rows = dates
        .iter()
        .map(|date| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let shock = ((state >> 33) as f64 / (1u64 << 31) as f64) - 0.5;
            price *= 1.0 + 0.02 * shock;
            (*date, price)
        })
        .collect();
    AssetSeries::from_rows(name, rows).unwrap()
}

fn business_days(years: std::ops::RangeInclusive<i32>) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    for year in years {
        let mut date = d(year, 1, 1);
        while date.year() == year {
            if date.weekday().number_from_monday() <= 5 {
                dates.push(date);
            }
            date = date.succ_opt().unwrap();
        }
    }
    dates
}

fn universe() -> Vec<AssetSeries> {
    let dates = business_days(2018..=2021);
    vec![
        walk(AssetName::Oil, 60.0, 1, &dates),
        walk(AssetName::Gold, 1300.0, 2, &dates),
        walk(AssetName::UsEquity, 2700.0, 3, &dates),
        walk(AssetName::UsTenYearBond, 120.0, 4, &dates),
    ]
}

#[test]
fn test_two_asset_scenario() {
    let a = AssetSeries::from_rows(
        AssetName::Oil,
        vec![(d(2022, 3, 1), 100.0), (d(2022, 3, 2), 102.0), (d(2022, 3, 3), 101.0)],
    )
    .unwrap();
    let b = AssetSeries::from_rows(
        AssetName::Gold,
        vec![(d(2022, 3, 1), 50.0), (d(2022, 3, 2), 49.0), (d(2022, 3, 3), 51.0)],
    )
    .unwrap();

    let periods = divide_in_periods(&[a, b]).unwrap();
    assert_eq!(periods.len(), 1);
    let period = &periods[0];

    let changes = period.change_matrix();
    assert_abs_diff_eq!(changes[[0, 0]], 0.02, epsilon = 1e-12);
    assert_abs_diff_eq!(changes[[0, 1]], -0.02, epsilon = 1e-12);
    assert_abs_diff_eq!(changes[[1, 0]], -0.0098, epsilon = 1e-4);
    assert_abs_diff_eq!(changes[[1, 1]], 0.0408, epsilon = 1e-4);

    // Divisor n - 1 = 1
    let cov = period.cov_matrix().unwrap();
    let x = [changes[[0, 0]], changes[[1, 0]]];
    let y = [changes[[0, 1]], changes[[1, 1]]];
    let (mx, my) = ((x[0] + x[1]) / 2.0, (y[0] + y[1]) / 2.0);
    let cov_xy = (x[0] - mx) * (y[0] - my) + (x[1] - mx) * (y[1] - my);
    assert_abs_diff_eq!(cov[[0, 1]], cov_xy, epsilon = 1e-15);
    assert_eq!(cov[[0, 1]], cov[[1, 0]]);

    // Two centered observations span a single direction, so the sample
    // covariance of two assets is rank one
    assert!(matches!(
        period.min_variance_weights(),
        Err(RiskError::SingularMatrix {
            assets: 2,
            observations: 2,
            ..
        })
    ));

    // Any invertible perturbation of it gives weights summing to one
    let regularised = cov + &(ndarray::Array2::<f64>::eye(2) * 1e-6);
    let inv = hobart_risk::covariance::invert_matrix(&regularised, 1e-12).unwrap();
    assert_abs_diff_eq!(min_variance_weights(&inv).unwrap().sum(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_covariance_properties_across_years() {
    let periods = divide_in_periods(&universe()).unwrap();
    assert_eq!(
        periods.iter().map(|p| p.year()).collect::<Vec<_>>(),
        vec![2018, 2019, 2020, 2021]
    );

    for period in &periods {
        let cov = period.cov_matrix().unwrap();
        let n = period.n_assets();
        for i in 0..n {
            for j in 0..n {
                assert_eq!(cov[[i, j]], cov[[j, i]]);
            }
        }

        let inv = period.cov_matrix_inv().unwrap();
        let product = inv.dot(cov);
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(product[[i, j]], expected, epsilon = 1e-8);
            }
        }

        let corr = period.corr_matrix().unwrap();
        for i in 0..n {
            assert_eq!(corr[[i, i]], 1.0);
        }

        let weights = period.min_variance_weights().unwrap();
        assert_abs_diff_eq!(weights.sum(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn test_min_variance_portfolio_has_lowest_variance() {
    let periods = divide_in_periods(&universe()).unwrap();
    let period = Arc::clone(&periods[1]);

    let optimal = Portfolio::min_variance(Arc::clone(&period)).unwrap();
    let equal = Portfolio::new(period, vec![0.25; 4]).unwrap();

    assert!(optimal.variance().unwrap() <= equal.variance().unwrap());
    assert_abs_diff_eq!(
        optimal.variance().unwrap(),
        optimal.quadratic_variance().unwrap(),
        epsilon = 1e-14
    );
}

#[test]
fn test_drift_view() {
    let periods = divide_in_periods(&universe()).unwrap();
    let series = PortfolioSeries::min_variance(&periods).unwrap();
    let prev = series.prev_portfolios().unwrap();

    assert_eq!(prev.len(), 3);
    for (i, carried) in prev.iter().enumerate() {
        assert!(Arc::ptr_eq(carried.period(), &periods[i + 1]));
        assert_eq!(carried.weights(), series.portfolios()[i].weights());
        assert!(carried.variance().unwrap() >= series.variance().unwrap()[i + 1] - 1e-15);
    }
}

#[test]
fn test_degenerate_tolerance_is_configurable() {
    let strict = MinVarianceSolver::new(RiskConfig {
        degenerate_tolerance: 0.5,
        ..Default::default()
    })
    .unwrap();
    let cov_inv = ndarray::array![[1.0, -0.9], [-0.9, 1.0]];

    // |denominator| = 0.2 is below 0.5 * 3.8
    assert!(matches!(
        strict.solve(&cov_inv),
        Err(RiskError::DegenerateSolution { .. })
    ));
    assert!(min_variance_weights(&cov_inv).is_ok());
}
