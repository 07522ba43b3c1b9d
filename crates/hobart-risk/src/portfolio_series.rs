//! Year-by-year sequence of portfolios and the drift view.
//!
//! The drift view answers "what would this year's risk have been had I kept
//! last year's weights": for each adjacent pair (P[i], P[i+1]) it builds a
//! portfolio over P[i+1]'s period using P[i]'s weights.

use crate::error::Result;
use crate::period::Period;
use crate::portfolio::Portfolio;
use std::sync::Arc;
use tracing::debug;

/// Portfolios ordered by period start date.
#[derive(Debug, Clone, Default)]
pub struct PortfolioSeries {
    portfolios: Vec<Portfolio>,
}

impl PortfolioSeries {
    /// Create a series, ordering portfolios by period start date.
    pub fn new(mut portfolios: Vec<Portfolio>) -> Self {
        portfolios.sort_by_key(|p| p.period().start_date());
        Self { portfolios }
    }

    /// Minimum-variance portfolio for every period.
    ///
    /// # Errors
    /// Fails on the first period whose weights cannot be solved.
    pub fn min_variance(periods: &[Arc<Period>]) -> Result<Self> {
        let portfolios = periods
            .iter()
            .map(|period| Portfolio::min_variance(Arc::clone(period)))
            .collect::<Result<Vec<_>>>()?;
        debug!(portfolios = portfolios.len(), "built minimum-variance series");
        Ok(Self::new(portfolios))
    }

    /// Portfolios in period order.
    pub fn portfolios(&self) -> &[Portfolio] {
        &self.portfolios
    }

    /// Number of portfolios.
    pub fn len(&self) -> usize {
        self.portfolios.len()
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.portfolios.is_empty()
    }

    /// Period labels in order.
    pub fn labels(&self) -> Vec<String> {
        self.portfolios.iter().map(|p| p.period().label()).collect()
    }

    /// Variance of each portfolio, in order.
    ///
    /// # Errors
    /// Fails if any portfolio has too few observations.
    pub fn variance(&self) -> Result<Vec<f64>> {
        self.portfolios.iter().map(Portfolio::variance).collect()
    }

    /// Standard deviation of each portfolio, in order.
    ///
    /// # Errors
    /// Fails if any portfolio has too few observations.
    pub fn std_dev(&self) -> Result<Vec<f64>> {
        self.portfolios.iter().map(Portfolio::std_dev).collect()
    }

    /// Portfolios over each later period using the previous period's weights.
    ///
    /// The result has one fewer element than the series; the original
    /// portfolios are untouched.
    ///
    /// # Errors
    /// Returns a dimension mismatch if adjacent periods have different asset counts.
    pub fn prev_portfolios(&self) -> Result<Vec<Portfolio>> {
        self.portfolios
            .windows(2)
            .map(|pair| Portfolio::new(Arc::clone(pair[1].period()), pair[0].weights().clone()))
            .collect()
    }

    /// The drift view as a series of its own.
    ///
    /// # Errors
    /// See [`PortfolioSeries::prev_portfolios`].
    pub fn drift(&self) -> Result<Self> {
        Ok(Self::new(self.prev_portfolios()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use hobart_data::AssetName;
    use ndarray::{Array2, array};

    fn year_period(year: i32, prices: Array2<f64>) -> Arc<Period> {
        let dates = (0..prices.nrows())
            .map(|i| NaiveDate::from_ymd_opt(year, 3, 1 + i as u32).unwrap())
            .collect();
        Arc::new(Period::new(dates, vec![AssetName::Gold, AssetName::UsEquity], prices).unwrap())
    }

    fn periods() -> Vec<Arc<Period>> {
        vec![
            year_period(
                2019,
                array![[10.0, 20.0], [10.2, 19.8], [10.1, 20.5], [10.4, 20.1]],
            ),
            year_period(
                2020,
                array![[11.0, 21.0], [10.7, 21.6], [11.1, 21.2], [11.0, 22.0]],
            ),
            year_period(
                2021,
                array![[12.0, 23.0], [12.3, 22.5], [12.1, 23.4], [12.6, 23.1]],
            ),
        ]
    }

    #[test]
    fn test_new_orders_by_start_date() {
        let p = periods();
        let series = PortfolioSeries::new(vec![
            Portfolio::new(Arc::clone(&p[2]), vec![0.5, 0.5]).unwrap(),
            Portfolio::new(Arc::clone(&p[0]), vec![0.5, 0.5]).unwrap(),
        ]);
        assert_eq!(series.labels(), vec!["2019", "2021"]);
    }

    #[test]
    fn test_prev_portfolios() {
        let series = PortfolioSeries::min_variance(&periods()).unwrap();
        let prev = series.prev_portfolios().unwrap();

        assert_eq!(prev.len(), series.len() - 1);
        for (i, portfolio) in prev.iter().enumerate() {
            let later = &series.portfolios()[i + 1];
            let earlier = &series.portfolios()[i];
            assert!(Arc::ptr_eq(portfolio.period(), later.period()));
            assert_eq!(portfolio.weights(), earlier.weights());
        }

        // Originals keep their own weights
        let again = PortfolioSeries::min_variance(&periods()).unwrap();
        for (a, b) in series.portfolios().iter().zip(again.portfolios()) {
            assert_eq!(a.weights(), b.weights());
        }
    }

    #[test]
    fn test_min_variance_beats_carried_weights() {
        let series = PortfolioSeries::min_variance(&periods()).unwrap();
        let drift = series.drift().unwrap();
        let optimal = series.variance().unwrap();
        let carried = drift.variance().unwrap();

        for (i, v) in carried.iter().enumerate() {
            assert!(optimal[i + 1] <= *v + 1e-15);
        }
    }

    #[test]
    fn test_statistics_aligned_with_portfolios() {
        let series = PortfolioSeries::min_variance(&periods()).unwrap();
        let variance = series.variance().unwrap();
        let std_dev = series.std_dev().unwrap();

        assert_eq!(variance.len(), 3);
        for (var, sd) in variance.iter().zip(std_dev.iter()) {
            assert_abs_diff_eq!(var.sqrt(), *sd, epsilon = 1e-15);
        }
        for p in series.portfolios() {
            assert_abs_diff_eq!(p.weights().sum(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_empty_and_single() {
        let empty = PortfolioSeries::default();
        assert!(empty.is_empty());
        assert!(empty.prev_portfolios().unwrap().is_empty());

        let single = PortfolioSeries::min_variance(&periods()[..1]).unwrap();
        assert!(single.prev_portfolios().unwrap().is_empty());
    }
}
