use crate::model::{HistoricalPriceSeries, PriceStatistics, StatsError};
use crate::utils::round2;

/// Trait defining the interface for a price-series analyzer.
pub trait Analyzer {
    /// Returns `Ok(None)` when the series holds no prices.
    fn calculate_stats(&self, series: &HistoricalPriceSeries) -> Result<Option<PriceStatistics>, StatsError>;
}

/// Implementation of the price-series analyzer.
pub struct AnalyzerImpl;

impl AnalyzerImpl {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnalyzerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for AnalyzerImpl {
    /// Growth rate, mean, min, max and sample standard deviation over the series,
    /// taking first and last in source order.
    fn calculate_stats(&self, series: &HistoricalPriceSeries) -> Result<Option<PriceStatistics>, StatsError> {
        let prices = series.prices();
        let (first, last) = match (prices.first(), prices.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Ok(None),
        };
        if first == 0.0 {
            return Err(StatsError::ZeroBasePrice);
        }

        let count = prices.len() as f64;
        let avg = prices.iter().sum::<f64>() / count;
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let stats = PriceStatistics {
            growth_rate_pct: round2((last - first) / first * 100.0),
            avg_price: round2(avg),
            min_price: min,
            max_price: max,
            volatility: round2(sample_std_dev(&prices, avg)),
        };
        ensure_finite(&stats)?;
        Ok(Some(stats))
    }
}

fn ensure_finite(stats: &PriceStatistics) -> Result<(), StatsError> {
    let fields = [
        ("growth rate", stats.growth_rate_pct),
        ("average price", stats.avg_price),
        ("minimum price", stats.min_price),
        ("maximum price", stats.max_price),
        ("volatility", stats.volatility),
    ];
    match fields.iter().find(|(_, v)| !v.is_finite()) {
        Some(&(field, _)) => Err(StatsError::NonFinite { field }),
        None => Ok(()),
    }
}

/// Bessel-corrected standard deviation; zero for fewer than two samples.
fn sample_std_dev(prices: &[f64], mean: f64) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }
    let variance = prices
        .iter()
        .map(|p| (p - mean).powi(2))
        .sum::<f64>() / (prices.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PricePoint;
    use chrono::NaiveDate;

    fn series(prices: &[f64]) -> HistoricalPriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        HistoricalPriceSeries::new(
            prices
                .iter()
                .enumerate()
                .map(|(i, &price)| PricePoint {
                    date: start + chrono::Days::new(i as u64),
                    price,
                })
                .collect(),
        )
    }

    fn stats_for(prices: &[f64]) -> PriceStatistics {
        AnalyzerImpl::new()
            .calculate_stats(&series(prices))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn empty_series_has_no_statistics() {
        let result = AnalyzerImpl::new().calculate_stats(&HistoricalPriceSeries::default());
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn constant_series_is_flat() {
        let stats = stats_for(&[5.0, 5.0, 5.0]);
        assert_eq!(stats.volatility, 0.0);
        assert_eq!(stats.avg_price, 5.0);
        assert_eq!(stats.min_price, 5.0);
        assert_eq!(stats.max_price, 5.0);
        assert_eq!(stats.growth_rate_pct, 0.0);
    }

    #[test]
    fn single_price_has_zero_volatility() {
        let stats = stats_for(&[100.0]);
        assert_eq!(stats.volatility, 0.0);
        assert_eq!(stats.growth_rate_pct, 0.0);
        assert_eq!(stats.avg_price, 100.0);
        assert_eq!(stats.min_price, 100.0);
        assert_eq!(stats.max_price, 100.0);
    }

    #[test]
    fn two_point_series() {
        let s = HistoricalPriceSeries::new(vec![
            PricePoint { date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), price: 100.0 },
            PricePoint { date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(), price: 150.0 },
        ]);
        let stats = AnalyzerImpl::new().calculate_stats(&s).unwrap().unwrap();
        assert_eq!(stats.growth_rate_pct, 50.0);
        assert_eq!(stats.avg_price, 125.0);
        assert_eq!(stats.min_price, 100.0);
        assert_eq!(stats.max_price, 150.0);
        assert_eq!(stats.volatility, 35.36);
    }

    #[test]
    fn growth_uses_source_order_not_extremes() {
        // falls, peaks, then ends below the start
        let stats = stats_for(&[200.0, 120.0, 260.0, 150.0]);
        assert_eq!(stats.growth_rate_pct, -25.0);
        assert_eq!(stats.min_price, 120.0);
        assert_eq!(stats.max_price, 260.0);
        assert_eq!(stats.avg_price, 182.5);
    }

    #[test]
    fn min_and_max_are_not_rounded() {
        let stats = stats_for(&[10.123, 10.987, 10.5]);
        assert_eq!(stats.min_price, 10.123);
        assert_eq!(stats.max_price, 10.987);
        assert_eq!(stats.avg_price, 10.54);
        assert_eq!(stats.growth_rate_pct, 3.72);
    }

    #[test]
    fn zero_first_price_is_an_error() {
        let result = AnalyzerImpl::new().calculate_stats(&series(&[0.0, 10.0]));
        assert_eq!(result, Err(StatsError::ZeroBasePrice));
    }

    #[test]
    fn tiny_first_price_overflows_growth() {
        let result = AnalyzerImpl::new().calculate_stats(&series(&[5e-324, 10.0]));
        assert_eq!(result, Err(StatsError::NonFinite { field: "growth rate" }));
    }

    #[test]
    fn huge_prices_overflow_average() {
        let result = AnalyzerImpl::new().calculate_stats(&series(&[1e308, 1.5e308]));
        assert_eq!(result, Err(StatsError::NonFinite { field: "average price" }));
    }

    #[test]
    fn zero_later_price_is_fine() {
        let stats = stats_for(&[10.0, 0.0]);
        assert_eq!(stats.growth_rate_pct, -100.0);
        assert_eq!(stats.min_price, 0.0);
    }
}
