use statrs::statistics::Statistics;

/// Descriptive statistics over the valid values of a scoring column.
///
/// Every function returns `None` where the statistic is undefined rather than
/// a NaN; callers decide whether undefined becomes `null` or `0.0`.
pub struct StatisticalAnalyzer;

impl StatisticalAnalyzer {
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.mean())
    }

    /// Sample standard deviation (divisor n - 1); needs at least two values.
    pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
        if values.len() < 2 {
            return None;
        }
        Some(values.std_dev())
    }

    /// Population standard deviation (divisor n).
    pub fn population_std_dev(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.population_std_dev())
    }

    /// Quantile `q` in `[0, 1]` with linear interpolation between closest ranks,
    /// at position `q * (n - 1)` of the sorted values.
    pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
        if values.is_empty() || !(0.0..=1.0).contains(&q) {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let position = q * (sorted.len() - 1) as f64;
        let lower = position.floor() as usize;
        let upper = position.ceil() as usize;
        let fraction = position - lower as f64;

        Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
    }

    /// Half-away-from-zero rounding to `places` decimals.
    pub fn round_to(value: f64, places: u32) -> f64 {
        let factor = 10f64.powi(places as i32);
        (value * factor).round() / factor
    }
}
