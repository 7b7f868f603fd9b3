use approx::assert_relative_eq;
use llm_bench_metrics::statistical::StatisticalAnalyzer;
use test_case::test_case;

// ===== Mean / Standard Deviation =====

#[test]
fn test_mean_of_empty_is_undefined() {
    assert_eq!(StatisticalAnalyzer::mean(&[]), None);
}

#[test]
fn test_sample_and_population_std_differ() {
    let values = [1.0, 2.0, 3.0, 4.0];

    let sample = StatisticalAnalyzer::sample_std_dev(&values).unwrap();
    let population = StatisticalAnalyzer::population_std_dev(&values).unwrap();

    assert_relative_eq!(sample, (5.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    assert_relative_eq!(population, 1.25f64.sqrt(), epsilon = 1e-12);
    assert!(sample > population);
}

#[test]
fn test_sample_std_needs_two_values() {
    assert_eq!(StatisticalAnalyzer::sample_std_dev(&[3.0]), None);
    assert_relative_eq!(
        StatisticalAnalyzer::population_std_dev(&[3.0]).unwrap(),
        0.0
    );
}

// ===== Percentiles =====

#[test_case(0.0, 1.0 ; "minimum")]
#[test_case(0.25, 3.25 ; "first quartile")]
#[test_case(0.5, 5.5 ; "median")]
#[test_case(0.75, 7.75 ; "third quartile")]
#[test_case(1.0, 10.0 ; "maximum")]
fn test_linear_percentiles(q: f64, expected: f64) {
    let values: Vec<f64> = (1..=10).rev().map(f64::from).collect();
    assert_relative_eq!(
        StatisticalAnalyzer::percentile(&values, q).unwrap(),
        expected,
        epsilon = 1e-12
    );
}

#[test]
fn test_percentile_rejects_out_of_range_quantile() {
    assert_eq!(StatisticalAnalyzer::percentile(&[1.0], 1.5), None);
    assert_eq!(StatisticalAnalyzer::percentile(&[], 0.5), None);
}

// ===== Rounding =====

#[test_case(0.666_666, 4, 0.6667)]
#[test_case(0.75, 6, 0.75)]
#[test_case(0.125, 2, 0.13 ; "half rounds away from zero")]
fn test_round_to(value: f64, places: u32, expected: f64) {
    assert_relative_eq!(StatisticalAnalyzer::round_to(value, places), expected, epsilon = 1e-12);
}
