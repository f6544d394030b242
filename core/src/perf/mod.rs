//! Expected-value scenarios and timing summaries shared by the Criterion
//! benches, `arena verify` and `arena run`.

pub mod scenarios;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Summary of a set of timing samples, in nanoseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStats {
    pub samples: usize,
    pub mean_ns: f64,
    pub median_ns: f64,
    pub std_dev_ns: f64,
    pub min_ns: f64,
    pub max_ns: f64,
    pub p50_ns: f64,
    pub p95_ns: f64,
    pub p99_ns: f64,
}

impl TimeStats {
    pub fn from_durations(durations: &[Duration]) -> Self {
        let samples: Vec<f64> = durations.iter().map(|d| d.as_nanos() as f64).collect();
        Self::from_samples(samples)
    }

    pub fn from_samples(mut samples: Vec<f64>) -> Self {
        samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let n = samples.len();
        if n == 0 {
            return Self {
                samples: 0,
                mean_ns: 0.0,
                median_ns: 0.0,
                std_dev_ns: 0.0,
                min_ns: 0.0,
                max_ns: 0.0,
                p50_ns: 0.0,
                p95_ns: 0.0,
                p99_ns: 0.0,
            };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        // Sample standard deviation; a single sample has none.
        let std_dev = if n > 1 {
            let var = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };
        let median = quantile(&samples, 0.5);
        Self {
            samples: n,
            mean_ns: mean,
            median_ns: median,
            std_dev_ns: std_dev,
            min_ns: samples[0],
            max_ns: samples[n - 1],
            p50_ns: median,
            p95_ns: quantile(&samples, 0.95),
            p99_ns: quantile(&samples, 0.99),
        }
    }
}

/// Linear-interpolated quantile over an ascending slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = pos - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolates() {
        let data = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(quantile(&data, 0.0), 10.0);
        assert_eq!(quantile(&data, 0.5), 30.0);
        assert_eq!(quantile(&data, 1.0), 50.0);
        assert_eq!(quantile(&data, 0.125), 15.0);
        assert_eq!(quantile(&[], 0.5), 0.0);
        assert_eq!(quantile(&[7.0], 0.99), 7.0);
    }

    #[test]
    fn test_time_stats_from_samples() {
        let stats = TimeStats::from_samples(vec![4.0, 2.0, 8.0, 6.0]);
        assert_eq!(stats.samples, 4);
        assert_eq!(stats.mean_ns, 5.0);
        assert_eq!(stats.median_ns, 5.0);
        assert_eq!(stats.min_ns, 2.0);
        assert_eq!(stats.max_ns, 8.0);
        assert!((stats.std_dev_ns - (20.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_time_stats_empty_and_single() {
        assert_eq!(TimeStats::from_samples(Vec::new()).samples, 0);
        let single = TimeStats::from_durations(&[Duration::from_nanos(1500)]);
        assert_eq!(single.mean_ns, 1500.0);
        assert_eq!(single.std_dev_ns, 0.0);
        assert_eq!(single.p99_ns, 1500.0);
    }
}
