//! Distribution summary over nanosecond timing samples.

use std::{fmt, time::Duration};

/// Summary statistics of a set of latency samples.
///
/// Percentiles use the nearest-rank method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySummary {
    /// Number of samples.
    pub count: usize,
    /// Sum of every sample.
    pub cumulative: Duration,
    /// Arithmetic mean.
    pub mean: Duration,
    /// Harmonic mean; zero when any sample is zero.
    pub hmean: Duration,
    /// Median.
    pub p50: Duration,
    /// 75th percentile.
    pub p75: Duration,
    /// 95th percentile.
    pub p95: Duration,
    /// 99th percentile.
    pub p99: Duration,
    /// 99.9th percentile.
    pub p999: Duration,
    /// Mean of the slowest 5% of samples.
    pub long_5p: Duration,
    /// Mean of the fastest 5% of samples.
    pub short_5p: Duration,
    /// Slowest sample.
    pub max: Duration,
    /// Fastest sample.
    pub min: Duration,
    /// `max - min`.
    pub range: Duration,
    /// Population standard deviation.
    pub stddev: Duration,
    /// Samples per second of cumulative time.
    pub rate_per_sec: f64,
}

impl LatencySummary {
    /// Summarizes `samples`, given in nanoseconds. Returns `None` when there
    /// are no samples.
    pub fn from_samples(samples: &[u64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let n = sorted.len();
        let total: u128 = sorted.iter().map(|&s| u128::from(s)).sum();
        let mean = total as f64 / n as f64;

        let hmean = if sorted[0] == 0 {
            0.0
        } else {
            n as f64 / sorted.iter().map(|&s| 1.0 / s as f64).sum::<f64>()
        };

        let variance = sorted.iter().map(|&s| (s as f64 - mean).powi(2)).sum::<f64>() / n as f64;

        let tail = (n / 20).max(1);
        let short_5p = mean_of(&sorted[..tail]);
        let long_5p = mean_of(&sorted[n - tail..]);

        let cumulative = nanos(total as f64);
        let rate_per_sec = if total == 0 { 0.0 } else { n as f64 / cumulative.as_secs_f64() };

        Some(Self {
            count: n,
            cumulative,
            mean: nanos(mean),
            hmean: nanos(hmean),
            p50: Duration::from_nanos(percentile(&sorted, 0.50)),
            p75: Duration::from_nanos(percentile(&sorted, 0.75)),
            p95: Duration::from_nanos(percentile(&sorted, 0.95)),
            p99: Duration::from_nanos(percentile(&sorted, 0.99)),
            p999: Duration::from_nanos(percentile(&sorted, 0.999)),
            long_5p: nanos(long_5p),
            short_5p: nanos(short_5p),
            max: Duration::from_nanos(sorted[n - 1]),
            min: Duration::from_nanos(sorted[0]),
            range: Duration::from_nanos(sorted[n - 1] - sorted[0]),
            stddev: nanos(variance.sqrt()),
            rate_per_sec,
        })
    }
}

/// Value at `fraction` of a sorted, non-empty slice.
fn percentile(sorted: &[u64], fraction: f64) -> u64 {
    let rank = (fraction * sorted.len() as f64).ceil() as usize;
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}

fn mean_of(values: &[u64]) -> f64 {
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

fn nanos(value: f64) -> Duration {
    Duration::from_nanos(value.round() as u64)
}

impl fmt::Display for LatencySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} samples:", self.count)?;
        writeln!(f, "Cumulative:\t{:?}", self.cumulative)?;
        writeln!(f, "HMean:\t\t{:?}", self.hmean)?;
        writeln!(f, "Avg.:\t\t{:?}", self.mean)?;
        writeln!(f, "p50: \t\t{:?}", self.p50)?;
        writeln!(f, "p75:\t\t{:?}", self.p75)?;
        writeln!(f, "p95:\t\t{:?}", self.p95)?;
        writeln!(f, "p99:\t\t{:?}", self.p99)?;
        writeln!(f, "p999:\t\t{:?}", self.p999)?;
        writeln!(f, "Long 5%:\t{:?}", self.long_5p)?;
        writeln!(f, "Short 5%:\t{:?}", self.short_5p)?;
        writeln!(f, "Max:\t\t{:?}", self.max)?;
        writeln!(f, "Min:\t\t{:?}", self.min)?;
        writeln!(f, "Range:\t\t{:?}", self.range)?;
        writeln!(f, "StdDev:\t\t{:?}", self.stddev)?;
        write!(f, "Rate/sec.:\t{:.2}", self.rate_per_sec)
    }
}
