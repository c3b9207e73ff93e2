use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// ETA is only extrapolated once this fraction of the corpus is done.
const ETA_MIN_FRACTION: f64 = 0.001;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total_files: u64,
    pub files_completed: u64,
    pub total_bytes: u64,
    /// Bytes of input already accounted for, including earlier runs.
    pub bytes_done: u64,
    pub words_cleaned: u64,
    pub chunks_cleaned: u64,
    pub chunks_skipped: u64,
}

/// Read-only view handed to progress sinks before each chunk is sent.
#[derive(Clone, Debug)]
pub struct ProgressSnapshot {
    pub stats: Stats,
    pub file: String,
    pub chunk: u64,
    /// Fraction in `[0, 1]`.
    pub fraction: f64,
    pub elapsed: Duration,
    pub eta: Option<Duration>,
}

pub trait ProgressSink: Send + Sync {
    fn report(&self, snapshot: &ProgressSnapshot);
}

pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _snapshot: &ProgressSnapshot) {}
}

pub(crate) struct Clock {
    started: Instant,
}

impl Clock {
    pub(crate) fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub(crate) fn snapshot(&self, stats: &Stats, file: &str, chunk: u64) -> ProgressSnapshot {
        let elapsed = self.started.elapsed();
        let fraction = fraction(stats.bytes_done, stats.total_bytes);
        ProgressSnapshot {
            stats: stats.clone(),
            file: file.to_string(),
            chunk,
            fraction,
            elapsed,
            eta: eta(elapsed, fraction),
        }
    }
}

pub fn fraction(done: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (done as f64 / total as f64).clamp(0.0, 1.0)
}

/// `elapsed × (1/fraction − 1)`; undefined until enough work is done.
pub fn eta(elapsed: Duration, fraction: f64) -> Option<Duration> {
    if fraction <= ETA_MIN_FRACTION {
        return None;
    }
    let secs = elapsed.as_secs_f64() * (1.0 / fraction - 1.0);
    Some(Duration::from_secs_f64(secs.max(0.0)))
}

/// `H:MM:SS`, hours unbounded.
pub fn format_hms(d: Duration) -> String {
    let s = d.as_secs();
    format!("{}:{:02}:{:02}", s / 3600, (s / 60) % 60, s % 60)
}

pub fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eta_extrapolates_linearly() {
        let e = eta(Duration::from_secs(60), 0.25).unwrap();
        assert_eq!(e.as_secs(), 180);
    }

    #[test]
    fn eta_waits_for_some_progress() {
        assert!(eta(Duration::from_secs(60), 0.0005).is_none());
        assert!(eta(Duration::from_secs(60), 0.0).is_none());
    }

    #[test]
    fn fraction_of_empty_corpus() {
        assert_eq!(fraction(0, 0), 0.0);
        assert_eq!(fraction(50, 200), 0.25);
    }

    #[test]
    fn hms() {
        assert_eq!(format_hms(Duration::from_secs(3_725)), "1:02:05");
        assert_eq!(format_hms(Duration::from_secs(59)), "0:00:59");
    }

    #[test]
    fn words_split_on_any_whitespace() {
        assert_eq!(word_count("  واحد اثنان\n\tثلاثة "), 3);
        assert_eq!(word_count(""), 0);
    }
}
