use tanqih_core::stats::{ProgressSink, ProgressSnapshot, format_hms};

const BAR_WIDTH: usize = 30;

/// One status line on stderr per chunk.
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn report(&self, s: &ProgressSnapshot) {
        eprintln!("{}", render(s));
    }
}

pub fn render(s: &ProgressSnapshot) -> String {
    let eta = s.eta.map(format_hms).unwrap_or_else(|| "--:--:--".to_string());
    format!(
        "[{}] {:>6.2}%  eta {}  elapsed {}  words {}  files {}/{}  {} (chunk {})",
        bar(s.fraction),
        s.fraction * 100.0,
        eta,
        format_hms(s.elapsed),
        s.stats.words_cleaned,
        s.stats.files_completed,
        s.stats.total_files,
        s.file,
        s.chunk
    )
}

fn bar(fraction: f64) -> String {
    let filled = ((BAR_WIDTH as f64) * fraction) as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "─".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tanqih_core::stats::Stats;

    #[test]
    fn renders_eta_once_known() {
        let snap = ProgressSnapshot {
            stats: Stats {
                total_files: 4,
                files_completed: 1,
                words_cleaned: 1200,
                ..Default::default()
            },
            file: "f.txt".into(),
            chunk: 3,
            fraction: 0.5,
            elapsed: Duration::from_secs(90),
            eta: Some(Duration::from_secs(90)),
        };
        let line = render(&snap);
        assert!(line.contains(" 50.00%"));
        assert!(line.contains("eta 0:01:30"));
        assert!(line.contains("files 1/4  f.txt (chunk 3)"));
        assert_eq!(bar(0.5).chars().filter(|c| *c == '█').count(), 15);
    }

    #[test]
    fn unknown_eta_is_dashed() {
        let snap = ProgressSnapshot {
            stats: Stats::default(),
            file: "a.txt".into(),
            chunk: 1,
            fraction: 0.0,
            elapsed: Duration::ZERO,
            eta: None,
        };
        assert!(render(&snap).contains("eta --:--:--"));
    }
}
