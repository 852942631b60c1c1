use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};

/// Счётчики пакетной обработки, обновляемые lock-free из рабочих потоков.
#[derive(Debug, Default)]
pub struct BatchMetrics {
    pub files_total: AtomicU64,
    pub decoded: AtomicU64,
    pub failed: AtomicU64,
    pub skipped: AtomicU64,
    pub written: AtomicU64,
    pub fallback_timestamps: AtomicU64,
    pub samples_decoded: AtomicU64,
}

/// Snapshot метрик для вывода / тестирования.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub duration_secs: f64,
    pub files_total: u64,
    pub decoded: u64,
    pub failed: u64,
    pub skipped: u64,
    pub written: u64,
    pub fallback_timestamps: u64,
    pub samples_decoded: u64,
    pub files_per_sec: f64,
}

impl BatchMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Файлы, обработанные без ошибок (записанные, пропущенные, dry-run).
    pub fn succeeded(&self) -> u64 {
        let total = self.files_total.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        total.saturating_sub(failed)
    }

    pub fn has_errors(&self) -> bool {
        self.failed.load(Ordering::Relaxed) > 0
    }

    pub fn files_per_sec(
        &self,
        elapsed: &Instant,
    ) -> f64 {
        let secs = elapsed.elapsed().as_secs_f64();

        if secs < 1e-9 {
            return 0.0;
        }

        self.files_total.load(Ordering::Relaxed) as f64 / secs
    }

    /// Итоговая сводка для вывода в конце запуска.
    pub fn summary(
        &self,
        elapsed: &Instant,
    ) -> BatchSummary {
        BatchSummary {
            duration_secs: elapsed.elapsed().as_secs_f64(),
            files_total: self.files_total.load(Ordering::Relaxed),
            decoded: self.decoded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            written: self.written.load(Ordering::Relaxed),
            fallback_timestamps: self.fallback_timestamps.load(Ordering::Relaxed),
            samples_decoded: self.samples_decoded.load(Ordering::Relaxed),
            files_per_sec: self.files_per_sec(elapsed),
        }
    }
}

/// Итоговая строка запуска для stdout.
pub fn completion_line(
    dry_run: bool,
    processed: usize,
    errors: usize,
) -> String {
    if dry_run {
        format!("Dry run complete. Would process {processed} files, {errors} errors.")
    } else {
        format!("Processed {processed} files, {errors} errors.")
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "  Duration      : {:.1}s", self.duration_secs)?;
        writeln!(f, "  Files         : {}", self.files_total)?;
        writeln!(f, "  Decoded       : {}", self.decoded)?;
        writeln!(f, "  Written       : {}", self.written)?;
        writeln!(f, "  Skipped       : {}", self.skipped)?;
        writeln!(f, "  Errors        : {}", self.failed)?;
        writeln!(f, "  Mtime dates   : {}", self.fallback_timestamps)?;
        writeln!(f, "  Samples       : {}", self.samples_decoded)?;
        writeln!(f, "  Speed         : {:.1} files/s", self.files_per_sec)?;
        write!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")
    }
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use super::*;

    #[test]
    fn test_initial_metrics_zero() {
        let metrics = BatchMetrics::new();
        let summary = metrics.summary(&Instant::now());

        assert_eq!(summary.files_total, 0);
        assert_eq!(summary.decoded, 0);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.written, 0);
        assert_eq!(summary.files_per_sec, 0.0);
        assert!(!metrics.has_errors());
    }

    #[test]
    fn test_succeeded_excludes_failures() {
        let metrics = BatchMetrics::new();
        metrics.files_total.store(10, Ordering::Relaxed);
        metrics.failed.store(3, Ordering::Relaxed);

        assert_eq!(metrics.succeeded(), 7);
        assert!(metrics.has_errors());
    }

    #[test]
    fn test_files_per_sec() {
        let metrics = BatchMetrics::new();
        metrics.files_total.store(20, Ordering::Relaxed);

        let start = Instant::now() - Duration::from_secs(2);
        assert!((metrics.files_per_sec(&start) - 10.0).abs() < 0.5);
    }

    #[test]
    fn test_completion_line() {
        assert_eq!(completion_line(false, 3, 1), "Processed 3 files, 1 errors.");
        assert_eq!(
            completion_line(true, 3, 0),
            "Dry run complete. Would process 3 files, 0 errors."
        );
    }

    #[test]
    fn test_multithreaded_updates() {
        let metrics = BatchMetrics::new();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let m = metrics.clone();
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        m.decoded.fetch_add(1, Ordering::Relaxed);
                        m.samples_decoded.fetch_add(100, Ordering::Relaxed);
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(metrics.decoded.load(Ordering::Relaxed), 4_000);
        assert_eq!(metrics.samples_decoded.load(Ordering::Relaxed), 400_000);
    }
}
