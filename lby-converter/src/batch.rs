//! Пакетная конвертация: поиск файлов, группировка по датам, параллельное
//! декодирование и запись CSV/JSON.
//!
//! Рабочие потоки только декодируют. Результаты собираются главным потоком
//! в порядке входного списка, и все решения о записи (существует ли файл,
//! `--force`, `--dry-run`) принимаются последовательно. Поэтому две записи
//! с одинаковым тегом обрабатываются детерминированно.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use chrono::{Local, TimeZone};
use lby_core::{write_series_file, DecodedRecording, LbyDecoder, LbyError, LbyResult};
use log::{debug, error, info, warn};

use crate::{has_extension, BatchMetrics, ConvertConfig, ConverterError, ConverterResult, LBY_EXTENSIONS};

/// Итог обработки одного файла.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Файл записан (или ссылка создана)
    Written(PathBuf),
    /// Цель уже существует, `--force` не задан
    Skipped(PathBuf),
    /// `--dry-run`: только показано, куда был бы записан файл
    DryRun(PathBuf),
    /// Ошибка чтения или записи
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub source: PathBuf,
    pub status: FileStatus,
}

impl FileReport {
    pub fn is_error(&self) -> bool {
        matches!(self.status, FileStatus::Failed(_))
    }
}

/// Краткая сводка по записи для журнала: число точек и пиковое усилие.
pub fn conversion_note(rec: &DecodedRecording) -> String {
    format!("{} points, peak {:.3} kN", rec.len(), rec.peak_value())
}

/// Файлы `*.lby` в каталоге (без рекурсии, регистр расширения не важен),
/// отсортированные по пути.
pub fn list_lby_files(dir: &Path) -> ConverterResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ConverterError::MissingDirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, LBY_EXTENSIONS) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Группирует файлы по дате записи `YYYY-MM-DD` (UTC), читая только
/// начало каждого файла. Нечитаемые файлы возвращаются отдельно.
pub fn bucket_by_date<Tz: TimeZone>(
    decoder: &LbyDecoder<Tz>,
    files: &[PathBuf],
) -> (BTreeMap<String, Vec<PathBuf>>, Vec<(PathBuf, LbyError)>) {
    let mut buckets: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    let mut failures = Vec::new();

    for path in files {
        match decoder.peek_timestamp(path) {
            Ok(ts) => {
                debug!("{path:?}: {ts}");
                buckets.entry(ts.date_key()).or_default().push(path.clone());
            }
            Err(e) => {
                warn!("{e}");
                failures.push((path.clone(), e));
            }
        }
    }

    (buckets, failures)
}

/// Пакетная конвертация LBY → CSV/JSON.
pub struct ConvertBatch<Tz: TimeZone = Local> {
    config: ConvertConfig,
    decoder: LbyDecoder<Tz>,
    metrics: Arc<BatchMetrics>,
    stop_flag: Arc<AtomicBool>,
}

impl ConvertBatch<Local> {
    /// Пакет в часовом поясе хоста.
    pub fn new(config: ConvertConfig) -> (Self, Arc<BatchMetrics>) {
        Self::with_timezone(config, Local)
    }
}

impl<Tz: TimeZone + Sync> ConvertBatch<Tz> {
    pub fn with_timezone(
        config: ConvertConfig,
        tz: Tz,
    ) -> (Self, Arc<BatchMetrics>) {
        let metrics = BatchMetrics::new();
        let decoder = LbyDecoder::with_timezone(config.decoder.clone(), tz);

        let batch = Self {
            config,
            decoder,
            metrics: metrics.clone(),
            stop_flag: Arc::new(AtomicBool::new(false)),
        };

        (batch, metrics)
    }

    pub fn decoder(&self) -> &LbyDecoder<Tz> {
        &self.decoder
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Путь выходного файла для тега записи.
    pub fn output_path(
        &self,
        rec: &DecodedRecording,
    ) -> PathBuf {
        self.config.output_dir.join(format!(
            "{}{}",
            rec.sequence,
            self.config.output_format.extension()
        ))
    }

    /// Обрабатывает `files` и возвращает отчёты в порядке входа.
    ///
    /// После установки stop-флага новые файлы не берутся, в отчёт попадает
    /// только уже обработанное.
    pub fn run(
        &self,
        files: &[PathBuf],
    ) -> ConverterResult<Vec<FileReport>> {
        if !self.config.dry_run {
            fs::create_dir_all(&self.config.output_dir)?;
        }

        self.metrics
            .files_total
            .fetch_add(files.len() as u64, Ordering::Relaxed);

        let jobs = self.config.jobs.max(1).min(files.len().max(1));
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, &Path)>();
        let (res_tx, res_rx) =
            crossbeam_channel::bounded::<(usize, LbyResult<DecodedRecording>)>(jobs * 2);

        for (i, path) in files.iter().enumerate() {
            // приёмник жив до конца функции
            let _ = job_tx.send((i, path.as_path()));
        }
        drop(job_tx);

        let mut reports = Vec::with_capacity(files.len());

        thread::scope(|s| {
            for _ in 0..jobs {
                let rx = job_rx.clone();
                let tx = res_tx.clone();
                let decoder = &self.decoder;
                let stop = &self.stop_flag;

                s.spawn(move || {
                    for (i, path) in rx.iter() {
                        if stop.load(Ordering::Relaxed) {
                            break;
                        }

                        if tx.send((i, decoder.decode_file(path))).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(res_tx);

            //  Восстанавливаем порядок входного списка
            let mut pending = BTreeMap::new();
            let mut next = 0usize;

            for (i, result) in res_rx.iter() {
                pending.insert(i, result);

                while let Some(result) = pending.remove(&next) {
                    reports.push(self.handle(&files[next], result));
                    next += 1;
                }
            }

            // после остановки в очереди могут остаться разрывы
            for (i, result) in pending {
                reports.push(self.handle(&files[i], result));
            }
        });

        if self.stop_flag.load(Ordering::Relaxed) {
            warn!("Stopped: {} of {} files processed", reports.len(), files.len());
        }

        Ok(reports)
    }

    fn handle(
        &self,
        source: &Path,
        result: LbyResult<DecodedRecording>,
    ) -> FileReport {
        let status = match result {
            Ok(rec) => self.emit(source, &rec),
            Err(e) => {
                error!("{e}");
                self.metrics.failed.fetch_add(1, Ordering::Relaxed);
                FileStatus::Failed(e.to_string())
            }
        };

        FileReport {
            source: source.to_path_buf(),
            status,
        }
    }

    fn emit(
        &self,
        source: &Path,
        rec: &DecodedRecording,
    ) -> FileStatus {
        let m = &self.metrics;
        m.decoded.fetch_add(1, Ordering::Relaxed);
        m.samples_decoded.fetch_add(rec.len() as u64, Ordering::Relaxed);
        if rec.timestamp.is_fallback() {
            m.fallback_timestamps.fetch_add(1, Ordering::Relaxed);
        }

        let out = self.output_path(rec);

        if out.exists() && !self.config.force {
            info!("skip {:?}: {:?} exists", source, out);
            m.skipped.fetch_add(1, Ordering::Relaxed);
            return FileStatus::Skipped(out);
        }

        if self.config.dry_run {
            info!(
                "[dry-run] {:?} -> {:?} ({}, {})",
                source,
                out,
                conversion_note(rec),
                rec.timestamp
            );
            return FileStatus::DryRun(out);
        }

        match write_series_file(&out, &rec.series, self.config.output_format) {
            Ok(()) => {
                info!("{:?} -> {:?} ({})", source, out, conversion_note(rec));
                m.written.fetch_add(1, Ordering::Relaxed);
                FileStatus::Written(out)
            }
            Err(e) => {
                error!("write {out:?}: {e}");
                m.failed.fetch_add(1, Ordering::Relaxed);
                FileStatus::Failed(format!("write {}: {e}", out.display()))
            }
        }
    }
}
