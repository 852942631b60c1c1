//! Подготовка дня испытаний: ссылки на записи LBY под каноническими
//! UTC-именами в каталоге `_StagedUTC`.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{atomic::Ordering, Arc},
};

use chrono::{Local, NaiveDate, TimeZone};
use lby_core::{canonical_file_name, sequence_tag, LbyDecoder};
use log::{debug, error, info, warn};

use crate::{
    has_extension, BatchMetrics, ConverterError, ConverterResult, FileReport, FileStatus, StageConfig,
    DATE_FORMAT, LBY_EXTENSIONS, MEDIA_EXTENSIONS,
};

/// Сессия подготовки одного или нескольких дней.
pub struct StageSession<Tz: TimeZone = Local> {
    config: StageConfig,
    decoder: LbyDecoder<Tz>,
    metrics: Arc<BatchMetrics>,
}

impl StageSession<Local> {
    pub fn new(config: StageConfig) -> (Self, Arc<BatchMetrics>) {
        Self::with_timezone(config, Local)
    }
}

impl<Tz: TimeZone> StageSession<Tz> {
    pub fn with_timezone(
        config: StageConfig,
        tz: Tz,
    ) -> (Self, Arc<BatchMetrics>) {
        let metrics = BatchMetrics::new();
        let decoder = LbyDecoder::with_timezone(config.decoder.clone(), tz);

        let session = Self {
            config,
            decoder,
            metrics: metrics.clone(),
        };

        (session, metrics)
    }

    /// Каноническое имя для записи LBY: дата из заголовка (или mtime),
    /// тег источника, тег записи.
    pub fn staged_name(
        &self,
        source: &Path,
    ) -> ConverterResult<String> {
        let ts = self.decoder.peek_timestamp(source)?;
        if ts.is_fallback() {
            self.metrics.fallback_timestamps.fetch_add(1, Ordering::Relaxed);
        }

        let ext = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let seq = sequence_tag(source.file_name().map(Path::new).unwrap_or(source));

        Ok(canonical_file_name(&ts.utc, &self.config.source_tag, seq.as_str(), &ext))
    }

    /// Подготавливает каталог `<intake>/<date>_import`.
    pub fn run(
        &self,
        date: &str,
    ) -> ConverterResult<Vec<FileReport>> {
        NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|e| ConverterError::InvalidSelection(format!("'{date}': {e}")))?;

        let import_dir = self.config.import_dir(date);
        if !import_dir.is_dir() {
            return Err(ConverterError::MissingDirectory(import_dir));
        }

        let staged_dir = self.config.staged_dir();
        if !self.config.dry_run {
            fs::create_dir_all(&staged_dir)?;
        }

        let mut entries: Vec<PathBuf> = fs::read_dir(&import_dir)?
            .map(|e| e.map(|e| e.path()))
            .collect::<io::Result<_>>()?;
        entries.sort();

        let mut reports = Vec::new();

        for path in entries.into_iter().filter(|p| p.is_file()) {
            if has_extension(&path, MEDIA_EXTENSIONS) {
                info!("skip media {:?}", path);
                self.metrics.skipped.fetch_add(1, Ordering::Relaxed);
                continue;
            }

            if !has_extension(&path, LBY_EXTENSIONS) {
                debug!("ignore {:?}", path);
                continue;
            }

            self.metrics.files_total.fetch_add(1, Ordering::Relaxed);
            let status = match self.stage_file(&path, &staged_dir) {
                Ok(status) => status,
                Err(e) => {
                    error!("{path:?}: {e}");
                    self.metrics.failed.fetch_add(1, Ordering::Relaxed);
                    FileStatus::Failed(e.to_string())
                }
            };

            reports.push(FileReport {
                source: path,
                status,
            });
        }

        if reports.is_empty() {
            warn!("No LBY files in {:?}", import_dir);
        }

        Ok(reports)
    }

    fn stage_file(
        &self,
        source: &Path,
        staged_dir: &Path,
    ) -> ConverterResult<FileStatus> {
        let target = staged_dir.join(self.staged_name(source)?);
        self.metrics.decoded.fetch_add(1, Ordering::Relaxed);

        // symlink_metadata видит и битые ссылки
        let exists = fs::symlink_metadata(&target).is_ok();

        if exists && !self.config.force {
            info!("skip {:?}: exists", target);
            self.metrics.skipped.fetch_add(1, Ordering::Relaxed);
            return Ok(FileStatus::Skipped(target));
        }

        if self.config.dry_run {
            info!("[dry-run] {:?} -> {:?}", source, target);
            return Ok(FileStatus::DryRun(target));
        }

        if exists {
            fs::remove_file(&target)?;
        }

        link_or_copy(&fs::canonicalize(source)?, &target)?;
        info!("{:?} -> {:?}", source, target);
        self.metrics.written.fetch_add(1, Ordering::Relaxed);

        Ok(FileStatus::Written(target))
    }
}

#[cfg(unix)]
fn link_or_copy(
    source: &Path,
    target: &Path,
) -> io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

#[cfg(not(unix))]
fn link_or_copy(
    source: &Path,
    target: &Path,
) -> io::Result<()> {
    fs::copy(source, target).map(|_| ())
}
