use std::path::{Path, PathBuf};

use lby_core::{DecoderConfig, OutputFormat, LBY_SOURCE_TAG};

/// Каталог приёма по умолчанию
pub const DEFAULT_INTAKE_DIR: &str = "~/Projects/AnchorTesting/_Intake";

/// Имя каталога со ссылками в каноническом UTC-формате
pub const STAGED_DIR_NAME: &str = "_StagedUTC";

/// Расширения файлов разрывной машины (без учёта регистра)
pub const LBY_EXTENSIONS: &[&str] = &["lby"];

/// Расширения медиафайлов, которые встречаются в каталоге приёма
pub const MEDIA_EXTENSIONS: &[&str] = &["mov", "mp4", "heic", "jpg", "jpeg"];

/// Конфигурация команды `convert`.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Каталог с исходными .LBY
    pub input_dir: PathBuf,
    /// Каталог для CSV/JSON
    pub output_dir: PathBuf,
    /// Формат выходных файлов
    pub output_format: OutputFormat,
    /// Ничего не записывать, только показать
    pub dry_run: bool,
    /// Перезаписывать существующие файлы
    pub force: bool,
    /// Количество рабочих потоков декодирования
    pub jobs: usize,
    /// Параметры декодера
    pub decoder: DecoderConfig,
}

/// Конфигурация команды `stage`.
#[derive(Debug, Clone)]
pub struct StageConfig {
    /// Каталог приёма с подкаталогами `<YYYY-MM-DD>_import`
    pub intake_dir: PathBuf,
    pub dry_run: bool,
    pub force: bool,
    /// Тег источника в каноническом имени
    pub source_tag: String,
    pub decoder: DecoderConfig,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl ConvertConfig {
    /// Проверяет параметры до запуска.
    pub fn validate(&self) -> Result<(), String> {
        if self.jobs == 0 {
            return Err("jobs must be > 0".to_string());
        }

        if !self.decoder.scale.is_finite() || !self.decoder.sample_interval_s.is_finite() {
            return Err("scale and sample interval must be finite".to_string());
        }

        if self.decoder.sample_interval_s <= 0.0 {
            return Err("sample interval must be > 0".to_string());
        }

        Ok(())
    }
}

impl StageConfig {
    /// Каталог приёма для конкретной даты.
    pub fn import_dir(
        &self,
        date: &str,
    ) -> PathBuf {
        self.intake_dir.join(format!("{date}_import"))
    }

    /// Каталог `_StagedUTC` рядом с каталогом приёма.
    pub fn staged_dir(&self) -> PathBuf {
        self.intake_dir
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(STAGED_DIR_NAME)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("./output"),
            output_format: OutputFormat::Csv,
            dry_run: false,
            force: false,
            jobs: 1,
            decoder: DecoderConfig::default(),
        }
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            intake_dir: expand_tilde(Path::new(DEFAULT_INTAKE_DIR)),
            dry_run: false,
            force: false,
            source_tag: LBY_SOURCE_TAG.to_string(),
            decoder: DecoderConfig::default(),
        }
    }
}

/// Раскрывает ведущий `~` в домашний каталог (`$HOME`).
pub fn expand_tilde(path: &Path) -> PathBuf {
    let home = match std::env::var_os("HOME") {
        Some(h) => PathBuf::from(h),
        None => return path.to_path_buf(),
    };

    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// `true`, если расширение файла входит в `exts` (без учёта регистра).
pub fn has_extension(
    path: &Path,
    exts: &[&str],
) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| exts.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
