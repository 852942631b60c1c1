use std::path::PathBuf;

use thiserror::Error;

pub type ConverterResult<T> = std::result::Result<T, ConverterError>;

#[derive(Debug, Error)]
pub enum ConverterError {
    /// Ошибка файловой системы
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка декодирования LBY
    #[error("LBY error: {0}")]
    Lby(#[from] lby_types::LbyError),

    /// Некорректный выбор дат
    #[error("Invalid date selection: {0}")]
    InvalidSelection(String),

    /// Каталог не существует или не является каталогом
    #[error("Directory does not exist: {0:?}")]
    MissingDirectory(PathBuf),

    /// Некорректная конфигурация
    #[error("Config error: {0}")]
    Config(String),
}
