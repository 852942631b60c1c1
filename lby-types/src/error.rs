use std::path::PathBuf;

use thiserror::Error;

/// Результат для операций LBY
pub type LbyResult<T> = std::result::Result<T, LbyError>;

/// Типы ошибок декодирования LBY.
#[derive(Debug, Error)]
pub enum LbyError {
    /// Исходный файл не читается (фатально только для этой записи)
    #[error("Cannot read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LbyError {
    pub fn read<P: Into<PathBuf>>(
        path: P,
        source: std::io::Error,
    ) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}
