use chrono::{DateTime, Utc};

/// Происхождение метки времени записи
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    /// Декодирована из заголовка LBY
    Header,
    /// Заголовок не дал даты, взято время модификации файла
    FileModified,
}

/// Метка времени записи. Всегда в UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingTimestamp {
    pub utc: DateTime<Utc>,
    pub source: TimestampSource,
}

impl RecordingTimestamp {
    pub fn from_header(utc: DateTime<Utc>) -> Self {
        Self {
            utc,
            source: TimestampSource::Header,
        }
    }

    pub fn from_mtime(utc: DateTime<Utc>) -> Self {
        Self {
            utc,
            source: TimestampSource::FileModified,
        }
    }

    /// `true`, если метка получена не из заголовка (низкая достоверность).
    pub fn is_fallback(&self) -> bool {
        self.source == TimestampSource::FileModified
    }

    /// Календарная дата в UTC, `YYYY-MM-DD`.
    pub fn date_key(&self) -> String {
        self.utc.format("%Y-%m-%d").to_string()
    }
}

impl std::fmt::Display for TimestampSource {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            TimestampSource::Header => write!(f, "header"),
            TimestampSource::FileModified => write!(f, "file-modification-fallback"),
        }
    }
}

impl std::fmt::Display for RecordingTimestamp {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{} UTC ({})", self.utc.format("%Y-%m-%d %H:%M:%S"), self.source)
    }
}
