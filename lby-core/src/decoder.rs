//! Конвейер декодирования одной записи:
//! буфер → смещение → дата из заголовка (или mtime) → отсчёты → ряд.
//!
//! Декодер не хранит состояния между записями, поэтому один экземпляр
//! можно разделять между потоками.

use std::{
    fs::{self, File},
    io::Read,
    path::Path,
};

use chrono::{DateTime, Local, TimeZone, Utc};
use lby_types::{DecodedRecording, LbyError, LbyResult, RecordingTimestamp, SampleWidth};
use log::{debug, trace, warn};

use crate::{
    build_series, collapse_to_u16, decode_header_timestamp, decode_samples, header_strings,
    sequence_tag, split_recording, LBY_DEFAULT_MAX_YEAR, LBY_FORCE_SCALE, LBY_HEADER_PEEK_SIZE,
    LBY_SAMPLE_INTERVAL_S,
};

/// Параметры декодирования.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderConfig {
    /// Верхняя граница допустимого года в заголовке
    pub max_year: u16,
    /// Множитель отсчёт → кН
    pub scale: f64,
    /// Период дискретизации, секунды
    pub sample_interval_s: f64,
    /// Разрядность слов полезной нагрузки
    pub sample_width: SampleWidth,
    /// Схлопывать 32-битный поток в 16-битный, если старшие половины нулевые
    pub collapse_u16: bool,
}

/// Декодер LBY, привязанный к часовому поясу прибора.
#[derive(Debug, Clone)]
pub struct LbyDecoder<Tz: TimeZone = Local> {
    config: DecoderConfig,
    tz: Tz,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_year: LBY_DEFAULT_MAX_YEAR,
            scale: LBY_FORCE_SCALE,
            sample_interval_s: LBY_SAMPLE_INTERVAL_S,
            sample_width: SampleWidth::Bits32,
            collapse_u16: false,
        }
    }
}

impl LbyDecoder<Local> {
    /// Декодер в часовом поясе хоста.
    pub fn new(config: DecoderConfig) -> Self {
        Self { config, tz: Local }
    }
}

impl Default for LbyDecoder<Local> {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

impl<Tz: TimeZone> LbyDecoder<Tz> {
    pub fn with_timezone(
        config: DecoderConfig,
        tz: Tz,
    ) -> Self {
        Self { config, tz }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Дата из заголовка в UTC или `None`.
    pub fn header_timestamp(
        &self,
        header: &[u8],
    ) -> Option<DateTime<Utc>> {
        decode_header_timestamp(header, self.config.max_year, &self.tz)
    }

    /// Декодирует уже загруженный буфер.
    ///
    /// `file_name` нужен для тега записи, `mtime` подставляется, если
    /// заголовок не дал даты.
    pub fn decode_bytes<P: AsRef<Path>>(
        &self,
        data: &[u8],
        file_name: P,
        mtime: DateTime<Utc>,
    ) -> DecodedRecording {
        let name = file_name.as_ref();
        let regions = split_recording(data);
        trace!("{name:?}: payload at offset {}", regions.offset);

        let timestamp = match self.header_timestamp(regions.header) {
            Some(utc) => RecordingTimestamp::from_header(utc),
            None => {
                warn!("{name:?}: no header timestamp, using file mtime");
                RecordingTimestamp::from_mtime(mtime)
            }
        };

        if log::log_enabled!(log::Level::Debug) {
            debug!("{name:?}: header strings {:?}", header_strings(regions.header));
        }

        let words = decode_samples(regions.payload, self.config.sample_width);
        let (samples, sample_width) =
            if self.config.collapse_u16 && self.config.sample_width == SampleWidth::Bits32 {
                collapse_to_u16(words)
            } else {
                (words, self.config.sample_width)
            };
        trace!("{name:?}: {} samples as {sample_width}", samples.len());

        DecodedRecording {
            timestamp,
            sequence: sequence_tag(name),
            data_offset: regions.offset,
            sample_width,
            series: build_series(&samples, self.config.scale, self.config.sample_interval_s),
        }
    }

    /// Читает и декодирует файл. Ошибка только если файл не читается.
    pub fn decode_file(
        &self,
        path: &Path,
    ) -> LbyResult<DecodedRecording> {
        let data = fs::read(path).map_err(|e| LbyError::read(path, e))?;
        let mtime = file_mtime_utc(path)?;
        let name = path.file_name().map(Path::new).unwrap_or(path);

        Ok(self.decode_bytes(&data, name, mtime))
    }

    /// Быстрое определение даты записи по первым байтам файла, без поиска
    /// полезной нагрузки. При неудаче берётся время модификации.
    pub fn peek_timestamp(
        &self,
        path: &Path,
    ) -> LbyResult<RecordingTimestamp> {
        let mut header = Vec::with_capacity(LBY_HEADER_PEEK_SIZE);
        File::open(path)
            .and_then(|f| f.take(LBY_HEADER_PEEK_SIZE as u64).read_to_end(&mut header))
            .map_err(|e| LbyError::read(path, e))?;

        match self.header_timestamp(&header) {
            Some(utc) => Ok(RecordingTimestamp::from_header(utc)),
            None => {
                debug!("{path:?}: missing header timestamp, using mtime");
                Ok(RecordingTimestamp::from_mtime(file_mtime_utc(path)?))
            }
        }
    }
}

/// Время последней модификации файла в UTC.
pub fn file_mtime_utc(path: &Path) -> LbyResult<DateTime<Utc>> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| LbyError::read(path, e))?;

    Ok(DateTime::<Utc>::from(modified))
}
