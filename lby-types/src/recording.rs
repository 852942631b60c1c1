use crate::{RecordingTimestamp, SampleWidth, SequenceTag, SeriesPoint};

/// Результат декодирования одного LBY файла.
///
/// Неизменяем после создания: дальше им владеют потребители (именование,
/// запись CSV/JSON).
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecording {
    /// Метка времени записи (UTC) с указанием источника
    pub timestamp: RecordingTimestamp,
    /// Идентификатор из имени файла
    pub sequence: SequenceTag,
    /// Смещение начала полезной нагрузки в байтах
    pub data_offset: usize,
    /// Разрядность, с которой интерпретированы слова
    pub sample_width: SampleWidth,
    /// Временной ряд (время, кН)
    pub series: Vec<SeriesPoint>,
}

impl DecodedRecording {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Максимальное значение ряда (0.0 для пустого ряда).
    pub fn peak_value(&self) -> f64 {
        self.series
            .iter()
            .map(|p| p.value)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            .unwrap_or(0.0)
    }

    /// Длительность записи в секундах (время последней точки).
    pub fn duration_s(&self) -> f64 {
        self.series.last().map_or(0.0, |p| p.time_s)
    }
}
