//! Раскладка файлов LBY разрывной машины.
//!
//! Публичной спецификации формата нет. Положение начала полезной нагрузки
//! меняется от прошивки к прошивке, поэтому оно угадывается по содержимому:
//! заголовок выглядит как «шум», а отсчёты датчика как положительные
//! счётчики с заметным разбросом. Все многобайтовые числа little-endian.

use log::trace;

use crate::binary::read_i32_window;

/// Смещение полезной нагрузки, если эвристика ничего не нашла
pub const LBY_FALLBACK_OFFSET: usize = 608;

/// Первое проверяемое смещение
pub const LBY_SCAN_START: usize = 256;

/// Верхняя граница сканирования (не включительно)
pub const LBY_SCAN_END: usize = 800;

/// Сколько байт в конце буфера не участвует в выборе кандидата
pub const LBY_SCAN_TAIL: usize = 100;

/// Шаг сканирования (одно 32-битное слово)
pub const LBY_SCAN_STEP: usize = 4;

/// Количество слов в окне-кандидате
pub const LBY_WINDOW_WORDS: usize = 20;

/// Минимум «правдоподобных» слов в окне
pub const LBY_MIN_PLAUSIBLE_WORDS: usize = 10;

/// Правдоподобный отсчёт лежит строго в `(0, LBY_PLAUSIBLE_MAX)`
pub const LBY_PLAUSIBLE_MAX: i32 = 100_000;

/// Разброс правдоподобных слов должен быть строго больше этого значения
pub const LBY_MIN_SPREAD: i32 = 100;

/// Сколько байт читается из начала файла для быстрого определения даты
pub const LBY_HEADER_PEEK_SIZE: usize = 64;

/// Заголовок и полезная нагрузка одной записи (заимствованные срезы).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingRegions<'a> {
    /// Граница между заголовком и данными, не больше длины буфера
    pub offset: usize,
    /// `[0, offset)`
    pub header: &'a [u8],
    /// `[offset, end)`
    pub payload: &'a [u8],
}

/// Находит наиболее правдоподобное начало полезной нагрузки.
///
/// Кандидаты `[256, min(800, len - 100))` с шагом 4. Окно из 20 слов `i32`
/// принимается, если не меньше 10 слов лежат в `(0, 100000)` и разброс
/// этих слов больше 100. Побеждает первое подходящее смещение, иначе
/// возвращается [`LBY_FALLBACK_OFFSET`].
pub fn infer_data_offset(buf: &[u8]) -> usize {
    let end = LBY_SCAN_END.min(buf.len().saturating_sub(LBY_SCAN_TAIL));
    let mut words = [0i32; LBY_WINDOW_WORDS];

    for offset in (LBY_SCAN_START..end).step_by(LBY_SCAN_STEP) {
        if !read_i32_window(buf, offset, &mut words) {
            continue;
        }

        if looks_like_payload(&words) {
            trace!("payload window accepted at offset {offset}");
            return offset;
        }
    }

    trace!("no payload window found, using fallback offset {LBY_FALLBACK_OFFSET}");
    LBY_FALLBACK_OFFSET
}

/// Делит буфер на заголовок и данные по [`infer_data_offset`].
///
/// Смещение ограничивается длиной буфера, поэтому короткий файл даёт пустую
/// полезную нагрузку, а не ошибку.
pub fn split_recording(buf: &[u8]) -> RecordingRegions<'_> {
    let offset = infer_data_offset(buf).min(buf.len());
    let (header, payload) = buf.split_at(offset);

    RecordingRegions {
        offset,
        header,
        payload,
    }
}

fn looks_like_payload(words: &[i32]) -> bool {
    let mut count = 0usize;
    let mut min = i32::MAX;
    let mut max = i32::MIN;

    for &w in words.iter().filter(|&&w| w > 0 && w < LBY_PLAUSIBLE_MAX) {
        count += 1;
        min = min.min(w);
        max = max.max(w);
    }

    count >= LBY_MIN_PLAUSIBLE_WORDS && max - min > LBY_MIN_SPREAD
}
