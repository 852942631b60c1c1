//! Перевод отсчётов в физические единицы.

use lby_types::SeriesPoint;

/// Калибровка: сырые отсчёты в ньютонах, на выходе килоньютоны
pub const LBY_FORCE_SCALE: f64 = 0.001;

/// Фиксированный период дискретизации прибора, секунды
pub const LBY_SAMPLE_INTERVAL_S: f64 = 0.5;

/// Строит временной ряд: точка `i` = `(i * interval_s, samples[i] * scale)`.
///
/// Один отсчёт даёт одну точку, порядок сохраняется, без фильтрации и
/// передискретизации.
pub fn build_series(
    samples: &[i32],
    scale: f64,
    interval_s: f64,
) -> Vec<SeriesPoint> {
    samples
        .iter()
        .enumerate()
        .map(|(i, &s)| SeriesPoint::new(i as f64 * interval_s, s as f64 * scale))
        .collect()
}
