/// Точка временного ряда: (время от начала записи, значение в физических
/// единицах).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    /// Секунды от первого отсчёта
    pub time_s: f64,
    /// Усилие, кН
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(
        time_s: f64,
        value: f64,
    ) -> Self {
        Self { time_s, value }
    }
}
