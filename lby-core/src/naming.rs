//! Канонические имена файлов: `YYYYMMDDThhmmssZ__SOURCE__SEQ.ext`.

use chrono::{DateTime, Utc};

/// Тег источника для записей разрывной машины
pub const LBY_SOURCE_TAG: &str = "HCV5S";

/// Собирает каноническое имя. Пустой `sequence` пропускается, расширение
/// приводится к нижнему регистру и ожидается вместе с точкой.
pub fn canonical_file_name(
    timestamp: &DateTime<Utc>,
    source: &str,
    sequence: &str,
    extension: &str,
) -> String {
    let mut name = format!("{}__{source}", timestamp.format("%Y%m%dT%H%M%SZ"));

    if !sequence.is_empty() {
        name.push_str("__");
        name.push_str(sequence);
    }

    name.push_str(&extension.to_lowercase());
    name
}
