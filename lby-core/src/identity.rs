//! Идентификатор записи из имени файла.

use std::{path::Path, sync::LazyLock};

use lby_types::SequenceTag;
use regex::Regex;

static HC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)HC\d+").expect("HC pattern is a valid regex"));

/// Извлекает тег записи: первое вхождение `HC<цифры>` (без учёта
/// регистра), иначе имя файла без расширения, иначе `HC0000`.
/// Результат всегда в верхнем регистре.
pub fn sequence_tag<P: AsRef<Path>>(file_name: P) -> SequenceTag {
    let base = file_name
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    match HC_PATTERN.find(&base) {
        Some(m) => SequenceTag::new(m.as_str()),
        None => SequenceTag::new(&base),
    }
}
