/// Короткий идентификатор записи, извлечённый из имени файла (`HC0010`).
///
/// Никогда не бывает пустым: при отсутствии подходящего имени используется
/// [`SequenceTag::SENTINEL`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceTag(String);

impl SequenceTag {
    /// Значение по умолчанию для пустого имени файла
    pub const SENTINEL: &'static str = "HC0000";

    /// Создаёт тег, приводя его к верхнему регистру. Пустая строка
    /// заменяется на [`SequenceTag::SENTINEL`].
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let s = s.as_ref();

        if s.is_empty() {
            Self(Self::SENTINEL.to_string())
        } else {
            Self(s.to_uppercase())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SequenceTag {
    fn default() -> Self {
        Self(Self::SENTINEL.to_string())
    }
}

impl std::fmt::Display for SequenceTag {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SequenceTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
