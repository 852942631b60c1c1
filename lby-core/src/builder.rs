//! Синтетические записи LBY для тестов, бенчмарков и примеров.
//!
//! Заголовок заполняется нулями (кроме полей даты), полезная нагрузка
//! начинается с тишины в [`LBY_LEAD_IN_WORDS`] нулевых слов, как у
//! настоящего прибора до начала нагружения. Благодаря этому эвристика
//! поиска смещения находит ровно `header_len`.

use crate::{
    binary::{write_i32_le, write_u16_le},
    HeaderFields, LBY_DAY_OFFSET, LBY_HOUR_OFFSET, LBY_MINUTE_OFFSET, LBY_MONTH_OFFSET,
    LBY_YEAR_OFFSET,
};

/// Длина заголовка по умолчанию
pub const LBY_BUILDER_HEADER_LEN: usize = 400;

/// Нулевые слова перед нарастанием усилия в [`LbyBuilder::ramp`]
pub const LBY_LEAD_IN_WORDS: usize = 10;

#[derive(Debug, Clone)]
pub struct LbyBuilder {
    header_len: usize,
    timestamp: Option<HeaderFields>,
    samples: Vec<i32>,
}

impl LbyBuilder {
    pub fn new() -> Self {
        Self {
            header_len: LBY_BUILDER_HEADER_LEN,
            timestamp: None,
            samples: Vec::new(),
        }
    }

    pub fn header_len(
        mut self,
        len: usize,
    ) -> Self {
        self.header_len = len;
        self
    }

    /// Поля даты пишутся как есть, без проверки диапазонов.
    pub fn timestamp(
        mut self,
        fields: HeaderFields,
    ) -> Self {
        self.timestamp = Some(fields);
        self
    }

    pub fn samples(
        mut self,
        samples: Vec<i32>,
    ) -> Self {
        self.samples = samples;
        self
    }

    /// Тишина + `n` отсчётов нарастающего усилия (1000, 1250, 1500 ...).
    pub fn ramp(
        mut self,
        n: usize,
    ) -> Self {
        self.samples = vec![0; LBY_LEAD_IN_WORDS];
        self.samples.extend((0..n as i32).map(|i| 1_000 + i * 250));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let header_len = self.header_len.max(LBY_YEAR_OFFSET + 2);
        let mut buf = vec![0u8; header_len + self.samples.len() * 4];

        if let Some(f) = self.timestamp {
            buf[LBY_MINUTE_OFFSET] = f.minute;
            buf[LBY_HOUR_OFFSET] = f.hour;
            buf[LBY_DAY_OFFSET] = f.day;
            buf[LBY_MONTH_OFFSET] = f.month;

            let mut off = LBY_YEAR_OFFSET;
            write_u16_le(&mut buf, &mut off, f.year);
        }

        let mut off = header_len;
        for &s in &self.samples {
            write_i32_le(&mut buf, &mut off, s);
        }

        buf
    }
}

impl Default for LbyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
