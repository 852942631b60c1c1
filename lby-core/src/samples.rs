//! Сырые отсчёты полезной нагрузки.

use byteorder::{ByteOrder, LittleEndian};
use lby_types::SampleWidth;

/// Читает полезную нагрузку как последовательность знаковых слов
/// little-endian заданной разрядности.
///
/// Длина усекается до кратной размеру слова, неполное слово в хвосте
/// отбрасывается. Значения не проверяются.
pub fn decode_samples(
    payload: &[u8],
    width: SampleWidth,
) -> Vec<i32> {
    let word = width.word_size();
    let body = &payload[..payload.len() / word * word];

    match width {
        SampleWidth::Bits32 => {
            let mut out = vec![0i32; body.len() / word];
            LittleEndian::read_i32_into(body, &mut out);
            out
        }
        SampleWidth::Bits16 => body
            .chunks_exact(word)
            .map(|c| LittleEndian::read_i16(c) as i32)
            .collect(),
    }
}

/// Если у всех 32-битных слов старшая половина нулевая, поток считается
/// 16-битным. Значения при этом не меняются, меняется только разрядность.
pub fn collapse_to_u16(words: Vec<i32>) -> (Vec<i32>, SampleWidth) {
    if words.iter().all(|&w| (0..=u16::MAX as i32).contains(&w)) {
        (words, SampleWidth::Bits16)
    } else {
        (words, SampleWidth::Bits32)
    }
}
