use byteorder::{ByteOrder, LittleEndian};

/// Читает `u16` little-endian по смещению `off` и сдвигает его.
pub fn read_u16_le(
    buf: &[u8],
    off: &mut usize,
) -> Option<u16> {
    let b = buf.get(*off..*off + 2)?;
    *off += 2;
    Some(LittleEndian::read_u16(b))
}

/// Заполняет `out` словами `i32` little-endian начиная с `off`.
/// Возвращает `false`, если окно выходит за пределы буфера.
pub fn read_i32_window(
    buf: &[u8],
    off: usize,
    out: &mut [i32],
) -> bool {
    match buf.get(off..off + out.len() * 4) {
        Some(window) => {
            LittleEndian::read_i32_into(window, out);
            true
        }
        None => false,
    }
}
