//! Пример: запись синтетического LBY-файла через LbyBuilder
//!
//! Демонстрирует:
//! - заполнение полей даты в заголовке
//! - генерацию кривой нагружения (рост, полка, обрыв)

use lby_core::{HeaderFields, LbyBuilder, LBY_LEAD_IN_WORDS};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_path = "lby-core/HC0042.LBY";

    // --- Местное время записи: 2025-09-10 14:30 ---
    let fields = HeaderFields {
        minute: 30,
        hour: 14,
        day: 10,
        month: 9,
        year: 2025,
    };

    // --- Кривая: тишина, рост до 24 кН, полка, обрыв ---
    let mut samples = vec![0i32; LBY_LEAD_IN_WORDS];
    samples.extend((0..120).map(|i| 500 + i * 195));
    samples.extend(std::iter::repeat(23_900).take(40));
    samples.extend([4_200, 310, 12, 0]);

    let data = LbyBuilder::new().timestamp(fields).samples(samples).build();
    std::fs::write(output_path, &data)?;

    println!("✓ Wrote {output_path} ({} bytes)", data.len());
    Ok(())
}
