//! Пример: декодирование LBY-файла
//!
//! Демонстрирует:
//! - поиск начала полезной нагрузки и дату из заголовка
//! - перевод отсчётов в кН
//! - выгрузку ряда в CSV

use std::path::Path;

use lby_core::{write_series_file, LbyDecoder, OutputFormat};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input_path = Path::new("lby-core/HC0042.LBY");
    let output_path = Path::new("lby-core/HC0042.csv");

    let decoder = LbyDecoder::default();
    let rec = match decoder.decode_file(input_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("✗ Decode failed: {e}");
            return Err(Box::new(e));
        }
    };

    println!("✓ Decoded");
    println!("  Sequence      : {}", rec.sequence);
    println!("  Timestamp     : {}", rec.timestamp);
    println!("  Data offset   : {}", rec.data_offset);
    println!("  Sample width  : {}", rec.sample_width);
    println!("  Points        : {}", rec.len());
    println!("  Duration      : {:.1} s", rec.duration_s());
    println!("  Peak force    : {:.3} kN", rec.peak_value());

    println!("\nFirst points:");
    for p in rec.series.iter().take(3) {
        println!("  {:>6.1} s  {:>8.3} kN", p.time_s, p.value);
    }

    write_series_file(output_path, &rec.series, OutputFormat::Csv)?;
    println!("\n✓ Wrote {}", output_path.display());

    Ok(())
}
