//! Запись временного ряда в CSV или JSON.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use lby_types::SeriesPoint;
use serde::Serialize;

/// Заголовок CSV
pub const CSV_HEADER: &str = "time_s,force_kN";

/// Формат выходного файла
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Строки `time_s,force_kN`
    #[default]
    Csv,
    /// Документ `{"values": [{"time_s": .., "force_kN": ..}]}`
    Json,
}

#[derive(Serialize)]
struct SeriesDocument {
    values: Vec<JsonPoint>,
}

#[derive(Serialize)]
struct JsonPoint {
    time_s: f64,
    #[serde(rename = "force_kN")]
    force_kn: f64,
}

impl OutputFormat {
    /// Расширение файла вместе с точкой.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => ".csv",
            OutputFormat::Json => ".json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format '{s}'. Use: csv, json")),
        }
    }
}

/// Пишет ряд в `writer` в выбранном формате.
pub fn write_series<W: Write>(
    writer: W,
    points: &[SeriesPoint],
    format: OutputFormat,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Csv => write_csv(writer, points),
        OutputFormat::Json => write_json(writer, points),
    }
}

/// Создаёт (перезаписывает) файл `path` и пишет в него ряд.
pub fn write_series_file(
    path: &Path,
    points: &[SeriesPoint],
    format: OutputFormat,
) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    write_series(&mut writer, points, format)?;
    writer.flush()
}

fn write_csv<W: Write>(
    mut writer: W,
    points: &[SeriesPoint],
) -> std::io::Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;

    // {:?} даёт кратчайшую точную запись: 0.0, 0.5, 1.234
    for p in points {
        writeln!(writer, "{:?},{:?}", p.time_s, p.value)?;
    }

    Ok(())
}

fn write_json<W: Write>(
    mut writer: W,
    points: &[SeriesPoint],
) -> std::io::Result<()> {
    let doc = SeriesDocument {
        values: points
            .iter()
            .map(|p| JsonPoint {
                time_s: p.time_s,
                force_kn: p.value,
            })
            .collect(),
    };

    serde_json::to_writer_pretty(&mut writer, &doc)?;
    writeln!(writer)
}
