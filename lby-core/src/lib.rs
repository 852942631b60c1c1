//! Библиотека декодирования записей LBY
//!
//! Разбирает проприетарные бинарные файлы разрывной машины в откалиброванный
//! временной ряд усилия (кН) с меткой времени в UTC и тегом записи.
//!
//! # Быстрый старт
//!
//! ```no_run
//! use std::path::Path;
//!
//! use lby_core::{write_series_file, LbyDecoder, OutputFormat};
//!
//! let decoder = LbyDecoder::default();
//! let rec = decoder.decode_file(Path::new("HC0010.LBY"))?;
//!
//! println!("{} @ {}: {} points", rec.sequence, rec.timestamp, rec.len());
//! write_series_file(Path::new("HC0010.csv"), &rec.series, OutputFormat::Csv)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod binary;
pub mod builder;
pub mod decoder;
pub mod export;
pub mod format;
pub mod header;
pub mod identity;
pub mod naming;
pub mod samples;
pub mod series;

pub use builder::*;
pub use decoder::*;
pub use export::*;
pub use format::*;
pub use header::*;
pub use identity::*;
pub use lby_types::*;
pub use naming::*;
pub use samples::*;
pub use series::*;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
