//! Пакетная обработка записей LBY: конвертация в CSV/JSON и подготовка
//! дня испытаний под каноническими UTC-именами.

pub mod batch;
pub mod config;
pub mod dates;
pub mod error;
pub mod metrics;
pub mod stage;

pub use batch::*;
pub use config::*;
pub use dates::*;
pub use error::*;
pub use metrics::*;
pub use stage::*;
