pub mod error;
pub mod identity;
pub mod recording;
pub mod sample;
pub mod series;
pub mod timestamp;

pub use error::*;
pub use identity::*;
pub use recording::*;
pub use sample::*;
pub use series::*;
pub use timestamp::*;
