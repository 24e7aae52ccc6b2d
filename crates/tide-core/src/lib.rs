pub mod duration;
pub mod error;
pub mod schedule;

pub use error::{ConfigError, ConfigResult};
pub use schedule::{CronOptions, Schedule};
