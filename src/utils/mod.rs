pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::{default_config_path, default_database_path, derive_area};
pub use progress::ProgressReporter;
