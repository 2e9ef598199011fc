pub mod analyzers;
pub mod cli;
pub mod error;
pub mod models;
pub mod readers;
pub mod settings;
pub mod store;
pub mod utils;

pub use error::{Result, WeathererError};
pub use settings::Settings;
pub use store::WeatherStore;
