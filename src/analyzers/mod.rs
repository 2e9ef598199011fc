pub mod daily_report;

pub use daily_report::{day_window, DailyReporter, TemperaturePoint, TemperatureSeries};
