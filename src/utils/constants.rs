/// Source file layout
pub const DEFAULT_HEADER_ROWS: usize = 5;
pub const DEFAULT_AREA_SEPARATOR: char = '_';
pub const DEFAULT_SOURCE_ENCODING: &str = "shift_jis";
pub const DEFAULT_UTC_OFFSET: &str = "+09:00";

/// Positional data columns (0-indexed)
pub const DATE_COLUMN: usize = 0;
pub const TEMPERATURE_COLUMN: usize = 1;
pub const PRECIPITATION_COLUMN: usize = 4;
pub const WIND_SPEED_COLUMN: usize = 7;
pub const WIND_DIRECTION_COLUMN: usize = 9;

/// Timestamp layouts
pub const OBSERVATION_DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
pub const REPORT_DATE_FORMAT: &str = "%Y/%m/%d";

/// Report window length after midnight
pub const REPORT_WINDOW_HOURS: i64 = 23;

/// Application names
pub const APP_NAME: &str = "weatherer";
pub const CONFIG_FILE: &str = "config.toml";
pub const DATABASE_FILE: &str = "weatherer.db";
pub const ENV_PREFIX: &str = "WEATHERER";
