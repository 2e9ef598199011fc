use crate::utils::constants::{APP_NAME, CONFIG_FILE, DATABASE_FILE};
use std::path::{Path, PathBuf};

/// Derive the area code from a source file name.
///
/// The area is everything in the base file name before the first `separator`.
/// A name without the separator is used whole.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use weatherer::utils::derive_area;
///
/// assert_eq!(derive_area(Path::new("data/tokyo_2020.csv"), '_'), "tokyo");
/// assert_eq!(derive_area(Path::new("nosep.csv"), '_'), "nosep.csv");
/// ```
pub fn derive_area(path: &Path, separator: char) -> String {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());

    match filename.split_once(separator) {
        Some((area, _)) => area.to_string(),
        None => filename.into_owned(),
    }
}

fn app_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

/// Default configuration file: `<config_dir>/weatherer/config.toml`
pub fn default_config_path() -> PathBuf {
    app_config_dir()
        .map(|dir| dir.join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

/// Default database file: `<config_dir>/weatherer/weatherer.db`
pub fn default_database_path() -> PathBuf {
    app_config_dir()
        .map(|dir| dir.join(DATABASE_FILE))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
}
