use crate::error::{Result, WeathererError};
use crate::utils::constants::*;
use crate::utils::filename::{default_config_path, default_database_path};
use chrono::FixedOffset;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime configuration, layered from defaults, a TOML file and
/// `WEATHERER_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub database: PathBuf,
    pub source_encoding: String,
    pub utc_offset: String,
    pub header_rows: usize,
    pub area_separator: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            source_encoding: DEFAULT_SOURCE_ENCODING.to_string(),
            utc_offset: DEFAULT_UTC_OFFSET.to_string(),
            header_rows: DEFAULT_HEADER_ROWS,
            area_separator: DEFAULT_AREA_SEPARATOR.to_string(),
        }
    }
}

impl Settings {
    /// Load settings. An explicit `path` must exist; the default config file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_config_path(), false),
        };

        let builder = Self::defaults()?
            .add_source(File::from(file).required(required))
            .add_source(Environment::with_prefix(ENV_PREFIX));

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Load settings from a single file, ignoring the environment
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings: Settings = Self::defaults()?
            .add_source(File::from(path.to_path_buf()))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = Settings::default();
        let builder = Config::builder()
            .set_default("database", defaults.database.to_string_lossy().to_string())?
            .set_default("source_encoding", defaults.source_encoding)?
            .set_default("utc_offset", defaults.utc_offset)?
            .set_default("header_rows", defaults.header_rows as i64)?
            .set_default("area_separator", defaults.area_separator)?;
        Ok(builder)
    }

    pub fn offset(&self) -> Result<FixedOffset> {
        self.utc_offset.trim().parse::<FixedOffset>().map_err(|_| {
            WeathererError::InvalidConfig(format!(
                "Invalid utc_offset '{}'. Expected format: '+HH:MM'",
                self.utc_offset
            ))
        })
    }

    pub fn separator(&self) -> Result<char> {
        let mut chars = self.area_separator.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(WeathererError::InvalidConfig(format!(
                "area_separator must be a single character, got '{}'",
                self.area_separator
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.header_rows, 5);
        assert_eq!(settings.separator().unwrap(), '_');
        assert_eq!(settings.offset().unwrap().local_minus_utc(), 9 * 3600);
        assert!(settings.database.ends_with(DATABASE_FILE));
    }

    #[test]
    fn test_from_file_overrides_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path)?;
        writeln!(file, "database = \"/tmp/weather.db\"")?;
        writeln!(file, "utc_offset = \"+00:00\"")?;
        writeln!(file, "header_rows = 2")?;

        let settings = Settings::from_file(&path)?;
        assert_eq!(settings.database, PathBuf::from("/tmp/weather.db"));
        assert_eq!(settings.offset()?.local_minus_utc(), 0);
        assert_eq!(settings.header_rows, 2);
        assert_eq!(settings.source_encoding, DEFAULT_SOURCE_ENCODING);

        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = Settings::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(WeathererError::Config(_))));
    }

    #[test]
    fn test_invalid_values() {
        let settings = Settings {
            utc_offset: "JST".to_string(),
            area_separator: "__".to_string(),
            ..Settings::default()
        };
        assert!(matches!(settings.offset(), Err(WeathererError::InvalidConfig(_))));
        assert!(matches!(settings.separator(), Err(WeathererError::InvalidConfig(_))));
    }
}
