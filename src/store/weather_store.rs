use crate::error::{Result, WeathererError};
use crate::models::{NewObservation, ObservationBatch, WeatherObservation};
use crate::readers::{EncodingDecoder, ObservationReader};
use crate::settings::Settings;
use crate::store::schema::{COUNT_OBSERVATIONS, INSERT_OBSERVATION, SCHEMA, SELECT_RANGE};
use crate::utils::progress::ProgressReporter;
use chrono::{DateTime, Utc};
use rusqlite::{ffi, params, Connection, OpenFlags, Transaction};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of importing one source file
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub path: PathBuf,
    pub area: String,
    pub rows: usize,
}

/// SQLite-backed observation store. A fresh connection is opened per operation.
pub struct WeatherStore {
    database: PathBuf,
    reader: ObservationReader,
}

impl WeatherStore {
    pub fn new(database: impl Into<PathBuf>, reader: ObservationReader) -> Self {
        Self {
            database: database.into(),
            reader,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let reader = ObservationReader::new(settings.offset()?)
            .with_decoder(EncodingDecoder::for_label(&settings.source_encoding)?)
            .with_header_rows(settings.header_rows)
            .with_area_separator(settings.separator()?);

        Ok(Self::new(settings.database.clone(), reader))
    }

    pub fn database(&self) -> &Path {
        &self.database
    }

    pub fn reader(&self) -> &ObservationReader {
        &self.reader
    }

    /// Create the database and schema unless the database file already exists.
    pub fn ensure_schema(&self) -> Result<()> {
        if self.database.exists() {
            debug!("Database {} already exists", self.database.display());
            return Ok(());
        }

        self.create_with_schema(SCHEMA)?;
        info!("Created database {}", self.database.display());
        Ok(())
    }

    fn create_with_schema(&self, schema: &str) -> Result<()> {
        if let Some(parent) = self.database.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| WeathererError::storage_init(&self.database, e))?;
        }

        let conn = Connection::open(&self.database)
            .map_err(|e| WeathererError::storage_init(&self.database, e))?;
        if let Err(e) = conn.execute_batch(schema) {
            drop(conn);
            // Its presence marks the schema as applied
            if let Err(remove_err) = fs::remove_file(&self.database) {
                warn!(
                    "Could not remove partially initialised database {}: {}",
                    self.database.display(),
                    remove_err
                );
            }
            return Err(WeathererError::storage_init(&self.database, e));
        }

        Ok(())
    }

    /// Import one file as a single all-or-nothing transaction.
    pub fn import(&self, path: &Path) -> Result<ImportSummary> {
        let batch = self.reader.read_observations(path)?;
        let rows = self.write_batch(&batch)?;

        info!(
            "Imported {} observations for area '{}' from {}",
            rows,
            batch.area,
            path.display()
        );

        Ok(ImportSummary {
            path: path.to_path_buf(),
            area: batch.area,
            rows,
        })
    }

    /// Import files in order. Each file commits on its own; the first failure stops the run.
    pub fn import_all(
        &self,
        paths: &[PathBuf],
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<ImportSummary>> {
        let mut summaries = Vec::with_capacity(paths.len());

        for path in paths {
            if let Some(p) = progress {
                p.set_message(&format!("Importing {}", path.display()));
            }

            summaries.push(self.import(path)?);

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        Ok(summaries)
    }

    fn write_batch(&self, batch: &ObservationBatch) -> Result<usize> {
        let mut conn = self.open_read_write().map_err(WeathererError::ImportWrite)?;
        let tx = conn.transaction().map_err(WeathererError::ImportWrite)?;

        match insert_all(&tx, batch) {
            Ok(rows) => {
                tx.commit().map_err(WeathererError::ImportWrite)?;
                Ok(rows)
            }
            Err(e) => {
                warn!("Rolling back import for area '{}': {}", batch.area, e);
                if let Err(rollback_err) = tx.rollback() {
                    warn!("Rollback for area '{}' failed: {}", batch.area, rollback_err);
                }
                Err(e)
            }
        }
    }

    /// Observations with `start <= date <= end`, oldest first.
    pub fn select_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WeatherObservation>> {
        let conn = self.open_read_only().map_err(WeathererError::StorageQuery)?;
        let mut stmt = conn
            .prepare(SELECT_RANGE)
            .map_err(WeathererError::StorageQuery)?;

        let rows = stmt
            .query_map(params![start, end], |row| {
                Ok(WeatherObservation {
                    id: row.get(0)?,
                    area: row.get(1)?,
                    date: row.get(2)?,
                    hour: row.get(3)?,
                    temperature: row.get(4)?,
                    precipitation: row.get(5)?,
                    wind_speed: row.get(6)?,
                    wind_direction: row.get(7)?,
                    created_at: row.get(8)?,
                })
            })
            .map_err(WeathererError::StorageQuery)?;

        let observations = rows
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(WeathererError::StorageQuery)?;

        debug!(
            "Range {} .. {} matched {} observations",
            start,
            end,
            observations.len()
        );
        Ok(observations)
    }

    pub fn count(&self) -> Result<usize> {
        let conn = self.open_read_only().map_err(WeathererError::StorageQuery)?;
        let count: i64 = conn
            .query_row(COUNT_OBSERVATIONS, [], |row| row.get(0))
            .map_err(WeathererError::StorageQuery)?;
        Ok(count as usize)
    }

    fn open_read_write(&self) -> rusqlite::Result<Connection> {
        Connection::open_with_flags(
            &self.database,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }

    fn open_read_only(&self) -> rusqlite::Result<Connection> {
        Connection::open_with_flags(
            &self.database,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }
}

fn insert_all(tx: &Transaction<'_>, batch: &ObservationBatch) -> Result<usize> {
    let mut stmt = tx
        .prepare(INSERT_OBSERVATION)
        .map_err(WeathererError::ImportWrite)?;

    for obs in &batch.observations {
        stmt.execute(params![
            obs.area,
            obs.date,
            obs.hour,
            obs.temperature,
            obs.precipitation,
            obs.wind_speed,
            obs.wind_direction,
            obs.created_at,
        ])
        .map_err(|e| insert_error(e, obs))?;
    }

    Ok(batch.len())
}

fn insert_error(err: rusqlite::Error, obs: &NewObservation) -> WeathererError {
    match err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            WeathererError::DuplicateObservation {
                area: obs.area.clone(),
                date: obs.date,
            }
        }
        other => WeathererError::ImportWrite(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> WeatherStore {
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        let reader = ObservationReader::new(jst)
            .with_decoder(EncodingDecoder::new(encoding_rs::UTF_8))
            .with_header_rows(0);
        WeatherStore::new(dir.path().join("db").join("weather.db"), reader)
    }

    fn observation(area: &str, hour: u32) -> NewObservation {
        NewObservation {
            area: area.to_string(),
            date: Utc.with_ymd_and_hms(2020, 1, 15, hour, 0, 0).unwrap(),
            hour,
            temperature: 10.0 + hour as f64,
            precipitation: None,
            wind_speed: Some(1.5),
            wind_direction: None,
            created_at: Utc::now(),
        }
    }

    fn batch(area: &str, hours: &[u32]) -> ObservationBatch {
        ObservationBatch {
            area: area.to_string(),
            observations: hours.iter().map(|h| observation(area, *h)).collect(),
        }
    }

    #[test]
    fn test_ensure_schema_creates_parent_and_is_idempotent() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);

        store.ensure_schema()?;
        assert!(store.database().exists());
        store.write_batch(&batch("tokyo", &[1, 2]))?;

        store.ensure_schema()?;
        assert_eq!(store.count()?, 2);

        Ok(())
    }

    #[test]
    fn test_unwritable_parent_is_storage_init() -> Result<()> {
        let dir = TempDir::new()?;
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory")?;

        let reader = ObservationReader::new(FixedOffset::east_opt(0).unwrap());
        let store = WeatherStore::new(blocker.join("sub").join("weather.db"), reader);

        let err = store.ensure_schema().unwrap_err();
        match &err {
            WeathererError::StorageInit { path, .. } => assert_eq!(path, store.database()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("weather.db"));
        assert!(!store.database().exists());

        Ok(())
    }

    #[test]
    fn test_failed_schema_removes_database_file() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);

        let err = store
            .create_with_schema("CREATE TABLE broken (")
            .unwrap_err();
        assert!(matches!(err, WeathererError::StorageInit { .. }));
        assert!(!store.database().exists());

        // A later initialisation starts from scratch
        store.ensure_schema()?;
        assert_eq!(store.count()?, 0);

        Ok(())
    }

    #[test]
    fn test_import_without_database_is_write_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store.write_batch(&batch("tokyo", &[1])).unwrap_err();
        assert!(matches!(err, WeathererError::ImportWrite(_)));
        assert!(!store.database().exists());
    }

    #[test]
    fn test_duplicate_rolls_back_batch() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        store.ensure_schema()?;

        let err = store.write_batch(&batch("tokyo", &[1, 2, 1])).unwrap_err();
        assert!(matches!(err, WeathererError::DuplicateObservation { .. }));
        assert_eq!(store.count()?, 0);

        // Same hour in another area is fine
        store.write_batch(&batch("tokyo", &[1]))?;
        store.write_batch(&batch("osaka", &[1]))?;
        assert_eq!(store.count()?, 2);

        Ok(())
    }

    #[test]
    fn test_select_range_inclusive_and_ordered() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        store.ensure_schema()?;
        store.write_batch(&batch("tokyo", &[5, 1, 3, 9]))?;

        let start = Utc.with_ymd_and_hms(2020, 1, 15, 1, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2020, 1, 15, 5, 0, 0).unwrap();
        let rows = store.select_range(start, end)?;

        let hours: Vec<u32> = rows.iter().map(|r| r.hour).collect();
        assert_eq!(hours, vec![1, 3, 5]);
        assert_eq!(rows[0].date, start);
        assert_eq!(rows[0].wind_speed, Some(1.5));
        assert!(rows.windows(2).all(|w| w[0].id != w[1].id));

        Ok(())
    }

    #[test]
    fn test_select_range_empty() -> Result<()> {
        let dir = TempDir::new()?;
        let store = store_in(&dir);
        store.ensure_schema()?;

        let start = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2021, 1, 1, 23, 0, 0).unwrap();
        assert!(store.select_range(start, end)?.is_empty());

        Ok(())
    }

    #[test]
    fn test_query_without_database_fails() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let now = Utc::now();
        assert!(matches!(
            store.select_range(now, now),
            Err(WeathererError::StorageQuery(_))
        ));
    }

    #[test]
    fn test_from_settings_rejects_bad_encoding() {
        let settings = Settings {
            source_encoding: "klingon".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            WeatherStore::from_settings(&settings),
            Err(WeathererError::InvalidConfig(_))
        ));
    }
}
