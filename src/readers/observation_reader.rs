use crate::error::{Result, WeathererError};
use crate::models::{NewObservation, ObservationBatch};
use crate::readers::decoder::{Decoder, EncodingDecoder};
use crate::utils::constants::*;
use crate::utils::filename::derive_area;
use chrono::{FixedOffset, NaiveDateTime, TimeZone, Timelike, Utc};
use csv::{ReaderBuilder, StringRecord};
use std::fs;
use std::path::Path;
use tracing::debug;
use validator::Validate;

/// Decodes, parses and transforms one observation export.
pub struct ObservationReader {
    decoder: Box<dyn Decoder>,
    header_rows: usize,
    area_separator: char,
    offset: FixedOffset,
}

impl ObservationReader {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            decoder: Box::new(EncodingDecoder::shift_jis()),
            header_rows: DEFAULT_HEADER_ROWS,
            area_separator: DEFAULT_AREA_SEPARATOR,
            offset,
        }
    }

    pub fn with_decoder(mut self, decoder: impl Decoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    pub fn with_header_rows(mut self, header_rows: usize) -> Self {
        self.header_rows = header_rows;
        self
    }

    pub fn with_area_separator(mut self, area_separator: char) -> Self {
        self.area_separator = area_separator;
        self
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn area_for(&self, path: &Path) -> String {
        derive_area(path, self.area_separator)
    }

    /// Read a source file (area taken from its file name)
    pub fn read_observations(&self, path: &Path) -> Result<ObservationBatch> {
        let bytes = fs::read(path)?;
        let area = self.area_for(path);
        debug!(
            "Read {} bytes from {} (area '{}')",
            bytes.len(),
            path.display(),
            area
        );
        self.parse_observations(&area, &bytes)
    }

    /// Decode and transform raw file contents for the given area
    pub fn parse_observations(&self, area: &str, bytes: &[u8]) -> Result<ObservationBatch> {
        let text = self.decoder.decode(bytes)?;
        debug!("Decoded input as {}", self.decoder.name());

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut observations = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                WeathererError::parse(line, e.to_string())
            })?;

            // Skip the metadata preamble
            if index < self.header_rows {
                continue;
            }

            let observation = self.parse_record(area, &record)?;
            observations.push(observation);
        }

        debug!(
            "Parsed {} observations after skipping {} header rows",
            observations.len(),
            self.header_rows
        );

        Ok(ObservationBatch {
            area: area.to_string(),
            observations,
        })
    }

    /// Transform a single data row
    fn parse_record(&self, area: &str, record: &StringRecord) -> Result<NewObservation> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let raw_date = field(record, DATE_COLUMN)
            .ok_or_else(|| WeathererError::parse(line, "Missing date/time column"))?;
        let naive = NaiveDateTime::parse_from_str(raw_date, OBSERVATION_DATETIME_FORMAT)
            .map_err(|e| {
                WeathererError::parse(line, format!("Invalid date/time '{}': {}", raw_date, e))
            })?;
        let local = self
            .offset
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| {
                WeathererError::parse(line, format!("Ambiguous local time '{}'", raw_date))
            })?;

        let temperature = parse_number(record, TEMPERATURE_COLUMN, "temperature", line)?
            .ok_or_else(|| WeathererError::parse(line, "Missing temperature"))?;

        let observation = NewObservation {
            area: area.to_string(),
            date: local.with_timezone(&Utc),
            hour: local.hour(),
            temperature,
            precipitation: parse_number(record, PRECIPITATION_COLUMN, "precipitation", line)?,
            wind_speed: parse_number(record, WIND_SPEED_COLUMN, "wind speed", line)?,
            wind_direction: field(record, WIND_DIRECTION_COLUMN).map(str::to_string),
            created_at: Utc::now(),
        };
        observation.validate().map_err(|e| {
            WeathererError::parse(line, format!("Invalid observation: {}", e))
        })?;

        Ok(observation)
    }
}

/// Trimmed, non-empty field at `column`
fn field(record: &StringRecord, column: usize) -> Option<&str> {
    record
        .get(column)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_number(
    record: &StringRecord,
    column: usize,
    name: &str,
    line: u64,
) -> Result<Option<f64>> {
    field(record, column)
        .map(|value| {
            value.parse::<f64>().map_err(|_| {
                WeathererError::parse(line, format!("Invalid {}: '{}'", name, value))
            })
        })
        .transpose()
}
