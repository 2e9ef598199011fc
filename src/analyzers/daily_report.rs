use crate::error::{Result, WeathererError};
use crate::models::WeatherObservation;
use crate::store::WeatherStore;
use crate::utils::constants::REPORT_WINDOW_HOURS;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::Serialize;

/// Query window for a calendar day: midnight in `offset` through 23:00.
pub fn day_window(date: NaiveDate, offset: FixedOffset) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| offset.from_local_datetime(&naive).single())
        .ok_or_else(|| WeathererError::InvalidConfig(format!("No midnight for {}", date)))?;

    let start = midnight.with_timezone(&Utc);
    let end = start + Duration::hours(REPORT_WINDOW_HOURS);
    Ok((start, end))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperaturePoint {
    pub timestamp: DateTime<FixedOffset>,
    pub hour: u32,
    pub temperature: f64,
}

/// Temperature over one day, in ascending time order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureSeries {
    pub date: NaiveDate,
    pub points: Vec<TemperaturePoint>,
}

impl TemperatureSeries {
    pub fn from_observations(
        date: NaiveDate,
        offset: FixedOffset,
        observations: &[WeatherObservation],
    ) -> Self {
        let points = observations
            .iter()
            .map(|obs| TemperaturePoint {
                timestamp: obs.date.with_timezone(&offset),
                hour: obs.hour,
                temperature: obs.temperature,
            })
            .collect();

        Self { date, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min(&self) -> Option<f64> {
        self.points.iter().map(|p| p.temperature).reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.points.iter().map(|p| p.temperature).reduce(f64::max)
    }

    pub fn mean(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let sum: f64 = self.points.iter().map(|p| p.temperature).sum();
        Some(sum / self.points.len() as f64)
    }

    pub fn summary(&self) -> String {
        let mut summary = format!("Temperature on {}\n", self.date.format("%Y/%m/%d"));
        summary.push_str(&"=".repeat(26));
        summary.push('\n');

        for point in &self.points {
            let bar_len = point.temperature.max(0.0).round() as usize;
            summary.push_str(&format!(
                "{}  {:>6.1}°C  {}\n",
                point.timestamp.format("%H:%M"),
                point.temperature,
                "#".repeat(bar_len)
            ));
        }

        if let (Some(min), Some(max), Some(mean)) = (self.min(), self.max(), self.mean()) {
            summary.push_str(&format!(
                "\nReadings: {}  Min: {:.1}°C  Max: {:.1}°C  Mean: {:.1}°C",
                self.len(),
                min,
                max,
                mean
            ));
        }

        summary
    }
}

/// Builds per-day temperature series from the store.
pub struct DailyReporter<'a> {
    store: &'a WeatherStore,
    offset: FixedOffset,
}

impl<'a> DailyReporter<'a> {
    pub fn new(store: &'a WeatherStore) -> Self {
        Self {
            store,
            offset: store.reader().offset(),
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Temperatures for `date`; an empty day is reported as `NoData`.
    pub fn temperatures(&self, date: NaiveDate) -> Result<TemperatureSeries> {
        let (start, end) = day_window(date, self.offset)?;
        let observations = self.store.select_range(start, end)?;

        if observations.is_empty() {
            return Err(WeathererError::NoData { date });
        }

        Ok(TemperatureSeries::from_observations(
            date,
            self.offset,
            &observations,
        ))
    }
}
