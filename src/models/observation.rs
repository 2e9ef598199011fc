use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;


/// A transformed source row, ready to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewObservation {
    #[validate(length(min = 1))]
    pub area: String,

    pub date: DateTime<Utc>,

    /// Hour of `date` in the source timezone
    #[validate(range(max = 23))]
    pub hour: u32,

    pub temperature: f64,

    pub precipitation: Option<f64>,

    pub wind_speed: Option<f64>,

    pub wind_direction: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// A persisted row of the `weathers` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub id: i64,
    pub area: String,
    pub date: DateTime<Utc>,
    pub hour: u32,
    pub temperature: f64,
    pub precipitation: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// All observations parsed from one source file.
#[derive(Debug, Clone)]
pub struct ObservationBatch {
    pub area: String,
    pub observations: Vec<NewObservation>,
}

impl ObservationBatch {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
