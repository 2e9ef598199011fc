pub mod observation;

pub use observation::{NewObservation, ObservationBatch, WeatherObservation};
