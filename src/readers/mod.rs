pub mod decoder;
pub mod observation_reader;

pub use decoder::{Decoder, EncodingDecoder};
pub use observation_reader::ObservationReader;
