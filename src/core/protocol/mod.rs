//! Protocol implementations
//!
//! Provides the pieces of the receiver's NMEA 0183 text protocol the pipeline
//! needs:
//! - Coordinate codec (DDDMM.MMMM + hemisphere ↔ signed decimal degrees)
//! - Sentence framing (XOR checksum, `$...*CC\r\n` envelope)
//! - GGA/RMC sentence parsing into [`nmea::FixRecord`]

pub mod coordinate;
pub mod framing;
pub mod nmea;

pub use framing::{checksum, validate, wrap, FramingError};
pub use nmea::{apply_sentence, FixRecord};
