//! Natal chart computation over the Swiss Ephemeris.
//!
//! The engine itself sits behind [`ephemeris::Ephemeris`]; this crate owns
//! time normalization, sign mapping, aspect detection and chart assembly.

pub mod aspects;
pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod houses;
pub mod time;
pub mod zodiac;

pub use aspects::{find_aspects, AspectCalculator, AspectMatch, AspectPoint};
pub use chart::{Body, ChartAssembler, ChartRequest, ChartResult};
pub use ephemeris::{Ephemeris, EphemerisError, SwissEphemerisAdapter};
pub use error::{ChartError, ValidationError};
pub use houses::HouseSystem;
pub use time::{normalize, NormalizedTime};
pub use zodiac::{sign_of, SignPosition, ZodiacSign};
