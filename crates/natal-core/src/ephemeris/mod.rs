pub mod adapter;
pub mod types;

pub use adapter::{julian_day, normalize_degrees, Ephemeris, EphemerisError, SwissEphemerisAdapter};
pub use types::{EclipticPosition, EphemerisBody, GeoLocation, HouseFrame};
