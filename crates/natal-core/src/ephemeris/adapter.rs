use crate::ephemeris::types::{EclipticPosition, EphemerisBody, HouseFrame};
use crate::houses::HouseSystem;
use chrono::{DateTime, Datelike, Timelike, Utc};
use log::debug;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use swisseph::swe::{calc_ut, houses_ex, julday};
use swisseph::{AscMc, Cusp};
use thiserror::Error;

/// Errors that can occur at the ephemeris boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Ephemeris path not found: {path}. {message}")]
    EphemerisPathNotFound { path: String, message: String },
    #[error("Ephemeris search path is already {active}; cannot switch to {requested}")]
    EphemerisPathConflict { active: String, requested: String },
    #[error("Failed to calculate position for {body}: {message}")]
    CalculationFailed { body: String, message: String },
    #[error("House calculation failed: {message}")]
    HouseCalculationFailed { message: String },
    #[error("Ephemeris returned a malformed result for {what}: {message}")]
    MalformedResult { what: String, message: String },
}

impl EphemerisError {
    /// Structural errors mean the engine broke its contract; they are never
    /// recovered per body.
    pub fn is_structural(&self) -> bool {
        matches!(self, EphemerisError::MalformedResult { .. })
    }
}

/// The astronomical engine a chart is computed against.
pub trait Ephemeris: Send + Sync {
    /// Julian Day (UT) for a UTC instant, Gregorian calendar
    fn julian_day(&self, utc: DateTime<Utc>) -> f64;

    fn body_position(
        &self,
        jd: f64,
        body: EphemerisBody,
    ) -> Result<EclipticPosition, EphemerisError>;

    fn houses(
        &self,
        jd: f64,
        lat: f64,
        lon: f64,
        system: HouseSystem,
    ) -> Result<HouseFrame, EphemerisError>;
}

// Swiss Ephemeris calculation flags
const FLG_SWIEPH: i32 = 2;
const FLG_MOSEPH: i32 = 4;
const FLG_SPEED: i32 = 256;

const GREG_CAL: i32 = 1;

/// Precision steps tried in order for body positions.
const PRECISION_CHAIN: &[(&str, i32)] = &[
    ("swiss+speed", FLG_SWIEPH | FLG_SPEED),
    ("swiss", FLG_SWIEPH),
    ("moshier", FLG_MOSEPH),
];

/// Search path exported to the engine; fixed for the life of the process.
static EPHE_SEARCH_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Swiss Ephemeris adapter implementation
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
}

impl SwissEphemerisAdapter {
    /// Create the adapter and point the engine at its data files.
    ///
    /// The search path is exported once per process. Later adapters must
    /// name the same directory.
    pub fn new(ephemeris_path: impl AsRef<Path>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(EphemerisError::EphemerisPathNotFound {
                path: path.display().to_string(),
                message: "Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }
        let path = path.canonicalize().unwrap_or(path);

        let active = EPHE_SEARCH_PATH.get_or_init(|| {
            // The engine reads SE_EPHE_PATH when it first initializes.
            env::set_var("SE_EPHE_PATH", &path);
            debug!("Ephemeris search path set to {}", path.display());
            path.clone()
        });
        check_search_path(active, &path)?;

        Ok(Self {
            ephemeris_path: path,
        })
    }

    pub fn ephemeris_path(&self) -> &Path {
        &self.ephemeris_path
    }

    fn calc_with_flags(
        &self,
        jd: f64,
        body: EphemerisBody,
        flags: i32,
    ) -> Result<EclipticPosition, EphemerisError> {
        let result = calc_ut(jd, body.code() as u32, flags as u32).map_err(|e| {
            EphemerisError::CalculationFailed {
                body: body.name().to_string(),
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        let out = result.out;
        let speed = if flags & FLG_SPEED != 0 {
            Some(out[3])
        } else {
            None
        };
        validate_position(
            body,
            EclipticPosition {
                longitude: out[0],
                latitude: out[1],
                distance: out[2],
                speed,
            },
        )
    }
}

fn check_search_path(active: &Path, requested: &Path) -> Result<(), EphemerisError> {
    if active == requested {
        Ok(())
    } else {
        Err(EphemerisError::EphemerisPathConflict {
            active: active.display().to_string(),
            requested: requested.display().to_string(),
        })
    }
}

/// Julian Day (UT) for a UTC instant, Gregorian calendar.
pub fn julian_day(utc: DateTime<Utc>) -> f64 {
    let hour_decimal =
        utc.hour() as f64 + utc.minute() as f64 / 60.0 + utc.second() as f64 / 3600.0;
    julday(utc.year(), utc.month() as i32, utc.day() as i32, hour_decimal, GREG_CAL)
}

/// Try each precision step in order. The first success wins; if every step
/// fails the last step's error is returned.
fn run_precision_chain<F>(body: EphemerisBody, mut calc: F) -> Result<EclipticPosition, EphemerisError>
where
    F: FnMut(i32) -> Result<EclipticPosition, EphemerisError>,
{
    let mut last_err = None;
    for (label, flags) in PRECISION_CHAIN {
        match calc(*flags) {
            Ok(position) => return Ok(position),
            Err(e) => {
                debug!("{} via {} failed: {}", body.name(), label, e);
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| EphemerisError::CalculationFailed {
        body: body.name().to_string(),
        message: "no precision mode available".to_string(),
    }))
}

impl Ephemeris for SwissEphemerisAdapter {
    fn julian_day(&self, utc: DateTime<Utc>) -> f64 {
        julian_day(utc)
    }

    fn body_position(
        &self,
        jd: f64,
        body: EphemerisBody,
    ) -> Result<EclipticPosition, EphemerisError> {
        run_precision_chain(body, |flags| self.calc_with_flags(jd, body, flags))
    }

    fn houses(
        &self,
        jd: f64,
        lat: f64,
        lon: f64,
        system: HouseSystem,
    ) -> Result<HouseFrame, EphemerisError> {
        let (c, a) = houses_ex(jd, 0, lat, lon, system.code() as i32);
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        validate_house_frame(HouseFrame {
            cusps: [
                cusps.first, cusps.second, cusps.third, cusps.fourth,
                cusps.fifth, cusps.sixth, cusps.seventh, cusps.eighth,
                cusps.ninth, cusps.tenth, cusps.eleventh, cusps.twelfth,
            ],
            ascendant: ascmc.ascendant,
            midheaven: ascmc.mc,
        })
    }
}

/// Check an engine position and normalize its longitude into [0, 360).
pub fn validate_position(
    body: EphemerisBody,
    position: EclipticPosition,
) -> Result<EclipticPosition, EphemerisError> {
    let speed_ok = position.speed.map_or(true, f64::is_finite);
    if !position.longitude.is_finite() || !position.latitude.is_finite() || !speed_ok {
        return Err(EphemerisError::MalformedResult {
            what: body.name().to_string(),
            message: format!("non-finite coordinates {:?}", position),
        });
    }
    Ok(EclipticPosition {
        longitude: normalize_degrees(position.longitude),
        ..position
    })
}

/// Check engine house output and normalize every value into [0, 360).
pub fn validate_house_frame(frame: HouseFrame) -> Result<HouseFrame, EphemerisError> {
    let all_finite = frame.cusps.iter().all(|c| c.is_finite())
        && frame.ascendant.is_finite()
        && frame.midheaven.is_finite();
    if !all_finite {
        return Err(EphemerisError::MalformedResult {
            what: "houses".to_string(),
            message: format!("non-finite cusps or angles {:?}", frame),
        });
    }
    let mut cusps = frame.cusps;
    for cusp in cusps.iter_mut() {
        *cusp = normalize_degrees(*cusp);
    }
    Ok(HouseFrame {
        cusps,
        ascendant: normalize_degrees(frame.ascendant),
        midheaven: normalize_degrees(frame.midheaven),
    })
}

/// Fold any finite angle into [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360.0
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}
