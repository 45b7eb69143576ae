use crate::aspects::{AspectCalculator, AspectPoint};
use crate::chart::types::{
    AnglePosition, Angles, Body, BodyFailure, BodyOutcome, BodyPosition, ChartMeta, ChartRequest,
    ChartResult, HouseCusp,
};
use crate::ephemeris::{
    normalize_degrees, EclipticPosition, Ephemeris, EphemerisBody, GeoLocation,
};
use crate::error::{ChartError, ValidationError};
use crate::houses::HouseSystem;
use crate::time::normalize;
use crate::zodiac::{round_to, sign_of};
use log::{debug, info, warn};
use std::sync::Arc;

/// Node sources in order of preference
const NODE_SOURCES: [EphemerisBody; 2] = [EphemerisBody::MeanNode, EphemerisBody::TrueNode];

/// Builds natal charts against an ephemeris engine.
#[derive(Clone)]
pub struct ChartAssembler {
    ephemeris: Arc<dyn Ephemeris>,
    aspects: AspectCalculator,
}

impl ChartAssembler {
    pub fn new(ephemeris: Arc<dyn Ephemeris>) -> Self {
        Self {
            ephemeris,
            aspects: AspectCalculator::new(),
        }
    }

    /// Compute a full chart.
    ///
    /// Input is validated before the engine is touched. A failing body is
    /// reported in place; a failing lunar node drops both nodes. House or
    /// structural engine failures abort the chart.
    pub fn assemble(&self, request: &ChartRequest) -> Result<ChartResult, ChartError> {
        let house_system = match request.house_system.as_deref() {
            Some(raw) => raw.parse::<HouseSystem>()?,
            None => HouseSystem::default(),
        };
        let location = validate_location(request.latitude, request.longitude)?;
        let time = normalize(&request.date, request.time.as_deref(), &request.timezone)?;

        let jd = self.ephemeris.julian_day(time.utc);

        let mut planets: Vec<BodyOutcome> = Vec::with_capacity(12);
        let mut points = Vec::with_capacity(12);

        for body in Body::CLASSICAL {
            let Some(eph_body) = body.ephemeris_body() else {
                continue;
            };
            match self.ephemeris.body_position(jd, eph_body) {
                Ok(position) => {
                    points.push(aspect_point(body, &position));
                    planets.push(Ok(BodyPosition::new(body, &position)));
                }
                Err(e) if e.is_structural() => return Err(e.into()),
                Err(e) => {
                    warn!("{} position unavailable at jd {}: {}", body, jd, e);
                    planets.push(Err(BodyFailure {
                        body,
                        reason: e.to_string(),
                    }));
                }
            }
        }

        if let Some(north) = self.lunar_node(jd) {
            let south = EclipticPosition {
                longitude: normalize_degrees(north.longitude + 180.0),
                ..north
            };
            for (body, position) in [(Body::NorthNode, north), (Body::SouthNode, south)] {
                points.push(aspect_point(body, &position));
                planets.push(Ok(BodyPosition::new(body, &position)));
            }
        }

        let (houses, angles) = if time.time_assumed {
            (Vec::new(), None)
        } else {
            let frame = self.ephemeris.houses(
                jd,
                location.lat,
                location.lon,
                house_system,
            )?;
            let houses = frame
                .cusps
                .iter()
                .enumerate()
                .map(|(i, &cusp)| HouseCusp {
                    n: (i + 1) as u8,
                    position: sign_of(cusp),
                    lon: round_to(cusp, 4),
                })
                .collect::<Vec<_>>();
            let angles = Angles {
                ascendant: AnglePosition::new("ASC", frame.ascendant),
                midheaven: AnglePosition::new("MC", frame.midheaven),
            };
            (houses, Some(angles))
        };

        let aspects = self.aspects.find_aspects(&points);
        let rising_sign = angles.as_ref().map(|a| a.ascendant.position);

        info!(
            "chart computed for {} ({}, time_assumed={}, {} aspects)",
            time.utc_iso,
            house_system,
            time.time_assumed,
            aspects.len()
        );

        Ok(ChartResult {
            meta: ChartMeta {
                house_system,
                datetime_utc: time.utc_iso,
                time_assumed: time.time_assumed,
                location,
            },
            angles,
            houses,
            planets,
            aspects,
            rising_sign,
        })
    }

    /// North node position, or None if every source fails.
    fn lunar_node(&self, jd: f64) -> Option<EclipticPosition> {
        for source in NODE_SOURCES {
            match self.ephemeris.body_position(jd, source) {
                Ok(position) => {
                    return Some(EclipticPosition {
                        latitude: 0.0,
                        ..position
                    })
                }
                Err(e) => debug!("lunar node via {} failed: {}", source.name(), e),
            }
        }
        debug!("omitting lunar nodes at jd {}", jd);
        None
    }
}

fn aspect_point(body: Body, position: &EclipticPosition) -> AspectPoint {
    AspectPoint {
        name: body.name().to_string(),
        longitude: position.longitude,
        speed: position.speed,
    }
}

fn validate_location(lat: f64, lon: f64) -> Result<GeoLocation, ValidationError> {
    check_range("latitude", lat, 90.0)?;
    check_range("longitude", lon, 180.0)?;
    Ok(GeoLocation { lat, lon })
}

fn check_range(field: &'static str, value: f64, limit: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (-limit..=limit).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::CoordinateOutOfRange {
            field,
            value,
            min: -limit,
            max: limit,
        })
    }
}
