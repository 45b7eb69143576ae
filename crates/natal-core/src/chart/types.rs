use crate::aspects::AspectMatch;
use crate::ephemeris::{EclipticPosition, EphemerisBody, GeoLocation};
use crate::houses::HouseSystem;
use crate::zodiac::{round_to, sign_of, SignPosition};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Points reported in a natal chart, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    NorthNode,
    SouthNode,
}

impl Body {
    /// The ten bodies looked up one by one
    pub const CLASSICAL: [Body; 10] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::NorthNode => "North Node",
            Body::SouthNode => "South Node",
        }
    }

    /// Engine body for a classical body; nodes are resolved separately.
    pub fn ephemeris_body(self) -> Option<EphemerisBody> {
        match self {
            Body::Sun => Some(EphemerisBody::Sun),
            Body::Moon => Some(EphemerisBody::Moon),
            Body::Mercury => Some(EphemerisBody::Mercury),
            Body::Venus => Some(EphemerisBody::Venus),
            Body::Mars => Some(EphemerisBody::Mars),
            Body::Jupiter => Some(EphemerisBody::Jupiter),
            Body::Saturn => Some(EphemerisBody::Saturn),
            Body::Uranus => Some(EphemerisBody::Uranus),
            Body::Neptune => Some(EphemerisBody::Neptune),
            Body::Pluto => Some(EphemerisBody::Pluto),
            Body::NorthNode | Body::SouthNode => None,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Body {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Incoming birth data
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartRequest {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM` 24h; absent or blank means unknown
    #[serde(default)]
    pub time: Option<String>,
    /// IANA zone name
    pub timezone: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Defaults to Placidus
    #[serde(default)]
    pub house_system: Option<String>,
}

/// A successfully computed body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyPosition {
    pub name: Body,
    #[serde(flatten)]
    pub position: SignPosition,
    pub lon: f64,
    pub lat: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrograde: Option<bool>,
}

impl BodyPosition {
    pub fn new(body: Body, position: &EclipticPosition) -> Self {
        Self {
            name: body,
            position: sign_of(position.longitude),
            lon: round_to(position.longitude, 4),
            lat: round_to(position.latitude, 4),
            speed: position.speed.map(|s| round_to(s, 4)),
            retrograde: position.is_retrograde(),
        }
    }
}

/// A body the engine could not place
#[derive(Debug, Clone, PartialEq)]
pub struct BodyFailure {
    pub body: Body,
    pub reason: String,
}

pub type BodyOutcome = Result<BodyPosition, BodyFailure>;

#[derive(Serialize)]
#[serde(untagged)]
enum BodyOutcomeRepr<'a> {
    Computed(&'a BodyPosition),
    Failed { name: Body, error: String },
}

fn serialize_outcomes<S: Serializer>(
    outcomes: &[BodyOutcome],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(outcomes.iter().map(|outcome| match outcome {
        Ok(position) => BodyOutcomeRepr::Computed(position),
        Err(failure) => BodyOutcomeRepr::Failed {
            name: failure.body,
            error: format!("calc failed: {}", failure.reason),
        },
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseCusp {
    /// House number 1-12
    pub n: u8,
    #[serde(flatten)]
    pub position: SignPosition,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnglePosition {
    pub name: &'static str,
    #[serde(flatten)]
    pub position: SignPosition,
    pub lon: f64,
}

impl AnglePosition {
    pub fn new(name: &'static str, longitude: f64) -> Self {
        Self {
            name,
            position: sign_of(longitude),
            lon: round_to(longitude, 4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Angles {
    #[serde(rename = "ASC")]
    pub ascendant: AnglePosition,
    #[serde(rename = "MC")]
    pub midheaven: AnglePosition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartMeta {
    pub house_system: HouseSystem,
    pub datetime_utc: String,
    pub time_assumed: bool,
    pub location: GeoLocation,
}

/// A complete natal chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    /// None when the birth time was assumed
    pub angles: Option<Angles>,
    /// Empty when the birth time was assumed
    pub houses: Vec<HouseCusp>,
    #[serde(serialize_with = "serialize_outcomes")]
    pub planets: Vec<BodyOutcome>,
    pub aspects: Vec<AspectMatch>,
    pub rising_sign: Option<SignPosition>,
}

impl ChartResult {
    pub fn body(&self, body: Body) -> Option<&BodyOutcome> {
        self.planets.iter().find(|outcome| match outcome {
            Ok(position) => position.name == body,
            Err(failure) => failure.body == body,
        })
    }
}
