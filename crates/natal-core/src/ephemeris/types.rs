use serde::Serialize;

/// Geographic location coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoLocation {
    pub lat: f64,
    #[serde(rename = "lng")]
    pub lon: f64,
}

/// Bodies the ephemeris engine can be asked about.
///
/// Discriminants are the Swiss Ephemeris planet numbers.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EphemerisBody {
    Sun = 0,
    Moon = 1,
    Mercury = 2,
    Venus = 3,
    Mars = 4,
    Jupiter = 5,
    Saturn = 6,
    Uranus = 7,
    Neptune = 8,
    Pluto = 9,
    MeanNode = 10,
    TrueNode = 11,
}

impl EphemerisBody {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            EphemerisBody::Sun => "sun",
            EphemerisBody::Moon => "moon",
            EphemerisBody::Mercury => "mercury",
            EphemerisBody::Venus => "venus",
            EphemerisBody::Mars => "mars",
            EphemerisBody::Jupiter => "jupiter",
            EphemerisBody::Saturn => "saturn",
            EphemerisBody::Uranus => "uranus",
            EphemerisBody::Neptune => "neptune",
            EphemerisBody::Pluto => "pluto",
            EphemerisBody::MeanNode => "mean_node",
            EphemerisBody::TrueNode => "true_node",
        }
    }
}

/// Ecliptic position of one body as returned by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticPosition {
    /// Longitude in degrees (0-360)
    pub longitude: f64,
    /// Latitude in degrees
    pub latitude: f64,
    /// Distance in AU
    pub distance: f64,
    /// Speed in longitude (degrees per day), absent when computed without velocity
    pub speed: Option<f64>,
}

impl EclipticPosition {
    pub fn is_retrograde(&self) -> Option<bool> {
        self.speed.map(|s| s < 0.0)
    }
}

/// House cusps and angles for one instant and place
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseFrame {
    /// Cusps 1..12 in house order, degrees 0-360
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}
