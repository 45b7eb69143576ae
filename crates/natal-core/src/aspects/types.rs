use serde::{Serialize, Serializer};
use std::fmt;

/// Major aspect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AspectKind {
    Conjunction,
    Opposition,
    Trine,
    Square,
    Sextile,
}

impl AspectKind {
    pub fn name(self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::Opposition => "opposition",
            AspectKind::Trine => "trine",
            AspectKind::Square => "square",
            AspectKind::Sextile => "sextile",
        }
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for AspectKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// One row of the aspect table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectDefinition {
    pub kind: AspectKind,
    /// Exact angle for this aspect (0, 60, 90, 120, 180)
    pub exact_angle: f64,
    /// Maximum allowed deviation from the exact angle
    pub max_orb: f64,
}

/// A named longitude fed to the detector
#[derive(Debug, Clone, PartialEq)]
pub struct AspectPoint {
    pub name: String,
    pub longitude: f64,
    /// Degrees per day, when known
    pub speed: Option<f64>,
}

impl AspectPoint {
    pub fn new(name: impl Into<String>, longitude: f64) -> Self {
        Self {
            name: name.into(),
            longitude,
            speed: None,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }
}

/// Core aspect information for one pair of longitudes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectCore {
    pub kind: AspectKind,
    pub exact_angle: f64,
    /// Angular separation, 0-180
    pub distance: f64,
    /// Deviation from the exact angle
    pub orb: f64,
    /// Whether the separation is closing on exact; None without both speeds
    pub applying: Option<bool>,
}

/// An aspect between two named bodies, rounded for output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectMatch {
    pub a: String,
    pub b: String,
    #[serde(rename = "type")]
    pub kind: AspectKind,
    pub orb: f64,
    pub dist: f64,
    pub exact: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applying: Option<bool>,
}
