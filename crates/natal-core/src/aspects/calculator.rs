use crate::aspects::types::{AspectCore, AspectDefinition, AspectKind, AspectMatch, AspectPoint};
use crate::ephemeris::normalize_degrees;
use crate::zodiac::round_to;

/// Aspect table in priority order: the first entry within orb wins.
pub const DEFAULT_ASPECTS: [AspectDefinition; 5] = [
    AspectDefinition { kind: AspectKind::Conjunction, exact_angle: 0.0, max_orb: 8.0 },
    AspectDefinition { kind: AspectKind::Opposition, exact_angle: 180.0, max_orb: 8.0 },
    AspectDefinition { kind: AspectKind::Trine, exact_angle: 120.0, max_orb: 7.0 },
    AspectDefinition { kind: AspectKind::Square, exact_angle: 90.0, max_orb: 6.0 },
    AspectDefinition { kind: AspectKind::Sextile, exact_angle: 60.0, max_orb: 5.0 },
];

/// Projection step in days for the applying check
const PROJECTION_STEP: f64 = 0.1;

/// Aspect calculator
#[derive(Debug, Clone)]
pub struct AspectCalculator {
    table: Vec<AspectDefinition>,
}

impl AspectCalculator {
    /// Create a calculator with the standard five-aspect table
    pub fn new() -> Self {
        Self::with_table(DEFAULT_ASPECTS.to_vec())
    }

    /// Create a calculator with a custom table, checked in the given order
    pub fn with_table(table: Vec<AspectDefinition>) -> Self {
        Self { table }
    }

    /// Find at most one aspect for every unordered pair, in input order.
    pub fn find_aspects(&self, points: &[AspectPoint]) -> Vec<AspectMatch> {
        let mut matches = Vec::new();
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let p1 = &points[i];
                let p2 = &points[j];

                if let Some(core) =
                    self.calculate_aspect(p1.longitude, p2.longitude, p1.speed, p2.speed)
                {
                    matches.push(AspectMatch {
                        a: p1.name.clone(),
                        b: p2.name.clone(),
                        kind: core.kind,
                        orb: round_to(core.orb, 2),
                        dist: round_to(core.distance, 2),
                        exact: core.exact_angle,
                        applying: core.applying,
                    });
                }
            }
        }
        matches
    }

    /// Calculate the aspect between two longitudes, if any is within orb
    pub fn calculate_aspect(
        &self,
        lon1: f64,
        lon2: f64,
        speed1: Option<f64>,
        speed2: Option<f64>,
    ) -> Option<AspectCore> {
        let distance = angular_distance(lon1, lon2);

        self.table
            .iter()
            .find(|def| (distance - def.exact_angle).abs() <= def.max_orb)
            .map(|def| {
                let applying = match (speed1, speed2) {
                    (Some(s1), Some(s2)) => Some(is_aspect_applying(
                        lon1,
                        lon2,
                        s1,
                        s2,
                        def.exact_angle,
                        distance,
                    )),
                    _ => None,
                };
                AspectCore {
                    kind: def.kind,
                    exact_angle: def.exact_angle,
                    distance,
                    orb: (distance - def.exact_angle).abs(),
                    applying,
                }
            })
    }
}

impl Default for AspectCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Find aspects with the standard table
pub fn find_aspects(points: &[AspectPoint]) -> Vec<AspectMatch> {
    AspectCalculator::new().find_aspects(points)
}

/// Minimal separation between two longitudes, always in [0, 180]
pub fn angular_distance(lon1: f64, lon2: f64) -> f64 {
    let raw = (normalize_degrees(lon1) - normalize_degrees(lon2)).abs();
    raw.min(360.0 - raw)
}

/// Fold a signed difference into (-180, 180]
fn wrap_signed(diff: f64) -> f64 {
    if diff > 180.0 {
        diff - 360.0
    } else if diff <= -180.0 {
        diff + 360.0
    } else {
        diff
    }
}

/// True when the separation moves toward exact over the next step.
///
/// Bodies moving at the same speed keep their separation and are not applying.
fn is_aspect_applying(
    lon1: f64,
    lon2: f64,
    speed1: f64,
    speed2: f64,
    aspect_angle: f64,
    current_angle: f64,
) -> bool {
    let relative_speed = speed1 - speed2;
    let signed_diff = wrap_signed(normalize_degrees(lon1) - normalize_degrees(lon2));
    let future_diff = wrap_signed(signed_diff + relative_speed * PROJECTION_STEP);

    let current_distance = (current_angle - aspect_angle).abs();
    let future_distance = (future_diff.abs() - aspect_angle).abs();

    future_distance < current_distance
}
