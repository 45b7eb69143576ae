//! Deterministic stand-in for the Swiss Ephemeris.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use natal_core::ephemeris::{EclipticPosition, Ephemeris, EphemerisBody, EphemerisError, HouseFrame};
use natal_core::houses::HouseSystem;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct FakeEphemeris {
    positions: HashMap<EphemerisBody, Result<EclipticPosition, EphemerisError>>,
    frame: Result<HouseFrame, EphemerisError>,
    body_calls: AtomicUsize,
    house_calls: AtomicUsize,
    last_house_system: Mutex<Option<HouseSystem>>,
}

pub fn position(longitude: f64, speed: f64) -> EclipticPosition {
    EclipticPosition {
        longitude,
        latitude: 0.5,
        distance: 1.0,
        speed: Some(speed),
    }
}

impl FakeEphemeris {
    /// Sun 10 opposite Moon 190; the others spread out.
    pub fn new() -> Self {
        let positions = [
            (EphemerisBody::Sun, position(10.0, 1.0)),
            (EphemerisBody::Moon, position(190.0, 13.2)),
            (EphemerisBody::Mercury, position(25.5, 1.4)),
            (EphemerisBody::Venus, position(333.25, 1.2)),
            (EphemerisBody::Mars, position(101.0, 0.6)),
            (EphemerisBody::Jupiter, position(250.75, -0.1)),
            (EphemerisBody::Saturn, position(45.0, 0.05)),
            (EphemerisBody::Uranus, position(300.0, 0.03)),
            (EphemerisBody::Neptune, position(287.5, 0.02)),
            (EphemerisBody::Pluto, position(229.0, 0.01)),
            (EphemerisBody::MeanNode, position(125.0, -0.05)),
            (EphemerisBody::TrueNode, position(126.0, -0.02)),
        ]
        .into_iter()
        .map(|(body, pos)| (body, Ok(pos)))
        .collect();

        let mut cusps = [0.0; 12];
        for (i, cusp) in cusps.iter_mut().enumerate() {
            *cusp = (95.0 + 30.0 * i as f64) % 360.0;
        }

        Self {
            positions,
            frame: Ok(HouseFrame {
                cusps,
                ascendant: 95.0,
                midheaven: 5.0,
            }),
            body_calls: AtomicUsize::new(0),
            house_calls: AtomicUsize::new(0),
            last_house_system: Mutex::new(None),
        }
    }

    pub fn with_body(mut self, body: EphemerisBody, result: Result<EclipticPosition, EphemerisError>) -> Self {
        self.positions.insert(body, result);
        self
    }

    pub fn failing(self, body: EphemerisBody) -> Self {
        let err = EphemerisError::CalculationFailed {
            body: body.name().to_string(),
            message: "file not found".to_string(),
        };
        self.with_body(body, Err(err))
    }

    pub fn with_houses(mut self, frame: Result<HouseFrame, EphemerisError>) -> Self {
        self.frame = frame;
        self
    }

    pub fn total_calls(&self) -> usize {
        self.body_calls.load(Ordering::SeqCst) + self.house_calls.load(Ordering::SeqCst)
    }

    pub fn house_calls(&self) -> usize {
        self.house_calls.load(Ordering::SeqCst)
    }

    pub fn last_house_system(&self) -> Option<HouseSystem> {
        *self.last_house_system.lock().unwrap()
    }
}

impl Ephemeris for FakeEphemeris {
    fn julian_day(&self, utc: DateTime<Utc>) -> f64 {
        utc.timestamp() as f64 / 86_400.0 + 2_440_587.5
    }

    fn body_position(&self, _jd: f64, body: EphemerisBody) -> Result<EclipticPosition, EphemerisError> {
        self.body_calls.fetch_add(1, Ordering::SeqCst);
        self.positions
            .get(&body)
            .cloned()
            .unwrap_or_else(|| {
                Err(EphemerisError::CalculationFailed {
                    body: body.name().to_string(),
                    message: "unknown body".to_string(),
                })
            })
    }

    fn houses(&self, _jd: f64, _lat: f64, _lon: f64, system: HouseSystem) -> Result<HouseFrame, EphemerisError> {
        self.house_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_house_system.lock().unwrap() = Some(system);
        self.frame.clone()
    }
}
