mod common;

use common::{position, FakeEphemeris};
use natal_core::aspects::AspectKind;
use natal_core::chart::{Body, ChartAssembler, ChartRequest};
use natal_core::ephemeris::{EphemerisBody, EphemerisError, HouseFrame};
use natal_core::houses::HouseSystem;
use natal_core::zodiac::ZodiacSign;
use natal_core::{ChartError, ValidationError};
use std::sync::Arc;

fn request(time: Option<&str>) -> ChartRequest {
    ChartRequest {
        date: "1990-06-12".to_string(),
        time: time.map(str::to_string),
        timezone: "America/New_York".to_string(),
        latitude: 40.7128,
        longitude: -74.006,
        house_system: None,
    }
}

fn assembler(fake: &Arc<FakeEphemeris>) -> ChartAssembler {
    ChartAssembler::new(fake.clone())
}

#[test]
fn test_full_chart_with_known_time() {
    let fake = Arc::new(FakeEphemeris::new());
    let chart = assembler(&fake).assemble(&request(Some("14:23"))).unwrap();

    assert_eq!(chart.meta.datetime_utc, "1990-06-12T18:23:00Z");
    assert!(!chart.meta.time_assumed);
    assert_eq!(chart.meta.house_system, HouseSystem::Placidus);
    assert_eq!(fake.last_house_system(), Some(HouseSystem::Placidus));

    assert_eq!(chart.houses.len(), 12);
    for (i, cusp) in chart.houses.iter().enumerate() {
        assert_eq!(cusp.n as usize, i + 1);
    }
    assert_eq!(chart.houses[0].position.sign, ZodiacSign::Cancer);
    assert_eq!(chart.houses[0].position.degree, 5.0);

    let angles = chart.angles.as_ref().unwrap();
    assert_eq!(angles.ascendant.name, "ASC");
    assert_eq!(angles.ascendant.position.sign, ZodiacSign::Cancer);
    assert_eq!(angles.midheaven.position.sign, ZodiacSign::Aries);
    assert_eq!(chart.rising_sign, Some(angles.ascendant.position));

    assert_eq!(chart.planets.len(), 12);
    assert!(chart.planets.iter().all(|p| p.is_ok()));
}

#[test]
fn test_planets_in_canonical_order() {
    let fake = Arc::new(FakeEphemeris::new());
    let chart = assembler(&fake).assemble(&request(Some("14:23"))).unwrap();

    let names: Vec<Body> = chart
        .planets
        .iter()
        .map(|p| p.as_ref().unwrap().name)
        .collect();
    let mut expected = Body::CLASSICAL.to_vec();
    expected.push(Body::NorthNode);
    expected.push(Body::SouthNode);
    assert_eq!(names, expected);
}

#[test]
fn test_south_node_opposes_north_node() {
    let fake = Arc::new(FakeEphemeris::new());
    let chart = assembler(&fake).assemble(&request(Some("14:23"))).unwrap();

    let north = chart.body(Body::NorthNode).unwrap().as_ref().unwrap();
    let south = chart.body(Body::SouthNode).unwrap().as_ref().unwrap();
    assert_eq!(north.lon, 125.0);
    assert_eq!(south.lon, 305.0);
    assert_eq!(north.lat, 0.0);
    assert_eq!(south.lat, 0.0);
    assert_eq!(south.position.sign, ZodiacSign::Aquarius);

    let node_axis = chart
        .aspects
        .iter()
        .find(|a| a.a == "North Node" && a.b == "South Node")
        .unwrap();
    assert_eq!(node_axis.kind, AspectKind::Opposition);
    // Both nodes share one speed, so the axis never closes
    assert_eq!(node_axis.applying, Some(false));
}

#[test]
fn test_unknown_time_suppresses_houses_and_angles() {
    let fake = Arc::new(FakeEphemeris::new());
    let mut req = request(None);
    req.date = "2000-01-01".to_string();
    let chart = assembler(&fake).assemble(&req).unwrap();

    assert!(chart.meta.time_assumed);
    assert_eq!(chart.meta.datetime_utc, "2000-01-01T17:00:00Z");
    assert!(chart.houses.is_empty());
    assert!(chart.angles.is_none());
    assert!(chart.rising_sign.is_none());
    assert_eq!(chart.planets.len(), 12);
    assert_eq!(fake.house_calls(), 0);
}

#[test]
fn test_unknown_house_system_fails_before_engine() {
    let fake = Arc::new(FakeEphemeris::new());
    let mut req = request(Some("14:23"));
    req.house_system = Some("Foo".to_string());

    let err = assembler(&fake).assemble(&req).unwrap_err();
    match err {
        ChartError::Validation(ValidationError::InvalidHouseSystem { valid, .. }) => {
            assert_eq!(
                valid,
                vec!["Placidus", "Koch", "Porphyry", "Regiomontanus", "Campanus", "Equal", "WholeSign"]
            );
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(fake.total_calls(), 0);
}

#[test]
fn test_house_system_alias_is_passed_through() {
    let fake = Arc::new(FakeEphemeris::new());
    let mut req = request(Some("14:23"));
    req.house_system = Some("whole-sign".to_string());

    let chart = assembler(&fake).assemble(&req).unwrap();
    assert_eq!(chart.meta.house_system, HouseSystem::WholeSign);
    assert_eq!(fake.last_house_system(), Some(HouseSystem::WholeSign));
}

#[test]
fn test_bad_timezone_fails_before_engine() {
    let fake = Arc::new(FakeEphemeris::new());
    let mut req = request(Some("14:23"));
    req.timezone = "Nowhere/Special".to_string();

    let err = assembler(&fake).assemble(&req).unwrap_err();
    assert!(err.is_client_error());
    assert_eq!(fake.total_calls(), 0);
}

#[test]
fn test_out_of_range_latitude() {
    let fake = Arc::new(FakeEphemeris::new());
    let mut req = request(Some("14:23"));
    req.latitude = 91.0;

    let err = assembler(&fake).assemble(&req).unwrap_err();
    assert!(matches!(
        err,
        ChartError::Validation(ValidationError::CoordinateOutOfRange { field: "latitude", .. })
    ));
}

#[test]
fn test_failing_body_is_isolated() {
    let fake = Arc::new(FakeEphemeris::new().failing(EphemerisBody::Mars));
    let chart = assembler(&fake).assemble(&request(Some("14:23"))).unwrap();

    assert_eq!(chart.planets.len(), 12);
    let mars = chart.body(Body::Mars).unwrap();
    let failure = mars.as_ref().unwrap_err();
    assert!(failure.reason.contains("file not found"));

    assert_eq!(chart.planets.iter().filter(|p| p.is_err()).count(), 1);
    assert!(chart.aspects.iter().all(|a| a.a != "Mars" && a.b != "Mars"));
    assert!(chart
        .aspects
        .iter()
        .any(|a| a.a == "Sun" && a.b == "Moon" && a.kind == AspectKind::Opposition));
}

#[test]
fn test_mars_square_present_when_mars_computes() {
    let fake = Arc::new(FakeEphemeris::new());
    let chart = assembler(&fake).assemble(&request(Some("14:23"))).unwrap();

    let square = chart
        .aspects
        .iter()
        .find(|a| a.a == "Sun" && a.b == "Mars")
        .unwrap();
    assert_eq!(square.kind, AspectKind::Square);
    assert_eq!(square.dist, 91.0);
    assert_eq!(square.orb, 1.0);
}

#[test]
fn test_structural_error_aborts_chart() {
    let malformed = EphemerisError::MalformedResult {
        what: "venus".to_string(),
        message: "non-finite coordinates".to_string(),
    };
    let fake = Arc::new(FakeEphemeris::new().with_body(EphemerisBody::Venus, Err(malformed)));

    let err = assembler(&fake).assemble(&request(Some("14:23"))).unwrap_err();
    assert!(matches!(err, ChartError::Calculation(_)));
    assert!(!err.is_client_error());
}

#[test]
fn test_true_node_used_when_mean_node_fails() {
    let fake = Arc::new(FakeEphemeris::new().failing(EphemerisBody::MeanNode));
    let chart = assembler(&fake).assemble(&request(Some("14:23"))).unwrap();

    let north = chart.body(Body::NorthNode).unwrap().as_ref().unwrap();
    assert_eq!(north.lon, 126.0);
}

#[test]
fn test_node_failure_omits_both_nodes() {
    let fake = Arc::new(
        FakeEphemeris::new()
            .failing(EphemerisBody::MeanNode)
            .failing(EphemerisBody::TrueNode),
    );
    let chart = assembler(&fake).assemble(&request(Some("14:23"))).unwrap();

    assert_eq!(chart.planets.len(), 10);
    assert!(chart.body(Body::NorthNode).is_none());
    assert!(chart.body(Body::SouthNode).is_none());
    assert!(chart.aspects.iter().all(|a| !a.a.contains("Node") && !a.b.contains("Node")));
}

#[test]
fn test_house_failure_is_fatal() {
    let fake = Arc::new(FakeEphemeris::new().with_houses(Err(EphemerisError::HouseCalculationFailed {
        message: "polar latitude".to_string(),
    })));

    let err = assembler(&fake).assemble(&request(Some("14:23"))).unwrap_err();
    assert_eq!(err.to_string(), "House calculation failed: polar latitude");
}

#[test]
fn test_house_failure_irrelevant_without_time() {
    let fake = Arc::new(FakeEphemeris::new().with_houses(Err(EphemerisError::HouseCalculationFailed {
        message: "polar latitude".to_string(),
    })));

    assert!(assembler(&fake).assemble(&request(None)).is_ok());
}

#[test]
fn test_retrograde_and_speed_reported() {
    let fake = Arc::new(FakeEphemeris::new());
    let chart = assembler(&fake).assemble(&request(Some("14:23"))).unwrap();

    let jupiter = chart.body(Body::Jupiter).unwrap().as_ref().unwrap();
    assert_eq!(jupiter.speed, Some(-0.1));
    assert_eq!(jupiter.retrograde, Some(true));
}

#[test]
fn test_missing_speed_leaves_speed_unset() {
    let mut slow = position(200.0, 0.0);
    slow.speed = None;
    let fake = Arc::new(FakeEphemeris::new().with_body(EphemerisBody::Pluto, Ok(slow)));
    let chart = assembler(&fake).assemble(&request(Some("14:23"))).unwrap();

    let pluto = chart.body(Body::Pluto).unwrap().as_ref().unwrap();
    assert_eq!(pluto.speed, None);
    assert_eq!(pluto.retrograde, None);
}

#[test]
fn test_cusps_keep_house_order() {
    let mut cusps = [0.0; 12];
    for (i, cusp) in cusps.iter_mut().enumerate() {
        *cusp = 330.0 + 30.0 * i as f64;
    }
    let frame = HouseFrame {
        cusps,
        ascendant: 330.0,
        midheaven: 240.0,
    };
    let fake = Arc::new(FakeEphemeris::new().with_houses(Ok(frame)));
    let chart = assembler(&fake).assemble(&request(Some("14:23"))).unwrap();

    assert_eq!(chart.houses[0].position.sign, ZodiacSign::Pisces);
    assert_eq!(chart.houses[1].position.sign, ZodiacSign::Aries);
    assert_eq!(chart.houses[11].position.sign, ZodiacSign::Aquarius);
}

#[test]
fn test_identical_requests_serialize_identically() {
    let fake = Arc::new(FakeEphemeris::new());
    let assembler = assembler(&fake);
    let first = serde_json::to_string(&assembler.assemble(&request(Some("14:23"))).unwrap()).unwrap();
    let second = serde_json::to_string(&assembler.assemble(&request(Some("14:23"))).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_chart_json_shape() {
    let fake = Arc::new(FakeEphemeris::new().failing(EphemerisBody::Mars));
    let chart = assembler(&fake).assemble(&request(Some("14:23"))).unwrap();
    let json = serde_json::to_value(&chart).unwrap();

    assert_eq!(json["meta"]["house_system"], "Placidus");
    assert_eq!(json["meta"]["location"]["lng"], -74.006);
    assert_eq!(json["angles"]["ASC"]["name"], "ASC");
    assert_eq!(json["angles"]["ASC"]["sign"], "Cancer");
    assert_eq!(json["houses"][0]["n"], 1);
    assert_eq!(json["rising_sign"]["sign"], "Cancer");
    assert_eq!(json["rising_sign"]["deg"], 5.0);

    assert_eq!(json["planets"][0]["name"], "Sun");
    assert_eq!(json["planets"][0]["sign"], "Aries");
    assert_eq!(json["planets"][0]["lat"], 0.5);
    assert_eq!(json["planets"][0]["retrograde"], false);
    assert_eq!(json["planets"][4]["name"], "Mars");
    assert_eq!(
        json["planets"][4]["error"],
        "calc failed: Failed to calculate position for mars: file not found"
    );
    assert!(json["planets"][4].get("lon").is_none());
}

#[test]
fn test_assumed_time_serializes_nulls() {
    let fake = Arc::new(FakeEphemeris::new());
    let chart = assembler(&fake).assemble(&request(None)).unwrap();
    let json = serde_json::to_value(&chart).unwrap();

    assert!(json["angles"].is_null());
    assert!(json["rising_sign"].is_null());
    assert_eq!(json["houses"], serde_json::json!([]));
    assert_eq!(json["meta"]["time_assumed"], true);
}
