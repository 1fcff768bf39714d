//! End-to-end batch scenarios around Oslo city centre

use placeguide_core::distance::distance_meters;
use placeguide_core::models::{
    Candidate, CategoryPolicy, CategoryTable, Coordinate, DistanceEnvelope, OpenStatus,
    RejectionReason, SignalValue, Verdict,
};
use placeguide_core::PlaceguideError;
use placeguide_quality::{
    calculate_quality_stats, evaluate, find_nearby_groups, QualityPipeline,
};

const METERS_PER_DEGREE_LAT: f64 = 111_194.93;
const ANCHOR_LAT: f64 = 59.9139;
const ANCHOR_LNG: f64 = 10.7522;

fn anchor() -> Coordinate {
    Coordinate::new(ANCHOR_LAT, ANCHOR_LNG).unwrap()
}

/// Local offset from the anchor in metres
fn offset(north: f64, east: f64) -> Coordinate {
    let meters_per_degree_lng = METERS_PER_DEGREE_LAT * ANCHOR_LAT.to_radians().cos();
    Coordinate::new(
        ANCHOR_LAT + north / METERS_PER_DEGREE_LAT,
        ANCHOR_LNG + east / meters_per_degree_lng,
    )
    .unwrap()
}

fn categories() -> CategoryTable {
    let toml = r#"
        [categories.restaurant]
        min_meters = 0
        max_meters = 1500
        min_signals = 2
        mismatch_keywords = ["kontor", "office"]

        [categories.park]
        min_signals = 0
    "#;
    CategoryTable::from_toml_str(toml).unwrap()
}

fn restaurant(id: &str, name: &str, at: Coordinate, signals: usize) -> Candidate {
    let all = [
        ("rating", SignalValue::Number(4.4)),
        ("review_count", SignalValue::Number(120.0)),
        ("website", SignalValue::Text("https://example.no".to_string())),
    ];

    all.into_iter()
        .take(signals)
        .fold(Candidate::new(id, name, "restaurant", at).with_status(OpenStatus::Open), |c, (k, v)| {
            c.with_signal(k, v)
        })
}

fn oslo_batch() -> Vec<Candidate> {
    vec![
        restaurant("R1", "Pizza Bar", offset(200.0, 0.0), 3),
        restaurant("R2", "Pizza Bar 2", offset(218.75, 23.42), 2),
        restaurant("R3", "Pizza Bar 3", offset(5000.0, 0.0), 3),
    ]
}

#[test]
fn test_scenario_geometry() {
    let batch = oslo_batch();
    assert!((distance_meters(anchor(), batch[0].coordinate) - 200.0).abs() < 0.5);
    assert!((distance_meters(anchor(), batch[1].coordinate) - 220.0).abs() < 0.5);
    assert!((distance_meters(batch[0].coordinate, batch[1].coordinate) - 30.0).abs() < 0.5);
    assert!((distance_meters(anchor(), batch[2].coordinate) - 5000.0).abs() < 1.0);
}

#[test]
fn test_oslo_restaurants() {
    let report = QualityPipeline::new(categories(), anchor())
        .unwrap()
        .with_threshold(50.0)
        .run(&oslo_batch())
        .unwrap();

    assert_eq!(report.verdict_for("R1"), Some(Verdict::Accepted));
    assert_eq!(report.verdict_for("R2"), Some(Verdict::Accepted));
    assert_eq!(report.verdict_for("R3"), Some(Verdict::Rejected(RejectionReason::OutOfRange)));

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].member_ids().collect::<Vec<_>>(), vec!["R1", "R2"]);
    assert!(report.group_of("R3").is_none());

    assert_eq!(report.stats.total_evaluated, 3);
    assert_eq!(report.stats.total_accepted, 2);
    assert_eq!(report.stats.rejected_for(RejectionReason::OutOfRange), 1);
    assert_eq!(report.stats.multi_member_groups, 1);
    assert_eq!(report.stats.largest_group_size, 2);
    assert!(report.failures.is_empty());
}

#[test]
fn test_closed_and_far_reports_closed() {
    let candidate =
        restaurant("R9", "Pizza Bar", offset(5000.0, 0.0), 3).with_status(OpenStatus::Closed);
    assert_eq!(
        evaluate(&candidate, anchor(), &categories()).unwrap(),
        Verdict::Rejected(RejectionReason::Closed)
    );
}

#[test]
fn test_unknown_status_never_closed() {
    let mut candidate = restaurant("R1", "Pizza Bar", offset(200.0, 0.0), 3);
    candidate.status = OpenStatus::Unknown;
    assert_eq!(evaluate(&candidate, anchor(), &categories()).unwrap(), Verdict::Accepted);
}

#[test]
fn test_office_named_restaurant_rejected() {
    let candidate = restaurant("R5", "Advokat Kontor", offset(300.0, 0.0), 3);
    assert_eq!(
        evaluate(&candidate, anchor(), &categories()).unwrap(),
        Verdict::Rejected(RejectionReason::NameMismatch)
    );
}

#[test]
fn test_park_without_envelope_accepted_anywhere() {
    let park = Candidate::new("P1", "Vigelandsparken", "park", Coordinate::new(-45.0, 170.0).unwrap());
    assert_eq!(evaluate(&park, anchor(), &categories()).unwrap(), Verdict::Accepted);
}

#[test]
fn test_all_rejected_batch() {
    let batch: Vec<Candidate> = (0..4)
        .map(|i| restaurant(&format!("F{}", i), "Pizza", offset(3000.0 + i as f64 * 10.0, 0.0), 3))
        .collect();

    let report = QualityPipeline::new(categories(), anchor()).unwrap().run(&batch).unwrap();

    assert_eq!(report.stats.acceptance_rate, 0.0);
    assert_eq!(report.stats.group_count, 0);
    assert!(report.groups.is_empty());
}

#[test]
fn test_all_accepted_spread_out_batch() {
    let batch: Vec<Candidate> = (0..5)
        .map(|i| restaurant(&format!("S{}", i), "Pizza", offset(100.0 + i as f64 * 200.0, 0.0), 2))
        .collect();

    let report = QualityPipeline::new(categories(), anchor()).unwrap().run(&batch).unwrap();

    assert_eq!(report.stats.acceptance_rate, 1.0);
    assert_eq!(report.stats.group_count, 5);
    assert_eq!(report.stats.singleton_groups, 5);
}

#[test]
fn test_stats_from_parts_match_pipeline() {
    let batch = oslo_batch();
    let report = QualityPipeline::new(categories(), anchor()).unwrap().run(&batch).unwrap();

    let verdicts: Vec<Verdict> = batch
        .iter()
        .map(|c| evaluate(c, anchor(), &categories()).unwrap())
        .collect();
    let accepted: Vec<Candidate> = batch
        .iter()
        .zip(&verdicts)
        .filter(|(_, v)| v.is_accepted())
        .map(|(c, _)| c.clone())
        .collect();
    let groups = find_nearby_groups(&accepted, 50.0);

    assert_eq!(calculate_quality_stats(&verdicts, &groups), report.stats);
}

#[test]
fn test_unknown_category_is_an_error() {
    let mut candidate = restaurant("R1", "Pizza Bar", offset(200.0, 0.0), 3);
    candidate.category = "nightclub".into();

    let err = evaluate(&candidate, anchor(), &categories()).unwrap_err();
    assert!(matches!(err, PlaceguideError::UnknownCategory { .. }));
    assert!(err.to_string().contains("nightclub"));
}

#[test]
fn test_report_serializes_to_json() {
    let report = QualityPipeline::new(categories(), anchor())
        .unwrap()
        .with_explain(true)
        .run(&oslo_batch())
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["verdicts"][0]["verdict"]["outcome"], "accepted");
    assert_eq!(json["verdicts"][2]["verdict"]["reason"], "OUT_OF_RANGE");
    assert_eq!(json["groups"][0]["members"].as_array().unwrap().len(), 2);
    assert_eq!(json["explanations"][2]["failed_checks"][0], "OUT_OF_RANGE");
}
