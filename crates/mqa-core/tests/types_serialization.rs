use mqa_core::{ComplianceLevel, Dimension, Rating, Term};

#[test]
fn dimensions_serialize_lowercase_in_reporting_order() {
    let json = serde_json::to_string(&Dimension::ALL).expect("serialize dimensions");
    assert_eq!(
        json,
        r#"["findability","accessibility","interoperability","reusability","contextuality"]"#
    );
}

#[test]
fn ratings_serialize_capitalized() {
    let json = serde_json::to_string(&[Rating::Excellent, Rating::Bad]).expect("serialize");
    assert_eq!(json, r#"["Excellent","Bad"]"#);
}

#[test]
fn compliance_level_defaults_to_two() {
    assert_eq!(ComplianceLevel::default().number(), 2);
    assert_eq!(
        ComplianceLevel::from_number(3),
        Some(ComplianceLevel::Level3)
    );
    assert_eq!(ComplianceLevel::from_number(0), None);
}

#[test]
fn terms_round_trip_through_json() {
    let term = Term::lang_literal("Datos abiertos", "es");
    let json = serde_json::to_string(&term).expect("serialize term");
    assert_eq!(
        json,
        r#"{"kind":"literal","lexical":"Datos abiertos","language":"es"}"#
    );
    let parsed: Term = serde_json::from_str(&json).expect("parse term");
    assert_eq!(parsed, term);
}

#[test]
fn dimension_json_schema_lists_variants() {
    let schema = schemars::schema_for!(Dimension);
    let json = serde_json::to_value(&schema).expect("schema json");
    let variants = json
        .get("enum")
        .and_then(|value| value.as_array())
        .expect("enum variants");
    assert_eq!(variants.len(), 5);
}
