use serde_json::{json, Value as Json};
use workout_doc_core::{HrTarget, JsonObject, Value, ValueUnits, WorkoutError};

fn obj(v: Json) -> JsonObject {
    v.as_object().expect("fixture must be an object").clone()
}

#[test]
fn percent_ftp_renders_with_label() {
    let v = Value::point(60.0, Some(ValueUnits::PercentFtp));
    assert_eq!(v.to_text(), "60% ftp");
}

#[test]
fn unit_formatting_table() {
    assert_eq!(Value::point(2.0, Some(ValueUnits::HrZone)).to_text(), "Z2 HR");
    assert_eq!(Value::point(3.0, Some(ValueUnits::PowerZone)).to_text(), "Z3 W");
    assert_eq!(Value::point(4.0, Some(ValueUnits::PaceZone)).to_text(), "Z4 Pace");
    assert_eq!(Value::point(250.0, Some(ValueUnits::Watts)).to_text(), "250W");
    assert_eq!(Value::point(90.0, Some(ValueUnits::Cadence)).to_text(), "90rpm Cadence");
    assert_eq!(Value::point(110.0, Some(ValueUnits::PercentMmp)).to_text(), "110% MMP");
    assert_eq!(Value::point(95.5, Some(ValueUnits::PercentPace)).to_text(), "95.5% Pace");
    // No units: bare number
    assert_eq!(Value::point(7.5, None).to_text(), "7.5");
}

#[test]
fn range_then_value_then_label() {
    let range = Value::range(50.0, 65.0, Some(ValueUnits::PercentFtp));
    assert_eq!(range.to_text(), "50 - 65 ftp");

    let both = Value {
        value: Some(80.0),
        start: Some(70.0),
        end: Some(90.0),
        units: Some(ValueUnits::PercentHr),
        target: None,
    };
    assert_eq!(both.to_text(), "70 - 90 80% HR");
}

#[test]
fn hr_window_is_rendered_last() {
    let v = Value::point(75.0, Some(ValueUnits::PercentLthr)).with_target(HrTarget::ThreeSecond);
    assert_eq!(v.to_text(), "75% LTHR hr=3s");
}

#[test]
fn empty_value_renders_empty() {
    assert_eq!(Value::default().to_text(), "");
}

#[test]
fn encode_omits_absent_fields() {
    let v = Value::point(60.0, Some(ValueUnits::PercentFtp));
    let encoded = v.encode().unwrap();
    assert_eq!(Json::Object(encoded), json!({"value": 60.0, "units": "%ftp"}));
}

#[test]
fn decode_treats_empty_string_and_null_as_absent() {
    let v = Value::decode(&obj(json!({
        "value": "",
        "start": "55",
        "end": 65,
        "units": "%ftp",
        "target": null
    })))
    .unwrap();

    assert_eq!(v.value, None);
    assert_eq!(v.start, Some(55.0));
    assert_eq!(v.end, Some(65.0));
    assert_eq!(v.units, Some(ValueUnits::PercentFtp));
    assert_eq!(v.target, None);
    assert!(v.is_range());
}

#[test]
fn decode_encode_roundtrip() {
    let v = Value {
        value: Some(72.5),
        start: Some(70.0),
        end: Some(75.0),
        units: Some(ValueUnits::PercentHr),
        target: Some(HrTarget::Lap),
    };
    let back = Value::decode(&v.encode().unwrap()).unwrap();
    assert_eq!(back, v);

    let text_back = Value::from_json_str(&v.to_json_string().unwrap()).unwrap();
    assert_eq!(text_back, v);
}

#[test]
fn unknown_units_token_is_rejected() {
    let err = Value::decode(&obj(json!({"value": 1, "units": "%vo2"}))).unwrap_err();
    match err {
        WorkoutError::UnknownEnumToken { vocabulary, token } => {
            assert_eq!(vocabulary, "value units");
            assert_eq!(token, "%vo2");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn non_numeric_string_is_malformed() {
    let err = Value::decode(&obj(json!({"value": "fast"}))).unwrap_err();
    match err {
        WorkoutError::MalformedInput { path, .. } => assert_eq!(path, "value"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn units_must_be_a_string() {
    let err = Value::decode(&obj(json!({"units": 3}))).unwrap_err();
    assert!(matches!(err, WorkoutError::MalformedInput { .. }));
}

#[test]
fn non_finite_numbers_are_not_encoded() {
    let err = Value::point(f64::NAN, Some(ValueUnits::Watts)).encode().unwrap_err();
    match err {
        WorkoutError::MalformedInput { path, .. } => assert_eq!(path, "value"),
        other => panic!("unexpected error: {other:?}"),
    }

    let range = Value::range(50.0, f64::INFINITY, Some(ValueUnits::PercentFtp));
    assert!(matches!(
        range.to_json_string(),
        Err(WorkoutError::MalformedInput { .. })
    ));
}
