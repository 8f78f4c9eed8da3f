use serde_json::json;
use wiregen_conformance::generated::com::example::common::UserId;
use wiregen_conformance::generated::com::example::errors::{Name, NameParameters};
use wiregen_conformance::generated::com::example::shapes::ShapeNotFound;
use wiregen_core::{ErrorCode, ErrorType, SerializableError};

#[test]
fn test_error_envelope() {
    let error = Name::new(1, "x".to_string());
    let value = serde_json::to_value(&error).expect("encode");
    assert_eq!(
        value,
        json!({
            "errorCode": "NOT_FOUND",
            "errorName": "Ns:Name",
            "errorInstanceId": error.error_instance_id().to_string(),
            "parameters": {"a": 1, "b": "x"}
        })
    );
}

#[test]
fn test_error_decode_restores_parameters() {
    let error = Name::new(1, "x".to_string());
    let encoded = serde_json::to_string(&error).expect("encode");
    let decoded: Name = serde_json::from_str(&encoded).expect("decode");

    assert_eq!(decoded, error);
    assert_eq!(
        decoded.params(),
        Some(&NameParameters {
            a: 1,
            b: "x".to_string()
        })
    );
    let parameters = serde_json::Value::Object(ErrorType::parameters(&decoded));
    assert_eq!(parameters, json!({"a": 1, "b": "x"}));
}

#[test]
fn test_malformed_parameters_do_not_fail_decode() {
    let wire = json!({
        "errorCode": "NOT_FOUND",
        "errorName": "Ns:Name",
        "errorInstanceId": "6f1b3f1e-8a84-4c1f-9d7c-8a1f2c3b4d5e",
        "parameters": {"a": "not a number"}
    });
    let decoded: Name = serde_json::from_value(wire).expect("decode");
    assert_eq!(decoded.params(), None);
    assert!(ErrorType::parameters(&decoded).is_empty());
    assert_eq!(
        decoded.error_instance_id().to_string(),
        "6f1b3f1e-8a84-4c1f-9d7c-8a1f2c3b4d5e"
    );
}

#[test]
fn test_safety_partition() {
    let error = Name::new(1, "x".to_string());
    assert_eq!(Name::SAFE_ARGS, &["a"]);
    assert_eq!(Name::UNSAFE_ARGS, &["b"]);
    assert_eq!(
        serde_json::Value::Object(error.safe_params()),
        json!({"a": 1})
    );
    assert_eq!(
        serde_json::Value::Object(error.unsafe_params()),
        json!({"b": "x"})
    );
}

#[test]
fn test_instance_ids_are_fresh() {
    let first = Name::new(1, "x".to_string());
    let second = Name::new(1, "x".to_string());
    assert_ne!(first.error_instance_id(), second.error_instance_id());
}

#[test]
fn test_error_metadata() {
    let error = ShapeNotFound::new("s-1".to_string(), Some(UserId::new("u-1")));
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(ErrorType::name(&error), "Shapes:ShapeNotFound");
    assert_eq!(error.safe_args(), &["shapeId"]);

    let display = error.to_string();
    assert!(display.contains("Shapes:ShapeNotFound"));
    assert!(!display.contains("u-1"));

    let boxed: Box<dyn std::error::Error> = Box::new(error);
    assert!(boxed.to_string().contains("NOT_FOUND"));
}

#[test]
fn test_server_extras() {
    let error = ShapeNotFound::new("s-1".to_string(), None);
    assert_eq!(error.status_code(), 404);

    let id = error.error_instance_id();
    let envelope = SerializableError::from(error);
    assert_eq!(envelope.error_code(), ErrorCode::NotFound);
    assert_eq!(envelope.error_instance_id(), id);
    assert_eq!(envelope.parameters(), &json!({"shapeId": "s-1"}));
}
