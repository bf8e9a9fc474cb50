//! Long fields under the string encoding policy.

use std::sync::Arc;

use json_static::{
    CodecRegistry, FieldOp, FieldRecord, Generator, LongEncoding, ModelBinding, ModelEntry,
    ModelSchema, ValueShape,
};

#[derive(Debug, Default, PartialEq)]
struct L {
    value: i64,
}

fn registry(encoding: LongEncoding) -> Arc<CodecRegistry> {
    let registry = CodecRegistry::new();
    let entry = ModelEntry::new::<L>(
        ModelSchema::new("long::L")
            .long_encoding(encoding)
            .field(FieldRecord::new("value", ValueShape::Long)),
        ModelBinding::new().field(
            "value",
            FieldOp::Int {
                get: |m: &L| Some(m.value),
                set: |m, v| m.value = v,
            },
        ),
    );
    let results = Generator::new(Arc::clone(&registry)).run(vec![entry]);
    assert!(results[0].is_ok());
    registry
}

#[test]
fn string_policy_writes_quoted_decimals() {
    let registry = registry(LongEncoding::String);
    let json = registry.encode_to_string(&L { value: i64::MAX }).unwrap();
    assert_eq!(json, format!("{{\"value\":\"{}\"}}", i64::MAX));
}

#[test]
fn number_policy_writes_bare_numbers() {
    let registry = registry(LongEncoding::Number);
    let json = registry.encode_to_string(&L { value: 42 }).unwrap();
    assert_eq!(json, r#"{"value":42}"#);
}

#[test]
fn decode_accepts_both_forms_under_either_policy() {
    for encoding in [LongEncoding::Number, LongEncoding::String] {
        let registry = registry(encoding);
        let model = registry.decode::<L>(br#"{"value": 7}"#).unwrap().unwrap();
        assert_eq!(model.value, 7);
        let model = registry
            .decode::<L>(br#"{"value": "9223372036854775807"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(model.value, i64::MAX);
    }
}

#[test]
fn string_policy_roundtrip() {
    let registry = registry(LongEncoding::String);
    let model = L { value: -77 };
    let json = registry.encode_to_string(&model).unwrap();
    let reloaded = registry.decode::<L>(json.as_bytes()).unwrap().unwrap();
    assert_eq!(reloaded, model);
}
