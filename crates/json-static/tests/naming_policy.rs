//! Wire-name translation policies, explicit renames, and alias dispatch.

use std::sync::Arc;

use json_static::{
    CodecRegistry, FieldOp, FieldRecord, Generator, ModelBinding, ModelEntry, ModelSchema,
    NamingPolicy, ValueShape,
};

#[derive(Debug, Default, PartialEq)]
struct Lcwu {
    foo_bar_baz: i32,
}

#[derive(Debug, Default, PartialEq)]
struct Lcwd {
    foo_bar_baz: i32,
}

#[derive(Debug, Default, PartialEq)]
struct Ucc {
    foo_bar_baz: i32,
}

#[derive(Debug, Default, PartialEq)]
struct Uccws {
    foo_bar_baz: i32,
}

#[derive(Debug, Default, PartialEq)]
struct Renamed {
    foo_bar: Option<String>,
}

#[derive(Debug, Default, PartialEq)]
struct Overlap {
    first: i32,
    second: i32,
}

fn int_field_binding<T: 'static>(
    get: fn(&T) -> Option<i64>,
    set: fn(&mut T, i64),
) -> ModelBinding<T> {
    ModelBinding::new().field("fooBarBaz", FieldOp::Int { get, set })
}

fn registry() -> Arc<CodecRegistry> {
    let registry = CodecRegistry::new();
    let entries = vec![
        ModelEntry::new::<Lcwu>(
            ModelSchema::new("naming::Lcwu")
                .naming(NamingPolicy::LowerWithUnderscores)
                .field(FieldRecord::new("fooBarBaz", ValueShape::Int)),
            int_field_binding(
                |m: &Lcwu| Some(m.foo_bar_baz as i64),
                |m, v| m.foo_bar_baz = v as i32,
            ),
        ),
        ModelEntry::new::<Lcwd>(
            ModelSchema::new("naming::Lcwd")
                .naming(NamingPolicy::LowerWithDashes)
                .field(FieldRecord::new("fooBarBaz", ValueShape::Int)),
            int_field_binding(
                |m: &Lcwd| Some(m.foo_bar_baz as i64),
                |m, v| m.foo_bar_baz = v as i32,
            ),
        ),
        ModelEntry::new::<Ucc>(
            ModelSchema::new("naming::Ucc")
                .naming(NamingPolicy::UpperCamel)
                .field(FieldRecord::new("fooBarBaz", ValueShape::Int)),
            int_field_binding(
                |m: &Ucc| Some(m.foo_bar_baz as i64),
                |m, v| m.foo_bar_baz = v as i32,
            ),
        ),
        ModelEntry::new::<Uccws>(
            ModelSchema::new("naming::Uccws")
                .naming(NamingPolicy::UpperCamelWithSpaces)
                .field(FieldRecord::new("fooBarBaz", ValueShape::Int)),
            int_field_binding(
                |m: &Uccws| Some(m.foo_bar_baz as i64),
                |m, v| m.foo_bar_baz = v as i32,
            ),
        ),
        ModelEntry::new::<Renamed>(
            ModelSchema::new("naming::Renamed").field(
                FieldRecord::new("fooBar", ValueShape::Str)
                    .nullable()
                    .renamed("foo")
                    .alias("legacy_foo"),
            ),
            ModelBinding::new().field(
                "fooBar",
                FieldOp::Str {
                    get: |m: &Renamed| m.foo_bar.as_deref(),
                    set: |m, v| m.foo_bar = Some(v),
                },
            ),
        ),
        ModelEntry::new::<Overlap>(
            ModelSchema::new("naming::Overlap")
                .field(FieldRecord::new("first", ValueShape::Int))
                .field(
                    FieldRecord::new("second", ValueShape::Int)
                        .renamed("second")
                        .alias("first"),
                ),
            ModelBinding::new()
                .field(
                    "first",
                    FieldOp::Int {
                        get: |m: &Overlap| Some(m.first as i64),
                        set: |m, v| m.first = v as i32,
                    },
                )
                .field(
                    "second",
                    FieldOp::Int {
                        get: |m: &Overlap| Some(m.second as i64),
                        set: |m, v| m.second = v as i32,
                    },
                ),
        ),
    ];
    let results = Generator::new(Arc::clone(&registry)).run(entries);
    for result in &results {
        assert!(result.is_ok(), "generation failed: {result:?}");
    }
    registry
}

#[test]
fn lower_case_with_underscores() {
    let registry = registry();
    let json = r#"{"foo_bar_baz":42}"#;
    assert_eq!(
        registry
            .encode_to_string(&Lcwu { foo_bar_baz: 42 })
            .unwrap(),
        json
    );
    let model = registry.decode::<Lcwu>(json.as_bytes()).unwrap().unwrap();
    assert_eq!(model.foo_bar_baz, 42);
}

#[test]
fn lower_case_with_dashes() {
    let registry = registry();
    let json = r#"{"foo-bar-baz":42}"#;
    assert_eq!(
        registry
            .encode_to_string(&Lcwd { foo_bar_baz: 42 })
            .unwrap(),
        json
    );
    let model = registry.decode::<Lcwd>(json.as_bytes()).unwrap().unwrap();
    assert_eq!(model.foo_bar_baz, 42);
}

#[test]
fn upper_camel_case() {
    let registry = registry();
    let json = r#"{"FooBarBaz":42}"#;
    assert_eq!(
        registry.encode_to_string(&Ucc { foo_bar_baz: 42 }).unwrap(),
        json
    );
    let model = registry.decode::<Ucc>(json.as_bytes()).unwrap().unwrap();
    assert_eq!(model.foo_bar_baz, 42);
}

#[test]
fn upper_camel_case_with_spaces() {
    let registry = registry();
    let json = r#"{"Foo Bar Baz":42}"#;
    assert_eq!(
        registry
            .encode_to_string(&Uccws { foo_bar_baz: 42 })
            .unwrap(),
        json
    );
    let model = registry.decode::<Uccws>(json.as_bytes()).unwrap().unwrap();
    assert_eq!(model.foo_bar_baz, 42);
}

#[test]
fn rename_encodes_canonically_and_decodes_aliases() {
    let registry = registry();
    let model = Renamed {
        foo_bar: Some("x".to_string()),
    };
    assert_eq!(registry.encode_to_string(&model).unwrap(), r#"{"foo":"x"}"#);
    let via_canonical = registry
        .decode::<Renamed>(br#"{"foo": "a"}"#)
        .unwrap()
        .unwrap();
    assert_eq!(via_canonical.foo_bar, Some("a".to_string()));
    let via_alias = registry
        .decode::<Renamed>(br#"{"legacy_foo": "b"}"#)
        .unwrap()
        .unwrap();
    assert_eq!(via_alias.foo_bar, Some("b".to_string()));
}

#[test]
fn overlapping_candidate_resolves_to_first_declaration() {
    let registry = registry();
    // "first" is declared by the first field; the second field's alias
    // overlap loses deterministically.
    let model = registry
        .decode::<Overlap>(br#"{"first": 1, "second": 2}"#)
        .unwrap()
        .unwrap();
    assert_eq!(model.first, 1);
    assert_eq!(model.second, 2);
    let model = registry
        .decode::<Overlap>(br#"{"first": 7}"#)
        .unwrap()
        .unwrap();
    assert_eq!(model.first, 7);
    assert_eq!(model.second, 0);
}
