//! Schema-driven static JSON codec generation.
//!
//! Given schema records describing a model's fields, the generator builds a
//! matched encoder/decoder pair over the streaming token layer in
//! `json-static-token` — resolved once, registered by type identity, and
//! reused — while keeping per-field error recovery a purely structural
//! serializer cannot express: a field may be lenient (bad input is logged
//! and the default kept), strict (bad input aborts the enclosing object),
//! require-non-null (null or absence is itself an error) or must-set (a
//! primitive that has to see an assignment). Collections recover partially,
//! dropping failed elements while preserving the order of the rest.
//!
//! The schema-extraction front end and source-text emission are external
//! collaborators; tests play the front end's role by writing records and
//! accessor bindings by hand.

pub mod adapter;
pub mod codec;
pub mod descriptor;
pub mod error;
pub mod generator;
pub mod naming;
pub mod registry;
pub mod schema;
pub mod sink;

pub use adapter::TypeAdapterRegistry;
pub use codec::{Codec, DecodeContext, FieldOp, FieldValue, GeneratedCodec, ModelBinding, ValueRef};
pub use descriptor::{FieldDescriptor, ModelDescriptor};
pub use error::{ConversionError, DecodeError, EncodeError, GenerationError};
pub use generator::{GeneratedModel, Generator, ModelEntry};
pub use naming::NamingPolicy;
pub use registry::{adapter_name, CodecRegistry};
pub use schema::{FailurePolicy, FieldRecord, LongEncoding, ModelSchema, ValueShape, Visibility};
pub use sink::ErrorSink;

#[cfg(test)]
mod tests {
    use super::{
        adapter_name, CodecRegistry, FieldOp, FieldRecord, Generator, ModelBinding, ModelEntry,
        ModelSchema, ValueShape,
    };

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: i64,
        y: i64,
    }

    fn register_point(registry: &std::sync::Arc<CodecRegistry>) {
        let schema = ModelSchema::new("geo::Point")
            .field(FieldRecord::new("x", ValueShape::Long))
            .field(FieldRecord::new("y", ValueShape::Long));
        let binding = ModelBinding::new()
            .field(
                "x",
                FieldOp::Int {
                    get: |p: &Point| Some(p.x),
                    set: |p, v| p.x = v,
                },
            )
            .field(
                "y",
                FieldOp::Int {
                    get: |p: &Point| Some(p.y),
                    set: |p, v| p.y = v,
                },
            );
        let results = Generator::new(registry.clone()).run(vec![ModelEntry::new::<Point>(
            schema, binding,
        )]);
        assert!(results[0].is_ok());
    }

    #[test]
    fn adapter_names_are_stable() {
        assert_eq!(adapter_name("geo::Point"), "geo_Point_TypeAdapter");
        assert_eq!(adapter_name("Point"), "Point_TypeAdapter");
    }

    #[test]
    fn lookup_miss_is_a_normal_outcome() {
        let registry = CodecRegistry::new();
        assert!(registry.lookup::<Point>().is_none());
        assert!(registry.adapter("geo_Point_TypeAdapter").is_none());
    }

    #[test]
    fn registered_codec_is_addressable_three_ways() {
        let registry = CodecRegistry::new();
        register_point(&registry);
        assert!(registry.lookup::<Point>().is_some());
        assert!(registry.lookup_type_name("geo::Point").is_some());
        assert!(registry.adapter("geo_Point_TypeAdapter").is_some());
    }

    #[test]
    fn encode_decode_through_the_facade() {
        let registry = CodecRegistry::new();
        register_point(&registry);
        let json = registry
            .encode_to_string(&Point { x: 3, y: -4 })
            .unwrap();
        assert_eq!(json, r#"{"x":3,"y":-4}"#);
        let point = registry.decode::<Point>(json.as_bytes()).unwrap().unwrap();
        assert_eq!(point, Point { x: 3, y: -4 });
    }

    #[test]
    fn root_null_decodes_to_none() {
        let registry = CodecRegistry::new();
        register_point(&registry);
        assert!(registry.decode::<Point>(b"null").unwrap().is_none());
    }
}
