//! Model codec synthesis.
//!
//! A [`GeneratedCodec`] binds one [`ModelDescriptor`] to a concrete struct
//! through the accessor functions of a [`ModelBinding`] and carries the
//! resolved adapter handles for its non-scalar fields. Construction happens
//! once, at generation time; the resulting codec is immutable and reusable.

use std::collections::HashMap;
use std::sync::Arc;

use json_static_token::{TokenKind, TokenReader, TokenWriter};

use super::{map_token, scalar, Codec, DecodeContext, Failure, FieldValue, ValueRef};
use crate::adapter::{AdapterHandle, TypeAdapterRegistry};
use crate::descriptor::ModelDescriptor;
use crate::error::{ConversionError, DecodeError, EncodeError, GenerationError};
use crate::registry::CodecRegistry;
use crate::schema::{FailurePolicy, LongEncoding, ValueShape};

/// Accessor pair linking one field to the model struct.
///
/// These are the generated accessor functions the schema front end
/// supplies for every field, public or not. Getters return `None` for an
/// absent value; primitive getters always return `Some`. Integer-like and
/// float accessors are widened, with any narrowing cast living in the
/// accessor itself.
pub enum FieldOp<T> {
    Bool {
        get: fn(&T) -> Option<bool>,
        set: fn(&mut T, bool),
    },
    Int {
        get: fn(&T) -> Option<i64>,
        set: fn(&mut T, i64),
    },
    Float {
        get: fn(&T) -> Option<f64>,
        set: fn(&mut T, f64),
    },
    Str {
        get: for<'a> fn(&'a T) -> Option<&'a str>,
        set: fn(&mut T, String),
    },
    /// Nested object, collection, array or map; values cross the erasure
    /// seam as [`ValueRef`]/[`FieldValue`]. The setter returns `false` when
    /// the value does not fit the field.
    Adapter {
        get: for<'a> fn(&'a T) -> Option<ValueRef<'a>>,
        set: fn(&mut T, FieldValue) -> bool,
    },
}

/// The accessor bindings for one model, keyed by declared field name.
pub struct ModelBinding<T> {
    ops: HashMap<String, FieldOp<T>>,
}

impl<T> Default for ModelBinding<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ModelBinding<T> {
    pub fn new() -> ModelBinding<T> {
        ModelBinding {
            ops: HashMap::new(),
        }
    }

    pub fn field(mut self, declared_name: &str, op: FieldOp<T>) -> ModelBinding<T> {
        self.ops.insert(declared_name.to_string(), op);
        self
    }
}

struct BoundField<T> {
    declared_name: String,
    canonical: String,
    shape: ValueShape,
    policy: FailurePolicy,
    /// Handle slot for adapter-backed shapes.
    slot: Option<usize>,
    op: FieldOp<T>,
}

/// The synthesized encode/decode pair for one model type.
pub struct GeneratedCodec<T> {
    type_name: String,
    emit_nulls: bool,
    long_encoding: LongEncoding,
    fields: Vec<BoundField<T>>,
    /// Wire name candidate -> field index; first declaration wins.
    dispatch: HashMap<String, usize>,
    handles: Vec<AdapterHandle>,
}

impl<T: Default + 'static> GeneratedCodec<T> {
    /// Pair a descriptor with its accessor bindings and collect the codec
    /// handles its fields depend on.
    pub fn synthesize(
        descriptor: &ModelDescriptor,
        binding: ModelBinding<T>,
        registry: &Arc<CodecRegistry>,
    ) -> Result<GeneratedCodec<T>, GenerationError> {
        let mut ops = binding.ops;
        let mut adapters = TypeAdapterRegistry::new();
        let mut fields: Vec<BoundField<T>> = Vec::with_capacity(descriptor.fields.len());
        let mut dispatch = HashMap::new();

        for field in &descriptor.fields {
            let op = ops.remove(&field.declared_name).ok_or_else(|| {
                GenerationError::MissingBinding {
                    model: descriptor.type_name.clone(),
                    field: field.declared_name.clone(),
                }
            })?;
            let compatible = matches!(
                (&field.shape, &op),
                (ValueShape::Bool, FieldOp::Bool { .. })
                    | (ValueShape::Int | ValueShape::Long, FieldOp::Int { .. })
                    | (ValueShape::Float | ValueShape::Double, FieldOp::Float { .. })
                    | (ValueShape::Str, FieldOp::Str { .. })
            ) || (!field.shape.is_scalar() && matches!(op, FieldOp::Adapter { .. }));
            if !compatible {
                return Err(GenerationError::BindingMismatch {
                    model: descriptor.type_name.clone(),
                    field: field.declared_name.clone(),
                    shape: field.shape.to_string(),
                });
            }
            let slot = if field.shape.is_scalar() {
                None
            } else {
                Some(adapters.resolve(&field.shape))
            };
            let index = fields.len();
            for name in &field.wire_names {
                dispatch.entry(name.clone()).or_insert(index);
            }
            fields.push(BoundField {
                declared_name: field.declared_name.clone(),
                canonical: field.canonical_name().to_string(),
                shape: field.shape.clone(),
                policy: field.policy,
                slot,
                op,
            });
        }

        Ok(GeneratedCodec {
            type_name: descriptor.type_name.clone(),
            emit_nulls: descriptor.emit_nulls,
            long_encoding: descriptor.long_encoding,
            fields,
            dispatch,
            handles: adapters.into_handles(registry),
        })
    }

    fn handle(&self, field: &BoundField<T>) -> Result<Arc<dyn Codec>, String> {
        match field.slot {
            Some(slot) => self.handles[slot].get(),
            None => Err(field.shape.to_string()),
        }
    }

    fn encode_model(&self, value: &T, writer: &mut TokenWriter) -> Result<(), EncodeError> {
        writer.begin_object();
        for field in &self.fields {
            match &field.op {
                FieldOp::Bool { get, .. } => match get(value) {
                    Some(v) => {
                        writer.name(&field.canonical);
                        writer.value_bool(v);
                    }
                    None => self.encode_absent(field, writer),
                },
                FieldOp::Int { get, .. } => match get(value) {
                    Some(v) => {
                        writer.name(&field.canonical);
                        let as_string = matches!(field.shape, ValueShape::Long)
                            && matches!(self.long_encoding, LongEncoding::String);
                        if as_string {
                            writer.value_str(&v.to_string());
                        } else {
                            writer.value_i64(v);
                        }
                    }
                    None => self.encode_absent(field, writer),
                },
                FieldOp::Float { get, .. } => match get(value) {
                    Some(v) => {
                        writer.name(&field.canonical);
                        writer.value_f64(v);
                    }
                    None => self.encode_absent(field, writer),
                },
                FieldOp::Str { get, .. } => match get(value) {
                    Some(v) => {
                        writer.name(&field.canonical);
                        writer.value_str(v);
                    }
                    None => self.encode_absent(field, writer),
                },
                FieldOp::Adapter { get, .. } => match get(value) {
                    Some(v) => {
                        // Resolve before writing the name so an encode
                        // abort never leaves a dangling name token.
                        let codec = self
                            .handle(field)
                            .map_err(|type_name| EncodeError::UnresolvedAdapter { type_name })?;
                        writer.name(&field.canonical);
                        codec.encode(&v, writer)?;
                    }
                    None => self.encode_absent(field, writer),
                },
            }
        }
        writer.end_object();
        Ok(())
    }

    /// Absent value: emit an explicit null or omit the field entirely.
    fn encode_absent(&self, field: &BoundField<T>, writer: &mut TokenWriter) {
        if self.emit_nulls {
            writer.name(&field.canonical);
            writer.null();
        }
    }

    fn decode_model(
        &self,
        reader: &mut TokenReader<'_>,
        cx: &DecodeContext,
    ) -> Result<Option<T>, DecodeError> {
        if reader.peek().map_err(map_token)? == TokenKind::Null {
            reader.next_null().map_err(map_token)?;
            return Ok(None);
        }
        reader.begin_object().map_err(map_token)?;

        let mut object = T::default();
        let mut assigned = vec![false; self.fields.len()];

        while reader.has_next().map_err(DecodeError::Syntax)? {
            let name = reader.next_name().map_err(DecodeError::Syntax)?;
            let Some(&index) = self.dispatch.get(&name) else {
                // Unknown fields are always skipped, whatever the policies.
                reader.skip_value().map_err(DecodeError::Syntax)?;
                continue;
            };
            let field = &self.fields[index];
            match self.read_field(field, &mut object, reader, cx) {
                Ok(true) => assigned[index] = true,
                Ok(false) => {}
                Err(Failure::Fatal(error)) => return Err(error),
                Err(failure) => {
                    let error = DecodeError::Field {
                        model: self.type_name.clone(),
                        field: field.declared_name.clone(),
                        reason: failure.into_error().to_string(),
                    };
                    if field.policy.aborts_on_error() {
                        reader.skip_rest_of_object().map_err(DecodeError::Syntax)?;
                        return Err(error);
                    }
                    cx.report(&error);
                }
            }
        }
        reader.end_object().map_err(DecodeError::Syntax)?;

        for (index, field) in self.fields.iter().enumerate() {
            if matches!(field.policy, FailurePolicy::RequireNonNull)
                && self.is_absent(field, &object)
            {
                return Err(DecodeError::Field {
                    model: self.type_name.clone(),
                    field: field.declared_name.clone(),
                    reason: String::from("must not be null"),
                });
            }
            if matches!(field.policy, FailurePolicy::MustSet) && !assigned[index] {
                return Err(DecodeError::Field {
                    model: self.type_name.clone(),
                    field: field.declared_name.clone(),
                    reason: String::from("must be set"),
                });
            }
        }
        Ok(Some(object))
    }

    /// Read one matched field value into the object. `Ok(true)` marks an
    /// assignment; wire null reads as `Ok(false)`, leaving the default in
    /// place. On a mismatch the offending value has already been skipped.
    fn read_field(
        &self,
        field: &BoundField<T>,
        object: &mut T,
        reader: &mut TokenReader<'_>,
        cx: &DecodeContext,
    ) -> Result<bool, Failure> {
        match reader.peek() {
            Ok(TokenKind::Null) => {
                reader
                    .next_null()
                    .map_err(|e| Failure::Fatal(DecodeError::Syntax(e)))?;
                return Ok(false);
            }
            Ok(_) => {}
            Err(error) => return Err(Failure::classify_token(error)),
        }

        let checkpoint = reader.checkpoint();
        let result = match &field.op {
            FieldOp::Bool { set, .. } => scalar::read_bool_relaxed(reader)
                .map(|v| {
                    set(object, v);
                    true
                })
                .map_err(Failure::classify_token),
            FieldOp::Int { set, .. } => scalar::read_i64_relaxed(reader)
                .map(|v| {
                    set(object, v);
                    true
                })
                .map_err(Failure::classify_token),
            FieldOp::Float { set, .. } => scalar::read_f64_relaxed(reader)
                .map(|v| {
                    set(object, v);
                    true
                })
                .map_err(Failure::classify_token),
            FieldOp::Str { set, .. } => reader
                .next_str()
                .map(|v| {
                    set(object, v);
                    true
                })
                .map_err(Failure::classify_token),
            FieldOp::Adapter { set, .. } => match self.handle(field) {
                Err(type_name) => Err(Failure::Fatal(DecodeError::UnresolvedAdapter {
                    type_name,
                })),
                Ok(codec) => match codec.decode(reader, cx) {
                    Ok(FieldValue::Null) => Ok(false),
                    Ok(value) => {
                        if set(object, value) {
                            Ok(true)
                        } else {
                            Err(Failure::Mismatch(ConversionError {
                                expected: "a value assignable to the field",
                                found: String::from("an incompatible value"),
                                path: reader.path(),
                            }))
                        }
                    }
                    Err(error) => Err(Failure::classify(error)),
                },
            },
        };

        match result {
            Err(Failure::Mismatch(conversion)) => {
                reader.restore(checkpoint);
                reader
                    .skip_value()
                    .map_err(|e| Failure::Fatal(DecodeError::Syntax(e)))?;
                Err(Failure::Mismatch(conversion))
            }
            other => other,
        }
    }

    fn is_absent(&self, field: &BoundField<T>, object: &T) -> bool {
        match &field.op {
            FieldOp::Bool { get, .. } => get(object).is_none(),
            FieldOp::Int { get, .. } => get(object).is_none(),
            FieldOp::Float { get, .. } => get(object).is_none(),
            FieldOp::Str { get, .. } => get(object).is_none(),
            FieldOp::Adapter { get, .. } => get(object).is_none(),
        }
    }
}

impl<T: Default + 'static> Codec for GeneratedCodec<T> {
    fn encode(&self, value: &ValueRef<'_>, writer: &mut TokenWriter) -> Result<(), EncodeError> {
        let any = match value {
            ValueRef::Object(any) => *any,
            _ => {
                return Err(EncodeError::Value {
                    expected: "a model value",
                })
            }
        };
        let model = any.downcast_ref::<T>().ok_or(EncodeError::Value {
            expected: "the bound model type",
        })?;
        self.encode_model(model, writer)
    }

    fn decode(
        &self,
        reader: &mut TokenReader<'_>,
        cx: &DecodeContext,
    ) -> Result<FieldValue, DecodeError> {
        Ok(match self.decode_model(reader, cx)? {
            Some(value) => FieldValue::Object(Box::new(value)),
            None => FieldValue::Null,
        })
    }
}
