//! Runtime codec resolution facade.
//!
//! Generated codecs register themselves here by type identity at startup;
//! lookups are ordinary typed map reads and a miss is a normal outcome that
//! lets the calling serialization stack fall back to another mechanism.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use json_static_token::{TokenReader, TokenWriter};

use crate::codec::{Codec, DecodeContext, FieldValue, ValueRef};
use crate::error::{DecodeError, EncodeError};
use crate::sink::ErrorSink;

/// Deterministic artifact name for a model's codec: the qualified type name
/// with `::` flattened, suffixed with `_TypeAdapter`. Stable across
/// regeneration for the same model.
pub fn adapter_name(type_name: &str) -> String {
    format!("{}_TypeAdapter", type_name.replace("::", "_"))
}

struct Entry {
    codec: Arc<dyn Codec>,
}

#[derive(Default)]
struct Entries {
    by_type: HashMap<TypeId, Entry>,
    by_type_name: HashMap<String, TypeId>,
    by_adapter_name: HashMap<String, TypeId>,
}

/// The registration table mapping model types to their generated codecs.
///
/// Registration happens once at startup (or as each generation batch
/// completes); afterwards the table is read-mostly and safe to share across
/// threads. Re-registering a type replaces its codec, keeping at most one
/// per type.
pub struct CodecRegistry {
    sink: Option<Arc<dyn ErrorSink>>,
    entries: RwLock<Entries>,
}

impl CodecRegistry {
    pub fn new() -> Arc<CodecRegistry> {
        Arc::new(CodecRegistry {
            sink: None,
            entries: RwLock::new(Entries::default()),
        })
    }

    /// Build a registry whose decode recoveries are reported to `sink`.
    pub fn with_sink(sink: Arc<dyn ErrorSink>) -> Arc<CodecRegistry> {
        Arc::new(CodecRegistry {
            sink: Some(sink),
            entries: RwLock::new(Entries::default()),
        })
    }

    pub fn register<T: 'static>(&self, type_name: &str, codec: Arc<dyn Codec>) {
        let type_id = TypeId::of::<T>();
        let mut entries = self.entries.write().expect("registry lock poisoned");
        entries
            .by_type_name
            .insert(type_name.to_string(), type_id);
        entries
            .by_adapter_name
            .insert(adapter_name(type_name), type_id);
        entries.by_type.insert(type_id, Entry { codec });
    }

    /// Find the codec generated for `T`. `None` means the type was never
    /// processed by the generator; it is not an error.
    pub fn lookup<T: 'static>(&self) -> Option<Arc<dyn Codec>> {
        let entries = self.entries.read().expect("registry lock poisoned");
        entries
            .by_type
            .get(&TypeId::of::<T>())
            .map(|e| e.codec.clone())
    }

    /// Find a codec by qualified model type name.
    pub fn lookup_type_name(&self, type_name: &str) -> Option<Arc<dyn Codec>> {
        let entries = self.entries.read().expect("registry lock poisoned");
        let type_id = entries.by_type_name.get(type_name)?;
        entries.by_type.get(type_id).map(|e| e.codec.clone())
    }

    /// Find a codec by its generated artifact name (see [`adapter_name`]).
    pub fn adapter(&self, name: &str) -> Option<Arc<dyn Codec>> {
        let entries = self.entries.read().expect("registry lock poisoned");
        let type_id = entries.by_adapter_name.get(name)?;
        entries.by_type.get(type_id).map(|e| e.codec.clone())
    }

    pub fn contains_type_name(&self, type_name: &str) -> bool {
        let entries = self.entries.read().expect("registry lock poisoned");
        entries.by_type_name.contains_key(type_name)
    }

    /// Encode a registered model value to JSON bytes.
    pub fn encode<T: 'static>(&self, value: &T) -> Result<Vec<u8>, EncodeError> {
        let codec = self.lookup::<T>().ok_or_else(|| EncodeError::UnresolvedAdapter {
            type_name: std::any::type_name::<T>().to_string(),
        })?;
        let mut writer = TokenWriter::new();
        codec.encode(&ValueRef::Object(value), &mut writer)?;
        Ok(writer.finish())
    }

    /// Encode a registered model value to a JSON string.
    pub fn encode_to_string<T: 'static>(&self, value: &T) -> Result<String, EncodeError> {
        let bytes = self.encode(value)?;
        Ok(String::from_utf8(bytes).expect("writer produced invalid UTF-8"))
    }

    /// Decode a registered model from JSON bytes. A root wire null decodes
    /// to `None`.
    pub fn decode<T: 'static>(&self, json: &[u8]) -> Result<Option<T>, DecodeError> {
        let codec = self.lookup::<T>().ok_or_else(|| DecodeError::UnresolvedAdapter {
            type_name: std::any::type_name::<T>().to_string(),
        })?;
        let mut reader = TokenReader::new(json);
        let cx = DecodeContext::new(self.sink.clone());
        match codec.decode(&mut reader, &cx)? {
            FieldValue::Null => Ok(None),
            FieldValue::Object(boxed) => match boxed.downcast::<T>() {
                Ok(value) => Ok(Some(*value)),
                Err(_) => Err(DecodeError::Value {
                    expected: "the requested model type",
                }),
            },
            _ => Err(DecodeError::Value {
                expected: "a model value",
            }),
        }
    }
}
