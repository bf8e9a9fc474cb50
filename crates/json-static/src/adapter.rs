//! Per-model codec handle registry.
//!
//! While a model is being synthesized, every non-scalar field shape is
//! deduplicated into one handle slot; the resulting plan is carried by the
//! generated codec. Handles resolve lazily against the ambient
//! [`CodecRegistry`] on first use — never against each other — so a type
//! referenced by several fields is resolved once and self-referential
//! models introduce no initialization cycle.

use std::sync::{Arc, OnceLock, Weak};

use indexmap::IndexSet;

use crate::codec::scalar::{BoolCodec, FloatCodec, IntCodec, StrCodec};
use crate::codec::seq::{MapCodec, SeqCodec};
use crate::codec::Codec;
use crate::registry::CodecRegistry;
use crate::schema::ValueShape;

/// Synthesis-time dedup of the codec handles one model depends on.
///
/// Distinctness is value equality over the full parameterized shape;
/// insertion order is the handle initialization plan.
#[derive(Default)]
pub struct TypeAdapterRegistry {
    shapes: IndexSet<ValueShape>,
}

impl TypeAdapterRegistry {
    pub fn new() -> TypeAdapterRegistry {
        TypeAdapterRegistry::default()
    }

    /// Slot index for `shape`, allocating one on first sight.
    pub fn resolve(&mut self, shape: &ValueShape) -> usize {
        if let Some(index) = self.shapes.get_index_of(shape) {
            return index;
        }
        self.shapes.insert_full(shape.clone()).0
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> impl Iterator<Item = &ValueShape> {
        self.shapes.iter()
    }

    /// Consume the plan into one lazy handle per distinct shape.
    pub(crate) fn into_handles(self, registry: &Arc<CodecRegistry>) -> Vec<AdapterHandle> {
        self.shapes
            .into_iter()
            .map(|shape| AdapterHandle::new(shape, registry))
            .collect()
    }
}

/// A lazily-resolved codec handle for one value shape.
pub(crate) struct AdapterHandle {
    shape: ValueShape,
    registry: Weak<CodecRegistry>,
    slot: OnceLock<Arc<dyn Codec>>,
}

impl AdapterHandle {
    pub(crate) fn new(shape: ValueShape, registry: &Arc<CodecRegistry>) -> AdapterHandle {
        AdapterHandle {
            shape,
            registry: Arc::downgrade(registry),
            slot: OnceLock::new(),
        }
    }

    /// The resolved codec, building or looking it up on first use.
    ///
    /// Concurrent first use may build a duplicate before the memo wins;
    /// codecs are stateless, so the spare is merely discarded. The error
    /// value is the unresolvable type name.
    pub(crate) fn get(&self) -> Result<Arc<dyn Codec>, String> {
        if let Some(codec) = self.slot.get() {
            return Ok(codec.clone());
        }
        let codec = self.build()?;
        Ok(self.slot.get_or_init(|| codec).clone())
    }

    fn build(&self) -> Result<Arc<dyn Codec>, String> {
        let registry = self
            .registry
            .upgrade()
            .ok_or_else(|| self.shape.to_string())?;
        match &self.shape {
            ValueShape::Bool => Ok(Arc::new(BoolCodec)),
            ValueShape::Int | ValueShape::Long => Ok(Arc::new(IntCodec)),
            ValueShape::Float | ValueShape::Double => Ok(Arc::new(FloatCodec)),
            ValueShape::Str => Ok(Arc::new(StrCodec)),
            ValueShape::Object(type_name) => registry
                .lookup_type_name(type_name)
                .ok_or_else(|| type_name.clone()),
            ValueShape::List(element) | ValueShape::Array(element) => Ok(Arc::new(SeqCodec::new(
                AdapterHandle::new((**element).clone(), &registry),
            ))),
            ValueShape::Map(value) => Ok(Arc::new(MapCodec::new(AdapterHandle::new(
                (**value).clone(),
                &registry,
            )))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TypeAdapterRegistry;
    use crate::schema::ValueShape;

    #[test]
    fn resolve_dedups_by_shape_equality() {
        let mut registry = TypeAdapterRegistry::new();
        let list_a = ValueShape::list_of(ValueShape::object("t::A"));
        let first = registry.resolve(&list_a);
        let second = registry.resolve(&list_a);
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn parameterized_shapes_are_distinct_entries() {
        let mut registry = TypeAdapterRegistry::new();
        let a = registry.resolve(&ValueShape::list_of(ValueShape::object("t::A")));
        let b = registry.resolve(&ValueShape::list_of(ValueShape::object("t::B")));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn initialization_plan_preserves_first_sight_order() {
        let mut registry = TypeAdapterRegistry::new();
        registry.resolve(&ValueShape::object("t::B"));
        registry.resolve(&ValueShape::object("t::A"));
        registry.resolve(&ValueShape::object("t::B"));
        let order: Vec<String> = registry.shapes().map(|s| s.to_string()).collect();
        assert_eq!(order, vec!["t::B", "t::A"]);
    }
}
