//! Batch codec generation.
//!
//! One [`ModelEntry`] per model type; [`Generator::run`] validates, builds
//! and registers each entry. A schema that cannot be generated fails alone
//! — the rest of the batch proceeds. Independent models share no mutable
//! state, so batches of more than one entry synthesize on scoped worker
//! threads, with the registry's write lock serializing the registrations.

use std::collections::HashSet;
use std::sync::Arc;

use crate::codec::{GeneratedCodec, ModelBinding};
use crate::descriptor::ModelDescriptor;
use crate::error::GenerationError;
use crate::registry::{adapter_name, CodecRegistry};
use crate::schema::{ModelSchema, ValueShape};

/// Report for one successfully generated model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModel {
    pub type_name: String,
    pub adapter_name: String,
}

type BuildFn = Box<dyn FnOnce(&Arc<CodecRegistry>) -> Result<(), GenerationError> + Send>;

/// One model queued for generation: its schema-derived descriptor plus the
/// typed registration step.
pub struct ModelEntry {
    type_name: String,
    field_shapes: Vec<(String, ValueShape)>,
    build: BuildFn,
}

impl ModelEntry {
    pub fn new<T: Default + 'static>(schema: ModelSchema, binding: ModelBinding<T>) -> ModelEntry {
        let descriptor = ModelDescriptor::build(&schema);
        let type_name = descriptor.type_name.clone();
        let field_shapes = descriptor
            .fields
            .iter()
            .map(|f| (f.declared_name.clone(), f.shape.clone()))
            .collect();
        let build: BuildFn = Box::new(move |registry: &Arc<CodecRegistry>| {
            let codec = GeneratedCodec::<T>::synthesize(&descriptor, binding, registry)?;
            registry.register::<T>(&descriptor.type_name, Arc::new(codec));
            Ok(())
        });
        ModelEntry {
            type_name,
            field_shapes,
            build,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

pub struct Generator {
    registry: Arc<CodecRegistry>,
}

impl Generator {
    pub fn new(registry: Arc<CodecRegistry>) -> Generator {
        Generator { registry }
    }

    /// Generate and register every entry, returning one result per entry in
    /// input order.
    pub fn run(&self, batch: Vec<ModelEntry>) -> Vec<Result<GeneratedModel, GenerationError>> {
        let batch_names: HashSet<String> =
            batch.iter().map(|entry| entry.type_name.clone()).collect();

        let mut results: Vec<Result<GeneratedModel, GenerationError>> =
            Vec::with_capacity(batch.len());
        let mut pending: Vec<(usize, ModelEntry)> = Vec::new();

        for (index, entry) in batch.into_iter().enumerate() {
            results.push(Ok(GeneratedModel {
                type_name: entry.type_name.clone(),
                adapter_name: adapter_name(&entry.type_name),
            }));
            match self.validate(&entry, &batch_names) {
                Ok(()) => pending.push((index, entry)),
                Err(error) => results[index] = Err(error),
            }
        }

        if pending.len() == 1 {
            let (index, entry) = pending.remove(0);
            if let Err(error) = (entry.build)(&self.registry) {
                results[index] = Err(error);
            }
        } else if !pending.is_empty() {
            let registry = &self.registry;
            let outcomes: Vec<(usize, Result<(), GenerationError>)> =
                std::thread::scope(|scope| {
                    let workers: Vec<_> = pending
                        .into_iter()
                        .map(|(index, entry)| {
                            scope.spawn(move || (index, (entry.build)(registry)))
                        })
                        .collect();
                    workers
                        .into_iter()
                        .map(|worker| worker.join().expect("generator worker panicked"))
                        .collect()
                });
            for (index, outcome) in outcomes {
                if let Err(error) = outcome {
                    results[index] = Err(error);
                }
            }
        }

        results
    }

    /// Every model type a field references must be registered already or be
    /// part of this batch.
    fn validate(&self, entry: &ModelEntry, batch_names: &HashSet<String>) -> Result<(), GenerationError> {
        for (field, shape) in &entry.field_shapes {
            let mut referenced = Vec::new();
            collect_referenced_models(shape, &mut referenced);
            for type_name in referenced {
                if !batch_names.contains(type_name)
                    && !self.registry.contains_type_name(type_name)
                {
                    return Err(GenerationError::NotSerializable {
                        model: entry.type_name.clone(),
                        field: field.clone(),
                        type_name: type_name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn collect_referenced_models<'a>(shape: &'a ValueShape, out: &mut Vec<&'a String>) {
    match shape {
        ValueShape::Object(type_name) => out.push(type_name),
        ValueShape::List(element) | ValueShape::Array(element) | ValueShape::Map(element) => {
            collect_referenced_models(element, out)
        }
        _ => {}
    }
}
