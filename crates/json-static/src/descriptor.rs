//! Flattened model descriptors.

use std::collections::HashSet;

use crate::naming::NamingPolicy;
use crate::schema::{FailurePolicy, LongEncoding, ModelSchema, ValueShape, Visibility};

/// One field of a built descriptor.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub declared_name: String,
    /// Accepted wire names; the first is canonical and used for encoding,
    /// the rest are decode-only aliases.
    pub wire_names: Vec<String>,
    pub shape: ValueShape,
    pub nullable: bool,
    pub policy: FailurePolicy,
    pub visibility: Visibility,
}

impl FieldDescriptor {
    pub fn canonical_name(&self) -> &str {
        &self.wire_names[0]
    }
}

/// Immutable description of one serializable model type: its flattened,
/// ordered field list plus the model-level options.
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    pub type_name: String,
    pub naming: NamingPolicy,
    pub emit_nulls: bool,
    pub long_encoding: LongEncoding,
    pub fields: Vec<FieldDescriptor>,
}

impl ModelDescriptor {
    /// Flatten a schema and its ancestor chain into one ordered field list.
    ///
    /// The model's own fields come first in declaration order, then each
    /// ancestor's, walking up until the root sentinel. The most-derived
    /// model's naming policy applies to inherited fields as well. Wire-name
    /// candidates are unique across the descriptor: the first declaration
    /// of a name wins, a later field whose canonical name is already taken
    /// is shadowed entirely, and a later field only loses the stolen
    /// aliases otherwise. Transient fields are dropped.
    pub fn build(schema: &ModelSchema) -> ModelDescriptor {
        let mut fields = Vec::new();
        let mut taken: HashSet<String> = HashSet::new();

        let mut current = Some(schema);
        while let Some(model) = current {
            for record in &model.fields {
                if record.transient {
                    continue;
                }
                let canonical = match &record.rename {
                    Some(name) => name.clone(),
                    None => schema.naming.translate(&record.declared_name),
                };
                if taken.contains(&canonical) {
                    // Shadowed by an earlier declaration.
                    continue;
                }
                let mut wire_names = vec![canonical];
                for alias in &record.aliases {
                    if !taken.contains(alias) && !wire_names.contains(alias) {
                        wire_names.push(alias.clone());
                    }
                }
                for name in &wire_names {
                    taken.insert(name.clone());
                }
                fields.push(FieldDescriptor {
                    declared_name: record.declared_name.clone(),
                    wire_names,
                    shape: record.shape.clone(),
                    nullable: record.nullable,
                    policy: FailurePolicy::resolve(
                        record.strict,
                        record.require_non_null,
                        record.must_set,
                        &record.shape,
                        record.nullable,
                    ),
                    visibility: record.visibility,
                });
            }
            current = model.ancestor.as_deref();
        }

        ModelDescriptor {
            type_name: schema.type_name.clone(),
            naming: schema.naming,
            emit_nulls: schema.emit_nulls,
            long_encoding: schema.long_encoding,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::ModelDescriptor;
    use crate::naming::NamingPolicy;
    use crate::schema::{FailurePolicy, FieldRecord, ModelSchema, ValueShape};

    #[test]
    fn naming_policy_applies_to_wire_names() {
        let schema = ModelSchema::new("t::M")
            .naming(NamingPolicy::LowerWithUnderscores)
            .field(FieldRecord::new("fooBarBaz", ValueShape::Int));
        let descriptor = ModelDescriptor::build(&schema);
        assert_eq!(descriptor.fields[0].canonical_name(), "foo_bar_baz");
    }

    #[test]
    fn rename_bypasses_policy_and_keeps_aliases() {
        let schema = ModelSchema::new("t::M")
            .naming(NamingPolicy::UpperCamel)
            .field(
                FieldRecord::new("fooBar", ValueShape::Str)
                    .nullable()
                    .renamed("foo")
                    .alias("legacy_foo"),
            );
        let descriptor = ModelDescriptor::build(&schema);
        assert_eq!(descriptor.fields[0].wire_names, vec!["foo", "legacy_foo"]);
    }

    #[test]
    fn ancestors_append_after_own_fields() {
        let base = Arc::new(
            ModelSchema::new("t::Base")
                .field(FieldRecord::new("baseValue", ValueShape::Str).nullable()),
        );
        let schema = ModelSchema::new("t::Derived")
            .field(FieldRecord::new("derivedValue", ValueShape::Str).nullable())
            .ancestor(base);
        let descriptor = ModelDescriptor::build(&schema);
        let names: Vec<_> = descriptor
            .fields
            .iter()
            .map(|f| f.declared_name.as_str())
            .collect();
        assert_eq!(names, vec!["derivedValue", "baseValue"]);
    }

    #[test]
    fn derived_field_shadows_ancestor_with_same_wire_name() {
        let base = Arc::new(
            ModelSchema::new("t::Base")
                .field(FieldRecord::new("value", ValueShape::Str).nullable()),
        );
        let schema = ModelSchema::new("t::Derived")
            .field(FieldRecord::new("value", ValueShape::Int))
            .ancestor(base);
        let descriptor = ModelDescriptor::build(&schema);
        assert_eq!(descriptor.fields.len(), 1);
        assert_eq!(descriptor.fields[0].shape, ValueShape::Int);
    }

    #[test]
    fn alias_overlap_resolves_to_first_declaration() {
        let schema = ModelSchema::new("t::M")
            .field(FieldRecord::new("a", ValueShape::Int))
            .field(
                FieldRecord::new("b", ValueShape::Int)
                    .renamed("b")
                    .alias("a"),
            );
        let descriptor = ModelDescriptor::build(&schema);
        assert_eq!(descriptor.fields[0].wire_names, vec!["a"]);
        // "b" keeps its canonical name but loses the stolen alias.
        assert_eq!(descriptor.fields[1].wire_names, vec!["b"]);
    }

    #[test]
    fn transient_fields_are_dropped() {
        let schema = ModelSchema::new("t::M")
            .field(FieldRecord::new("keep", ValueShape::Int))
            .field(FieldRecord::new("skip", ValueShape::Int).transient());
        let descriptor = ModelDescriptor::build(&schema);
        assert_eq!(descriptor.fields.len(), 1);
        assert_eq!(descriptor.fields[0].declared_name, "keep");
    }

    #[test]
    fn visibility_is_carried_through() {
        use crate::schema::Visibility;
        let schema = ModelSchema::new("t::M")
            .field(FieldRecord::new("hidden", ValueShape::Str).nullable().private());
        let descriptor = ModelDescriptor::build(&schema);
        assert_eq!(descriptor.fields[0].visibility, Visibility::Private);
    }

    #[test]
    fn policies_resolve_per_field() {
        let schema = ModelSchema::new("t::M")
            .field(FieldRecord::new("a", ValueShape::Str).nullable().strict())
            .field(FieldRecord::new("b", ValueShape::Str).nullable().non_null())
            .field(FieldRecord::new("c", ValueShape::Int).must_set())
            .field(FieldRecord::new("d", ValueShape::Int));
        let descriptor = ModelDescriptor::build(&schema);
        let policies: Vec<_> = descriptor.fields.iter().map(|f| f.policy).collect();
        assert_eq!(
            policies,
            vec![
                FailurePolicy::Strict,
                FailurePolicy::RequireNonNull,
                FailurePolicy::MustSet,
                FailurePolicy::Lenient,
            ]
        );
    }
}
