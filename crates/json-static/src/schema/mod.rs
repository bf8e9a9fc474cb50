//! Schema input contract.
//!
//! The schema-extraction front end (out of scope here) reports each model
//! as a [`ModelSchema`]: an ordered sequence of [`FieldRecord`]s plus the
//! model-level options and an optional ancestor reference. These records
//! are the only thing the generator knows about a model's source form.

mod policy;
mod shape;

pub use policy::FailurePolicy;
pub use shape::ValueShape;

use std::sync::Arc;

use crate::naming::NamingPolicy;

/// Whether a field is directly reachable or goes through generated
/// accessor functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// How `Long`-shaped fields are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LongEncoding {
    /// Ordinary number tokens.
    #[default]
    Number,
    /// Decimal string tokens; decode accepts both forms.
    String,
}

/// One field as reported by the schema front end.
#[derive(Debug, Clone)]
pub struct FieldRecord {
    pub declared_name: String,
    pub shape: ValueShape,
    /// Whether the host type can hold an absent value (independent of wire
    /// null).
    pub nullable: bool,
    /// Explicit wire name; bypasses the naming policy entirely.
    pub rename: Option<String>,
    /// Alternate names accepted on decode only.
    pub aliases: Vec<String>,
    pub strict: bool,
    pub require_non_null: bool,
    pub must_set: bool,
    /// Excluded from serialization entirely.
    pub transient: bool,
    pub visibility: Visibility,
}

impl FieldRecord {
    pub fn new(declared_name: impl Into<String>, shape: ValueShape) -> Self {
        Self {
            declared_name: declared_name.into(),
            shape,
            nullable: false,
            rename: None,
            aliases: Vec::new(),
            strict: false,
            require_non_null: false,
            must_set: false,
            transient: false,
            visibility: Visibility::Public,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn non_null(mut self) -> Self {
        self.require_non_null = true;
        self
    }

    pub fn must_set(mut self) -> Self {
        self.must_set = true;
        self
    }

    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    pub fn renamed(mut self, wire_name: impl Into<String>) -> Self {
        self.rename = Some(wire_name.into());
        self
    }

    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.aliases.push(name.into());
        self
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }
}

/// Schema input for one model type.
#[derive(Debug, Clone)]
pub struct ModelSchema {
    /// Qualified type name, e.g. `store::Book`.
    pub type_name: String,
    pub naming: NamingPolicy,
    /// Emit `name: null` for absent nullable fields instead of omitting
    /// them.
    pub emit_nulls: bool,
    pub long_encoding: LongEncoding,
    pub fields: Vec<FieldRecord>,
    /// Ancestor model whose fields are flattened in after this model's
    /// own. `None` is the root sentinel.
    pub ancestor: Option<Arc<ModelSchema>>,
}

impl ModelSchema {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            naming: NamingPolicy::Identity,
            emit_nulls: false,
            long_encoding: LongEncoding::Number,
            fields: Vec::new(),
            ancestor: None,
        }
    }

    pub fn naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    pub fn emit_nulls(mut self) -> Self {
        self.emit_nulls = true;
        self
    }

    pub fn long_encoding(mut self, encoding: LongEncoding) -> Self {
        self.long_encoding = encoding;
        self
    }

    pub fn field(mut self, record: FieldRecord) -> Self {
        self.fields.push(record);
        self
    }

    pub fn ancestor(mut self, ancestor: Arc<ModelSchema>) -> Self {
        self.ancestor = Some(ancestor);
        self
    }
}
