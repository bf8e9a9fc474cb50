//! Static value shapes.

use std::fmt;

/// The static shape of a field value.
///
/// Shapes compare by full value equality, so `List<a::Foo>` and
/// `List<a::Bar>` are distinct adapter-registry keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueShape {
    Bool,
    /// Integer-like (i8/i16/i32 at the model edge).
    Int,
    /// i64 at the model edge; subject to the model's [`LongEncoding`].
    ///
    /// [`LongEncoding`]: crate::schema::LongEncoding
    Long,
    /// f32 at the model edge.
    Float,
    /// f64 at the model edge.
    Double,
    Str,
    /// A nested model, referenced by its qualified type name.
    Object(String),
    List(Box<ValueShape>),
    Array(Box<ValueShape>),
    /// String-keyed map of `T`.
    Map(Box<ValueShape>),
}

impl ValueShape {
    pub fn object(type_name: impl Into<String>) -> ValueShape {
        ValueShape::Object(type_name.into())
    }

    pub fn list_of(element: ValueShape) -> ValueShape {
        ValueShape::List(Box::new(element))
    }

    pub fn array_of(element: ValueShape) -> ValueShape {
        ValueShape::Array(Box::new(element))
    }

    pub fn map_of(value: ValueShape) -> ValueShape {
        ValueShape::Map(Box::new(value))
    }

    /// Whether the shape is written inline by a model codec rather than
    /// through a resolved adapter handle.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            ValueShape::Bool
                | ValueShape::Int
                | ValueShape::Long
                | ValueShape::Float
                | ValueShape::Double
                | ValueShape::Str
        )
    }

    /// Whether the shape has a non-nullable host representation.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ValueShape::Bool
                | ValueShape::Int
                | ValueShape::Long
                | ValueShape::Float
                | ValueShape::Double
        )
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueShape::Bool => f.write_str("bool"),
            ValueShape::Int => f.write_str("int"),
            ValueShape::Long => f.write_str("long"),
            ValueShape::Float => f.write_str("float"),
            ValueShape::Double => f.write_str("double"),
            ValueShape::Str => f.write_str("string"),
            ValueShape::Object(name) => f.write_str(name),
            ValueShape::List(el) => write!(f, "List<{el}>"),
            ValueShape::Array(el) => write!(f, "Array<{el}>"),
            ValueShape::Map(val) => write!(f, "Map<string, {val}>"),
        }
    }
}
