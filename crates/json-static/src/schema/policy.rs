//! Per-field failure policies.

use super::shape::ValueShape;

/// What happens when decoding a field's value fails or is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Conversion failures are reported to the sink and the field keeps its
    /// default value; decoding continues.
    #[default]
    Lenient,
    /// Conversion failures abort decoding of the enclosing object. A wire
    /// null or an absent key is still tolerated.
    Strict,
    /// Strict, and additionally a wire null or absent key is itself an
    /// error.
    RequireNonNull,
    /// Strict, and additionally the field must see at least one assignment
    /// during decoding. Only meaningful for non-nullable primitives, which
    /// have no null state to check after the fact.
    MustSet,
}

impl FailurePolicy {
    /// Resolve a field's policy from its markers. When several markers are
    /// present the most restrictive wins: MustSet > RequireNonNull >
    /// Strict > Lenient.
    pub fn resolve(
        strict: bool,
        require_non_null: bool,
        must_set: bool,
        shape: &ValueShape,
        nullable: bool,
    ) -> FailurePolicy {
        if must_set && !nullable && shape.is_primitive() {
            FailurePolicy::MustSet
        } else if require_non_null {
            FailurePolicy::RequireNonNull
        } else if strict {
            FailurePolicy::Strict
        } else {
            FailurePolicy::Lenient
        }
    }

    /// Whether a conversion failure on this field aborts the enclosing
    /// object instead of being recovered locally.
    pub fn aborts_on_error(&self) -> bool {
        !matches!(self, FailurePolicy::Lenient)
    }
}
