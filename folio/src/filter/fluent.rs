use crate::common::Value;

use super::{ComparisonOp, FieldCondition, Filter};

/// Creates a fluent filter builder for the specified field name.
///
/// Embedded fields are addressed with the configured separator, for
/// example `field("publisher.country")`.
pub fn field(field_name: &str) -> FluentFilter {
    FluentFilter {
        field_name: field_name.to_string(),
    }
}

/// A fluent builder for constructing filters on a specific field.
///
/// Each method returns a [`Filter`] that can be passed to `find()` directly
/// or combined with other filters through [`Filter::and`].
pub struct FluentFilter {
    field_name: String,
}

impl FluentFilter {
    #[inline]
    fn condition<T: Into<Value>>(self, op: ComparisonOp, value: T) -> Filter {
        Filter::from_condition(FieldCondition::new(&self.field_name, op, value.into()))
    }

    /// Matches documents where the field equals the value. A missing field
    /// equals null.
    #[inline]
    pub fn eq<T: Into<Value>>(self, value: T) -> Filter {
        self.condition(ComparisonOp::Equals, value)
    }

    /// Matches documents where the field does not equal the value.
    #[inline]
    pub fn ne<T: Into<Value>>(self, value: T) -> Filter {
        self.condition(ComparisonOp::NotEquals, value)
    }

    /// Matches documents where the field is greater than the value.
    #[inline]
    pub fn gt<T: Into<Value>>(self, value: T) -> Filter {
        self.condition(ComparisonOp::GreaterThan, value)
    }

    #[inline]
    pub fn gte<T: Into<Value>>(self, value: T) -> Filter {
        self.condition(ComparisonOp::GreaterOrEqual, value)
    }

    #[inline]
    pub fn lt<T: Into<Value>>(self, value: T) -> Filter {
        self.condition(ComparisonOp::LessThan, value)
    }

    #[inline]
    pub fn lte<T: Into<Value>>(self, value: T) -> Filter {
        self.condition(ComparisonOp::LessOrEqual, value)
    }
}
