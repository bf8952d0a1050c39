//! Scalar values exchanged over couplings, and their type tags.

use std::fmt;

/// Classification of an attribute's scalar type.
///
/// Declared once when the attribute is registered; the workspace checks
/// producer/consumer compatibility at coupling creation using
/// [`ValueType::convertible_to`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// A 64-bit floating-point value.
    Float,
    /// A 64-bit signed integer value.
    Int,
    /// A boolean value.
    Bool,
}

impl ValueType {
    /// Whether a value of this type may feed an attribute of type `target`.
    ///
    /// Exact matches are always allowed. The only widening conversions are
    /// `Int → Float` and `Bool → Float` (0.0 / 1.0); narrowing is never
    /// implicit.
    pub fn convertible_to(self, target: ValueType) -> bool {
        self == target || matches!((self, target), (Self::Int | Self::Bool, Self::Float))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => write!(f, "float"),
            Self::Int => write!(f, "int"),
            Self::Bool => write!(f, "bool"),
        }
    }
}

/// A scalar value read from a producer attribute or written to a consumer
/// attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// A 64-bit floating-point value.
    Float(f64),
    /// A 64-bit signed integer value.
    Int(i64),
    /// A boolean value.
    Bool(bool),
}

impl Value {
    /// The type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Float(_) => ValueType::Float,
            Self::Int(_) => ValueType::Int,
            Self::Bool(_) => ValueType::Bool,
        }
    }

    /// Convert this value to `target`, if the conversion is permitted.
    ///
    /// Mirrors [`ValueType::convertible_to`]: exact matches pass through,
    /// `Int` and `Bool` widen to `Float`, everything else returns `None`.
    pub fn convert_to(self, target: ValueType) -> Option<Value> {
        match (self, target) {
            (v, t) if v.value_type() == t => Some(v),
            (Self::Int(i), ValueType::Float) => Some(Self::Float(i as f64)),
            (Self::Bool(b), ValueType::Float) => Some(Self::Float(if b { 1.0 } else { 0.0 })),
            _ => None,
        }
    }

    /// The value as an `f64`, converting if permitted.
    pub fn as_float(self) -> Option<f64> {
        match self.convert_to(ValueType::Float)? {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_types_convertible() {
        assert!(ValueType::Float.convertible_to(ValueType::Float));
        assert!(ValueType::Int.convertible_to(ValueType::Int));
        assert!(ValueType::Bool.convertible_to(ValueType::Bool));
    }

    #[test]
    fn widening_to_float_only() {
        assert!(ValueType::Int.convertible_to(ValueType::Float));
        assert!(ValueType::Bool.convertible_to(ValueType::Float));
        assert!(!ValueType::Float.convertible_to(ValueType::Int));
        assert!(!ValueType::Float.convertible_to(ValueType::Bool));
        assert!(!ValueType::Int.convertible_to(ValueType::Bool));
        assert!(!ValueType::Bool.convertible_to(ValueType::Int));
    }

    #[test]
    fn convert_widens_int_and_bool() {
        assert_eq!(Value::Int(3).convert_to(ValueType::Float), Some(Value::Float(3.0)));
        assert_eq!(Value::Bool(true).convert_to(ValueType::Float), Some(Value::Float(1.0)));
        assert_eq!(Value::Bool(false).convert_to(ValueType::Float), Some(Value::Float(0.0)));
        assert_eq!(Value::Float(1.5).convert_to(ValueType::Int), None);
    }

    #[test]
    fn as_float_follows_conversion_rules() {
        assert_eq!(Value::Float(0.73).as_float(), Some(0.73));
        assert_eq!(Value::Int(-2).as_float(), Some(-2.0));
        assert_eq!(Value::Bool(true).as_float(), Some(1.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_value() -> impl Strategy<Value = Value> {
            prop_oneof![
                (-1e9f64..1e9).prop_map(Value::Float),
                any::<i64>().prop_map(Value::Int),
                any::<bool>().prop_map(Value::Bool),
            ]
        }

        fn arb_type() -> impl Strategy<Value = ValueType> {
            prop_oneof![
                Just(ValueType::Float),
                Just(ValueType::Int),
                Just(ValueType::Bool),
            ]
        }

        proptest! {
            #[test]
            fn conversion_agrees_with_the_type_lattice(
                v in arb_value(),
                t in arb_type(),
            ) {
                let converted = v.convert_to(t);
                prop_assert_eq!(
                    converted.is_some(),
                    v.value_type().convertible_to(t)
                );
                if let Some(c) = converted {
                    prop_assert_eq!(c.value_type(), t);
                }
            }

            #[test]
            fn identity_conversion_is_lossless(v in arb_value()) {
                prop_assert_eq!(v.convert_to(v.value_type()), Some(v));
            }
        }
    }
}
