//! Interpreter values crossing the dispatch boundary.

use std::fmt;

use glam::Mat4;

/// A dynamically typed interpreter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The unspecified result of an operation run for its effect.
    Void,
    Bool(bool),
    /// An exact integer.
    Int(i64),
    /// An inexact real.
    Float(f64),
    Str(String),
    Symbol(String),
    Vector(Vec<Value>),
}

impl Value {
    /// Human-readable name of this value's kind, used in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "real",
            Value::Str(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Vector(_) => "vector",
        }
    }

    /// Creates a symbol value.
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    /// Creates a vector of reals.
    pub fn floats(values: impl IntoIterator<Item = f32>) -> Self {
        Value::Vector(
            values
                .into_iter()
                .map(|v| Value::Float(f64::from(v)))
                .collect(),
        )
    }

    /// Flattens a matrix into 16 reals in row-major order.
    #[must_use]
    pub fn matrix(m: Mat4) -> Self {
        Self::floats(m.transpose().to_cols_array())
    }

    /// Returns the value as a real if it is any kind of number.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Value::Int(i) => Some(i as f64),
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the elements if this is a vector.
    #[must_use]
    pub fn as_vector(&self) -> Option<&[Value]> {
        match self {
            Value::Vector(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the vector's elements as `f32`s if they are all numbers.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_floats(&self) -> Option<Vec<f32>> {
        self.as_vector()?
            .iter()
            .map(|v| v.as_number().map(|n| n as f32))
            .collect()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("#<void>"),
            Value::Bool(true) => f.write_str("#t"),
            Value::Bool(false) => f.write_str("#f"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Symbol(s) => f.write_str(s),
            Value::Vector(items) => {
                f.write_str("#(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn test_matrix_is_row_major() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let flat = Value::matrix(m).as_floats().unwrap();
        assert_eq!(flat.len(), 16);
        // translation sits in the last column, i.e. the end of each row
        assert_eq!(flat[3], 1.0);
        assert_eq!(flat[7], 2.0);
        assert_eq!(flat[11], 3.0);
        assert_eq!(flat[15], 1.0);
    }

    #[test]
    fn test_display() {
        let v = Value::Vector(vec![
            Value::Bool(true),
            Value::Int(3),
            Value::Float(0.5),
            Value::symbol("back"),
            Value::from("a.png"),
        ]);
        assert_eq!(v.to_string(), "#(#t 3 0.5 back \"a.png\")");
    }

    #[test]
    fn test_as_floats_requires_numbers() {
        let mixed = Value::Vector(vec![Value::Int(1), Value::Bool(false)]);
        assert!(mixed.as_floats().is_none());
        assert_eq!(
            Value::Vector(vec![Value::Int(1), Value::Float(2.5)]).as_floats(),
            Some(vec![1.0, 2.5])
        );
    }
}
