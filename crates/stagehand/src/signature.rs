//! Declarative argument signatures and validated argument access.
//!
//! Every operation declares its arguments once as a slice of [`ArgKind`]s.
//! [`check`] validates arity and kinds for the whole call before anything
//! runs; [`Args`] then hands out typed values.

use glam::{Mat4, Vec3};
use stagehand_core::{Result, StagehandError};

use crate::value::Value;

/// The kind of value expected at one argument position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// An exact integer (`i`).
    Int,
    /// Any number (`f`).
    Float,
    /// A string (`s`).
    Str,
    /// A symbol token (`S`).
    Symbol,
    /// A colour vector of 3 or 4 numbers (`v`).
    Colour,
    /// A width/height vector of 2 numbers (`2`).
    Size,
    /// A 4x4 matrix as 16 numbers, row-major (`m`).
    Matrix,
    /// A vector of 4 booleans (`q`).
    BoolQuad,
}

impl ArgKind {
    /// Single-character signature code.
    #[must_use]
    pub fn code(self) -> char {
        match self {
            ArgKind::Int => 'i',
            ArgKind::Float => 'f',
            ArgKind::Str => 's',
            ArgKind::Symbol => 'S',
            ArgKind::Colour => 'v',
            ArgKind::Size => '2',
            ArgKind::Matrix => 'm',
            ArgKind::BoolQuad => 'q',
        }
    }

    /// Description used in error messages.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            ArgKind::Int => "an integer",
            ArgKind::Float => "a number",
            ArgKind::Str => "a string",
            ArgKind::Symbol => "a symbol",
            ArgKind::Colour => "a colour vector of 3 or 4 numbers",
            ArgKind::Size => "a size vector of 2 numbers",
            ArgKind::Matrix => "a matrix vector of 16 numbers",
            ArgKind::BoolQuad => "a vector of 4 booleans",
        }
    }

    /// Returns true if `value` has the shape this kind requires.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        let numbers = |lens: &[usize]| {
            value
                .as_vector()
                .is_some_and(|v| lens.contains(&v.len()) && v.iter().all(|x| x.as_number().is_some()))
        };
        match self {
            ArgKind::Int => matches!(value, Value::Int(_)),
            ArgKind::Float => value.as_number().is_some(),
            ArgKind::Str => matches!(value, Value::Str(_)),
            ArgKind::Symbol => matches!(value, Value::Symbol(_)),
            ArgKind::Colour => numbers(&[3, 4]),
            ArgKind::Size => numbers(&[2]),
            ArgKind::Matrix => numbers(&[16]),
            ArgKind::BoolQuad => value
                .as_vector()
                .is_some_and(|v| v.len() == 4 && v.iter().all(|x| matches!(x, Value::Bool(_)))),
        }
    }
}

/// Renders a signature as its code string, e.g. `"vfff"`.
#[must_use]
pub fn codes(signature: &[ArgKind]) -> String {
    signature.iter().map(|k| k.code()).collect()
}

/// Validates a whole argument list against a signature.
pub fn check(operation: &str, signature: &[ArgKind], args: &[Value]) -> Result<()> {
    if args.len() != signature.len() {
        return Err(StagehandError::Arity {
            operation: operation.to_string(),
            expected: signature.len(),
            got: args.len(),
        });
    }
    for (position, (kind, value)) in signature.iter().zip(args).enumerate() {
        if !kind.accepts(value) {
            return Err(StagehandError::ArgumentType {
                operation: operation.to_string(),
                position,
                expected: kind.describe(),
                found: value.kind_name(),
            });
        }
    }
    Ok(())
}

/// Typed view over an argument list that passed [`check`].
pub struct Args<'a> {
    operation: &'static str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub(crate) fn new(operation: &'static str, values: &'a [Value]) -> Self {
        Self { operation, values }
    }

    fn mismatch(&self, position: usize, kind: ArgKind) -> StagehandError {
        StagehandError::ArgumentType {
            operation: self.operation.to_string(),
            position,
            expected: kind.describe(),
            found: self.values.get(position).map_or("nothing", Value::kind_name),
        }
    }

    fn floats(&self, position: usize, kind: ArgKind) -> Result<Vec<f32>> {
        self.values
            .get(position)
            .and_then(Value::as_floats)
            .ok_or_else(|| self.mismatch(position, kind))
    }

    pub fn int(&self, position: usize) -> Result<i64> {
        match self.values.get(position) {
            Some(Value::Int(i)) => Ok(*i),
            _ => Err(self.mismatch(position, ArgKind::Int)),
        }
    }

    /// An integer used as an on/off switch; non-zero is on.
    pub fn flag(&self, position: usize) -> Result<bool> {
        Ok(self.int(position)? != 0)
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn float(&self, position: usize) -> Result<f32> {
        self.values
            .get(position)
            .and_then(Value::as_number)
            .map(|n| n as f32)
            .ok_or_else(|| self.mismatch(position, ArgKind::Float))
    }

    pub fn str(&self, position: usize) -> Result<&'a str> {
        match self.values.get(position) {
            Some(Value::Str(s)) => Ok(s),
            _ => Err(self.mismatch(position, ArgKind::Str)),
        }
    }

    pub fn symbol(&self, position: usize) -> Result<&'a str> {
        match self.values.get(position) {
            Some(Value::Symbol(s)) => Ok(s),
            _ => Err(self.mismatch(position, ArgKind::Symbol)),
        }
    }

    /// The first three components of a colour vector; alpha is ignored.
    pub fn colour(&self, position: usize) -> Result<Vec3> {
        let v = self.floats(position, ArgKind::Colour)?;
        match v[..] {
            [r, g, b] | [r, g, b, _] => Ok(Vec3::new(r, g, b)),
            _ => Err(self.mismatch(position, ArgKind::Colour)),
        }
    }

    pub fn size(&self, position: usize) -> Result<(f32, f32)> {
        let v = self.floats(position, ArgKind::Size)?;
        match v[..] {
            [w, h] => Ok((w, h)),
            _ => Err(self.mismatch(position, ArgKind::Size)),
        }
    }

    /// A matrix given as 16 numbers in row-major order.
    pub fn matrix(&self, position: usize) -> Result<Mat4> {
        let v = self.floats(position, ArgKind::Matrix)?;
        let cols: [f32; 16] = v
            .try_into()
            .map_err(|_| self.mismatch(position, ArgKind::Matrix))?;
        Ok(Mat4::from_cols_array(&cols).transpose())
    }

    pub fn bool_quad(&self, position: usize) -> Result<[bool; 4]> {
        let mut quad = [false; 4];
        let items = self
            .values
            .get(position)
            .and_then(Value::as_vector)
            .filter(|v| v.len() == 4)
            .ok_or_else(|| self.mismatch(position, ArgKind::BoolQuad))?;
        for (slot, item) in quad.iter_mut().zip(items) {
            match item {
                Value::Bool(b) => *slot = *b,
                _ => return Err(self.mismatch(position, ArgKind::BoolQuad)),
            }
        }
        Ok(quad)
    }
}
