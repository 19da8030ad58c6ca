//! Resources produced and consumed by primitive file formats.

use std::any::Any;

/// A renderable resource that can be read from or written to disk.
///
/// Formats use [`as_any`](Primitive::as_any) to check that they were handed
/// the concrete kind they know how to serialize.
pub trait Primitive: Any {
    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to self as `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the type name of this primitive (e.g. "`PixelPrimitive`").
    fn type_name(&self) -> &'static str;
}
