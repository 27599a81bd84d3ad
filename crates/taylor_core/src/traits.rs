use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types the VM can evaluate expressions over.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {
    /// Lifts a literal into the scalar type. Literals carry no derivative part.
    fn constant(value: f64) -> Self {
        Self::from_f64(value).unwrap_or_else(Self::nan)
    }
}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}
