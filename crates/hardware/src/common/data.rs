//! Cell value types.
//!
//! Register files and data memories are generic over the value they hold. This module
//! defines that value contract:
//! 1. **Integer Path:** `i64` cells for the in-order pipeline.
//! 2. **Floating-Point Path:** `f64` cells for the Tomasulo engine's `.D` operations.
//! 3. **Validation:** Detecting non-numeric values so storage can coerce them to zero.

use std::fmt;

/// A value that can be stored in a register or memory cell.
///
/// The default value of the type is the reset value of every cell.
pub trait Word: Copy + Default + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Returns `false` when the value cannot be stored as a number.
    ///
    /// Storage primitives replace non-numeric values with zero and log a warning.
    fn is_numeric(self) -> bool;
}

impl Word for i64 {
    fn is_numeric(self) -> bool {
        true
    }
}

impl Word for f64 {
    /// Infinities are numeric; only `NaN` is rejected.
    fn is_numeric(self) -> bool {
        !self.is_nan()
    }
}
