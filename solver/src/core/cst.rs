/// Type representing an integer constant.
pub type IntCst = i32;

/// Type used to store the result of operations on `IntCst` that may overflow.
pub type LongCst = i64;

/// Overflow tolerant max value for integer constants.
/// Products and sums of a few such values still fit in a [`LongCst`].
pub const INT_CST_MAX: IntCst = IntCst::MAX / 4 - 1;

/// Overflow tolerant min value for integer constants.
pub const INT_CST_MIN: IntCst = -INT_CST_MAX;

/// Converts a long value back to an `IntCst`, saturating at the representable bounds.
pub(crate) fn clamp_to_int(value: LongCst) -> IntCst {
    value.clamp(INT_CST_MIN as LongCst, INT_CST_MAX as LongCst) as IntCst
}
