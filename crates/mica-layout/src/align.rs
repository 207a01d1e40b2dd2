//! Alignment and rounding helpers.
//!
//! All alignments flowing through the engine are powers of two; the checked
//! variants turn arithmetic overflow into a typed error instead of wrapping.

use crate::error::LayoutError;

pub(crate) fn align_up_u32(value: u32, alignment: u32) -> Result<u32, LayoutError> {
    debug_assert!(alignment.is_power_of_two());
    value
        .checked_add(alignment - 1)
        .map(|v| v & !(alignment - 1))
        .ok_or_else(|| LayoutError::InvalidDescriptor("alignment overflow".into()))
}

pub(crate) fn align_up_u64(value: u64, alignment: u64) -> Result<u64, LayoutError> {
    debug_assert!(alignment.is_power_of_two());
    value
        .checked_add(alignment - 1)
        .map(|v| v & !(alignment - 1))
        .ok_or_else(|| LayoutError::InvalidDescriptor("alignment overflow".into()))
}

pub(crate) fn checked_mul_u32(a: u32, b: u32) -> Result<u32, LayoutError> {
    a.checked_mul(b)
        .ok_or_else(|| LayoutError::InvalidDescriptor("dimension overflow".into()))
}

pub(crate) fn checked_mul_u64(a: u64, b: u64) -> Result<u64, LayoutError> {
    a.checked_mul(b)
        .ok_or_else(|| LayoutError::InvalidDescriptor("size overflow".into()))
}
