//! Constant-time comparison of client-supplied secrets.

use subtle::ConstantTimeEq;

/// Compare two byte strings without early exit on the first differing byte.
///
/// Inputs of different length compare unequal.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    bool::from(a.ct_eq(b))
}
