//! Small numeric helpers shared by the pixel kernels.

/// Multiply two 0-255 channel values, renormalizing back into 0-255 with
/// correct rounding (`(a*b + 127) / 255`).
pub(crate) fn mul_div255(a: u8, b: u8) -> u8 {
    ((a as u16 * b as u16 + 127) / 255) as u8
}

/// Saturating add for 0-255 channel values.
pub(crate) fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Clamp `v` into `[lo, hi]`.
pub(crate) fn clamp_i64(v: i64, lo: i64, hi: i64) -> i64 {
    v.max(lo).min(hi)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
