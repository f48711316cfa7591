//! Numeric comparison helpers for checking operation outputs against each other.

use crate::Scalar;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Order-sensitive fingerprint of the exact bit patterns in `values`.
///
/// Signed zeros and NaN payloads change the result, so two runs match only
/// when every output is bitwise identical.
pub fn checksum(values: &[Scalar]) -> u64 {
    values.iter().fold(FNV_OFFSET, |hash, v| {
        (hash ^ u64::from(v.to_bits())).wrapping_mul(FNV_PRIME)
    })
}

/// Largest `|a[i] - b[i]|` over the common prefix.
///
/// Equal values (including matching infinities) and NaN on both sides count
/// as zero; NaN on one side only counts as infinite.
pub fn max_abs_diff(a: &[Scalar], b: &[Scalar]) -> Scalar {
    a.iter()
        .zip(b)
        .map(|(&lhs, &rhs)| {
            if lhs == rhs || (lhs.is_nan() && rhs.is_nan()) {
                0.0
            } else {
                let delta = (lhs - rhs).abs();
                if delta.is_nan() {
                    Scalar::INFINITY
                } else {
                    delta
                }
            }
        })
        .fold(0.0, Scalar::max)
}

#[cfg(not(feature = "double_precision"))]
fn ordered_bits(v: Scalar) -> i64 {
    let bits = v.to_bits() as i32;
    i64::from(if bits < 0 { i32::MIN - bits } else { bits })
}

#[cfg(feature = "double_precision")]
fn ordered_bits(v: Scalar) -> i64 {
    let bits = v.to_bits() as i64;
    if bits < 0 {
        i64::MIN - bits
    } else {
        bits
    }
}

/// Number of representable values between `a` and `b`; `None` if either is NaN.
///
/// `+0.0` and `-0.0` are zero ULPs apart.
pub fn ulp_distance(a: Scalar, b: Scalar) -> Option<u64> {
    if a.is_nan() || b.is_nan() {
        return None;
    }
    Some(ordered_bits(a).abs_diff(ordered_bits(b)))
}
