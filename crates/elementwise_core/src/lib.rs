//! Scalar elementwise operation registry.
//!
//! Every operation here maps one, two or three `Scalar` values to one `Scalar`
//! and is meant to be bound by an outer engine that walks dense buffers:
//! - unary activations and transcendentals ([`unary`])
//! - binary arithmetic and 0/1 predicates ([`binary`])
//! - a name-addressable catalog of all of the above ([`registry`])
//! - the owned generator behind the random fill ([`random`])
//!
//! No operation checks its domain. Division by zero, `log` of a negative
//! number and friends come back as whatever IEEE-754 produces.

pub mod binary;
pub mod config;
pub mod error;
pub mod metrics;
pub mod random;
pub mod registry;
pub mod unary;

/// Scalar type shared by every operation in this build.
#[cfg(not(feature = "double_precision"))]
pub type Scalar = f32;

/// Scalar type shared by every operation in this build.
#[cfg(feature = "double_precision")]
pub type Scalar = f64;

/// Floating representation selected for the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// 32-bit IEEE-754.
    Narrow,
    /// 64-bit IEEE-754.
    Wide,
}

#[cfg(not(feature = "double_precision"))]
pub const PRECISION: Precision = Precision::Narrow;

#[cfg(feature = "double_precision")]
pub const PRECISION: Precision = Precision::Wide;

impl Precision {
    pub fn bits(self) -> u32 {
        match self {
            Precision::Narrow => 32,
            Precision::Wide => 64,
        }
    }
}

/// Encodes a predicate outcome as `1` or `0` in the build's scalar type.
#[inline]
pub fn truth(value: bool) -> Scalar {
    Scalar::from(u8::from(value))
}

pub fn version_string() -> &'static str {
    concat!("elementwise_core ", env!("CARGO_PKG_VERSION"))
}

pub use binary::{
    add, add_with_scale, bigger, divide, equal, max, min, multiply, not_equal, smaller, BinaryFn,
    BinaryOp, ScaledFn,
};
pub use config::RandomSettings;
pub use error::{Error, Result};
pub use random::RandomSource;
pub use registry::{Arity, Operation};
pub use unary::{abs, exp, log, one, recip, sigma1, sigma2, square, tanh, zero, UnaryFn, UnaryOp};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truth_is_zero_or_one() {
        assert_eq!(truth(true), 1.0);
        assert_eq!(truth(false), 0.0);
    }

    #[test]
    fn precision_matches_scalar_width() {
        assert_eq!(
            PRECISION.bits() as usize,
            core::mem::size_of::<Scalar>() * 8
        );
    }
}
