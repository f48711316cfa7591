//! Unary elementwise operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::random::RandomSource;
use crate::Scalar;

/// Handle for a pure unary operation.
pub type UnaryFn = fn(Scalar) -> Scalar;

/// Always `0`; the input is ignored.
#[inline]
pub fn zero(_x: Scalar) -> Scalar {
    0.0
}

/// Always `1`; the input is ignored.
#[inline]
pub fn one(_x: Scalar) -> Scalar {
    1.0
}

#[inline]
pub fn abs(x: Scalar) -> Scalar {
    x.abs()
}

#[inline]
pub fn square(x: Scalar) -> Scalar {
    x * x
}

/// Logistic sigmoid through the tanh identity: `(tanh(x/2) + 1) / 2`.
///
/// Saturates to exactly `0` or `1` for large `|x|` instead of overflowing.
#[inline]
pub fn sigma1(x: Scalar) -> Scalar {
    ((x / 2.0).tanh() + 1.0) / 2.0
}

/// Logistic sigmoid through the exponential: `1 / (1 + e^-x)`.
///
/// For very negative `x` the exponential overflows to infinity and the result
/// rounds to `0`.
#[inline]
pub fn sigma2(x: Scalar) -> Scalar {
    1.0 / (1.0 + (-x).exp())
}

#[inline]
pub fn recip(x: Scalar) -> Scalar {
    1.0 / x
}

#[inline]
pub fn exp(x: Scalar) -> Scalar {
    x.exp()
}

/// Natural logarithm.
#[inline]
pub fn log(x: Scalar) -> Scalar {
    x.ln()
}

#[inline]
pub fn tanh(x: Scalar) -> Scalar {
    x.tanh()
}

/// Closed set of unary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Zero,
    One,
    Abs,
    Square,
    Sigma1,
    Sigma2,
    Recip,
    Exp,
    Log,
    Tanh,
    /// Uniform draw in `[0, 1)` from a [`RandomSource`].
    Rand,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 11] = [
        UnaryOp::Zero,
        UnaryOp::One,
        UnaryOp::Abs,
        UnaryOp::Square,
        UnaryOp::Sigma1,
        UnaryOp::Sigma2,
        UnaryOp::Recip,
        UnaryOp::Exp,
        UnaryOp::Log,
        UnaryOp::Tanh,
        UnaryOp::Rand,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Zero => "zero",
            UnaryOp::One => "one",
            UnaryOp::Abs => "abs",
            UnaryOp::Square => "square",
            UnaryOp::Sigma1 => "sigma1",
            UnaryOp::Sigma2 => "sigma2",
            UnaryOp::Recip => "recip",
            UnaryOp::Exp => "exp",
            UnaryOp::Log => "log",
            UnaryOp::Tanh => "tanh",
            UnaryOp::Rand => "rand",
        }
    }

    /// `false` only for [`UnaryOp::Rand`], which advances generator state.
    pub fn is_pure(self) -> bool {
        !matches!(self, UnaryOp::Rand)
    }

    /// Function handle for pure operations; `None` for [`UnaryOp::Rand`].
    pub fn function(self) -> Option<UnaryFn> {
        let f: UnaryFn = match self {
            UnaryOp::Zero => zero,
            UnaryOp::One => one,
            UnaryOp::Abs => abs,
            UnaryOp::Square => square,
            UnaryOp::Sigma1 => sigma1,
            UnaryOp::Sigma2 => sigma2,
            UnaryOp::Recip => recip,
            UnaryOp::Exp => exp,
            UnaryOp::Log => log,
            UnaryOp::Tanh => tanh,
            UnaryOp::Rand => return None,
        };
        Some(f)
    }

    /// Applies the operation to one element. Only [`UnaryOp::Rand`] touches `random`.
    #[inline]
    pub fn apply(self, x: Scalar, random: &mut RandomSource) -> Scalar {
        match self {
            UnaryOp::Zero => zero(x),
            UnaryOp::One => one(x),
            UnaryOp::Abs => abs(x),
            UnaryOp::Square => square(x),
            UnaryOp::Sigma1 => sigma1(x),
            UnaryOp::Sigma2 => sigma2(x),
            UnaryOp::Recip => recip(x),
            UnaryOp::Exp => exp(x),
            UnaryOp::Log => log(x),
            UnaryOp::Tanh => tanh(x),
            UnaryOp::Rand => random.rand(x),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnaryOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnaryOp::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}
