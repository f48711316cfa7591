//! Binary elementwise operations and the scaled-add primitive.
//!
//! Predicates (`bigger`, `smaller`, `equal`, `not_equal`) return `1` or `0` in
//! [`Scalar`] so their output can be fed straight back into arithmetic, e.g. as
//! a mask. Comparisons are exact, with no epsilon.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::{truth, Scalar};

/// Handle for a two-operand operation.
pub type BinaryFn = fn(Scalar, Scalar) -> Scalar;

/// Handle for the three-operand scaled add.
pub type ScaledFn = fn(Scalar, Scalar, Scalar) -> Scalar;

#[inline]
pub fn divide(x: Scalar, y: Scalar) -> Scalar {
    x / y
}

#[inline]
pub fn multiply(x: Scalar, y: Scalar) -> Scalar {
    x * y
}

#[inline]
pub fn add(x: Scalar, y: Scalar) -> Scalar {
    x + y
}

/// `x + scale * y`.
///
/// Kept as a separate multiply and add so it agrees bit-for-bit with
/// `add(x, multiply(scale, y))`. A gradient step `x - rate * g` is
/// `add_with_scale(x, g, -rate)`.
#[inline]
pub fn add_with_scale(x: Scalar, y: Scalar, scale: Scalar) -> Scalar {
    x + scale * y
}

/// Larger operand; returns `x` when the operands are unordered or equal.
#[inline]
pub fn max(x: Scalar, y: Scalar) -> Scalar {
    if x < y {
        y
    } else {
        x
    }
}

/// Smaller operand; returns `x` when the operands are unordered or equal.
#[inline]
pub fn min(x: Scalar, y: Scalar) -> Scalar {
    if y < x {
        y
    } else {
        x
    }
}

#[inline]
pub fn bigger(x: Scalar, y: Scalar) -> Scalar {
    truth(x > y)
}

#[inline]
pub fn smaller(x: Scalar, y: Scalar) -> Scalar {
    truth(x < y)
}

#[inline]
pub fn equal(x: Scalar, y: Scalar) -> Scalar {
    truth(x == y)
}

/// `1` when the operands differ, including whenever either is NaN.
#[inline]
pub fn not_equal(x: Scalar, y: Scalar) -> Scalar {
    truth(x != y)
}

/// Closed set of two-operand operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Divide,
    #[serde(alias = "mult")]
    Multiply,
    Add,
    Max,
    Min,
    Bigger,
    Smaller,
    Equal,
    #[serde(alias = "notEqual")]
    NotEqual,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 9] = [
        BinaryOp::Divide,
        BinaryOp::Multiply,
        BinaryOp::Add,
        BinaryOp::Max,
        BinaryOp::Min,
        BinaryOp::Bigger,
        BinaryOp::Smaller,
        BinaryOp::Equal,
        BinaryOp::NotEqual,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Divide => "divide",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Add => "add",
            BinaryOp::Max => "max",
            BinaryOp::Min => "min",
            BinaryOp::Bigger => "bigger",
            BinaryOp::Smaller => "smaller",
            BinaryOp::Equal => "equal",
            BinaryOp::NotEqual => "not_equal",
        }
    }

    /// Relational operations whose result is always `0` or `1`.
    pub fn is_predicate(self) -> bool {
        matches!(
            self,
            BinaryOp::Bigger | BinaryOp::Smaller | BinaryOp::Equal | BinaryOp::NotEqual
        )
    }

    pub fn function(self) -> BinaryFn {
        match self {
            BinaryOp::Divide => divide,
            BinaryOp::Multiply => multiply,
            BinaryOp::Add => add,
            BinaryOp::Max => max,
            BinaryOp::Min => min,
            BinaryOp::Bigger => bigger,
            BinaryOp::Smaller => smaller,
            BinaryOp::Equal => equal,
            BinaryOp::NotEqual => not_equal,
        }
    }

    #[inline]
    pub fn apply(self, x: Scalar, y: Scalar) -> Scalar {
        match self {
            BinaryOp::Divide => divide(x, y),
            BinaryOp::Multiply => multiply(x, y),
            BinaryOp::Add => add(x, y),
            BinaryOp::Max => max(x, y),
            BinaryOp::Min => min(x, y),
            BinaryOp::Bigger => bigger(x, y),
            BinaryOp::Smaller => smaller(x, y),
            BinaryOp::Equal => equal(x, y),
            BinaryOp::NotEqual => not_equal(x, y),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BinaryOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mult" => return Ok(BinaryOp::Multiply),
            "notEqual" => return Ok(BinaryOp::NotEqual),
            _ => {}
        }
        BinaryOp::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_values() {
        assert_eq!(max(3.0, 5.0), 5.0);
        assert_eq!(min(3.0, 5.0), 3.0);
        assert_eq!(divide(6.0, 3.0), 2.0);
        assert_eq!(multiply(2.5, 4.0), 10.0);
        assert_eq!(add(1.5, -0.5), 1.0);
        assert_eq!(add_with_scale(1.0, 2.0, -0.5), 0.0);
    }

    #[test]
    fn predicates_encode_as_zero_or_one() {
        assert_eq!(bigger(2.0, 1.0), 1.0);
        assert_eq!(bigger(1.0, 2.0), 0.0);
        assert_eq!(smaller(1.0, 2.0), 1.0);
        assert_eq!(equal(0.0, -0.0), 1.0);
        assert_eq!(not_equal(0.0, -0.0), 0.0);
        assert_eq!(not_equal(1.0, 1.0 + Scalar::EPSILON), 1.0);
    }

    #[test]
    fn nan_is_unordered() {
        let nan = Scalar::NAN;
        for (x, y) in [(nan, 1.0), (1.0, nan), (nan, nan)] {
            assert_eq!(bigger(x, y), 0.0);
            assert_eq!(smaller(x, y), 0.0);
            assert_eq!(equal(x, y), 0.0);
            assert_eq!(not_equal(x, y), 1.0);
        }
    }

    #[test]
    fn max_min_return_first_operand_when_unordered() {
        assert!(max(Scalar::NAN, 1.0).is_nan());
        assert_eq!(max(1.0, Scalar::NAN), 1.0);
        assert!(min(Scalar::NAN, 1.0).is_nan());
        assert_eq!(min(1.0, Scalar::NAN), 1.0);
        assert!(max(-0.0, 0.0).is_sign_negative());
        assert!(min(0.0, -0.0).is_sign_positive());
    }

    #[test]
    fn divide_by_zero_is_not_checked() {
        assert_eq!(divide(1.0, 0.0), Scalar::INFINITY);
        assert_eq!(divide(-1.0, 0.0), Scalar::NEG_INFINITY);
        assert!(divide(0.0, 0.0).is_nan());
    }

    #[test]
    fn handles_match_dispatch() {
        for op in BinaryOp::ALL {
            let f = op.function();
            for (x, y) in [(1.0, 2.0), (-3.0, 0.5), (4.0, 4.0)] {
                assert_eq!(f(x, y).to_bits(), op.apply(x, y).to_bits(), "{op}");
            }
        }
    }

    #[test]
    fn only_relations_are_predicates() {
        let predicates: Vec<_> = BinaryOp::ALL
            .into_iter()
            .filter(|op| op.is_predicate())
            .collect();
        assert_eq!(
            predicates,
            vec![
                BinaryOp::Bigger,
                BinaryOp::Smaller,
                BinaryOp::Equal,
                BinaryOp::NotEqual
            ]
        );
    }

    #[test]
    fn parses_names_and_aliases() {
        for op in BinaryOp::ALL {
            assert_eq!(op.name().parse::<BinaryOp>().unwrap(), op);
        }
        assert_eq!("mult".parse::<BinaryOp>().unwrap(), BinaryOp::Multiply);
        assert_eq!("notEqual".parse::<BinaryOp>().unwrap(), BinaryOp::NotEqual);
        assert!("add_with_scale".parse::<BinaryOp>().is_err());
    }

    #[test]
    fn sampled_pairs_are_ordered_exactly_once() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0xB1);
        for _ in 0..2048 {
            let x: Scalar = rng.gen_range(-1e3..1e3);
            let y: Scalar = if rng.gen_bool(0.1) { x } else { rng.gen_range(-1e3..1e3) };
            assert_eq!(bigger(x, y) + smaller(x, y) + equal(x, y), 1.0, "x={x} y={y}");
            assert_eq!(equal(x, y) + not_equal(x, y), 1.0);
            assert_eq!(add_with_scale(x, y, 1.0), add(x, y));
            assert_eq!(max(x, y) + min(x, y), x + y);
        }
    }
}
