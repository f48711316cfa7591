//! Name-addressable catalog of every operation in the registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::binary::{add_with_scale, BinaryOp, ScaledFn};
use crate::error::Error;
use crate::unary::UnaryOp;

/// Number of operands an operation consumes per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    Unary,
    Binary,
    Ternary,
}

impl Arity {
    pub fn operands(self) -> usize {
        match self {
            Arity::Unary => 1,
            Arity::Binary => 2,
            Arity::Ternary => 3,
        }
    }
}

/// One entry of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Unary(UnaryOp),
    Binary(BinaryOp),
    /// `x + scale * y`, see [`add_with_scale`].
    AddWithScale,
}

impl Operation {
    pub const ALL: [Operation; 21] = [
        Operation::Unary(UnaryOp::Zero),
        Operation::Unary(UnaryOp::One),
        Operation::Unary(UnaryOp::Abs),
        Operation::Unary(UnaryOp::Square),
        Operation::Unary(UnaryOp::Sigma1),
        Operation::Unary(UnaryOp::Sigma2),
        Operation::Unary(UnaryOp::Recip),
        Operation::Unary(UnaryOp::Exp),
        Operation::Unary(UnaryOp::Log),
        Operation::Unary(UnaryOp::Tanh),
        Operation::Unary(UnaryOp::Rand),
        Operation::Binary(BinaryOp::Divide),
        Operation::Binary(BinaryOp::Multiply),
        Operation::Binary(BinaryOp::Add),
        Operation::AddWithScale,
        Operation::Binary(BinaryOp::Max),
        Operation::Binary(BinaryOp::Min),
        Operation::Binary(BinaryOp::Bigger),
        Operation::Binary(BinaryOp::Smaller),
        Operation::Binary(BinaryOp::Equal),
        Operation::Binary(BinaryOp::NotEqual),
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn name(self) -> &'static str {
        match self {
            Operation::Unary(op) => op.name(),
            Operation::Binary(op) => op.name(),
            Operation::AddWithScale => "add_with_scale",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Operation::Unary(_) => Arity::Unary,
            Operation::Binary(_) => Arity::Binary,
            Operation::AddWithScale => Arity::Ternary,
        }
    }

    /// `false` only for the random draw.
    pub fn is_pure(self) -> bool {
        match self {
            Operation::Unary(op) => op.is_pure(),
            Operation::Binary(_) | Operation::AddWithScale => true,
        }
    }

    /// Handle for the three-operand entry; `None` for every other operation.
    pub fn scaled_function(self) -> Option<ScaledFn> {
        match self {
            Operation::AddWithScale => Some(add_with_scale as ScaledFn),
            _ => None,
        }
    }

    /// Looks an operation up by name.
    pub fn lookup(name: &str) -> Result<Self, Error> {
        name.parse()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "add_with_scale" || s == "addWithScale" {
            return Ok(Operation::AddWithScale);
        }
        if let Ok(op) = s.parse::<UnaryOp>() {
            return Ok(Operation::Unary(op));
        }
        s.parse::<BinaryOp>().map(Operation::Binary)
    }
}

impl From<UnaryOp> for Operation {
    fn from(op: UnaryOp) -> Self {
        Operation::Unary(op)
    }
}

impl From<BinaryOp> for Operation {
    fn from(op: BinaryOp) -> Self {
        Operation::Binary(op)
    }
}

impl Serialize for Operation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
