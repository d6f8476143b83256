//! Common imports for building and differentiating expressions.

pub use crate::errors::ADError;
pub use crate::expr::{cos, exp, log, max, min, neg, sin, Expr, Expression};
pub use crate::ops::{BinaryOp, UnaryOp};
pub use crate::scalar::Scalar;
pub use crate::symbol::Symbol;
pub use crate::tag::{new_identity_tag, Tag};
pub use crate::variable::{ConstVariable, Variable};
pub use crate::Differentiable;

#[cfg(feature = "macros")]
pub use crate::differentiable;
