//! Automatic differentiation over expression trees.
//!
//! Leaves ([`variable::Variable`], [`variable::ConstVariable`]) are combined
//! with operators and the free functions in [`expr`] into an [`expr::Expr`]
//! tree. Each call to `value()` or `grad(&var)` walks the tree, reading the
//! variables as they are at that moment, so nothing needs invalidating after
//! [`variable::Variable::set_value`].
//!
//! The tree is generic over a [`scalar::Scalar`] algebra: `f32` and `f64`
//! give numbers, [`symbol::Symbol`] gives the derivative as a formula.
//!
//! ```
//! use expr_ad::prelude::*;
//!
//! let x = Variable::new(2.0);
//! let y = Variable::new(3.0);
//! let f = &x * &y + sin(&x);
//! assert_eq!(f.grad(&y), 2.0);
//!
//! let s = Variable::new(Symbol::from("x"));
//! assert_eq!((&s * &s).grad(&s), "x+x");
//! ```
//!
//! Mixing scalar types is rejected when the tree is built:
//!
//! ```compile_fail
//! use expr_ad::prelude::*;
//!
//! let a = Variable::new(1.0f64);
//! let b = Variable::new(1.0f32);
//! let _ = &a + &b;
//! ```

pub mod errors;
pub mod expr;
pub mod ops;
pub mod prelude;
pub mod scalar;
pub mod symbol;
pub mod tag;
pub mod variable;
mod overloads;

#[cfg(feature = "macros")]
pub use expr_ad_macros::differentiable;

/// A parameter set lifted by `#[differentiable]`.
///
/// The generated companion struct lists its differentiable fields so a
/// training loop can read their gradients and write back updated values.
pub trait Differentiable {
    /// Scalar type of the parameters.
    type Scalar: scalar::Scalar;

    /// Handles to every differentiable field, in declaration order.
    fn parameters(&self) -> Vec<variable::Variable<Self::Scalar>>;
}
