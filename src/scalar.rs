//! The scalar algebra every expression is generic over.

use core::fmt;

/// Identities, elementary functions and combinators for one scalar type.
///
/// Every function is pure. Expression nodes never touch the scalar directly,
/// they only go through this trait, which is what lets the same tree produce
/// a number for `f64` and a derivative formula for [`crate::symbol::Symbol`].
pub trait Scalar: Clone + PartialEq + fmt::Debug + fmt::Display {
    /// Returns the additive identity.
    fn zero() -> Self;
    /// Returns the multiplicative identity.
    fn one() -> Self;

    /// Returns `-x`.
    fn negate(x: Self) -> Self;
    /// Returns the sine of `x`.
    fn sin(x: Self) -> Self;
    /// Returns the cosine of `x`.
    fn cos(x: Self) -> Self;
    /// Returns `e^x`.
    fn exp(x: Self) -> Self;
    /// Returns the natural logarithm of `x`.
    fn log(x: Self) -> Self;

    /// Returns `x + y`.
    fn plus(x: Self, y: Self) -> Self;
    /// Returns `x - y`.
    fn minus(x: Self, y: Self) -> Self;
    /// Returns `x * y`.
    fn multiply(x: Self, y: Self) -> Self;
    /// Returns `x / y`. Division by zero is whatever the type does.
    fn divide(x: Self, y: Self) -> Self;
    /// Returns `x` if `x < y`, else `y`.
    fn min(x: Self, y: Self) -> Self;
    /// Returns `x` if `x > y`, else `y`.
    fn max(x: Self, y: Self) -> Self;

    /// Returns `one()` when `x > y` holds strictly, else `zero()`.
    fn greater(x: &Self, y: &Self) -> Self;
}

macro_rules! impl_float_scalar {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            #[inline]
            fn zero() -> Self {
                0.0
            }
            #[inline]
            fn one() -> Self {
                1.0
            }
            #[inline]
            fn negate(x: Self) -> Self {
                -x
            }
            #[inline]
            fn sin(x: Self) -> Self {
                x.sin()
            }
            #[inline]
            fn cos(x: Self) -> Self {
                x.cos()
            }
            #[inline]
            fn exp(x: Self) -> Self {
                x.exp()
            }
            #[inline]
            fn log(x: Self) -> Self {
                x.ln()
            }
            #[inline]
            fn plus(x: Self, y: Self) -> Self {
                x + y
            }
            #[inline]
            fn minus(x: Self, y: Self) -> Self {
                x - y
            }
            #[inline]
            fn multiply(x: Self, y: Self) -> Self {
                x * y
            }
            #[inline]
            fn divide(x: Self, y: Self) -> Self {
                x / y
            }
            // Plain comparisons rather than `f64::min`/`f64::max`: a NaN
            // operand falls through to `y` instead of being skipped.
            #[inline]
            fn min(x: Self, y: Self) -> Self {
                if x < y { x } else { y }
            }
            #[inline]
            fn max(x: Self, y: Self) -> Self {
                if x > y { x } else { y }
            }
            #[inline]
            fn greater(x: &Self, y: &Self) -> Self {
                if x > y { 1.0 } else { 0.0 }
            }
        }
    )*};
}

impl_float_scalar!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identities() {
        assert_eq!(<f64 as Scalar>::zero(), 0.0);
        assert_eq!(<f64 as Scalar>::one(), 1.0);
        assert_eq!(<f32 as Scalar>::one(), 1.0f32);
    }

    #[test]
    fn elementary_functions_match_std() {
        assert_relative_eq!(<f64 as Scalar>::sin(0.3), 0.3f64.sin());
        assert_relative_eq!(<f64 as Scalar>::cos(0.3), 0.3f64.cos());
        assert_relative_eq!(<f64 as Scalar>::exp(1.0), std::f64::consts::E);
        assert_relative_eq!(<f64 as Scalar>::log(std::f64::consts::E), 1.0);
        assert_eq!(<f64 as Scalar>::negate(2.5), -2.5);
    }

    #[test]
    fn min_max_and_indicator() {
        assert_eq!(<f64 as Scalar>::max(1.0, 2.0), 2.0);
        assert_eq!(<f64 as Scalar>::min(1.0, 2.0), 1.0);
        assert_eq!(<f64 as Scalar>::greater(&3.0, &2.0), 1.0);
        assert_eq!(<f64 as Scalar>::greater(&2.0, &3.0), 0.0);
        assert_eq!(<f64 as Scalar>::greater(&2.0, &2.0), 0.0);
    }

    #[test]
    fn domain_errors_pass_through() {
        assert!(<f64 as Scalar>::log(-1.0).is_nan());
        assert!(<f64 as Scalar>::divide(1.0, 0.0).is_infinite());
    }
}
