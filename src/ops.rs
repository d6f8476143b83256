//! Operator descriptors: forward rules and local derivative rules.
//!
//! Descriptors are stateless tags. They know nothing about the tree; the
//! expression nodes combine their local derivatives with the operands'
//! gradients through the chain rule.

use core::fmt;

use crate::scalar::Scalar;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// A single-input operator.
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `sin(x)`
    Sin,
    /// `cos(x)`
    Cos,
    /// `e^x`
    Exp,
    /// `ln(x)`
    Log,
}

impl UnaryOp {
    #[inline]
    /// Evaluates the operator on the input value.
    pub fn apply<T: Scalar>(self, x: T) -> T {
        match self {
            UnaryOp::Neg => T::negate(x),
            UnaryOp::Sin => T::sin(x),
            UnaryOp::Cos => T::cos(x),
            UnaryOp::Exp => T::exp(x),
            UnaryOp::Log => T::log(x),
        }
    }

    #[inline]
    /// Returns the derivative of the operator with respect to its input,
    /// evaluated at `x`.
    pub fn local_grad<T: Scalar>(self, x: T) -> T {
        match self {
            UnaryOp::Neg => T::negate(T::one()),
            UnaryOp::Sin => T::cos(x),
            UnaryOp::Cos => T::negate(T::sin(x)),
            UnaryOp::Exp => T::exp(x),
            UnaryOp::Log => T::divide(T::one(), x),
        }
    }

    /// Short name of the operator.
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Exp => "exp",
            UnaryOp::Log => "log",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// A two-input operator.
pub enum BinaryOp {
    /// `x + y`
    Add,
    /// `x - y`
    Sub,
    /// `x * y`
    Mul,
    /// `x / y`
    Div,
    /// `x` if `x > y`, else `y`
    Max,
    /// `x` if `x < y`, else `y`
    Min,
}

impl BinaryOp {
    #[inline]
    /// Evaluates the operator on the input values.
    pub fn apply<T: Scalar>(self, x: T, y: T) -> T {
        match self {
            BinaryOp::Add => T::plus(x, y),
            BinaryOp::Sub => T::minus(x, y),
            BinaryOp::Mul => T::multiply(x, y),
            BinaryOp::Div => T::divide(x, y),
            BinaryOp::Max => T::max(x, y),
            BinaryOp::Min => T::min(x, y),
        }
    }

    /// Returns the derivative with respect to the left operand.
    ///
    /// `Max` and `Min` are strict on both sides, so at `x == y` neither
    /// branch receives gradient.
    pub fn local_grad_left<T: Scalar>(self, x: &T, y: &T) -> T {
        match self {
            BinaryOp::Add | BinaryOp::Sub => T::one(),
            BinaryOp::Mul => y.clone(),
            BinaryOp::Div => T::divide(T::one(), y.clone()),
            BinaryOp::Max => T::greater(x, y),
            BinaryOp::Min => T::greater(y, x),
        }
    }

    /// Returns the derivative with respect to the right operand.
    pub fn local_grad_right<T: Scalar>(self, x: &T, y: &T) -> T {
        match self {
            BinaryOp::Add => T::one(),
            BinaryOp::Sub => T::negate(T::one()),
            BinaryOp::Mul => x.clone(),
            BinaryOp::Div => T::negate(T::divide(x.clone(), T::multiply(y.clone(), y.clone()))),
            BinaryOp::Max => T::greater(y, x),
            BinaryOp::Min => T::greater(x, y),
        }
    }

    /// Short name of the operator.
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Max => "max",
            BinaryOp::Min => "min",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Symbol;
    use approx::assert_relative_eq;

    #[test]
    fn unary_rules() {
        let x = 0.7f64;
        assert_eq!(UnaryOp::Neg.apply(x), -0.7);
        assert_eq!(UnaryOp::Neg.local_grad(x), -1.0);
        assert_relative_eq!(UnaryOp::Sin.local_grad(x), x.cos());
        assert_relative_eq!(UnaryOp::Cos.local_grad(x), -x.sin());
        assert_relative_eq!(UnaryOp::Exp.local_grad(x), x.exp());
        assert_relative_eq!(UnaryOp::Log.apply(x), x.ln());
        assert_relative_eq!(UnaryOp::Log.local_grad(x), 1.0 / x);
    }

    #[test]
    fn binary_rules() {
        let (x, y) = (3.0f64, 4.0f64);
        assert_eq!(BinaryOp::Add.apply(x, y), 7.0);
        assert_eq!(BinaryOp::Sub.local_grad_right(&x, &y), -1.0);
        assert_eq!(BinaryOp::Mul.local_grad_left(&x, &y), 4.0);
        assert_eq!(BinaryOp::Mul.local_grad_right(&x, &y), 3.0);
        assert_relative_eq!(BinaryOp::Div.local_grad_left(&x, &y), 0.25);
        assert_relative_eq!(BinaryOp::Div.local_grad_right(&x, &y), -3.0 / 16.0);
    }

    #[test]
    fn min_max_split_gradient_and_tie() {
        assert_eq!(BinaryOp::Max.apply(3.0, 4.0), 4.0);
        assert_eq!(BinaryOp::Max.local_grad_left(&3.0, &4.0), 0.0);
        assert_eq!(BinaryOp::Max.local_grad_right(&3.0, &4.0), 1.0);
        assert_eq!(BinaryOp::Min.apply(3.0, 4.0), 3.0);
        assert_eq!(BinaryOp::Min.local_grad_left(&3.0, &4.0), 1.0);
        assert_eq!(BinaryOp::Min.local_grad_right(&3.0, &4.0), 0.0);
        for op in [BinaryOp::Max, BinaryOp::Min] {
            assert_eq!(op.local_grad_left(&2.0, &2.0), 0.0);
            assert_eq!(op.local_grad_right(&2.0, &2.0), 0.0);
        }
    }

    #[test]
    fn symbolic_local_grads() {
        let x = Symbol::from("x");
        assert_eq!(UnaryOp::Cos.local_grad(x.clone()), "-sin(x)");
        assert_eq!(UnaryOp::Log.local_grad(x.clone()), "1/x");
        let y = Symbol::from("y");
        assert_eq!(BinaryOp::Div.local_grad_right(&x, &y), "-x/(y*y)");
        assert_eq!(BinaryOp::Max.local_grad_left(&x, &y), "[x>y]");
    }

    #[test]
    fn operators_display_their_names() {
        assert_eq!(UnaryOp::Log.to_string(), "log");
        assert_eq!(UnaryOp::Neg.name(), "neg");
        assert_eq!(BinaryOp::Max.to_string(), "max");
        assert_eq!(format!("{}", BinaryOp::Div), BinaryOp::Div.name());
    }
}
