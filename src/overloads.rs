use crate::expr::Expr;
use crate::ops::BinaryOp;
use crate::scalar::Scalar;
use crate::symbol::Symbol;
use crate::variable::{ConstVariable, Variable};
use std::ops::*;

macro_rules! impl_bin_op {
    ($Trait:ident, $method:ident, $op:expr; $([$($gen:tt)*] $Self:ty),* $(,)?) => {$(
        impl<$($gen)*, R> $Trait<R> for $Self
        where
            T: Scalar,
            R: Into<Expr<T>>,
        {
            type Output = Expr<T>;
            #[inline]
            fn $method(self, rhs: R) -> Expr<T> {
                Expr::binary($op, self, rhs)
            }
        }
    )*};
}

macro_rules! impl_bin_ops_all {
    ($Trait:ident, $method:ident, $op:expr) => {
        impl_bin_op!(
            $Trait, $method, $op;
            [T] Expr<T>,
            ['a, T] &'a Expr<T>,
            [T] Variable<T>,
            ['a, T] &'a Variable<T>,
            [T] ConstVariable<T>,
        );
    };
}

impl_bin_ops_all!(Add, add, BinaryOp::Add);
impl_bin_ops_all!(Sub, sub, BinaryOp::Sub);
impl_bin_ops_all!(Mul, mul, BinaryOp::Mul);
impl_bin_ops_all!(Div, div, BinaryOp::Div);

macro_rules! impl_neg {
    ($([$($gen:tt)*] $Self:ty),* $(,)?) => {$(
        impl<$($gen)*> Neg for $Self
        where
            T: Scalar,
        {
            type Output = Expr<T>;
            #[inline]
            fn neg(self) -> Expr<T> {
                crate::expr::neg(self)
            }
        }
    )*};
}

impl_neg!(
    [T] Expr<T>,
    ['a, T] &'a Expr<T>,
    [T] Variable<T>,
    ['a, T] &'a Variable<T>,
    [T] ConstVariable<T>,
);

macro_rules! impl_assign {
    ($Trait:ident, $func:ident, $op:expr) => {
        impl<T, R> $Trait<R> for Expr<T>
        where
            T: Scalar,
            R: Into<Expr<T>>,
        {
            fn $func(&mut self, rhs: R) {
                let lhs = self.clone();
                *self = Expr::binary($op, lhs, rhs);
            }
        }
    };
}

impl_assign!(AddAssign, add_assign, BinaryOp::Add);
impl_assign!(SubAssign, sub_assign, BinaryOp::Sub);
impl_assign!(MulAssign, mul_assign, BinaryOp::Mul);
impl_assign!(DivAssign, div_assign, BinaryOp::Div);

// A bare scalar on the left of an expression. The right-hand side types are
// listed one by one: a blanket `R: Into<Expr<f64>>` would overlap with the
// std impls of `f64 + f64`.
macro_rules! impl_scalar_lhs {
    (@op $S:ty, $Trait:ident, $method:ident, $op:expr) => {
        impl $Trait<Expr<$S>> for $S {
            type Output = Expr<$S>;
            #[inline]
            fn $method(self, rhs: Expr<$S>) -> Expr<$S> {
                Expr::binary($op, Expr::constant(self), rhs)
            }
        }
        impl<'a> $Trait<&'a Expr<$S>> for $S {
            type Output = Expr<$S>;
            #[inline]
            fn $method(self, rhs: &'a Expr<$S>) -> Expr<$S> {
                Expr::binary($op, Expr::constant(self), rhs)
            }
        }
        impl $Trait<Variable<$S>> for $S {
            type Output = Expr<$S>;
            #[inline]
            fn $method(self, rhs: Variable<$S>) -> Expr<$S> {
                Expr::binary($op, Expr::constant(self), rhs)
            }
        }
        impl<'a> $Trait<&'a Variable<$S>> for $S {
            type Output = Expr<$S>;
            #[inline]
            fn $method(self, rhs: &'a Variable<$S>) -> Expr<$S> {
                Expr::binary($op, Expr::constant(self), rhs)
            }
        }
        impl $Trait<ConstVariable<$S>> for $S {
            type Output = Expr<$S>;
            #[inline]
            fn $method(self, rhs: ConstVariable<$S>) -> Expr<$S> {
                Expr::binary($op, Expr::constant(self), rhs)
            }
        }
    };
    ($($S:ty),*) => {$(
        impl From<$S> for Expr<$S> {
            /// Promotes a bare scalar to a constant leaf.
            #[inline]
            fn from(v: $S) -> Self {
                Expr::constant(v)
            }
        }
        impl_scalar_lhs!(@op $S, Add, add, BinaryOp::Add);
        impl_scalar_lhs!(@op $S, Sub, sub, BinaryOp::Sub);
        impl_scalar_lhs!(@op $S, Mul, mul, BinaryOp::Mul);
        impl_scalar_lhs!(@op $S, Div, div, BinaryOp::Div);
    )*};
}

impl_scalar_lhs!(f32, f64, Symbol);
