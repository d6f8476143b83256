//! Expression trees and the free functions that build them.

use std::rc::Rc;

use crate::ops::{BinaryOp, UnaryOp};
use crate::scalar::Scalar;
use crate::variable::{ConstVariable, Variable};

/// Anything that can report its value and its gradient against a variable.
///
/// Implemented by the leaves and by [`Expr`], so leaf and composite nodes are
/// interchangeable wherever only evaluation is needed.
pub trait Expression<T: Scalar> {
    /// Returns the value at the current leaf values.
    fn value(&self) -> T;
    /// Returns the partial derivative with respect to `target`.
    fn grad(&self, target: &Variable<T>) -> T;
}

/// A differentiable expression tree over scalar `T`.
///
/// Nodes own their operands (shared through `Rc`, so cloning a tree is
/// cheap) and cache nothing: every call to [`Expr::value`] or [`Expr::grad`]
/// walks the tree and reads the leaves as they are now.
///
/// # Limits
///
/// Evaluation recurses once per level, so a tree more than roughly 100k
/// levels deep (a long chain built with `+=`, say) overflows the stack in
/// `value` or `grad`. Dropping is iterative and has no such limit.
///
/// `grad` re-evaluates the operands of every binary node it passes, so on a
/// chain of depth `N` it costs `O(N²)` evaluations. Use [`Expr::node_count`]
/// to see the cost of a single `value` call.
#[derive(Clone, Debug)]
pub enum Expr<T: Scalar> {
    /// A variable.
    Leaf(Variable<T>),
    /// A constant.
    ConstLeaf(ConstVariable<T>),
    /// An operator applied to one sub-expression.
    Unary(UnaryOp, Rc<Expr<T>>),
    /// An operator applied to two sub-expressions.
    Binary(BinaryOp, Rc<Expr<T>>, Rc<Expr<T>>),
}

impl<T: Scalar> Expr<T> {
    /// Wraps a scalar as a constant leaf.
    #[inline]
    pub fn constant(value: T) -> Self {
        Expr::ConstLeaf(ConstVariable(value))
    }

    /// Wraps a variable handle as a leaf.
    #[inline]
    pub fn variable(var: &Variable<T>) -> Self {
        Expr::Leaf(var.clone())
    }

    /// Builds a unary node.
    pub fn unary(op: UnaryOp, operand: impl Into<Expr<T>>) -> Self {
        Expr::Unary(op, Rc::new(operand.into()))
    }

    /// Builds a binary node.
    pub fn binary(op: BinaryOp, left: impl Into<Expr<T>>, right: impl Into<Expr<T>>) -> Self {
        Expr::Binary(op, Rc::new(left.into()), Rc::new(right.into()))
    }

    /// Evaluates the expression at the current leaf values.
    pub fn value(&self) -> T {
        match self {
            Expr::Leaf(v) => v.value(),
            Expr::ConstLeaf(c) => c.value(),
            Expr::Unary(op, a) => op.apply(a.value()),
            Expr::Binary(op, l, r) => op.apply(l.value(), r.value()),
        }
    }

    /// Differentiates the expression with respect to `target`.
    ///
    /// Unary nodes multiply their local derivative with the operand's
    /// gradient; binary nodes sum that product over both operands.
    pub fn grad(&self, target: &Variable<T>) -> T {
        match self {
            Expr::Leaf(v) => v.grad(target),
            Expr::ConstLeaf(c) => c.grad(target),
            Expr::Unary(op, a) => {
                let x = a.value();
                T::multiply(op.local_grad(x), a.grad(target))
            }
            Expr::Binary(op, l, r) => {
                let lv = l.value();
                let rv = r.value();
                let d_left = op.local_grad_left(&lv, &rv);
                let d_right = op.local_grad_right(&lv, &rv);
                T::plus(
                    T::multiply(d_left, l.grad(target)),
                    T::multiply(d_right, r.grad(target)),
                )
            }
        }
    }

    /// Returns the gradient against each target, in order.
    pub fn gradient(&self, targets: &[&Variable<T>]) -> Vec<T> {
        targets.iter().map(|t| self.grad(t)).collect()
    }

    /// Number of nodes a single evaluation visits.
    ///
    /// A sub-expression used twice is counted twice, since it is evaluated
    /// twice.
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Leaf(_) | Expr::ConstLeaf(_) => 1,
            Expr::Unary(_, a) => 1 + a.node_count(),
            Expr::Binary(_, l, r) => 1 + l.node_count() + r.node_count(),
        }
    }

    /// Returns whether the expression reads `var` anywhere.
    pub fn depends_on(&self, var: &Variable<T>) -> bool {
        match self {
            Expr::Leaf(v) => v.tag() == var.tag(),
            Expr::ConstLeaf(_) => false,
            Expr::Unary(_, a) => a.depends_on(var),
            Expr::Binary(_, l, r) => l.depends_on(var) || r.depends_on(var),
        }
    }

    /// Returns `sin(self)`.
    pub fn sin(&self) -> Expr<T> {
        Expr::unary(UnaryOp::Sin, self)
    }
    /// Returns `cos(self)`.
    pub fn cos(&self) -> Expr<T> {
        Expr::unary(UnaryOp::Cos, self)
    }
    /// Returns `e^self`.
    pub fn exp(&self) -> Expr<T> {
        Expr::unary(UnaryOp::Exp, self)
    }
    /// Returns the natural logarithm of `self`.
    pub fn ln(&self) -> Expr<T> {
        Expr::unary(UnaryOp::Log, self)
    }
    /// Returns `max(self, other)`.
    pub fn max(&self, other: impl Into<Expr<T>>) -> Expr<T> {
        Expr::binary(BinaryOp::Max, self, other)
    }
    /// Returns `min(self, other)`.
    pub fn min(&self, other: impl Into<Expr<T>>) -> Expr<T> {
        Expr::binary(BinaryOp::Min, self, other)
    }
}

impl<T: Scalar> Expression<T> for Expr<T> {
    fn value(&self) -> T {
        Expr::value(self)
    }
    fn grad(&self, target: &Variable<T>) -> T {
        Expr::grad(self, target)
    }
}

impl<T: Scalar> Variable<T> {
    /// Returns `sin(self)`.
    pub fn sin(&self) -> Expr<T> {
        Expr::unary(UnaryOp::Sin, self)
    }
    /// Returns `cos(self)`.
    pub fn cos(&self) -> Expr<T> {
        Expr::unary(UnaryOp::Cos, self)
    }
    /// Returns `e^self`.
    pub fn exp(&self) -> Expr<T> {
        Expr::unary(UnaryOp::Exp, self)
    }
    /// Returns the natural logarithm of `self`.
    pub fn ln(&self) -> Expr<T> {
        Expr::unary(UnaryOp::Log, self)
    }
    /// Returns `max(self, other)`.
    pub fn max(&self, other: impl Into<Expr<T>>) -> Expr<T> {
        Expr::binary(BinaryOp::Max, self, other)
    }
    /// Returns `min(self, other)`.
    pub fn min(&self, other: impl Into<Expr<T>>) -> Expr<T> {
        Expr::binary(BinaryOp::Min, self, other)
    }
}

impl<T: Scalar> From<Variable<T>> for Expr<T> {
    fn from(v: Variable<T>) -> Self {
        Expr::Leaf(v)
    }
}
impl<T: Scalar> From<&Variable<T>> for Expr<T> {
    fn from(v: &Variable<T>) -> Self {
        Expr::Leaf(v.clone())
    }
}
impl<T: Scalar> From<ConstVariable<T>> for Expr<T> {
    fn from(c: ConstVariable<T>) -> Self {
        Expr::ConstLeaf(c)
    }
}
impl<T: Scalar> From<&Expr<T>> for Expr<T> {
    fn from(e: &Expr<T>) -> Self {
        e.clone()
    }
}

// Unlinks uniquely owned children onto a heap stack so a long chain is freed
// in a loop instead of one stack frame per node.
impl<T: Scalar> Drop for Expr<T> {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        let mut hole = None;
        detach_children(self, &mut stack, &mut hole);
        while let Some(child) = stack.pop() {
            if let Ok(mut node) = Rc::try_unwrap(child) {
                detach_children(&mut node, &mut stack, &mut hole);
            }
        }
    }
}

fn detach_children<T: Scalar>(
    node: &mut Expr<T>,
    stack: &mut Vec<Rc<Expr<T>>>,
    hole: &mut Option<Rc<Expr<T>>>,
) {
    let mut take = |child: &mut Rc<Expr<T>>| {
        if Rc::get_mut(child).is_some() {
            let filler = hole
                .get_or_insert_with(|| Rc::new(Expr::constant(T::zero())))
                .clone();
            stack.push(std::mem::replace(child, filler));
        }
    };
    match node {
        Expr::Unary(_, a) => take(a),
        Expr::Binary(_, l, r) => {
            take(l);
            take(r);
        }
        Expr::Leaf(_) | Expr::ConstLeaf(_) => {}
    }
}

#[inline]
/// Returns `-a`.
pub fn neg<T: Scalar>(a: impl Into<Expr<T>>) -> Expr<T> {
    Expr::unary(UnaryOp::Neg, a)
}
#[inline]
/// Returns the sine of an expression.
pub fn sin<T: Scalar>(a: impl Into<Expr<T>>) -> Expr<T> {
    Expr::unary(UnaryOp::Sin, a)
}
#[inline]
/// Returns the cosine of an expression.
pub fn cos<T: Scalar>(a: impl Into<Expr<T>>) -> Expr<T> {
    Expr::unary(UnaryOp::Cos, a)
}
#[inline]
/// Returns the exponential of an expression.
pub fn exp<T: Scalar>(a: impl Into<Expr<T>>) -> Expr<T> {
    Expr::unary(UnaryOp::Exp, a)
}
#[inline]
/// Returns the natural logarithm of an expression.
pub fn log<T: Scalar>(a: impl Into<Expr<T>>) -> Expr<T> {
    Expr::unary(UnaryOp::Log, a)
}

#[inline]
/// Returns the maximum of two expressions.
pub fn max<T: Scalar>(l: impl Into<Expr<T>>, r: impl Into<Expr<T>>) -> Expr<T> {
    Expr::binary(BinaryOp::Max, l, r)
}
#[inline]
/// Returns the minimum of two expressions.
pub fn min<T: Scalar>(l: impl Into<Expr<T>>, r: impl Into<Expr<T>>) -> Expr<T> {
    Expr::binary(BinaryOp::Min, l, r)
}
