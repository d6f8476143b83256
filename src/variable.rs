//! Leaf nodes: differentiable variables and constants.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::expr::Expression;
use crate::scalar::Scalar;
use crate::tag::{new_identity_tag, Tag};

/// A named, mutable input of an expression.
///
/// Cloning yields another handle to the same logical variable: both share the
/// tag and the stored value, so [`Variable::set_value`] through one handle is
/// seen by every expression built from any of them.
#[derive(Clone)]
pub struct Variable<T> {
    tag: Tag,
    value: Rc<RefCell<T>>,
}

impl<T: Scalar> Variable<T> {
    /// Creates a variable holding `value` under a freshly minted tag.
    pub fn new(value: T) -> Self {
        Self {
            tag: new_identity_tag(),
            value: Rc::new(RefCell::new(value)),
        }
    }

    /// Returns the identity tag of this variable.
    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the current value.
    #[inline]
    pub fn value(&self) -> T {
        self.value.borrow().clone()
    }

    /// Overwrites the stored value.
    pub fn set_value(&self, value: T) {
        debug!("variable {:?} set to {}", self.tag, value);
        *self.value.borrow_mut() = value;
    }

    /// Returns `one()` for the variable itself and `zero()` for any other.
    #[inline]
    pub fn grad(&self, target: &Variable<T>) -> T {
        if self.tag == target.tag {
            T::one()
        } else {
            T::zero()
        }
    }
}

impl<T: Scalar> Expression<T> for Variable<T> {
    fn value(&self) -> T {
        Variable::value(self)
    }
    fn grad(&self, target: &Variable<T>) -> T {
        Variable::grad(self, target)
    }
}

/// A fixed leaf. Carries [`Tag::CONSTANT`] and has zero gradient everywhere.
#[derive(Clone, Copy, PartialEq)]
pub struct ConstVariable<T>(pub T);

impl<T: Scalar> ConstVariable<T> {
    /// Creates a constant leaf.
    #[inline]
    pub fn new(value: T) -> Self {
        ConstVariable(value)
    }

    /// Constants all share the sentinel tag.
    #[inline]
    pub fn tag(&self) -> Tag {
        Tag::CONSTANT
    }

    /// Returns the stored value.
    #[inline]
    pub fn value(&self) -> T {
        self.0.clone()
    }

    /// Always `zero()`, whatever the target.
    #[inline]
    pub fn grad(&self, _target: &Variable<T>) -> T {
        T::zero()
    }
}

impl<T: Scalar> Expression<T> for ConstVariable<T> {
    fn value(&self) -> T {
        ConstVariable::value(self)
    }
    fn grad(&self, target: &Variable<T>) -> T {
        ConstVariable::grad(self, target)
    }
}

#[path = "variable_impl.rs"]
mod variable_impl;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Symbol;

    #[test]
    fn variable_value_and_self_grad() {
        let t = Variable::new(10.0);
        assert_eq!(t.value(), 10.0);
        assert_eq!(t.grad(&t), 1.0);
    }

    #[test]
    fn other_variable_has_zero_grad() {
        let t = Variable::new(10.0);
        let k = Variable::new(10.0);
        assert_ne!(t.tag(), k.tag());
        assert_eq!(t.grad(&k), 0.0);
        assert_eq!(k.grad(&t), 0.0);
    }

    #[test]
    fn clones_alias_the_same_variable() {
        let t = Variable::new(1.0);
        let alias = t.clone();
        assert_eq!(alias.tag(), t.tag());
        assert_eq!(alias.grad(&t), 1.0);
        alias.set_value(5.0);
        assert_eq!(t.value(), 5.0);
    }

    #[test]
    fn set_value_overwrites() {
        let t = Variable::new(Symbol::from("a"));
        t.set_value(Symbol::from("b"));
        assert_eq!(t.value(), "b");
    }

    #[test]
    fn constant_grad_is_always_zero() {
        let c = ConstVariable::new(3.0);
        let t = Variable::new(3.0);
        assert_eq!(c.value(), 3.0);
        assert_eq!(c.grad(&t), 0.0);
        assert!(c.tag().is_constant());
        assert_ne!(c.tag(), t.tag());
    }
}
