use core::fmt;

use crate::symbol::Symbol;

use super::{ConstVariable, Variable};

impl<T: fmt::Debug> fmt::Debug for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable({:?}, {:?})", self.value.borrow(), self.tag)
    }
}

impl<T: fmt::Display> fmt::Display for Variable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.borrow())
    }
}

impl<T: fmt::Debug> fmt::Debug for ConstVariable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstVariable({:?})", self.0)
    }
}

macro_rules! impl_leaf_from {
    ($($t:ty),*) => {$(
        impl From<$t> for Variable<$t> {
            /// Creates a new variable, minting a fresh tag.
            fn from(v: $t) -> Self {
                Variable::new(v)
            }
        }
        impl From<$t> for ConstVariable<$t> {
            /// Wraps a scalar as a constant leaf.
            fn from(v: $t) -> Self {
                ConstVariable(v)
            }
        }
    )*};
}

impl_leaf_from!(f32, f64, Symbol);
