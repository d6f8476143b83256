//! A text scalar that renders derivatives as readable formulas.
//!
//! Running an expression over [`Symbol`] instead of `f64` turns `value()` into
//! the formula of the expression and `grad()` into the formula of its
//! derivative. Only literal identities are collapsed (`0*x`, `1*x`, `x+0`,
//! `--x`, ...); this is not a computer algebra system.

use core::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::errors::{ADError, Result};
use crate::scalar::Scalar;

/// How a rendered symbol binds, used to decide where parentheses go.
#[derive(Clone, Debug)]
enum Form {
    Sum,
    Product,
    /// Keeps the operand so that negating twice gives it back verbatim.
    Negated(Box<Symbol>),
    Atom,
}

/// A symbolic scalar: simplified text plus its outermost operator.
#[derive(Clone, Debug)]
pub struct Symbol {
    text: String,
    form: Form,
}

impl Symbol {
    /// Creates an atomic symbol from raw text without validation.
    ///
    /// The text is treated as indivisible when composed, so it should be a
    /// name, a number or an already parenthesised formula. Use
    /// [`str::parse`] for validated input.
    pub fn atom(text: impl Into<String>) -> Self {
        Symbol {
            text: text.into(),
            form: Form::Atom,
        }
    }

    /// Returns the rendered formula.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns whether this symbol renders as the additive identity.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.text == "0"
    }

    /// Returns whether this symbol renders as the multiplicative identity.
    #[inline]
    pub fn is_one(&self) -> bool {
        self.text == "1"
    }

    fn binding(&self) -> u8 {
        match self.form {
            Form::Sum => 0,
            Form::Product => 1,
            Form::Negated(_) => 2,
            Form::Atom => 3,
        }
    }

    fn paren_if(&self, wrap: bool) -> String {
        if wrap {
            format!("({})", self.text)
        } else {
            self.text.clone()
        }
    }

    fn compound(text: String, form: Form) -> Self {
        Symbol { text, form }
    }

    fn call(name: &str, args: &[&Symbol]) -> Self {
        let args: Vec<&str> = args.iter().map(|a| a.as_str()).collect();
        Symbol::atom(format!("{name}({})", args.join(",")))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}
impl Eq for Symbol {}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}
impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl From<&str> for Symbol {
    /// Wraps the text as an atom, see [`Symbol::atom`]. A leading `-` is
    /// kept as a negation of the rest.
    fn from(s: &str) -> Self {
        match s.strip_prefix('-') {
            Some(rest) if !rest.is_empty() => Symbol::negate(Symbol::from(rest)),
            _ => Symbol::atom(s),
        }
    }
}
impl From<String> for Symbol {
    /// Same as `From<&str>`.
    fn from(s: String) -> Self {
        if s.starts_with('-') {
            Symbol::from(s.as_str())
        } else {
            Symbol::atom(s)
        }
    }
}

macro_rules! impl_symbol_from_number {
    ($($t:ty),*) => {$(
        impl From<$t> for Symbol {
            /// Renders the number, keeping a negative sign as a negation.
            fn from(v: $t) -> Self {
                if v == (0 as $t) {
                    Symbol::zero()
                } else if v < (0 as $t) {
                    Symbol::negate(Symbol::atom(format!("{}", -v)))
                } else {
                    Symbol::atom(format!("{v}"))
                }
            }
        }
    )*};
}

impl_symbol_from_number!(f32, f64, i32, i64);

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

fn is_number(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit()) && s.parse::<f64>().is_ok()
}

impl FromStr for Symbol {
    type Err = ADError;

    /// Parses a single identifier or unsigned numeric literal, optionally
    /// preceded by `-`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ADError::EmptySymbol);
        }
        if let Some(rest) = s.strip_prefix('-') {
            return rest
                .parse::<Symbol>()
                .map(Symbol::negate)
                .map_err(|_| ADError::InvalidSymbol(s.to_string()));
        }
        if is_identifier(s) || is_number(s) {
            Ok(Symbol::atom(s))
        } else {
            Err(ADError::InvalidSymbol(s.to_string()))
        }
    }
}

impl Scalar for Symbol {
    fn zero() -> Self {
        Symbol::atom("0")
    }

    fn one() -> Self {
        Symbol::atom("1")
    }

    fn negate(x: Self) -> Self {
        if x.is_zero() {
            return x;
        }
        match x.form {
            Form::Negated(inner) => *inner,
            _ => {
                let text = format!("-{}", x.paren_if(x.binding() == 0));
                Symbol::compound(text, Form::Negated(Box::new(x)))
            }
        }
    }

    fn sin(x: Self) -> Self {
        Symbol::call("sin", &[&x])
    }

    fn cos(x: Self) -> Self {
        Symbol::call("cos", &[&x])
    }

    fn exp(x: Self) -> Self {
        Symbol::call("exp", &[&x])
    }

    fn log(x: Self) -> Self {
        Symbol::call("log", &[&x])
    }

    fn plus(x: Self, y: Self) -> Self {
        if x.is_zero() {
            return y;
        }
        if y.is_zero() {
            return x;
        }
        match y.form {
            Form::Negated(inner) => Symbol::minus(x, *inner),
            _ => Symbol::compound(format!("{}+{}", x.text, y.text), Form::Sum),
        }
    }

    fn minus(x: Self, y: Self) -> Self {
        if y.is_zero() {
            return x;
        }
        if x.is_zero() {
            return Symbol::negate(y);
        }
        match y.form {
            Form::Negated(inner) => Symbol::plus(x, *inner),
            _ => {
                let text = format!("{}-{}", x.text, y.paren_if(y.binding() == 0));
                Symbol::compound(text, Form::Sum)
            }
        }
    }

    fn multiply(x: Self, y: Self) -> Self {
        if x.is_zero() || y.is_zero() {
            return Symbol::zero();
        }
        if x.is_one() {
            return y;
        }
        if y.is_one() {
            return x;
        }
        let right_wraps = matches!(y.form, Form::Sum | Form::Negated(_));
        let text = format!(
            "{}*{}",
            x.paren_if(x.binding() == 0),
            y.paren_if(right_wraps)
        );
        Symbol::compound(text, Form::Product)
    }

    fn divide(x: Self, y: Self) -> Self {
        if x.is_zero() {
            return x;
        }
        if y.is_one() {
            return x;
        }
        let text = format!(
            "{}/{}",
            x.paren_if(x.binding() == 0),
            y.paren_if(y.binding() < 3)
        );
        Symbol::compound(text, Form::Product)
    }

    fn min(x: Self, y: Self) -> Self {
        Symbol::call("min", &[&x, &y])
    }

    fn max(x: Self, y: Self) -> Self {
        Symbol::call("max", &[&x, &y])
    }

    fn greater(x: &Self, y: &Self) -> Self {
        // x > x never holds
        if x == y {
            return Symbol::zero();
        }
        Symbol::atom(format!("[{}>{}]", x.text, y.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Symbol {
        Symbol::atom(text)
    }

    #[test]
    fn multiply_collapses_zero_and_one() {
        assert_eq!(Symbol::multiply(s("x"), Symbol::zero()), "0");
        assert_eq!(Symbol::multiply(Symbol::zero(), s("x")), "0");
        assert_eq!(Symbol::multiply(Symbol::one(), s("x")), "x");
        assert_eq!(Symbol::multiply(s("x"), Symbol::one()), "x");
        assert_eq!(Symbol::multiply(s("x"), s("y")), "x*y");
    }

    #[test]
    fn plus_collapses_zero() {
        assert_eq!(Symbol::plus(Symbol::zero(), s("x")), "x");
        assert_eq!(Symbol::plus(s("x"), Symbol::zero()), "x");
        assert_eq!(Symbol::plus(s("x"), s("x")), "x+x");
    }

    #[test]
    fn parentheses_only_where_needed() {
        let sum = Symbol::plus(s("a"), s("b"));
        assert_eq!(Symbol::multiply(sum.clone(), s("c")), "(a+b)*c");
        assert_eq!(Symbol::multiply(s("c"), sum.clone()), "c*(a+b)");
        assert_eq!(Symbol::plus(s("c"), sum.clone()), "c+a+b");
        assert_eq!(Symbol::minus(s("c"), sum.clone()), "c-(a+b)");
        let prod = Symbol::multiply(s("a"), s("b"));
        assert_eq!(Symbol::plus(prod.clone(), s("c")), "a*b+c");
        assert_eq!(Symbol::multiply(prod.clone(), s("c")), "a*b*c");
        assert_eq!(Symbol::divide(s("c"), prod), "c/(a*b)");
        assert_eq!(Symbol::divide(sum, s("c")), "(a+b)/c");
    }

    #[test]
    fn negation_never_doubles() {
        let neg = Symbol::negate(s("x"));
        assert_eq!(neg, "-x");
        assert_eq!(Symbol::negate(neg.clone()), "x");
        assert_eq!(Symbol::negate(Symbol::plus(s("a"), s("b"))), "-(a+b)");
        assert_eq!(Symbol::negate(Symbol::negate(Symbol::plus(s("a"), s("b")))), "a+b");
        assert_eq!(Symbol::negate(Symbol::zero()), "0");
        assert_eq!(Symbol::plus(s("y"), neg.clone()), "y-x");
        assert_eq!(Symbol::minus(s("y"), neg.clone()), "y+x");
        assert_eq!(Symbol::minus(Symbol::zero(), s("y")), "-y");
        assert_eq!(Symbol::multiply(s("y"), neg), "y*(-x)");
    }

    #[test]
    fn divide_rules() {
        assert_eq!(Symbol::divide(Symbol::zero(), s("x")), "0");
        assert_eq!(Symbol::divide(s("x"), Symbol::one()), "x");
        assert_eq!(Symbol::divide(Symbol::one(), s("x")), "1/x");
    }

    #[test]
    fn functions_render_as_calls() {
        assert_eq!(Symbol::sin(s("x")), "sin(x)");
        assert_eq!(Symbol::log(Symbol::plus(s("x"), s("y"))), "log(x+y)");
        assert_eq!(Symbol::max(s("x"), s("y")), "max(x,y)");
        assert_eq!(Symbol::greater(&s("x"), &s("y")), "[x>y]");
        assert_eq!(Symbol::greater(&s("x"), &s("x")), "0");
    }

    #[test]
    fn from_numbers() {
        assert_eq!(Symbol::from(2.0), "2");
        assert_eq!(Symbol::from(-3), "-3");
        assert_eq!(Symbol::negate(Symbol::from(-3)), "3");
    }

    #[test]
    fn parse_validates_atoms() {
        assert_eq!("x".parse::<Symbol>().unwrap(), "x");
        assert_eq!(" weight_1 ".parse::<Symbol>().unwrap(), "weight_1");
        assert_eq!("2.5".parse::<Symbol>().unwrap(), "2.5");
        assert_eq!("-y".parse::<Symbol>().unwrap(), "-y");
        assert_eq!("".parse::<Symbol>(), Err(ADError::EmptySymbol));
        assert_eq!(
            "x+y".parse::<Symbol>(),
            Err(ADError::InvalidSymbol("x+y".to_string()))
        );
        assert!("1x".parse::<Symbol>().is_err());
    }

    #[test]
    fn leading_minus_in_text_is_a_negation() {
        let x = Symbol::from("-x");
        assert_eq!(x, "-x");
        assert_eq!(Symbol::negate(x.clone()), "x");
        assert_eq!(Symbol::plus(s("y"), x.clone()), "y-x");
        assert_eq!(Symbol::negate(Symbol::from(String::from("-x"))), "x");
        assert_eq!(Symbol::from("-"), "-");

        let v = crate::variable::Variable::new(Symbol::from("-x"));
        assert_eq!((-&v).value(), "x");
    }
}
