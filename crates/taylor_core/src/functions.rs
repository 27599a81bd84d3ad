//! The closed table of functions and named constants the engine understands.
//!
//! Anything not listed here is rejected by the parser, so every later stage
//! (differentiation, compilation, evaluation) can match exhaustively.

use crate::traits::Scalar;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    /// Natural logarithm.
    Ln,
    /// `log(u)` is the natural logarithm, `log(u, base)` an arbitrary base.
    Log,
    Log10,
    Sqrt,
    Cbrt,
    Abs,
    Sign,
}

pub const FUNCTIONS: [Function; 17] = [
    Function::Sin,
    Function::Cos,
    Function::Tan,
    Function::Asin,
    Function::Acos,
    Function::Atan,
    Function::Sinh,
    Function::Cosh,
    Function::Tanh,
    Function::Exp,
    Function::Ln,
    Function::Log,
    Function::Log10,
    Function::Sqrt,
    Function::Cbrt,
    Function::Abs,
    Function::Sign,
];

impl Function {
    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Exp => "exp",
            Function::Ln => "ln",
            Function::Log => "log",
            Function::Log10 => "log10",
            Function::Sqrt => "sqrt",
            Function::Cbrt => "cbrt",
            Function::Abs => "abs",
            Function::Sign => "sign",
        }
    }

    pub fn from_name(name: &str) -> Option<Function> {
        FUNCTIONS.iter().copied().find(|f| f.name() == name)
    }

    pub fn accepts_arity(self, count: usize) -> bool {
        match self {
            Function::Log => count == 1 || count == 2,
            _ => count == 1,
        }
    }

    pub(crate) fn arity_description(self) -> &'static str {
        match self {
            Function::Log => "1 or 2 arguments",
            _ => "1 argument",
        }
    }

    /// Applies the function to already-evaluated arguments. A wrong argument
    /// count yields NaN; the parser never produces one.
    pub fn apply<T: Scalar>(self, args: &[T]) -> T {
        match (self, args) {
            (Function::Log, [u, base]) => (*u).ln() / (*base).ln(),
            (_, [u]) => self.apply_unary(*u),
            _ => T::nan(),
        }
    }

    fn apply_unary<T: Scalar>(self, u: T) -> T {
        match self {
            Function::Sin => u.sin(),
            Function::Cos => u.cos(),
            Function::Tan => u.tan(),
            Function::Asin => u.asin(),
            Function::Acos => u.acos(),
            Function::Atan => u.atan(),
            Function::Sinh => u.sinh(),
            Function::Cosh => u.cosh(),
            Function::Tanh => u.tanh(),
            Function::Exp => u.exp(),
            Function::Ln | Function::Log => u.ln(),
            Function::Log10 => u.log10(),
            Function::Sqrt => u.sqrt(),
            Function::Cbrt => u.cbrt(),
            Function::Abs => u.abs(),
            Function::Sign => sign(u),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `sign(0) = 0` and `sign(NaN) = NaN`, unlike `Float::signum`.
fn sign<T: Scalar>(u: T) -> T {
    if u > T::zero() {
        T::one()
    } else if u < T::zero() {
        -T::one()
    } else {
        u * T::zero()
    }
}

/// Named constants usable wherever a number is.
pub fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        _ => None,
    }
}
