//! Expression trees.
//!
//! Nodes own their children and are never mutated once built. The lowercase
//! constructors (`Expr::add`, `Expr::mul`, ...) apply a handful of local
//! identities while building, which keeps repeated differentiation from
//! piling up `0 * u` and `1 * u` subtrees. The parser builds nodes directly
//! so the parsed tree mirrors the source.

use crate::functions::Function;
use crate::traits::Scalar;
use std::fmt;

/// Name of the single bound variable.
pub const VARIABLE: &str = "x";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Pow => '^',
        }
    }

    pub fn apply<T: Scalar>(self, a: T, b: T) -> T {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Pow => a.powf(b),
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Pow => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable,
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Function, Vec<Expr>),
}

const NEG_PRECEDENCE: u8 = 3;
const ATOM_PRECEDENCE: u8 = 5;

impl Expr {
    pub fn num(value: f64) -> Expr {
        Expr::Number(value)
    }

    pub fn zero() -> Expr {
        Expr::Number(0.0)
    }

    pub fn one() -> Expr {
        Expr::Number(1.0)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expr::Number(value) => Some(*value),
            _ => None,
        }
    }

    fn is_number(&self, expected: f64) -> bool {
        self.as_number() == Some(expected)
    }

    /// True when the tree does not mention the variable.
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Number(_) => true,
            Expr::Variable => false,
            Expr::Unary(_, operand) => operand.is_constant(),
            Expr::Binary(_, left, right) => left.is_constant() && right.is_constant(),
            Expr::Call(_, args) => args.iter().all(Expr::is_constant),
        }
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::Variable => 1,
            Expr::Unary(_, operand) => 1 + operand.size(),
            Expr::Binary(_, left, right) => 1 + left.size() + right.size(),
            Expr::Call(_, args) => 1 + args.iter().map(Expr::size).sum::<usize>(),
        }
    }

    pub fn neg(operand: Expr) -> Expr {
        match operand {
            Expr::Number(value) => Expr::Number(-value),
            Expr::Unary(UnaryOp::Neg, inner) => *inner,
            other => Expr::Unary(UnaryOp::Neg, Box::new(other)),
        }
    }

    pub fn add(left: Expr, right: Expr) -> Expr {
        if left.is_number(0.0) {
            return right;
        }
        if right.is_number(0.0) {
            return left;
        }
        Expr::binary(BinaryOp::Add, left, right)
    }

    pub fn sub(left: Expr, right: Expr) -> Expr {
        if right.is_number(0.0) {
            return left;
        }
        if left.is_number(0.0) {
            return Expr::neg(right);
        }
        Expr::binary(BinaryOp::Sub, left, right)
    }

    pub fn mul(left: Expr, right: Expr) -> Expr {
        if left.is_number(0.0) || right.is_number(0.0) {
            return Expr::zero();
        }
        if left.is_number(1.0) {
            return right;
        }
        if right.is_number(1.0) {
            return left;
        }
        // c1*(c2*u) => (c1*c2)*u
        if let Some(a) = left.as_number() {
            if let Expr::Binary(BinaryOp::Mul, inner_left, inner_right) = right {
                return match inner_left.as_number() {
                    Some(b) if (a * b).is_finite() => Expr::mul(Expr::num(a * b), *inner_right),
                    _ => Expr::Binary(
                        BinaryOp::Mul,
                        Box::new(left),
                        Box::new(Expr::Binary(BinaryOp::Mul, inner_left, inner_right)),
                    ),
                };
            }
        }
        Expr::binary(BinaryOp::Mul, left, right)
    }

    pub fn div(left: Expr, right: Expr) -> Expr {
        if right.is_number(1.0) {
            return left;
        }
        Expr::binary(BinaryOp::Div, left, right)
    }

    pub fn pow(base: Expr, exponent: Expr) -> Expr {
        if exponent.is_number(1.0) {
            return base;
        }
        if exponent.is_number(0.0) {
            return Expr::one();
        }
        Expr::binary(BinaryOp::Pow, base, exponent)
    }

    /// Builds a call, folding it to a literal when every argument is a
    /// literal and the result is finite.
    pub fn call(function: Function, args: Vec<Expr>) -> Expr {
        let literals: Option<Vec<f64>> = args.iter().map(Expr::as_number).collect();
        if let Some(values) = literals {
            let folded = function.apply(&values);
            if folded.is_finite() {
                return Expr::Number(folded);
            }
        }
        Expr::Call(function, args)
    }

    pub fn call1(function: Function, arg: Expr) -> Expr {
        Expr::call(function, vec![arg])
    }

    /// Literal-on-literal arithmetic folds when the result stays finite, so
    /// `1/0` keeps its IEEE behaviour at evaluation time.
    fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
            let folded = op.apply(a, b);
            if folded.is_finite() {
                return Expr::Number(folded);
            }
        }
        Expr::Binary(op, Box::new(left), Box::new(right))
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Number(value) if value.is_sign_negative() => NEG_PRECEDENCE,
            Expr::Number(_) | Expr::Variable | Expr::Call(..) => ATOM_PRECEDENCE,
            Expr::Unary(UnaryOp::Neg, _) => NEG_PRECEDENCE,
            Expr::Binary(op, ..) => op.precedence(),
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parenthesize: bool) -> fmt::Result {
    if parenthesize {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(value) => write!(f, "{value}"),
            Expr::Variable => f.write_str(VARIABLE),
            Expr::Unary(UnaryOp::Neg, operand) => {
                f.write_str("-")?;
                write_operand(f, operand, operand.precedence() <= NEG_PRECEDENCE)
            }
            Expr::Binary(op, left, right) => {
                let own = op.precedence();
                let left_parens = match op {
                    BinaryOp::Pow => left.precedence() <= own,
                    _ => left.precedence() < own,
                };
                let right_parens = match op {
                    BinaryOp::Sub | BinaryOp::Div => right.precedence() <= own,
                    _ => right.precedence() < own,
                };
                write_operand(f, left, left_parens)?;
                match op {
                    BinaryOp::Add | BinaryOp::Sub => write!(f, " {} ", op.symbol())?,
                    _ => write!(f, "{}", op.symbol())?,
                }
                write_operand(f, right, right_parens)
            }
            Expr::Call(function, args) => {
                write!(f, "{function}(")?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}
