//! Symbolic differentiation with respect to `x`.
//!
//! Every rule builds its result through the folding constructors on
//! [`Expr`], so a second pass over the output stays small.

use crate::expr::{BinaryOp, Expr, UnaryOp};
use crate::functions::Function;

/// Returns d/dx of `expr`. Total over every tree the parser can produce.
pub fn differentiate(expr: &Expr) -> Expr {
    match expr {
        Expr::Number(_) => Expr::zero(),
        Expr::Variable => Expr::one(),
        Expr::Unary(UnaryOp::Neg, operand) => Expr::neg(differentiate(operand)),
        Expr::Binary(op, left, right) => differentiate_binary(*op, left, right),
        Expr::Call(function, args) => differentiate_call(*function, args),
    }
}

/// d²/dx² of `expr`.
pub fn second_derivative(expr: &Expr) -> Expr {
    differentiate(&differentiate(expr))
}

fn differentiate_binary(op: BinaryOp, u: &Expr, v: &Expr) -> Expr {
    match op {
        BinaryOp::Add => Expr::add(differentiate(u), differentiate(v)),
        BinaryOp::Sub => Expr::sub(differentiate(u), differentiate(v)),
        BinaryOp::Mul => Expr::add(
            Expr::mul(differentiate(u), v.clone()),
            Expr::mul(u.clone(), differentiate(v)),
        ),
        BinaryOp::Div => Expr::div(
            Expr::sub(
                Expr::mul(differentiate(u), v.clone()),
                Expr::mul(u.clone(), differentiate(v)),
            ),
            Expr::pow(v.clone(), Expr::num(2.0)),
        ),
        BinaryOp::Pow => differentiate_power(u, v),
    }
}

fn differentiate_power(base: &Expr, exponent: &Expr) -> Expr {
    if exponent.is_constant() {
        // c * u^(c-1) * du
        let reduced = Expr::sub(exponent.clone(), Expr::one());
        return Expr::mul(
            Expr::mul(exponent.clone(), Expr::pow(base.clone(), reduced)),
            differentiate(base),
        );
    }
    if base.is_constant() {
        // c^v * ln(c) * dv
        return Expr::mul(
            Expr::mul(
                Expr::pow(base.clone(), exponent.clone()),
                Expr::call1(Function::Ln, base.clone()),
            ),
            differentiate(exponent),
        );
    }
    // u^v = exp(v ln u), so d(u^v) = u^v * (dv ln u + v du / u)
    let inner = Expr::add(
        Expr::mul(differentiate(exponent), Expr::call1(Function::Ln, base.clone())),
        Expr::div(
            Expr::mul(exponent.clone(), differentiate(base)),
            base.clone(),
        ),
    );
    Expr::mul(Expr::pow(base.clone(), exponent.clone()), inner)
}

fn differentiate_call(function: Function, args: &[Expr]) -> Expr {
    if let (Function::Log, [u, b]) = (function, args) {
        let quotient = Expr::div(
            Expr::call1(Function::Ln, u.clone()),
            Expr::call1(Function::Ln, b.clone()),
        );
        return differentiate(&quotient);
    }

    let Some(u) = args.first() else {
        return Expr::zero();
    };
    let du = differentiate(u);
    if du.as_number() == Some(0.0) {
        return Expr::zero();
    }
    let u = u.clone();
    let square = |e: Expr| Expr::pow(e, Expr::num(2.0));
    let one_minus_square = |e: Expr| Expr::sub(Expr::one(), square(e));

    match function {
        Function::Sin => Expr::mul(Expr::call1(Function::Cos, u), du),
        Function::Cos => Expr::mul(Expr::neg(Expr::call1(Function::Sin, u)), du),
        Function::Tan => Expr::div(du, square(Expr::call1(Function::Cos, u))),
        Function::Asin => Expr::div(du, Expr::call1(Function::Sqrt, one_minus_square(u))),
        Function::Acos => Expr::neg(Expr::div(
            du,
            Expr::call1(Function::Sqrt, one_minus_square(u)),
        )),
        Function::Atan => Expr::div(du, Expr::add(Expr::one(), square(u))),
        Function::Sinh => Expr::mul(Expr::call1(Function::Cosh, u), du),
        Function::Cosh => Expr::mul(Expr::call1(Function::Sinh, u), du),
        Function::Tanh => Expr::div(du, square(Expr::call1(Function::Cosh, u))),
        Function::Exp => Expr::mul(Expr::call1(Function::Exp, u), du),
        Function::Ln | Function::Log => Expr::div(du, u),
        Function::Log10 => Expr::div(du, Expr::mul(u, Expr::num(std::f64::consts::LN_10))),
        Function::Sqrt => Expr::div(du, Expr::mul(Expr::num(2.0), Expr::call1(Function::Sqrt, u))),
        Function::Cbrt => Expr::div(
            du,
            Expr::mul(Expr::num(3.0), square(Expr::call1(Function::Cbrt, u))),
        ),
        Function::Abs => Expr::mul(Expr::call1(Function::Sign, u), du),
        Function::Sign => Expr::zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::parser::parse_expression;

    fn derivative_of(source: &str) -> Expr {
        differentiate(&parse_expression(source).expect("parse should succeed"))
    }

    fn eval(expr: &Expr, x: f64) -> f64 {
        compile(expr).evaluate(x)
    }

    fn central_difference(source: &str, x: f64) -> f64 {
        let f = compile(&parse_expression(source).expect("parse should succeed"));
        let h = 1e-5;
        (f.evaluate(x + h) - f.evaluate(x - h)) / (2.0 * h)
    }

    #[test]
    fn constants_differentiate_to_zero() {
        for c in [0.0, 1.0, -3.5, 1e6] {
            let d = differentiate(&Expr::Number(c));
            assert_eq!(d, Expr::zero());
            for x in [-2.0, 0.0, 7.0] {
                assert_eq!(eval(&d, x), 0.0);
            }
        }
        assert_eq!(derivative_of("sin(pi) * 4"), Expr::zero());
    }

    #[test]
    fn variable_differentiates_to_one() {
        assert_eq!(derivative_of("x"), Expr::one());
        assert_eq!(derivative_of("-x"), Expr::num(-1.0));
    }

    #[test]
    fn power_rule_matches_closed_form_and_finite_difference() {
        for n in 1..=6 {
            let source = format!("x^{n}");
            let d = derivative_of(&source);
            for x in [-1.5, -0.3, 0.7, 1.0, 2.2] {
                let got = eval(&d, x);
                let closed_form = n as f64 * x.powi(n - 1);
                assert!(
                    (got - closed_form).abs() < 1e-6,
                    "d/dx {source} at {x}: {got} vs {closed_form}"
                );
                assert!((got - central_difference(&source, x)).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn polynomial_derivatives_fold_to_compact_trees() {
        let first = derivative_of("x^3 - 3*x + 1");
        assert_eq!(first.to_string(), "3*x^2 - 3");
        let second = differentiate(&first);
        assert_eq!(second.to_string(), "6*x");
        assert_eq!(eval(&second, 2.0), 12.0);
    }

    #[test]
    fn product_and_quotient_rules() {
        let product = derivative_of("x * sin(x)");
        let quotient = derivative_of("sin(x) / x");
        for x in [0.4, 1.3, 2.9] {
            assert!((eval(&product, x) - (x.sin() + x * x.cos())).abs() < 1e-12);
            let expected = (x * x.cos() - x.sin()) / (x * x);
            assert!((eval(&quotient, x) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn exponential_bases_and_general_powers() {
        let exp_base = derivative_of("2^x");
        let general = derivative_of("x^x");
        for x in [0.5, 1.0, 2.5] {
            assert!((eval(&exp_base, x) - 2.0_f64.powf(x) * 2.0_f64.ln()).abs() < 1e-12);
            let expected = x.powf(x) * (x.ln() + 1.0);
            assert!((eval(&general, x) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn every_function_matches_finite_differences() {
        let cases = [
            ("sin(2*x)", 0.7),
            ("cos(x^2)", 0.9),
            ("tan(x)", 0.4),
            ("asin(x/2)", 0.3),
            ("acos(x/2)", -0.6),
            ("atan(3*x)", 0.2),
            ("sinh(x)", 1.1),
            ("cosh(x)", -0.8),
            ("tanh(x)", 0.5),
            ("exp(-0.5*x) * sin(3*x)", 1.0),
            ("ln(x^2 + 1)", 1.7),
            ("log(x)", 2.0),
            ("log(x, 2)", 3.0),
            ("log(8, x)", 3.0),
            ("log10(x)", 4.0),
            ("sqrt(x)", 4.0),
            ("cbrt(x)", 2.0),
            ("abs(x - 1)", -0.5),
            ("sign(x) * x", 2.0),
        ];
        for (source, x) in cases {
            let d = derivative_of(source);
            let got = eval(&d, x);
            let expected = central_difference(source, x);
            assert!(
                (got - expected).abs() < 1e-4,
                "d/dx {source} at {x}: {got} vs {expected} (tree: {d})"
            );
        }
    }

    #[test]
    fn second_derivative_of_damped_wave() {
        let source = "exp(-0.5*x) * sin(3*x)";
        let d2 = second_derivative(&parse_expression(source).expect("parse should succeed"));
        let x: f64 = 1.0;
        let expected = (-0.5 * x).exp() * (-8.75 * (3.0 * x).sin() - 3.0 * (3.0 * x).cos());
        assert!((eval(&d2, x) - expected).abs() < 1e-10);
    }

    #[test]
    fn derivative_output_stays_bounded() {
        let expr = parse_expression("exp(-0.5*x) * sin(3*x)").expect("parse should succeed");
        let second = second_derivative(&expr);
        assert!(second.size() < 100, "second derivative grew to {} nodes", second.size());
    }
}
