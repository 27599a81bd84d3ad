//! Human-readable formulas for the approximations. These strings are
//! presentation only; nothing parses them back.

use crate::approximation::ApproximationCoefficients;

const DECIMALS: usize = 4;

/// Fixed four-decimal rendering. Negative zero prints as `0.0000`.
pub fn format_value(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.*}", DECIMALS, value)
}

/// `L(x) = <f1>x <+|-> <|b|>` with `b = f0 - f1*x0`.
pub fn format_linear(f0: f64, f1: f64, x0: f64) -> String {
    let b = ApproximationCoefficients::new(f0, f1, 0.0, x0).intercept();
    let sign = if b >= 0.0 { '+' } else { '-' };
    format!(
        "L(x) = {}x {} {}",
        format_value(f1),
        sign,
        format_value(b.abs())
    )
}

/// `P(x) = <f0> + <f1>·(x-<x0>) + <f2/2>·(x-<x0>)²`, no sign collapsing.
pub fn format_quadratic(f0: f64, f1: f64, f2: f64, x0: f64) -> String {
    let anchor = format_anchor(x0);
    format!(
        "P(x) = {} + {}·(x-{anchor}) + {}·(x-{anchor})²",
        format_value(f0),
        format_value(f1),
        format_value(f2 / 2.0),
    )
}

/// x0 is shown as typed (shortest round-trip form), not padded.
fn format_anchor(x0: f64) -> String {
    let x0 = if x0 == 0.0 { 0.0 } else { x0 };
    format!("{x0}")
}

impl ApproximationCoefficients {
    pub fn linear_formula(&self) -> String {
        format_linear(self.f0, self.f1, self.x0)
    }

    pub fn quadratic_formula(&self) -> String {
        format_quadratic(self.f0, self.f1, self.f2, self.x0)
    }
}
