use serde::Serialize;

/// The three anchor-point scalars plus the anchor itself. Everything
/// downstream (formulas, approximation samples) is derived from these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApproximationCoefficients {
    pub f0: f64,
    pub f1: f64,
    pub f2: f64,
    pub x0: f64,
}

impl ApproximationCoefficients {
    pub fn new(f0: f64, f1: f64, f2: f64, x0: f64) -> Self {
        Self { f0, f1, f2, x0 }
    }

    /// Tangent line `f0 + f1 (x - x0)`.
    pub fn linear(&self, x: f64) -> f64 {
        self.f0 + self.f1 * (x - self.x0)
    }

    /// Second-order Taylor polynomial `f0 + f1 (x - x0) + f2/2 (x - x0)^2`.
    pub fn quadratic(&self, x: f64) -> f64 {
        let dx = x - self.x0;
        self.f0 + self.f1 * dx + (self.f2 / 2.0) * dx * dx
    }

    /// `b` in the slope-intercept form `L(x) = f1 x + b`.
    pub fn intercept(&self) -> f64 {
        self.f0 - self.f1 * self.x0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tangency_at_anchor() {
        let c = ApproximationCoefficients::new(3.0, 9.0, 12.0, 2.0);
        assert_eq!(c.linear(2.0), 3.0);
        assert_eq!(c.quadratic(2.0), 3.0);
        assert_eq!(c.intercept(), -15.0);
    }

    #[test]
    fn quadratic_has_the_requested_derivatives() {
        let c = ApproximationCoefficients::new(0.5, -1.25, 3.0, 0.75);
        let h = 1e-4;
        let slope = (c.quadratic(c.x0 + h) - c.quadratic(c.x0 - h)) / (2.0 * h);
        let curvature =
            (c.quadratic(c.x0 + h) - 2.0 * c.quadratic(c.x0) + c.quadratic(c.x0 - h)) / (h * h);
        assert!((slope - c.f1).abs() < 1e-9);
        assert!((curvature - c.f2).abs() < 1e-5);
        let linear_slope = (c.linear(c.x0 + 1.0) - c.linear(c.x0)) / 1.0;
        assert!((linear_slope - c.f1).abs() < 1e-12);
    }
}
