use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    /// Slope is within the flat tolerance of zero.
    Stationary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Concavity {
    Up,
    Down,
    /// Curvature is within the flat tolerance of zero.
    Inflection,
}

/// Local shape of the function at the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Behavior {
    pub trend: Trend,
    pub concavity: Concavity,
}

impl Behavior {
    pub fn classify(f1: f64, f2: f64, flat_tolerance: f64) -> Self {
        let trend = if f1.abs() < flat_tolerance {
            Trend::Stationary
        } else if f1 > 0.0 {
            Trend::Increasing
        } else {
            Trend::Decreasing
        };
        let concavity = if f2.abs() < flat_tolerance {
            Concavity::Inflection
        } else if f2 > 0.0 {
            Concavity::Up
        } else {
            Concavity::Down
        };
        Self { trend, concavity }
    }
}
