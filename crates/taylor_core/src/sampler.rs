use crate::approximation::ApproximationCoefficients;
use crate::compiler::{is_usable_point, Evaluator};
use crate::settings::SamplerSettings;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplePoint {
    pub x: f64,
    /// NaN marks a gap where the function is undefined.
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleSeries {
    pub points: Vec<SamplePoint>,
}

impl SampleSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// Number of points where the curve is undefined.
    pub fn gap_count(&self) -> usize {
        self.points.iter().filter(|p| p.y.is_nan()).count()
    }

    fn from_grid(grid: &[f64], f: impl Fn(f64) -> f64) -> Self {
        Self {
            points: grid.iter().map(|&x| SamplePoint { x, y: f(x) }).collect(),
        }
    }
}

/// The three plotted curves, all on the same x grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Samples {
    pub original: SampleSeries,
    pub linear: SampleSeries,
    pub quadratic: SampleSeries,
}

/// Evenly spaced grid centred on `x0`. Points are computed from their index
/// so the endpoints and the centre land exactly.
pub fn sample_grid(x0: f64, settings: &SamplerSettings) -> Vec<f64> {
    let half_width = settings.half_width(x0);
    let steps = settings.steps_per_side as f64;
    (0..settings.point_count())
        .map(|i| x0 + half_width * (i as f64 / steps - 1.0))
        .collect()
}

/// Samples the original function and both closed-form approximations.
/// Non-finite original values are recorded as NaN gaps.
pub fn sample(
    original: &Evaluator,
    coefficients: &ApproximationCoefficients,
    settings: &SamplerSettings,
) -> Samples {
    let grid = sample_grid(coefficients.x0, settings);
    Samples {
        original: SampleSeries::from_grid(&grid, |x| {
            let y = original.evaluate(x);
            if is_usable_point(y) {
                y
            } else {
                f64::NAN
            }
        }),
        linear: SampleSeries::from_grid(&grid, |x| coefficients.linear(x)),
        quadratic: SampleSeries::from_grid(&grid, |x| coefficients.quadratic(x)),
    }
}
