use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Shape of the plotting grid around the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerSettings {
    /// The grid extends at least this far on each side of x0.
    pub min_half_width: f64,
    /// Otherwise it extends `|x0| * width_scale` on each side.
    pub width_scale: f64,
    /// Number of steps between x0 and each end of the grid.
    pub steps_per_side: usize,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            min_half_width: 5.0,
            width_scale: 1.5,
            steps_per_side: 50,
        }
    }
}

impl SamplerSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.min_half_width.is_finite() || self.min_half_width <= 0.0 {
            return Err(EngineError::InvalidSettings {
                reason: "min_half_width must be positive and finite".to_string(),
            });
        }
        if !self.width_scale.is_finite() || self.width_scale < 0.0 {
            return Err(EngineError::InvalidSettings {
                reason: "width_scale must be non-negative and finite".to_string(),
            });
        }
        if self.steps_per_side == 0 {
            return Err(EngineError::InvalidSettings {
                reason: "steps_per_side must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Distance from x0 to either end of the grid.
    pub fn half_width(&self, x0: f64) -> f64 {
        self.min_half_width.max(x0.abs() * self.width_scale)
    }

    pub fn point_count(&self) -> usize {
        2 * self.steps_per_side + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationSettings {
    pub sampler: SamplerSettings,
    /// |f'| or |f''| below this counts as flat when classifying behaviour.
    pub flat_tolerance: f64,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        Self {
            sampler: SamplerSettings::default(),
            flat_tolerance: 1e-4,
        }
    }
}

impl CalculationSettings {
    pub fn validate(&self) -> Result<()> {
        self.sampler.validate()?;
        if !self.flat_tolerance.is_finite() || self.flat_tolerance < 0.0 {
            return Err(EngineError::InvalidSettings {
                reason: "flat_tolerance must be non-negative and finite".to_string(),
            });
        }
        Ok(())
    }
}
