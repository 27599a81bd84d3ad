//! WASM bindings for `taylor_core`.
//!
//! `calculate` runs the whole pipeline in one call and returns a plain JS
//! object; `WasmExpression` keeps a parsed expression around for interactive
//! use where only the anchor point changes.

use anyhow::Context;
use wasm_bindgen::prelude::*;

mod expression;
mod shared;

pub use expression::WasmExpression;

use shared::{js_error, serialize, settings_from_js};

/// Parses `expression`, differentiates it twice and builds both
/// approximations around `x0`. `settings` may be `undefined`.
#[wasm_bindgen]
pub fn calculate(expression: &str, x0: f64, settings: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let settings = settings_from_js(settings).map_err(js_error)?;
    let result = run_calculation(expression, x0, &settings).map_err(js_error)?;
    serialize(&result)
}

fn run_calculation(
    expression: &str,
    x0: f64,
    settings: &taylor_core::CalculationSettings,
) -> anyhow::Result<taylor_core::Calculation> {
    let calculation = taylor_core::calculate_with(expression, x0, settings)?;
    Ok(calculation)
}

/// Names accepted in function-call position, for the UI's help text.
#[wasm_bindgen]
pub fn supported_functions() -> Vec<String> {
    taylor_core::functions::FUNCTIONS
        .iter()
        .map(|function| function.name().to_string())
        .collect()
}

/// Validates a settings object without running a calculation.
#[wasm_bindgen]
pub fn check_settings(settings: JsValue) -> Result<(), JsValue> {
    settings_from_js(settings)
        .context("Settings rejected")
        .map(|_| ())
        .map_err(js_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taylor_core::{CalculationSettings, EngineError};

    #[test]
    fn run_calculation_returns_formulas() {
        let result = run_calculation("x^3 - 3*x + 1", 2.0, &CalculationSettings::default())
            .expect("calculation");
        assert_eq!(result.linear_formula, "L(x) = 9.0000x - 15.0000");
        assert_eq!(
            result.quadratic_formula,
            "P(x) = 3.0000 + 9.0000·(x-2) + 6.0000·(x-2)²"
        );
    }

    #[test]
    fn run_calculation_keeps_engine_error() {
        let err = run_calculation("1/x", 0.0, &CalculationSettings::default())
            .expect_err("singular anchor");
        let engine = err.downcast_ref::<EngineError>().expect("engine error");
        assert_eq!(engine.position(), None);
        assert_eq!(err.to_string(), "f(0) is not a finite number");
    }

    #[test]
    fn supported_functions_lists_the_table() {
        let names = supported_functions();
        assert!(names.iter().any(|name| name == "sin"));
        assert!(names.iter().any(|name| name == "log10"));
        assert_eq!(names.len(), taylor_core::functions::FUNCTIONS.len());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::{calculate, check_settings};
    use serde_wasm_bindgen::to_value;
    use taylor_core::{CalculationSettings, SamplerSettings};
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn calculate_accepts_missing_settings() {
        assert!(calculate("sin(x)", 0.5, JsValue::UNDEFINED).is_ok());
        assert!(calculate("sin(x)", 0.5, JsValue::NULL).is_ok());
    }

    #[wasm_bindgen_test]
    fn calculate_reports_syntax_error_position() {
        let message = calculate("x^^2", 1.0, JsValue::UNDEFINED)
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.starts_with("Syntax error at position 2: unexpected '^'"));
    }

    #[wasm_bindgen_test]
    fn check_settings_rejects_zero_steps() {
        let settings = CalculationSettings {
            sampler: SamplerSettings {
                steps_per_side: 0,
                ..SamplerSettings::default()
            },
            ..CalculationSettings::default()
        };
        let message = check_settings(to_value(&settings).expect("settings"))
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.contains("steps_per_side"));
    }
}
