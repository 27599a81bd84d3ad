use crate::shared::{js_error, serialize, settings_from_js};
use taylor_core::sampler::sample;
use taylor_core::{Order, PreparedExpression};
use wasm_bindgen::prelude::*;

/// A parsed expression kept alive on the JS side so that moving the anchor
/// point does not re-parse or re-differentiate.
#[wasm_bindgen]
pub struct WasmExpression {
    prepared: PreparedExpression,
}

#[wasm_bindgen]
impl WasmExpression {
    #[wasm_bindgen(constructor)]
    pub fn new(source: &str) -> Result<WasmExpression, JsValue> {
        console_error_panic_hook::set_once();
        let prepared = PreparedExpression::parse(source).map_err(|e| js_error(e.into()))?;
        Ok(WasmExpression { prepared })
    }

    /// f(x). Returns NaN or ±Infinity outside the domain.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.prepared.evaluate(Order::Value, x)
    }

    pub fn derivative(&self, x: f64) -> f64 {
        self.prepared.evaluate(Order::First, x)
    }

    pub fn second_derivative(&self, x: f64) -> f64 {
        self.prepared.evaluate(Order::Second, x)
    }

    pub fn expression_text(&self) -> String {
        self.prepared.function.to_string()
    }

    pub fn derivative_text(&self) -> String {
        self.prepared.first.to_string()
    }

    pub fn second_derivative_text(&self) -> String {
        self.prepared.second.to_string()
    }

    /// Anchor-point coefficients `{ f0, f1, f2, x0 }`.
    pub fn coefficients(&self, x0: f64) -> Result<JsValue, JsValue> {
        let coefficients = self
            .prepared
            .coefficients_at(x0)
            .map_err(|e| js_error(e.into()))?;
        serialize(&coefficients)
    }

    /// The three plot series around `x0`.
    pub fn sample(&self, x0: f64, settings: JsValue) -> Result<JsValue, JsValue> {
        let settings = settings_from_js(settings).map_err(js_error)?;
        let coefficients = self
            .prepared
            .coefficients_at(x0)
            .map_err(|e| js_error(e.into()))?;
        let samples = sample(
            self.prepared.evaluator(Order::Value),
            &coefficients,
            &settings.sampler,
        );
        serialize(&samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_all_three_orders() {
        let expression = WasmExpression {
            prepared: PreparedExpression::parse("sin(x)").expect("parse"),
        };
        assert_eq!(expression.evaluate(0.0), 0.0);
        assert_eq!(expression.derivative(0.0), 1.0);
        assert_eq!(expression.second_derivative(0.0), 0.0);
        assert_eq!(expression.derivative_text(), "cos(x)");
    }

    #[test]
    fn domain_errors_surface_as_ieee_values() {
        let expression = WasmExpression {
            prepared: PreparedExpression::parse("1/x").expect("parse"),
        };
        assert_eq!(expression.evaluate(0.0), f64::INFINITY);
        assert!(expression.derivative(0.0).is_infinite());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::WasmExpression;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn constructor_reports_syntax_errors() {
        let message = WasmExpression::new("x^^2")
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.contains("Syntax error at position 2"));
    }

    #[wasm_bindgen_test]
    fn coefficients_reject_singular_anchor() {
        let expression = WasmExpression::new("1/x").expect("expression");
        let message = expression
            .coefficients(0.0)
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.contains("f(0) is not a finite number"));
        assert!(expression.sample(1.0, JsValue::UNDEFINED).is_ok());
    }
}
