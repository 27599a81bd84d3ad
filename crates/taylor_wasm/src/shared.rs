//! Conversions shared by the exported bindings.

use anyhow::Context;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use taylor_core::CalculationSettings;
use wasm_bindgen::JsValue;

/// `undefined` or `null` mean "use the defaults"; missing fields fall back
/// to their defaults individually.
pub(crate) fn settings_from_js(value: JsValue) -> anyhow::Result<CalculationSettings> {
    if value.is_undefined() || value.is_null() {
        return Ok(CalculationSettings::default());
    }
    let settings: CalculationSettings = from_value(value)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Invalid settings")?;
    settings.validate()?;
    Ok(settings)
}

pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Flattens an error chain into the single message the UI displays.
pub(crate) fn js_error(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", err))
}
