use crate::domain::errors::PredictError;
use serde_json::Value;

/// Ordered list of input feature names.
/// This order MUST match exactly the column order the scaler and classifiers
/// were fitted with offline. Any change here is a breaking change for the
/// deployed artifacts.
pub const FEATURE_NAMES: &[&str] = &[
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

pub const FEATURE_COUNT: usize = 13;

/// Converts a JSON request body into the fixed-order numeric vector.
///
/// Lookup is by field name, so extra fields are ignored. Every schema field
/// must be present; there are no defaults. Coercion is permissive (integers,
/// floats and booleans all pass), but no range or plausibility checks are
/// applied to the values themselves.
pub fn encode(input: &Value) -> Result<Vec<f64>, PredictError> {
    let object = input
        .as_object()
        .ok_or_else(|| PredictError::Inference("request body is not a JSON object".to_string()))?;

    let mut vector = Vec::with_capacity(FEATURE_COUNT);
    for &name in FEATURE_NAMES {
        let value = object
            .get(name)
            .ok_or_else(|| PredictError::MissingFeature(name.to_string()))?;
        vector.push(coerce_numeric(name, value)?);
    }
    Ok(vector)
}

fn coerce_numeric(name: &str, value: &Value) -> Result<f64, PredictError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| PredictError::Inference(format!("feature '{name}' is not a finite number"))),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        other => Err(PredictError::Inference(format!(
            "feature '{name}' has non-numeric value {other}"
        ))),
    }
}
