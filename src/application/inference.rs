use crate::application::artifacts::ArtifactSet;
use crate::domain::errors::PredictError;
use crate::domain::model::PredictionResult;

/// Runs the full multi-model inference pass: scale once, then ask every
/// loaded classifier for its label.
///
/// All-or-nothing: a single classifier failure fails the whole request and no
/// partial result escapes. No retries, no fallback model, no thresholds.
pub fn run(artifacts: &ArtifactSet, vector: &[f64]) -> Result<PredictionResult, PredictError> {
    let scaled = artifacts
        .scaler()
        .transform(vector)
        .map_err(PredictError::Inference)?;

    let mut result = PredictionResult::new();
    for (model, classifier) in artifacts.classifiers() {
        let label = classifier
            .predict_label(&scaled)
            .map_err(|e| PredictError::Inference(format!("{}: {e}", model.as_str())))?;
        result.insert(model, label);
    }
    Ok(result)
}
