use super::classifier::Classifier;
use anyhow::{Context, Result, bail};
use ort::session::Session;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// A fitted classifier loaded from an ONNX export of the offline training job.
///
/// `Session::run` takes `&mut self`, so the session sits behind a `Mutex`;
/// everything else about the loaded artifact is immutable.
#[derive(Debug)]
pub struct OnnxClassifier {
    session: Mutex<Session>,
    model_path: PathBuf,
}

impl OnnxClassifier {
    pub fn load(model_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            bail!("classifier artifact not found at {model_path:?}");
        }

        let session = Session::builder()
            .context("failed to create ONNX session builder")?
            .commit_from_file(model_path)
            .with_context(|| format!("failed to load ONNX model {model_path:?}"))?;

        info!("Loaded ONNX model from {:?}", model_path);
        Ok(Self {
            session: Mutex::new(session),
            model_path: model_path.to_path_buf(),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl Classifier for OnnxClassifier {
    fn predict_label(&self, scaled: &[f64]) -> Result<i64, String> {
        let data: Vec<f32> = scaled.iter().map(|v| *v as f32).collect();
        let shape = vec![1, data.len()];

        let input_value = ort::value::Value::from_array((shape.as_slice(), data))
            .map_err(|e| format!("Input value creation failed: {e}"))?;
        let inputs = ort::inputs![input_value];

        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Mutex lock failed: {e}"))?;

        let outputs = session.run(inputs).map_err(|e| e.to_string())?;
        let output_value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or("No output found")?;

        // Classifier exports emit int64 labels first; fall back to a scored
        // output for models exported without the label tensor.
        if let Ok(labels) = output_value.try_extract_tensor::<i64>() {
            let label = *labels.1.iter().next().ok_or("Empty output")?;
            Ok(i64::from(label != 0))
        } else {
            let scores = output_value
                .try_extract_tensor::<f32>()
                .map_err(|e| e.to_string())?;
            let score = *scores.1.iter().next().ok_or("Empty output")?;
            Ok(i64::from(score > 0.5))
        }
    }
}
