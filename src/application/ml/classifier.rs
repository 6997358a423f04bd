/// Interface for a fitted binary classifier.
///
/// Implementations take an already-scaled feature vector and return a single
/// 0/1 label. The trait is the seam that lets tests run the full request path
/// against stub models instead of real fitted artifacts.
pub trait Classifier: Send + Sync {
    /// Predict the label for one scaled feature vector.
    fn predict_label(&self, scaled: &[f64]) -> Result<i64, String>;
}
