mod classifier;
mod onnx_classifier;
mod scaler;

pub use classifier::Classifier;
pub use onnx_classifier::OnnxClassifier;
pub use scaler::StandardScaler;
