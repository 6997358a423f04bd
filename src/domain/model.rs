use crate::domain::features::FEATURE_NAMES;
use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// Display pattern for `prediction_time` in history responses.
pub const PREDICTION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The closed set of deployed classifiers.
///
/// The set is fixed at deployment time: the artifact loader either finds one
/// fitted classifier per variant or declares the whole service not ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ModelName {
    LogisticRegression,
    #[serde(rename = "KNN")]
    Knn,
    #[serde(rename = "SVM")]
    Svm,
    RandomForest,
}

impl ModelName {
    pub const ALL: [ModelName; 4] = [
        ModelName::LogisticRegression,
        ModelName::Knn,
        ModelName::Svm,
        ModelName::RandomForest,
    ];

    /// Canonical wire name, as presented in `/predict` responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelName::LogisticRegression => "LogisticRegression",
            ModelName::Knn => "KNN",
            ModelName::Svm => "SVM",
            ModelName::RandomForest => "RandomForest",
        }
    }

    /// File name of the fitted classifier artifact.
    pub fn artifact_file(&self) -> String {
        format!("model_{}.onnx", self.as_str().to_lowercase())
    }

    /// Column name in the `predictions` audit table.
    pub fn column(&self) -> &'static str {
        match self {
            ModelName::LogisticRegression => "prediction_lr",
            ModelName::Knn => "prediction_knn",
            ModelName::Svm => "prediction_svm",
            ModelName::RandomForest => "prediction_rf",
        }
    }
}

/// One binary label per loaded classifier.
///
/// Serializes to the flat `{"LogisticRegression": 0, "KNN": 1, ...}` object
/// clients receive. Keys are exactly the loaded model set; partial results
/// are never constructed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct PredictionResult {
    labels: BTreeMap<ModelName, i64>,
}

impl PredictionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: ModelName, label: i64) {
        self.labels.insert(model, label);
    }

    pub fn label(&self, model: ModelName) -> Option<i64> {
        self.labels.get(&model).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModelName, i64)> + '_ {
        self.labels.iter().map(|(m, l)| (*m, *l))
    }
}

/// One row of the audit log: the inputs, every label, and the server-assigned
/// id and timestamp. Immutable once written.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub id: i64,
    pub features: Vec<f64>,
    pub result: PredictionResult,
    pub prediction_time: DateTime<Utc>,
}

impl Serialize for PredictionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + FEATURE_NAMES.len() + ModelName::ALL.len()))?;
        map.serialize_entry("id", &self.id)?;
        for (name, value) in FEATURE_NAMES.iter().zip(&self.features) {
            map.serialize_entry(name, value)?;
        }
        for model in ModelName::ALL {
            map.serialize_entry(model.column(), &self.result.label(model))?;
        }
        map.serialize_entry(
            "prediction_time",
            &self.prediction_time.format(PREDICTION_TIME_FORMAT).to_string(),
        )?;
        map.end()
    }
}
