use crate::application::ml::{Classifier, OnnxClassifier, StandardScaler};
use crate::domain::model::ModelName;
use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// Scaler file name inside the artifact directory.
pub const SCALER_FILE: &str = "scaler.json";

/// Everything the inference path needs, loaded once at startup.
///
/// Either the full set is present (one scaler plus one classifier per model
/// name) or construction fails; a partial set is never served.
pub struct ArtifactSet {
    scaler: StandardScaler,
    classifiers: BTreeMap<ModelName, Box<dyn Classifier>>,
}

impl std::fmt::Debug for ArtifactSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactSet")
            .field("classifiers", &self.classifiers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ArtifactSet {
    pub fn new(
        scaler: StandardScaler,
        classifiers: BTreeMap<ModelName, Box<dyn Classifier>>,
    ) -> Result<Self> {
        for model in ModelName::ALL {
            if !classifiers.contains_key(&model) {
                bail!("classifier set is missing '{}'", model.as_str());
            }
        }
        Ok(Self { scaler, classifiers })
    }

    /// Loads the scaler and all four classifier artifacts from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let scaler = StandardScaler::load(&dir.join(SCALER_FILE))?;
        info!("Scaler loaded successfully.");

        let mut classifiers: BTreeMap<ModelName, Box<dyn Classifier>> = BTreeMap::new();
        for model in ModelName::ALL {
            let path = dir.join(model.artifact_file());
            let classifier = OnnxClassifier::load(&path)
                .with_context(|| format!("failed to load classifier '{}'", model.as_str()))?;
            classifiers.insert(model, Box::new(classifier));
        }

        Self::new(scaler, classifiers)
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn classifiers(&self) -> impl Iterator<Item = (ModelName, &dyn Classifier)> {
        self.classifiers.iter().map(|(m, c)| (*m, &**c))
    }
}

/// Process-wide model state, initialized once and read-only afterwards.
///
/// A failed load degrades to "not ready" instead of exiting: the process keeps
/// answering HTTP requests with a not-ready error rather than crash-looping.
#[derive(Clone, Default)]
pub struct ModelState {
    artifacts: Option<Arc<ArtifactSet>>,
}

impl ModelState {
    pub fn load_or_degrade(dir: &Path) -> Self {
        match ArtifactSet::load(dir) {
            Ok(artifacts) => {
                info!("All model artifacts loaded from {:?}", dir);
                Self::ready(artifacts)
            }
            Err(e) => {
                error!("Failed to load model artifacts from {:?}: {:#}", dir, e);
                Self::not_ready()
            }
        }
    }

    pub fn ready(artifacts: ArtifactSet) -> Self {
        Self {
            artifacts: Some(Arc::new(artifacts)),
        }
    }

    pub fn not_ready() -> Self {
        Self { artifacts: None }
    }

    pub fn is_ready(&self) -> bool {
        self.artifacts.is_some()
    }

    pub fn artifacts(&self) -> Option<&ArtifactSet> {
        self.artifacts.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::features::FEATURE_COUNT;

    struct Fixed(i64);

    impl Classifier for Fixed {
        fn predict_label(&self, _scaled: &[f64]) -> Result<i64, String> {
            Ok(self.0)
        }
    }

    fn identity_scaler() -> StandardScaler {
        StandardScaler {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        }
    }

    #[test]
    fn test_partial_classifier_set_is_rejected() {
        let mut classifiers: BTreeMap<ModelName, Box<dyn Classifier>> = BTreeMap::new();
        classifiers.insert(ModelName::Knn, Box::new(Fixed(1)));

        let err = ArtifactSet::new(identity_scaler(), classifiers).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_load_degrades_to_not_ready_on_missing_dir() {
        let state = ModelState::load_or_degrade(Path::new("does/not/exist"));
        assert!(!state.is_ready());
        assert!(state.artifacts().is_none());
    }

    #[test]
    fn test_complete_set_is_ready() {
        let mut classifiers: BTreeMap<ModelName, Box<dyn Classifier>> = BTreeMap::new();
        for model in ModelName::ALL {
            classifiers.insert(model, Box::new(Fixed(0)));
        }
        let state = ModelState::ready(ArtifactSet::new(identity_scaler(), classifiers).unwrap());
        assert!(state.is_ready());
    }
}
