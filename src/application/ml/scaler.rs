use crate::domain::features::FEATURE_COUNT;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Fitted per-feature affine transform, exported by the offline training job
/// as `scaler.json` (`mean_` / `scale_` of the fitted standardizer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Loads and validates the scaler artifact. A fitted shape that does not
    /// match the 13-feature schema is a configuration error and fails the
    /// whole load, never an individual request.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("failed to open scaler artifact {path:?}"))?;
        let scaler: StandardScaler = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to deserialize scaler artifact {path:?}"))?;
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<()> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            bail!(
                "scaler was fitted for {}/{} features, expected {}",
                self.mean.len(),
                self.scale.len(),
                FEATURE_COUNT
            );
        }
        if self.scale.iter().any(|s| *s == 0.0) {
            bail!("scaler has a zero scale component");
        }
        Ok(())
    }

    /// Applies `(x - mean) / scale` component-wise.
    pub fn transform(&self, vector: &[f64]) -> Result<Vec<f64>, String> {
        if vector.len() != self.mean.len() {
            return Err(format!(
                "input has {} features, scaler was fitted for {}",
                vector.len(),
                self.mean.len()
            ));
        }
        Ok(vector
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_scaler() -> StandardScaler {
        StandardScaler {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        }
    }

    #[test]
    fn test_transform_is_affine() {
        let mut scaler = identity_scaler();
        scaler.mean[0] = 10.0;
        scaler.scale[0] = 2.0;

        let mut input = vec![0.0; FEATURE_COUNT];
        input[0] = 14.0;

        let scaled = scaler.transform(&input).unwrap();
        assert_eq!(scaled[0], 2.0);
        assert_eq!(scaled[1], 0.0);
    }

    #[test]
    fn test_transform_rejects_shape_mismatch() {
        let scaler = identity_scaler();
        assert!(scaler.transform(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_validate_rejects_wrong_fitted_width() {
        let scaler = StandardScaler {
            mean: vec![0.0; 4],
            scale: vec![1.0; 4],
        };
        assert!(scaler.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let mut scaler = identity_scaler();
        scaler.scale[5] = 0.0;
        assert!(scaler.validate().is_err());
    }
}
