//! Shared helpers for the HTTP endpoint tests: stub fitted artifacts and
//! request plumbing.
#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode};
use cardioserve::application::artifacts::{ArtifactSet, ModelState};
use cardioserve::application::ml::{Classifier, StandardScaler};
use cardioserve::domain::features::FEATURE_COUNT;
use cardioserve::domain::model::ModelName;
use cardioserve::infrastructure::persistence::{Database, SqlitePredictionRepository};
use cardioserve::interfaces::http::{AppState, router};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceExt;

/// Stub classifier: deterministic function of the scaled input, different per
/// weight so the four models disagree like real fitted ones would.
struct WeightedVote {
    weight: f64,
}

impl Classifier for WeightedVote {
    fn predict_label(&self, scaled: &[f64]) -> Result<i64, String> {
        Ok(i64::from(scaled.iter().sum::<f64>() * self.weight > 0.0))
    }
}

pub fn stub_artifacts() -> ArtifactSet {
    let scaler = StandardScaler {
        mean: vec![50.0; FEATURE_COUNT],
        scale: vec![10.0; FEATURE_COUNT],
    };

    let mut classifiers: BTreeMap<ModelName, Box<dyn Classifier>> = BTreeMap::new();
    classifiers.insert(ModelName::LogisticRegression, Box::new(WeightedVote { weight: 1.0 }));
    classifiers.insert(ModelName::Knn, Box::new(WeightedVote { weight: -1.0 }));
    classifiers.insert(ModelName::Svm, Box::new(WeightedVote { weight: 2.0 }));
    classifiers.insert(ModelName::RandomForest, Box::new(WeightedVote { weight: 0.5 }));

    ArtifactSet::new(scaler, classifiers).unwrap()
}

pub fn stateless_app() -> Router {
    router(AppState {
        models: ModelState::ready(stub_artifacts()),
        repo: None,
    })
}

pub fn not_ready_app() -> Router {
    router(AppState {
        models: ModelState::not_ready(),
        repo: None,
    })
}

pub async fn logging_app() -> (Router, Database) {
    let db = Database::in_memory().await.unwrap();
    let repo = SqlitePredictionRepository::new(db.pool.clone());
    let app = router(AppState {
        models: ModelState::ready(stub_artifacts()),
        repo: Some(Arc::new(repo)),
    });
    (app, db)
}

/// The worked example from the original deployment.
pub fn sample_patient() -> Value {
    json!({
        "age": 63, "sex": 1, "cp": 1, "trestbps": 145, "chol": 233,
        "fbs": 1, "restecg": 2, "thalach": 150, "exang": 0,
        "oldpeak": 2.3, "slope": 3, "ca": 0, "thal": 6
    })
}

pub async fn post_predict(app: Router, body: &Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get_history(app: Router) -> Response<Body> {
    app.oneshot(Request::builder().uri("/history").body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

pub fn assert_status(response: &Response<Body>, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
