use crate::application::artifacts::ModelState;
use crate::application::inference;
use crate::domain::errors::PredictError;
use crate::domain::features;
use crate::domain::model::PredictionResult;
use crate::infrastructure::persistence::SqlitePredictionRepository;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared request-handler state: immutable model artifacts plus, in the
/// logging shape, the audit-log repository. `repo: None` selects the
/// stateless shape (no audit append, no `/history` route).
pub struct AppState {
    pub models: ModelState,
    pub repo: Option<Arc<SqlitePredictionRepository>>,
}

type SharedState = Arc<AppState>;

pub fn router(state: AppState) -> Router {
    // Any-origin CORS on every route
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new().route("/predict", post(predict));
    if state.repo.is_some() {
        router = router.route("/history", get(history));
    }

    router.with_state(Arc::new(state)).layer(cors)
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

async fn predict(State(state): State<SharedState>, Json(payload): Json<Value>) -> Response {
    match run_predict(&state, &payload).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            error!("/predict failed: {}", e);
            e.into_response()
        }
    }
}

async fn run_predict(state: &AppState, payload: &Value) -> Result<PredictionResult, PredictError> {
    let artifacts = state.models.artifacts().ok_or(PredictError::NotReady)?;

    let vector = features::encode(payload)?;
    let result = inference::run(artifacts, &vector)?;

    // Logging shape: a failed append fails the whole call, even though the
    // labels above were already computed. See DESIGN.md.
    if let Some(repo) = &state.repo {
        repo.append(&vector, &result)
            .await
            .map_err(|e| PredictError::Database(format!("{e:#}")))?;
        info!("Prediction logged to database.");
    }

    Ok(result)
}

async fn history(State(state): State<SharedState>) -> Response {
    let Some(repo) = &state.repo else {
        // Route is only mounted in the logging shape
        return PredictError::Database("audit log not configured".to_string()).into_response();
    };

    match repo.list_all().await {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            error!("/history failed: {:#}", e);
            PredictError::Database(format!("{e:#}")).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_missing_feature_maps_to_bad_request() {
        let response = PredictError::MissingFeature("chol".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("chol"));
    }

    #[tokio::test]
    async fn test_server_faults_map_to_internal_error() {
        for err in [
            PredictError::NotReady,
            PredictError::Inference("boom".into()),
            PredictError::Database("locked".into()),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
