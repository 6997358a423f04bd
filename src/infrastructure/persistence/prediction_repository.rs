use crate::domain::features::FEATURE_NAMES;
use crate::domain::model::{ModelName, PredictionRecord, PredictionResult};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

/// Append-only store of prediction requests and their labels.
///
/// Every call acquires its own connection and commits independently; rows are
/// never updated or deleted once written.
pub struct SqlitePredictionRepository {
    pool: SqlitePool,
}

impl SqlitePredictionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts one record and returns its server-assigned id and timestamp.
    pub async fn append(
        &self,
        features: &[f64],
        result: &PredictionResult,
    ) -> Result<(i64, DateTime<Utc>)> {
        let prediction_time = Utc::now();

        // Scoped acquisition: the connection returns to the pool on every
        // exit path, including insert failure.
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire database connection")?;

        let mut query = sqlx::query(
            r#"
            INSERT INTO predictions (
                age, sex, cp, trestbps, chol, fbs, restecg, thalach, exang,
                oldpeak, slope, ca, thal,
                prediction_lr, prediction_knn, prediction_svm, prediction_rf,
                prediction_time
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        );
        for value in features {
            query = query.bind(*value);
        }
        for model in ModelName::ALL {
            query = query.bind(result.label(model));
        }
        query = query.bind(prediction_time);

        let outcome = query
            .execute(&mut *conn)
            .await
            .context("Failed to write prediction record")?;

        Ok((outcome.last_insert_rowid(), prediction_time))
    }

    /// Returns the whole log, most recent first. Records written within the
    /// same instant keep their insertion order.
    pub async fn list_all(&self) -> Result<Vec<PredictionRecord>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire database connection")?;

        let rows = sqlx::query("SELECT * FROM predictions ORDER BY prediction_time DESC, id ASC")
            .fetch_all(&mut *conn)
            .await
            .context("Failed to retrieve prediction history")?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let mut features = Vec::with_capacity(FEATURE_NAMES.len());
            for &name in FEATURE_NAMES {
                features.push(row.try_get::<f64, _>(name)?);
            }

            let mut result = PredictionResult::new();
            for model in ModelName::ALL {
                result.insert(model, row.try_get::<i64, _>(model.column())?);
            }

            records.push(PredictionRecord {
                id: row.try_get("id")?,
                features,
                result,
                prediction_time: row.try_get("prediction_time")?,
            });
        }
        Ok(records)
    }
}
