//! Configuration module for cardioserve.
//!
//! All configuration is loaded from environment variables (with `.env`
//! support via `dotenvy` in the binary). The presence of `DATABASE_URL`
//! selects the logging deployment shape.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub bind_addr: String,

    /// Directory holding `scaler.json` and the four `model_*.onnx` artifacts.
    pub artifact_dir: PathBuf,

    /// SQLite URL for the audit log. Unset (or empty) runs the stateless
    /// shape: no logging, no `/history` endpoint.
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            artifact_dir: PathBuf::from(
                env::var("ARTIFACT_DIR").unwrap_or_else(|_| "artifacts".to_string()),
            ),
            database_url: optional(env::var("DATABASE_URL").ok()),
        })
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
