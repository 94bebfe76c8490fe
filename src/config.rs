use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Environment variable prefix, e.g. `CLASSROOM_FEEDBACK__ANALYSIS__URL`
const ENV_PREFIX: &str = "CLASSROOM_FEEDBACK";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
    /// Largest recording the review API accepts
    pub max_upload_mb: usize,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    /// Base URL of the analysis service; requests go to `{url}/analyze`
    pub url: String,
    pub timeout_secs: u64,
}

impl HttpConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

impl AnalysisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "classroom-feedback")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 8080)?
            .set_default("service.http.max_upload_mb", 200)?
            .set_default("analysis.url", "http://localhost:8000")?
            .set_default("analysis.timeout_secs", 300)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .with_context(|| format!("Failed to load config from {}", path))?;

        Ok(settings.try_deserialize()?)
    }
}
