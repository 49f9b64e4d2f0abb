//! Runtime settings, read from `POS_REVIEWS_*` environment variables
//! (optionally via a `.env` file).

use anyhow::Context;
use review_core::ApprovalConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub port: u16,
    /// Rejected at load time when 0.
    pub min_approval_count: ApprovalConfig,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {e}");
        }

        config::Config::builder()
            .set_default("database_url", "sqlite:pos_reviews.db")?
            .set_default("bind_addr", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("min_approval_count", 3)?
            .add_source(config::Environment::with_prefix("POS_REVIEWS").try_parsing(true))
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }
}
