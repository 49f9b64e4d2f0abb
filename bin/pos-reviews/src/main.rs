//! # POS Reviews Binary
//!
//! The entry point that assembles the application based on compile-time features.

mod settings;

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use review_api::handlers::AppState;
use review_api::middleware::{cors_policy, standard_middleware};
use review_core::{ReviewRepo, ReviewService};

// Feature-gated imports: the store plugin is chosen at compile time
#[cfg(feature = "db-sqlite")]
use review_db_sqlite::SqliteReviewRepo;

#[cfg(all(feature = "store-memory", not(feature = "db-sqlite")))]
use review_store_memory::MemoryReviewRepo;

#[cfg(not(any(feature = "db-sqlite", feature = "store-memory")))]
compile_error!("enable one store plugin: `db-sqlite` or `store-memory`");

#[cfg(feature = "db-sqlite")]
async fn init_repo(settings: &settings::Settings) -> anyhow::Result<Arc<dyn ReviewRepo>> {
    let repo = SqliteReviewRepo::new(&settings.database_url)
        .await
        .context("failed to init SQLite")?;
    Ok(Arc::new(repo))
}

#[cfg(all(feature = "store-memory", not(feature = "db-sqlite")))]
async fn init_repo(_settings: &settings::Settings) -> anyhow::Result<Arc<dyn ReviewRepo>> {
    log::warn!("Using the in-memory store; reviews are lost on restart");
    Ok(Arc::new(MemoryReviewRepo::new()))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = settings::Settings::load()?;

    // 1. Initialize the store plugin
    let repo = init_repo(&settings).await?;

    // 2. Wire the review workflow with the configured quorum
    let policy = Arc::new(settings.min_approval_count);
    let state = web::Data::new(AppState {
        service: ReviewService::new(repo, policy),
    });

    log::info!(
        "POS reviews starting on http://{}:{} (quorum: {})",
        settings.bind_addr,
        settings.port,
        settings.min_approval_count.min_count()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(standard_middleware())
            .wrap(cors_policy())
            .app_data(state.clone())
            .configure(review_api::configure_routes)
    })
    .bind((settings.bind_addr.as_str(), settings.port))?
    .run()
    .await?;

    Ok(())
}
