//! # review-api
//!
//! The web routing layer for POS reviews.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::web;

/// Configures the review routes.
///
/// # Developer Note
/// Routes are scoped so the binary can mount the API under a different
/// prefix if needed. `/filter` is registered before `/{id}` so it is not
/// parsed as an id.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index)).service(
        web::scope("/api/reviews")
            .route("", web::post().to(handlers::create_review))
            .route("/filter", web::get().to(handlers::filter_reviews))
            .route("/{id}", web::get().to(handlers::get_review))
            .route("/{id}", web::put().to(handlers::update_review))
            .route("/{id}/approve", web::put().to(handlers::approve_review)),
    );
}
