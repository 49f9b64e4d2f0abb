//! pos-reviews/crates/review-api/src/middleware.rs Middleware
//!
//! Request logging and CORS.

use actix_cors::Cors;
use actix_web::middleware::Logger;

// Outputs: remote-ip "request-line" status-code response-size "referrer" "user-agent" time
pub fn standard_middleware() -> Logger {
    Logger::default()
}

// Browser clients on other origins may read reviews and submit changes.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT"])
        .allowed_header(actix_web::http::header::CONTENT_TYPE)
        .max_age(3600)
}
