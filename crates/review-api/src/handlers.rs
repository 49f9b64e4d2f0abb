//! # review-api Handlers
//!
//! This module coordinates the flow between HTTP requests and `ReviewService`.

use actix_web::{web, HttpResponse};
use review_core::models::ReviewId;
use review_core::service::ReviewService;

use crate::dto::{ApproveQuery, FilterQuery, ReviewDto, ReviewRequest};
use crate::error::ApiError;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub service: ReviewService,
}

/// Creates a review. The body must not reference an existing review.
pub async fn create_review(
    data: web::Data<AppState>,
    body: web::Json<ReviewRequest>,
) -> Result<HttpResponse, ApiError> {
    let candidate = body.into_inner().into_candidate(None);
    let stored = data.service.upsert_review(candidate).await?;
    Ok(HttpResponse::Created().json(ReviewDto::from(stored)))
}

/// Edits the text (or target) of an existing review.
pub async fn update_review(
    data: web::Data<AppState>,
    path: web::Path<ReviewId>,
    body: web::Json<ReviewRequest>,
) -> Result<HttpResponse, ApiError> {
    let candidate = body.into_inner().into_candidate(Some(path.into_inner()));
    let stored = data.service.upsert_review(candidate).await?;
    Ok(HttpResponse::Ok().json(ReviewDto::from(stored)))
}

pub async fn get_review(
    data: web::Data<AppState>,
    path: web::Path<ReviewId>,
) -> Result<HttpResponse, ApiError> {
    let review = data.service.get_review(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ReviewDto::from(review)))
}

/// Lists reviews of a POS by approval state (e.g. `?pos_id=..&approved=true`).
pub async fn filter_reviews(
    data: web::Data<AppState>,
    query: web::Query<FilterQuery>,
) -> Result<HttpResponse, ApiError> {
    let FilterQuery { pos_id, approved } = query.into_inner();
    let reviews: Vec<ReviewDto> = data
        .service
        .list_reviews(pos_id, approved)
        .await?
        .into_iter()
        .map(ReviewDto::from)
        .collect();
    Ok(HttpResponse::Ok().json(reviews))
}

/// Records one approval of the review by `?user_id=`.
pub async fn approve_review(
    data: web::Data<AppState>,
    path: web::Path<ReviewId>,
    query: web::Query<ApproveQuery>,
) -> Result<HttpResponse, ApiError> {
    let review = data
        .service
        .approve_review(path.into_inner(), query.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(ReviewDto::from(review)))
}

/// Plain-text banner at `/`, used by load balancers to check the server is up.
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().body("POS reviews API. See /api/reviews")
}
