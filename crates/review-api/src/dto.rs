//! Request and response bodies of the review endpoints.

use chrono::{DateTime, Utc};
use review_core::models::{PosId, Review, ReviewCandidate, ReviewId, UserId};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/reviews` and `PUT /api/reviews/{id}`.
///
/// Clients cannot send an approval count or flag; both are server-owned.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewRequest {
    pub pos_id: Option<PosId>,
    pub author_id: Option<UserId>,
    #[serde(default)]
    pub review: String,
}

impl ReviewRequest {
    pub fn into_candidate(self, id: Option<ReviewId>) -> ReviewCandidate {
        ReviewCandidate {
            id,
            pos_id: self.pos_id,
            author_id: self.author_id,
            text: self.review,
            approval_count: Some(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReviewDto {
    pub id: Option<ReviewId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pos_id: PosId,
    pub author_id: UserId,
    pub review: String,
    pub approval_count: u32,
    pub approved: bool,
}

impl From<Review> for ReviewDto {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            created_at: review.created_at,
            updated_at: review.updated_at,
            pos_id: review.pos_id,
            author_id: review.author_id,
            review: review.text,
            approval_count: review.approval_count,
            approved: review.approved,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    pub pos_id: PosId,
    pub approved: bool,
}

#[derive(Debug, Deserialize)]
pub struct ApproveQuery {
    pub user_id: UserId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}
