//! # ReviewService
//!
//! Runs every operation inside one store transaction: validate, recompute,
//! persist, commit. Any error drops the transaction, which rolls it back.

use std::sync::Arc;

use log::{info, warn};

use crate::engine::ApprovalEngine;
use crate::error::{AppError, Result};
use crate::models::{PosId, Review, ReviewCandidate, ReviewId, UserId};
use crate::traits::{ApprovalPolicy, PosRegistry, ReviewRepo, ReviewStore};
use crate::validator::ReviewValidator;

#[derive(Clone)]
pub struct ReviewService {
    repo: Arc<dyn ReviewRepo>,
    validator: ReviewValidator,
    engine: ApprovalEngine,
}

impl ReviewService {
    pub fn new(repo: Arc<dyn ReviewRepo>, policy: Arc<dyn ApprovalPolicy>) -> Self {
        Self {
            repo,
            validator: ReviewValidator::new(),
            engine: ApprovalEngine::new(policy),
        }
    }

    /// Creates a review (candidate without id) or edits the author's own one.
    pub async fn upsert_review(&self, candidate: ReviewCandidate) -> Result<Review> {
        let mut tx = self.repo.begin().await?;

        let prepared = self
            .validator
            .validate_and_prepare(&mut *tx, candidate)
            .await
            .inspect_err(|e| warn!("Rejected review upsert: {e}"))?;
        let review = self.engine.recompute_approval_status(prepared);
        let stored = tx.upsert_review(review).await?;

        tx.commit().await?;
        info!("Stored review {:?} (approved: {})", stored.id, stored.approved);
        Ok(stored)
    }

    /// Adds one approval by `user_id` to the review.
    pub async fn approve_review(&self, review_id: ReviewId, user_id: UserId) -> Result<Review> {
        let mut tx = self.repo.begin().await?;

        let stored = self
            .engine
            .approve(&mut *tx, review_id, user_id)
            .await
            .inspect_err(|e| warn!("Rejected approval of review {review_id}: {e}"))?;

        tx.commit().await?;
        Ok(stored)
    }

    pub async fn get_review(&self, review_id: ReviewId) -> Result<Review> {
        let mut tx = self.repo.begin().await?;
        let review = tx
            .get_review_by_id(review_id)
            .await?
            .ok_or_else(|| AppError::not_found("Review", review_id))?;
        tx.commit().await?;
        Ok(review)
    }

    /// Reviews of one POS that are (or are not yet) approved.
    pub async fn list_reviews(&self, pos_id: PosId, approved: bool) -> Result<Vec<Review>> {
        let mut tx = self.repo.begin().await?;
        let pos = tx
            .get_pos_by_id(pos_id)
            .await?
            .ok_or_else(|| AppError::not_found("POS", pos_id))?;
        let reviews = tx.find_reviews_by_pos_and_approved(pos.id, approved).await?;
        tx.commit().await?;
        Ok(reviews)
    }
}
