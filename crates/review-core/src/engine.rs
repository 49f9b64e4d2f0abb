//! # ApprovalEngine
//!
//! Owns the derived `approved` flag and the approval action.

use std::sync::Arc;

use log::{debug, info};

use crate::error::{AppError, Result};
use crate::models::{ApprovalState, Review, ReviewId, UserId};
use crate::traits::{ApprovalPolicy, ReviewStore, UserDirectory};

#[derive(Clone)]
pub struct ApprovalEngine {
    policy: Arc<dyn ApprovalPolicy>,
}

impl ApprovalEngine {
    pub fn new(policy: Arc<dyn ApprovalPolicy>) -> Self {
        Self { policy }
    }

    pub fn min_approval_count(&self) -> u32 {
        self.policy.min_approval_count()
    }

    /// Rewrites `approved` from the approval count. The count is untouched.
    pub fn recompute_approval_status(&self, review: Review) -> Review {
        debug!("Updating approval status of review with ID '{:?}'...", review.id);
        let state = ApprovalState::of(review.approval_count, self.min_approval_count());
        Review {
            approved: state.is_approved(),
            ..review
        }
    }

    /// Counts one approval of `review_id` by `user_id` and stores the result.
    ///
    /// Approvals are not deduplicated per user; only the author is excluded.
    pub async fn approve<L>(
        &self,
        store: &mut L,
        review_id: ReviewId,
        user_id: UserId,
    ) -> Result<Review>
    where
        L: UserDirectory + ReviewStore + ?Sized,
    {
        info!(
            "Processing approval request for review with ID '{}' by user with ID '{}'...",
            review_id, user_id
        );

        let user = store
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User", user_id))?;

        let existing = store
            .get_review_by_id(review_id)
            .await?
            .ok_or_else(|| AppError::not_found("Review", review_id))?;

        if existing.author_id == user.id {
            return Err(AppError::Forbidden("self-approval forbidden".into()));
        }

        let approval_count = existing
            .approval_count
            .checked_add(1)
            .ok_or_else(|| AppError::Internal("approval count overflow".into()))?;

        let updated = self.recompute_approval_status(Review {
            approval_count,
            ..existing
        });
        store.upsert_review(updated).await
    }
}
