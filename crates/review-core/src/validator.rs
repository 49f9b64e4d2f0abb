//! # ReviewValidator
//!
//! Gate in front of every upsert. References are re-resolved through the
//! lookup ports; identifiers embedded in the candidate are never trusted
//! beyond being keys for those lookups.

use log::debug;

use crate::error::{AppError, Result};
use crate::models::{Review, ReviewCandidate};
use crate::traits::{PosRegistry, ReviewStore, UserDirectory};

#[derive(Debug, Default, Clone, Copy)]
pub struct ReviewValidator;

impl ReviewValidator {
    pub fn new() -> Self {
        Self
    }

    /// Checks author, POS, uniqueness and approval count, then builds the
    /// review to be stored. Performs reads only.
    ///
    /// A new review always starts with zero approvals, whatever count the
    /// candidate claims. For an edit (candidate carries an id) the stored
    /// row's approval count, creation time and version are kept; the caller
    /// only changes text and target.
    pub async fn validate_and_prepare<L>(
        &self,
        lookups: &mut L,
        candidate: ReviewCandidate,
    ) -> Result<Review>
    where
        L: UserDirectory + PosRegistry + ReviewStore + ?Sized,
    {
        let author_id = candidate
            .author_id
            .ok_or_else(|| AppError::InvalidInput("missing author".into()))?;
        let author = lookups
            .get_user_by_id(author_id)
            .await?
            .ok_or_else(|| AppError::not_found("User", author_id))?;

        let pos_id = candidate
            .pos_id
            .ok_or_else(|| AppError::InvalidInput("missing POS".into()))?;
        let pos = lookups
            .get_pos_by_id(pos_id)
            .await?
            .ok_or_else(|| AppError::not_found("POS", pos_id))?;

        let existing = lookups
            .find_reviews_by_pos_and_author(pos.id, author.id)
            .await?;
        let conflict = match candidate.id {
            None => !existing.is_empty(),
            Some(id) => existing.iter().any(|r| r.id != Some(id)),
        };
        if conflict {
            debug!("User {} already reviewed POS {}", author.id, pos.id);
            return Err(AppError::Conflict("duplicate review".into()));
        }

        if candidate.approval_count.is_none() {
            return Err(AppError::InvalidInput("invalid approval count".into()));
        }

        if candidate.text.trim().is_empty() {
            return Err(AppError::InvalidInput("review text must not be empty".into()));
        }

        let Some(id) = candidate.id else {
            return Ok(Review {
                id: None,
                created_at: None,
                updated_at: None,
                pos_id: pos.id,
                author_id: author.id,
                text: candidate.text,
                approval_count: 0,
                approved: false,
                version: 0,
            });
        };

        let stored = match existing.into_iter().find(|r| r.id == Some(id)) {
            Some(review) => review,
            None => lookups
                .get_review_by_id(id)
                .await?
                .ok_or_else(|| AppError::not_found("Review", id))?,
        };
        if stored.author_id != author.id {
            return Err(AppError::Forbidden(
                "review belongs to another author".into(),
            ));
        }

        Ok(Review {
            pos_id: pos.id,
            text: candidate.text,
            ..stored
        })
    }
}
