//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.
//! Lookups take `&mut self` because they run on an open transaction.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Pos, PosId, Review, ReviewId, User, UserId};

/// Read access to the external user registry.
#[async_trait]
pub trait UserDirectory: Send {
    async fn get_user_by_id(&mut self, id: UserId) -> Result<Option<User>>;
}

/// Read access to the external POS registry.
#[async_trait]
pub trait PosRegistry: Send {
    async fn get_pos_by_id(&mut self, id: PosId) -> Result<Option<Pos>>;
}

/// Review queries and persistence.
#[async_trait]
pub trait ReviewStore: Send {
    async fn get_review_by_id(&mut self, id: ReviewId) -> Result<Option<Review>>;

    /// Every review the author wrote for the POS. Normally zero or one row.
    async fn find_reviews_by_pos_and_author(
        &mut self,
        pos_id: PosId,
        author_id: UserId,
    ) -> Result<Vec<Review>>;

    async fn find_reviews_by_pos_and_approved(
        &mut self,
        pos_id: PosId,
        approved: bool,
    ) -> Result<Vec<Review>>;

    /// Inserts when `review.id` is `None` (assigning id and timestamps),
    /// otherwise updates the row whose id and version match.
    ///
    /// A version mismatch or a second row for the same (author, POS) pair
    /// must be reported as `AppError::Conflict`.
    async fn upsert_review(&mut self, review: Review) -> Result<Review>;
}

/// One atomic unit of work against the store.
///
/// Reads and the final write of an operation run on the same transaction.
/// Dropping it without calling `commit` rolls everything back.
#[async_trait]
pub trait ReviewTx: UserDirectory + PosRegistry + ReviewStore {
    async fn commit(self: Box<Self>) -> Result<()>;
}

/// Entry point of a storage plugin.
#[async_trait]
pub trait ReviewRepo: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn ReviewTx>>;
}

/// Source of the approval quorum.
pub trait ApprovalPolicy: Send + Sync {
    /// Minimum number of approvals for a review to count as approved. Never 0.
    fn min_approval_count(&self) -> u32;
}
