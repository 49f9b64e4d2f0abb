//! # review-store-memory
//!
//! In-process implementation of `ReviewRepo`.
//! A transaction holds the store lock from `begin` until it is committed or
//! dropped, so operations are fully serialized. Writes go to a staged copy
//! that only replaces the live tables on commit.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use review_core::error::{AppError, Result};
use review_core::models::{Pos, PosId, Review, ReviewId, User, UserId};
use review_core::traits::{PosRegistry, ReviewRepo, ReviewStore, ReviewTx, UserDirectory};
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default, Clone)]
struct Tables {
    users: HashMap<UserId, User>,
    pos: HashMap<PosId, Pos>,
    reviews: HashMap<ReviewId, Review>,
}

#[derive(Debug, Default, Clone)]
pub struct MemoryReviewRepo {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryReviewRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user so reviews and approvals can reference it.
    pub async fn create_user(&self, login_name: &str) -> User {
        let user = User {
            id: UserId::new(),
            login_name: login_name.to_string(),
            created_at: Utc::now(),
        };
        self.tables.lock().await.users.insert(user.id, user.clone());
        user
    }

    /// Registers a point of sale.
    pub async fn create_pos(&self, name: &str) -> Pos {
        let pos = Pos {
            id: PosId::new(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.tables.lock().await.pos.insert(pos.id, pos.clone());
        pos
    }

    /// Number of committed reviews.
    pub async fn review_count(&self) -> usize {
        self.tables.lock().await.reviews.len()
    }
}

#[async_trait]
impl ReviewRepo for MemoryReviewRepo {
    async fn begin(&self) -> Result<Box<dyn ReviewTx>> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let staged = (*guard).clone();
        Ok(Box::new(MemoryTx { guard, staged }))
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
}

impl MemoryTx {
    fn pair_taken_by_other(&self, review: &Review) -> bool {
        self.staged.reviews.values().any(|r| {
            r.pos_id == review.pos_id && r.author_id == review.author_id && r.id != review.id
        })
    }
}

#[async_trait]
impl UserDirectory for MemoryTx {
    async fn get_user_by_id(&mut self, id: UserId) -> Result<Option<User>> {
        Ok(self.staged.users.get(&id).cloned())
    }
}

#[async_trait]
impl PosRegistry for MemoryTx {
    async fn get_pos_by_id(&mut self, id: PosId) -> Result<Option<Pos>> {
        Ok(self.staged.pos.get(&id).cloned())
    }
}

#[async_trait]
impl ReviewStore for MemoryTx {
    async fn get_review_by_id(&mut self, id: ReviewId) -> Result<Option<Review>> {
        Ok(self.staged.reviews.get(&id).cloned())
    }

    async fn find_reviews_by_pos_and_author(
        &mut self,
        pos_id: PosId,
        author_id: UserId,
    ) -> Result<Vec<Review>> {
        Ok(self
            .staged
            .reviews
            .values()
            .filter(|r| r.pos_id == pos_id && r.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn find_reviews_by_pos_and_approved(
        &mut self,
        pos_id: PosId,
        approved: bool,
    ) -> Result<Vec<Review>> {
        Ok(self
            .staged
            .reviews
            .values()
            .filter(|r| r.pos_id == pos_id && r.approved == approved)
            .cloned()
            .collect())
    }

    async fn upsert_review(&mut self, review: Review) -> Result<Review> {
        if self.pair_taken_by_other(&review) {
            return Err(AppError::Conflict("duplicate review".into()));
        }

        let now = Utc::now();
        let stored = match review.id {
            None => Review {
                id: Some(ReviewId::new()),
                created_at: Some(now),
                updated_at: Some(now),
                version: 1,
                ..review
            },
            Some(id) => {
                let current = self
                    .staged
                    .reviews
                    .get(&id)
                    .ok_or_else(|| AppError::not_found("Review", id))?;
                if current.version != review.version {
                    return Err(AppError::Conflict(format!(
                        "review {id} was modified concurrently"
                    )));
                }
                Review {
                    created_at: current.created_at,
                    updated_at: Some(now),
                    version: current.version + 1,
                    ..review
                }
            }
        };

        log::debug!("Staged review {:?} at version {}", stored.id, stored.version);
        if let Some(id) = stored.id {
            self.staged.reviews.insert(id, stored.clone());
        }
        Ok(stored)
    }
}

#[async_trait]
impl ReviewTx for MemoryTx {
    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTx { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
