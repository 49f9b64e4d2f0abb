//! Mockall doubles for the lookup ports.

use async_trait::async_trait;
use mockall::mock;

use crate::error::Result;
use crate::models::{Pos, PosId, Review, ReviewId, User, UserId};
use crate::traits::{PosRegistry, ReviewStore, UserDirectory};

// `MockLookups` answers every lookup, like an open transaction does.
mock! {
    pub Lookups {}

    #[async_trait]
    impl UserDirectory for Lookups {
        async fn get_user_by_id(&mut self, id: UserId) -> Result<Option<User>>;
    }

    #[async_trait]
    impl PosRegistry for Lookups {
        async fn get_pos_by_id(&mut self, id: PosId) -> Result<Option<Pos>>;
    }

    #[async_trait]
    impl ReviewStore for Lookups {
        async fn get_review_by_id(&mut self, id: ReviewId) -> Result<Option<Review>>;
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
        async fn upsert_review(&mut self, review: Review) -> Result<Review>;
    }
}
