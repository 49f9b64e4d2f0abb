//! # Domain Models
//!
//! Users and points of sale are owned by external registries; a review only
//! holds their identifiers. We use UUID v7 for time-ordered identification.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id!(
    /// Identifier of a user in the external user registry.
    UserId
);
entity_id!(
    /// Identifier of a point of sale in the external POS registry.
    PosId
);
entity_id!(ReviewId);

/// A registered user. Only its existence matters to review management.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub login_name: String,
    pub created_at: DateTime<Utc>,
}

/// A point of sale (café, vending machine, ...) that can be reviewed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pos {
    pub id: PosId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One user's review of one POS.
///
/// `approved` is derived from `approval_count` by the approval engine and is
/// rewritten on every mutation; nothing else assigns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// `None` until the store assigns one on first insert.
    pub id: Option<ReviewId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pos_id: PosId,
    pub author_id: UserId,
    pub text: String,
    pub approval_count: u32,
    pub approved: bool,
    /// Optimistic concurrency token, bumped by the store on every write.
    pub version: i64,
}

impl Review {
    pub fn state(&self) -> ApprovalState {
        if self.approved {
            ApprovalState::Approved
        } else {
            ApprovalState::Pending
        }
    }
}

/// Caller-supplied review data for an upsert.
///
/// References are optional because they arrive from outside and have not
/// been resolved yet. The approval flag is absent on purpose.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReviewCandidate {
    pub id: Option<ReviewId>,
    pub pos_id: Option<PosId>,
    pub author_id: Option<UserId>,
    pub text: String,
    pub approval_count: Option<u32>,
}

impl ReviewCandidate {
    /// A fresh review: no id yet and zero approvals.
    pub fn new(pos_id: PosId, author_id: UserId, text: impl Into<String>) -> Self {
        Self {
            id: None,
            pos_id: Some(pos_id),
            author_id: Some(author_id),
            text: text.into(),
            approval_count: Some(0),
        }
    }

    /// An edit of an already stored review.
    pub fn edit(id: ReviewId, pos_id: PosId, author_id: UserId, text: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            ..Self::new(pos_id, author_id, text)
        }
    }
}

/// Approval state of a review. There is no transition back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalState {
    Pending,
    Approved,
}

impl ApprovalState {
    /// Quorum rule: approved once the count reaches the threshold.
    pub fn of(approval_count: u32, min_approval_count: u32) -> Self {
        if approval_count >= min_approval_count {
            ApprovalState::Approved
        } else {
            ApprovalState::Pending
        }
    }

    pub fn is_approved(self) -> bool {
        self == ApprovalState::Approved
    }
}
