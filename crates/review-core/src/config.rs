//! Approval quorum configuration.

use std::num::NonZeroU32;

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::traits::ApprovalPolicy;

/// Configured quorum. A threshold of zero is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u32")]
pub struct ApprovalConfig {
    min_count: NonZeroU32,
}

impl ApprovalConfig {
    pub fn new(min_count: u32) -> Result<Self> {
        NonZeroU32::new(min_count)
            .map(|min_count| Self { min_count })
            .ok_or_else(|| {
                AppError::InvalidInput("minimum approval count must be greater than 0".into())
            })
    }

    pub fn min_count(&self) -> u32 {
        self.min_count.get()
    }
}

impl TryFrom<u32> for ApprovalConfig {
    type Error = AppError;

    fn try_from(min_count: u32) -> Result<Self> {
        Self::new(min_count)
    }
}

impl ApprovalPolicy for ApprovalConfig {
    fn min_approval_count(&self) -> u32 {
        self.min_count()
    }
}
