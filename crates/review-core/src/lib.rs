//! pos-reviews/crates/review-core/src/lib.rs
//!
//! The review lifecycle and approval workflow for points of sale, plus the
//! ports storage plugins implement.

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod service;
pub mod traits;
pub mod validator;

#[cfg(test)]
mod testing;

// Re-exporting for easier access in other crates
pub use config::*;
pub use engine::*;
pub use error::*;
pub use models::*;
pub use service::*;
pub use traits::*;
pub use validator::*;
