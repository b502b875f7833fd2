use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{RatingAggregate, Recruiter, RecruiterPayload, Review};

/// Maximum number of rows a recruiter search returns
pub const SEARCH_LIMIT: i64 = 50;

/// Errors that can occur when talking to a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("SQLx error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Persistence operations over recruiter records.
///
/// Reads only ever see verified recruiters.
#[async_trait]
pub trait RecruiterStore: Send + Sync {
    async fn find_by_handle(&self, handle: &str) -> Result<Recruiter, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Recruiter, StoreError>;

    /// Insert an unverified recruiter with an empty aggregate
    async fn create(&self, payload: &RecruiterPayload) -> Result<(), StoreError>;

    /// Case-insensitive substring search, best rated first. An empty result
    /// is reported as `NotFound`.
    async fn search(&self, term: &str) -> Result<Vec<Recruiter>, StoreError>;

    /// Overwrite the aggregate fields of one recruiter
    async fn update_rating(&self, aggregate: RatingAggregate, id: Uuid) -> Result<(), StoreError>;

    /// Fold `score` into the stored aggregate in a single backend operation
    async fn apply_rating(&self, id: Uuid, score: i32) -> Result<RatingAggregate, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

/// Persistence operations over reviews
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert(
        &self,
        recruiter_id: Uuid,
        score: i32,
        description: &str,
    ) -> Result<Review, StoreError>;

    /// Newest first
    async fn list_for_recruiter(&self, recruiter_id: Uuid, limit: i64) -> Result<Vec<Review>, StoreError>;

    /// Newest first across all recruiters
    async fn list_most_recent(&self, limit: i64) -> Result<Vec<Review>, StoreError>;
}
