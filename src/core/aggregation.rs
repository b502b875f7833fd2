use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::core::validation::{self, ValidationFailure};
use crate::models::{RatingAggregate, Review, ReviewPayload};
use crate::services::{RecruiterStore, ReviewStore, StoreError};

/// How a new score is folded into the recruiter's stored aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingStrategy {
    /// Compute the new aggregate from the recruiter read at the start of
    /// the submission and overwrite it. Concurrent submissions for the same
    /// recruiter can lose each other's contribution.
    #[default]
    ReadModifyWrite,
    /// Let the store increment and recompute in one operation
    Atomic,
}

/// Errors produced while submitting a review
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    #[error("Recruiter {0} not found")]
    RecruiterNotFound(Uuid),

    #[error("Failed to load recruiter: {0}")]
    Lookup(#[source] StoreError),

    #[error("Failed to insert review: {0}")]
    Insert(#[source] StoreError),

    /// The review is committed but the recruiter's aggregate is stale
    #[error("Review {review_id} saved but rating update failed: {source}")]
    AggregateUpdate {
        review_id: Uuid,
        #[source]
        source: StoreError,
    },
}

/// Outcome of a successful submission
#[derive(Debug, Clone)]
pub struct SubmittedReview {
    pub review: Review,
    pub aggregate: RatingAggregate,
}

/// Orchestrates review submission: validate, fetch recruiter, insert review,
/// fold the score into the aggregate and persist it.
///
/// The backend calls are separate round trips with no surrounding
/// transaction. If the handler future is dropped between steps, the
/// remaining steps never run.
#[derive(Clone)]
pub struct RatingWorkflow {
    recruiters: Arc<dyn RecruiterStore>,
    reviews: Arc<dyn ReviewStore>,
    strategy: RatingStrategy,
}

impl RatingWorkflow {
    pub fn new(
        recruiters: Arc<dyn RecruiterStore>,
        reviews: Arc<dyn ReviewStore>,
        strategy: RatingStrategy,
    ) -> Self {
        Self {
            recruiters,
            reviews,
            strategy,
        }
    }

    pub fn strategy(&self) -> RatingStrategy {
        self.strategy
    }

    pub async fn submit(&self, payload: &ReviewPayload) -> Result<SubmittedReview, WorkflowError> {
        validation::check(payload)?;

        let recruiter_id = Uuid::parse_str(&payload.recruiter_id)
            .map_err(|_| ValidationFailure::single("recruiterId", "must be a valid uuid"))?;
        let score = payload
            .rating
            .ok_or_else(|| ValidationFailure::single("rating", "is required"))?;

        let recruiter = self
            .recruiters
            .find_by_id(recruiter_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => WorkflowError::RecruiterNotFound(recruiter_id),
                other => WorkflowError::Lookup(other),
            })?;

        let review = self
            .reviews
            .insert(recruiter_id, score, &payload.description)
            .await
            .map_err(WorkflowError::Insert)?;

        let stored = match self.strategy {
            RatingStrategy::ReadModifyWrite => {
                let updated = recruiter.aggregate().with_score(score);
                self.recruiters
                    .update_rating(updated, recruiter_id)
                    .await
                    .map(|_| updated)
            }
            RatingStrategy::Atomic => self.recruiters.apply_rating(recruiter_id, score).await,
        };

        let aggregate = stored.map_err(|source| {
            tracing::error!(
                "Review {} committed for recruiter {} but aggregate is stale: {}",
                review.id,
                recruiter_id,
                source
            );
            WorkflowError::AggregateUpdate {
                review_id: review.id,
                source,
            }
        })?;

        tracing::info!(
            "Recruiter {} now at sum={} count={} ({:?})",
            recruiter_id,
            aggregate.rating_sum,
            aggregate.number_of_ratings,
            self.strategy
        );

        Ok(SubmittedReview { review, aggregate })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recruiter;
    use crate::services::InMemoryStore;
    use chrono::Utc;

    fn seeded_store() -> (Arc<InMemoryStore>, Uuid) {
        let store = Arc::new(InMemoryStore::new());
        let id = Uuid::new_v4();
        store
            .seed_recruiter(Recruiter {
                id,
                created_at: Utc::now(),
                name: "Sam Lee".to_string(),
                first_name: "Sam".to_string(),
                last_name: "Lee".to_string(),
                linkedin_username: "samlee".to_string(),
                job_title: None,
                image_url: None,
                rating: None,
                current_company: None,
                verified: true,
                rating_sum: 0,
                number_of_ratings: 0,
            })
            .unwrap();
        (store, id)
    }

    fn payload(id: &str, rating: i32) -> ReviewPayload {
        ReviewPayload {
            recruiter_id: id.to_string(),
            rating: Some(rating),
            description: "quick replies".to_string(),
        }
    }

    #[test]
    fn test_submit_updates_aggregate() {
        let (store, id) = seeded_store();
        let workflow = RatingWorkflow::new(store.clone(), store.clone(), RatingStrategy::default());

        let submitted = tokio_test::block_on(workflow.submit(&payload(&id.to_string(), 4))).unwrap();

        assert_eq!(submitted.review.rating, 4);
        assert_eq!(submitted.aggregate.rating_sum, 4);
        assert_eq!(submitted.aggregate.number_of_ratings, 1);
    }

    #[test]
    fn test_unknown_recruiter_writes_nothing() {
        let (store, _) = seeded_store();
        let workflow = RatingWorkflow::new(store.clone(), store.clone(), RatingStrategy::Atomic);

        let err = tokio_test::block_on(workflow.submit(&payload(&Uuid::new_v4().to_string(), 3)))
            .unwrap_err();

        assert!(matches!(err, WorkflowError::RecruiterNotFound(_)));
        assert_eq!(store.review_count().unwrap(), 0);
    }

    #[test]
    fn test_malformed_id_is_validation_failure() {
        let (store, _) = seeded_store();
        let workflow = RatingWorkflow::new(store.clone(), store.clone(), RatingStrategy::default());

        let err = tokio_test::block_on(workflow.submit(&payload("nope", 3))).unwrap_err();

        match err {
            WorkflowError::Validation(failure) => assert!(failure.mentions("recruiterId")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
