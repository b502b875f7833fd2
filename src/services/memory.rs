//! In-memory store backend
//!
//! Implements both store traits over lock-guarded vectors. Used by the test
//! suites and benchmarks; all data is lost when the value is dropped.

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::sync::RwLock;
use uuid::Uuid;

use crate::models::{RatingAggregate, Recruiter, RecruiterPayload, Review};
use crate::services::store::{RecruiterStore, ReviewStore, StoreError, SEARCH_LIMIT};

#[derive(Default)]
pub struct InMemoryStore {
    recruiters: RwLock<Vec<Recruiter>>,
    // Insertion order, oldest first
    reviews: RwLock<Vec<Review>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a recruiter as-is, bypassing `create`
    pub fn seed_recruiter(&self, recruiter: Recruiter) -> Result<(), StoreError> {
        self.recruiters
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .push(recruiter);
        Ok(())
    }

    /// Mark the recruiter with `handle` as verified, returning its id
    pub fn verify(&self, handle: &str) -> Result<Option<Uuid>, StoreError> {
        let mut recruiters = self.recruiters.write().map_err(|_| StoreError::Poisoned)?;

        Ok(recruiters
            .iter_mut()
            .find(|r| r.linkedin_username == handle)
            .map(|r| {
                r.verified = true;
                r.id
            }))
    }

    pub fn review_count(&self) -> Result<usize, StoreError> {
        Ok(self.reviews.read().map_err(|_| StoreError::Poisoned)?.len())
    }

    fn find_verified<F>(&self, predicate: F) -> Result<Option<Recruiter>, StoreError>
    where
        F: Fn(&Recruiter) -> bool,
    {
        let recruiters = self.recruiters.read().map_err(|_| StoreError::Poisoned)?;
        Ok(recruiters
            .iter()
            .find(|r| r.verified && predicate(r))
            .cloned())
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Rating descending, unrated recruiters last
fn by_rating_desc(a: &Recruiter, b: &Recruiter) -> Ordering {
    match (a.rating, b.rating) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl RecruiterStore for InMemoryStore {
    async fn find_by_handle(&self, handle: &str) -> Result<Recruiter, StoreError> {
        self.find_verified(|r| r.linkedin_username == handle)?
            .ok_or_else(|| StoreError::NotFound(format!("recruiter with handle {handle}")))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Recruiter, StoreError> {
        self.find_verified(|r| r.id == id)?
            .ok_or_else(|| StoreError::NotFound(format!("recruiter {id}")))
    }

    async fn create(&self, payload: &RecruiterPayload) -> Result<(), StoreError> {
        let mut recruiters = self.recruiters.write().map_err(|_| StoreError::Poisoned)?;

        if recruiters.iter().any(|r| r.linkedin_username == payload.linkedin) {
            return Err(StoreError::Conflict(format!(
                "linkedin_username {} already exists",
                payload.linkedin
            )));
        }

        recruiters.push(Recruiter {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            name: payload.name.clone(),
            first_name: payload.first_name.clone(),
            last_name: payload.last_name.clone(),
            linkedin_username: payload.linkedin.clone(),
            job_title: payload.job_title.clone(),
            image_url: None,
            rating: None,
            current_company: payload.current_company.clone(),
            verified: false,
            rating_sum: 0,
            number_of_ratings: 0,
        });

        Ok(())
    }

    async fn search(&self, term: &str) -> Result<Vec<Recruiter>, StoreError> {
        let needle = term.to_lowercase();
        let recruiters = self.recruiters.read().map_err(|_| StoreError::Poisoned)?;

        let mut matches: Vec<Recruiter> = recruiters
            .iter()
            .filter(|r| r.verified)
            .filter(|r| {
                contains_ignore_case(&r.linkedin_username, &needle)
                    || contains_ignore_case(&r.name, &needle)
                    || contains_ignore_case(&r.first_name, &needle)
                    || contains_ignore_case(&r.last_name, &needle)
                    || r.current_company
                        .as_deref()
                        .is_some_and(|c| contains_ignore_case(c, &needle))
            })
            .cloned()
            .collect();

        if matches.is_empty() {
            return Err(StoreError::NotFound(format!("no recruiters matching {term}")));
        }

        matches.sort_by(by_rating_desc);
        matches.truncate(SEARCH_LIMIT as usize);

        Ok(matches)
    }

    async fn update_rating(&self, aggregate: RatingAggregate, id: Uuid) -> Result<(), StoreError> {
        let mut recruiters = self.recruiters.write().map_err(|_| StoreError::Poisoned)?;

        let recruiter = recruiters
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("recruiter {id}")))?;

        recruiter.rating_sum = aggregate.rating_sum;
        recruiter.number_of_ratings = aggregate.number_of_ratings;
        recruiter.rating = aggregate.rating;

        Ok(())
    }

    async fn apply_rating(&self, id: Uuid, score: i32) -> Result<RatingAggregate, StoreError> {
        let mut recruiters = self.recruiters.write().map_err(|_| StoreError::Poisoned)?;

        let recruiter = recruiters
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("recruiter {id}")))?;

        let updated = recruiter.aggregate().with_score(score);
        recruiter.rating_sum = updated.rating_sum;
        recruiter.number_of_ratings = updated.number_of_ratings;
        recruiter.rating = updated.rating;

        Ok(updated)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(!self.recruiters.is_poisoned() && !self.reviews.is_poisoned())
    }
}

#[async_trait]
impl ReviewStore for InMemoryStore {
    async fn insert(
        &self,
        recruiter_id: Uuid,
        score: i32,
        description: &str,
    ) -> Result<Review, StoreError> {
        let review = Review {
            id: Uuid::new_v4(),
            recruiter_id,
            created_at: Utc::now(),
            rating: score,
            description: description.to_string(),
            thumbs_up_count: 0,
            thumbs_down_count: 0,
        };

        self.reviews
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .push(review.clone());

        Ok(review)
    }

    async fn list_for_recruiter(&self, recruiter_id: Uuid, limit: i64) -> Result<Vec<Review>, StoreError> {
        let reviews = self.reviews.read().map_err(|_| StoreError::Poisoned)?;

        Ok(reviews
            .iter()
            .rev()
            .filter(|r| r.recruiter_id == recruiter_id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_most_recent(&self, limit: i64) -> Result<Vec<Review>, StoreError> {
        let reviews = self.reviews.read().map_err(|_| StoreError::Poisoned)?;

        Ok(reviews
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}
