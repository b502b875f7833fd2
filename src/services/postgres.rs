use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use crate::config::DatabaseSettings;
use crate::models::{RatingAggregate, Recruiter, RecruiterPayload, Review};
use crate::services::store::{RecruiterStore, ReviewStore, StoreError, SEARCH_LIMIT};

const RECRUITER_COLUMNS: &str = "id, created_at, name, first_name, last_name, linkedin_username, \
     job_title, image_url, rating, current_company, verified, rating_sum, number_of_ratings";

const REVIEW_COLUMNS: &str =
    "id, recruiter_id, created_at, rating, description, thumbs_up_count, thumbs_down_count";

/// PostgreSQL backend for recruiters and reviews
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from settings
    ///
    /// Every connection carries a server-side `statement_timeout`, so a
    /// stuck statement fails the request instead of holding the connection.
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let options = PgConnectOptions::from_str(&settings.url)?.options([(
            "statement_timeout",
            settings.statement_timeout_ms.to_string(),
        )]);

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to PostgreSQL (max: {}, min: {} connections)",
            settings.max_connections,
            settings.min_connections
        );

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn recruiter_from_row(row: &PgRow) -> Result<Recruiter, sqlx::Error> {
    Ok(Recruiter {
        id: row.try_get("id")?,
        created_at: row.try_get("created_at")?,
        name: row.try_get("name")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        linkedin_username: row.try_get("linkedin_username")?,
        job_title: row.try_get("job_title")?,
        image_url: row.try_get("image_url")?,
        rating: row.try_get("rating")?,
        current_company: row.try_get("current_company")?,
        verified: row.try_get("verified")?,
        rating_sum: row.try_get("rating_sum")?,
        number_of_ratings: row.try_get("number_of_ratings")?,
    })
}

fn review_from_row(row: &PgRow) -> Result<Review, sqlx::Error> {
    Ok(Review {
        id: row.try_get("id")?,
        recruiter_id: row.try_get("recruiter_id")?,
        created_at: row.try_get("created_at")?,
        rating: row.try_get("rating")?,
        description: row.try_get("description")?,
        thumbs_up_count: row.try_get("thumbs_up_count")?,
        thumbs_down_count: row.try_get("thumbs_down_count")?,
    })
}

/// Map unique-constraint violations to `Conflict`
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Conflict(db.message().to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl RecruiterStore for PostgresClient {
    async fn find_by_handle(&self, handle: &str) -> Result<Recruiter, StoreError> {
        let query = format!(
            "SELECT {RECRUITER_COLUMNS} FROM recruiters \
             WHERE linkedin_username = $1 AND verified = true"
        );

        let row = sqlx::query(&query)
            .bind(handle)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("recruiter with handle {handle}")))?;

        Ok(recruiter_from_row(&row)?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Recruiter, StoreError> {
        let query = format!(
            "SELECT {RECRUITER_COLUMNS} FROM recruiters \
             WHERE id = $1 AND verified = true"
        );

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("recruiter {id}")))?;

        Ok(recruiter_from_row(&row)?)
    }

    async fn create(&self, payload: &RecruiterPayload) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO recruiters
                (name, first_name, last_name, linkedin_username, job_title, current_company,
                 verified, rating_sum, number_of_ratings)
            VALUES ($1, $2, $3, $4, $5, $6, false, 0, 0)
        "#;

        sqlx::query(query)
            .bind(&payload.name)
            .bind(&payload.first_name)
            .bind(&payload.last_name)
            .bind(&payload.linkedin)
            .bind(&payload.job_title)
            .bind(&payload.current_company)
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        tracing::debug!("Inserted recruiter {}", payload.linkedin);

        Ok(())
    }

    async fn search(&self, term: &str) -> Result<Vec<Recruiter>, StoreError> {
        let query = format!(
            "SELECT {RECRUITER_COLUMNS} FROM recruiters \
             WHERE verified = true \
             AND (linkedin_username ILIKE $1 \
                  OR name ILIKE $1 \
                  OR first_name ILIKE $1 \
                  OR last_name ILIKE $1 \
                  OR current_company ILIKE $1) \
             ORDER BY rating DESC NULLS LAST \
             LIMIT $2"
        );

        let rows = sqlx::query(&query)
            .bind(format!("%{term}%"))
            .bind(SEARCH_LIMIT)
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            return Err(StoreError::NotFound(format!("no recruiters matching {term}")));
        }

        let recruiters = rows
            .iter()
            .map(recruiter_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Search '{}' matched {} recruiters", term, recruiters.len());

        Ok(recruiters)
    }

    async fn update_rating(&self, aggregate: RatingAggregate, id: Uuid) -> Result<(), StoreError> {
        let query = r#"
            UPDATE recruiters
            SET rating_sum = $1, number_of_ratings = $2, rating = $3
            WHERE id = $4
        "#;

        let result = sqlx::query(query)
            .bind(aggregate.rating_sum)
            .bind(aggregate.number_of_ratings)
            .bind(aggregate.rating)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("recruiter {id}")));
        }

        Ok(())
    }

    async fn apply_rating(&self, id: Uuid, score: i32) -> Result<RatingAggregate, StoreError> {
        // Right-hand sides see the row as it was before this UPDATE
        let query = r#"
            UPDATE recruiters
            SET rating_sum = rating_sum + $1,
                number_of_ratings = number_of_ratings + 1,
                rating = ((rating_sum + $1) / (number_of_ratings + 1))::real
            WHERE id = $2
            RETURNING rating_sum, number_of_ratings, rating
        "#;

        let row = sqlx::query(query)
            .bind(score)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("recruiter {id}")))?;

        Ok(RatingAggregate {
            rating_sum: row.try_get("rating_sum")?,
            number_of_ratings: row.try_get("number_of_ratings")?,
            rating: row.try_get("rating")?,
        })
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl ReviewStore for PostgresClient {
    async fn insert(
        &self,
        recruiter_id: Uuid,
        score: i32,
        description: &str,
    ) -> Result<Review, StoreError> {
        let query = format!(
            "INSERT INTO reviews (recruiter_id, rating, description) \
             VALUES ($1, $2, $3) \
             RETURNING {REVIEW_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(recruiter_id)
            .bind(score)
            .bind(description)
            .fetch_one(&self.pool)
            .await?;

        Ok(review_from_row(&row)?)
    }

    async fn list_for_recruiter(&self, recruiter_id: Uuid, limit: i64) -> Result<Vec<Review>, StoreError> {
        let query = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews \
             WHERE recruiter_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2"
        );

        let rows = sqlx::query(&query)
            .bind(recruiter_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let reviews = rows
            .iter()
            .map(review_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Recruiter {} has {} reviews (limit {})", recruiter_id, reviews.len(), limit);

        Ok(reviews)
    }

    async fn list_most_recent(&self, limit: i64) -> Result<Vec<Review>, StoreError> {
        let query = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews \
             ORDER BY created_at DESC \
             LIMIT $1"
        );

        let rows = sqlx::query(&query).bind(limit).fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .map(review_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_lists_match_row_mappers() {
        for column in ["rating_sum", "number_of_ratings", "linkedin_username", "verified"] {
            assert!(RECRUITER_COLUMNS.contains(column), "{column}");
        }
        for column in ["recruiter_id", "thumbs_up_count", "thumbs_down_count"] {
            assert!(REVIEW_COLUMNS.contains(column), "{column}");
        }
    }

    #[test]
    fn test_classify_passes_through_non_database_errors() {
        let err = classify(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }
}
