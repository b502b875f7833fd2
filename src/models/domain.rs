use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recruiter profile with its denormalized rating aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recruiter {
    pub id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub name: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "linkedinUsername")]
    pub linkedin_username: String,
    #[serde(rename = "jobTitle")]
    pub job_title: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub rating: Option<f32>,
    #[serde(rename = "currentCompany")]
    pub current_company: Option<String>,
    pub verified: bool,
    pub rating_sum: i32,
    pub number_of_ratings: i32,
}

impl Recruiter {
    /// Current aggregate fields as a standalone value
    pub fn aggregate(&self) -> RatingAggregate {
        RatingAggregate {
            rating_sum: self.rating_sum,
            number_of_ratings: self.number_of_ratings,
            rating: self.rating,
        }
    }
}

/// A single review left for a recruiter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    #[serde(rename = "recruiterId")]
    pub recruiter_id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub rating: i32,
    pub description: String,
    #[serde(rename = "thumbsUpCount")]
    pub thumbs_up_count: i32,
    #[serde(rename = "thumbsDownCount")]
    pub thumbs_down_count: i32,
}

/// Running rating of a recruiter: sum, count and the whole-number average
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingAggregate {
    pub rating_sum: i32,
    pub number_of_ratings: i32,
    pub rating: Option<f32>,
}

impl RatingAggregate {
    /// Fold one more score into the aggregate.
    ///
    /// The average is the truncated integer quotient `sum / count`, stored
    /// as a float to match the `rating` column.
    pub fn with_score(&self, score: i32) -> Self {
        let number_of_ratings = self.number_of_ratings + 1;
        let rating_sum = self.rating_sum + score;

        Self {
            rating_sum,
            number_of_ratings,
            rating: Some((rating_sum / number_of_ratings) as f32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_score_from_empty() {
        let aggregate = RatingAggregate::default().with_score(4);
        assert_eq!(aggregate.rating_sum, 4);
        assert_eq!(aggregate.number_of_ratings, 1);
        assert_eq!(aggregate.rating, Some(4.0));
    }

    #[test]
    fn test_with_score_truncates_average() {
        let aggregate = RatingAggregate::default().with_score(5).with_score(2);
        // 7 / 2 truncates to 3
        assert_eq!(aggregate.rating, Some(3.0));
    }
}
