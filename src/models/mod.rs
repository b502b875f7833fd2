// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{RatingAggregate, Recruiter, Review};
pub use requests::{GetRecruiterParams, GetReviewsParams, RecruiterPayload, ReviewPayload};
pub use responses::{ApiResponse, HealthResponse, ResponseStatus};
