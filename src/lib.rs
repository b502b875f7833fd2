//! Recruiter Rater - review platform backend
//!
//! Clients register recruiters, submit ratings and read aggregate and
//! recent reviews. Query strings are bound onto typed parameter structures
//! through per-field descriptor tables, and every review submission folds
//! its score into the recruiter's stored rating aggregate.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{bind, BindError, RatingStrategy, RatingWorkflow, ValidationFailure};
pub use error::ApiError;
pub use models::{RatingAggregate, Recruiter, Review};
