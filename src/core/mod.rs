// Core exports
pub mod aggregation;
pub mod binder;
pub mod validation;

pub use aggregation::{RatingStrategy, RatingWorkflow, SubmittedReview, WorkflowError};
pub use binder::{bind, bind_into, BindError, FieldKind, FieldSlot, FieldSpec, QueryParams};
pub use validation::{check, FieldOrder, FieldViolation, ValidationFailure};
