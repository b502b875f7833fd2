use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::core::binder::{FieldKind, FieldSlot, FieldSpec, QueryParams};
use crate::core::validation::FieldOrder;

/// Query parameters for `GET /recruiter`
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct GetRecruiterParams {
    #[validate(length(min = 1))]
    pub search: String,
    pub url: bool,
}

impl QueryParams for GetRecruiterParams {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("search", FieldKind::Text).external("search"),
        FieldSpec::required("url", FieldKind::Boolean).external("url"),
    ];

    fn slot(&mut self, field: &str) -> Option<FieldSlot<'_>> {
        match field {
            "search" => Some(FieldSlot::Text(&mut self.search)),
            "url" => Some(FieldSlot::Boolean(&mut self.url)),
            _ => None,
        }
    }
}

impl FieldOrder for GetRecruiterParams {
    const ORDER: &'static [(&'static str, &'static str)] = &[("search", "search"), ("url", "url")];
}

/// Query parameters for `GET /reviews`
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct GetReviewsParams {
    #[validate(length(min = 1))]
    pub recruiter_id: String,
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
}

impl QueryParams for GetReviewsParams {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("recruiter_id", FieldKind::Text).external("recruiterId"),
        FieldSpec::required("limit", FieldKind::Integer).external("limit"),
    ];

    fn slot(&mut self, field: &str) -> Option<FieldSlot<'_>> {
        match field {
            "recruiter_id" => Some(FieldSlot::Text(&mut self.recruiter_id)),
            "limit" => Some(FieldSlot::Integer(&mut self.limit)),
            _ => None,
        }
    }
}

impl FieldOrder for GetReviewsParams {
    const ORDER: &'static [(&'static str, &'static str)] =
        &[("recruiter_id", "recruiterId"), ("limit", "limit")];
}

/// Request body for `POST /add-recruiter`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RecruiterPayload {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "must not be empty"))]
    pub name: String,
    #[serde(rename = "firstName", default)]
    #[validate(length(min = 1, max = 255, message = "must not be empty"))]
    pub first_name: String,
    #[serde(rename = "lastName", default)]
    #[validate(length(min = 1, max = 255, message = "must not be empty"))]
    pub last_name: String,
    #[serde(rename = "linkedin", default)]
    #[validate(length(min = 1, max = 255, message = "must not be empty"))]
    pub linkedin: String,
    #[serde(rename = "jobTitle", default)]
    #[validate(length(max = 255))]
    pub job_title: Option<String>,
    #[serde(rename = "currentCompany", default)]
    #[validate(length(max = 255))]
    pub current_company: Option<String>,
}

impl FieldOrder for RecruiterPayload {
    const ORDER: &'static [(&'static str, &'static str)] = &[
        ("name", "name"),
        ("first_name", "firstName"),
        ("last_name", "lastName"),
        ("linkedin", "linkedin"),
        ("job_title", "jobTitle"),
        ("current_company", "currentCompany"),
    ];
}

/// Request body for `POST /reviews`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReviewPayload {
    #[serde(rename = "recruiterId", default)]
    #[validate(custom(function = "validate_identity"))]
    pub recruiter_id: String,
    #[serde(default)]
    #[validate(required(message = "is required"), range(min = 0, max = 5))]
    pub rating: Option<i32>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
}

impl FieldOrder for ReviewPayload {
    const ORDER: &'static [(&'static str, &'static str)] = &[
        ("recruiter_id", "recruiterId"),
        ("rating", "rating"),
        ("description", "description"),
    ];
}

/// Rejects anything that is not a UUID
fn validate_identity(value: &str) -> Result<(), ValidationError> {
    if uuid::Uuid::parse_str(value).is_ok() {
        return Ok(());
    }

    let mut error = ValidationError::new("identity");
    error.message = Some("must be a valid uuid".into());
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::check;

    #[test]
    fn test_review_payload_wire_names() {
        let payload: ReviewPayload = serde_json::from_str(
            r#"{"recruiterId":"8b5d4a36-3f0e-4a8e-9b7c-2f1f3c7f9a10","rating":4,"description":"helpful"}"#,
        )
        .unwrap();

        assert_eq!(payload.recruiter_id, "8b5d4a36-3f0e-4a8e-9b7c-2f1f3c7f9a10");
        assert_eq!(payload.rating, Some(4));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_identity_rejects_garbage() {
        assert!(validate_identity("not-a-uuid").is_err());
        assert!(validate_identity("").is_err());
    }

    #[test]
    fn test_missing_name_defaults_to_empty() {
        let payload: RecruiterPayload = serde_json::from_str(
            r#"{"firstName":"Jane","lastName":"Doe","linkedin":"janedoe"}"#,
        )
        .unwrap();

        assert!(payload.name.is_empty());
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_first_violation_is_first_declared_field() {
        let payload = ReviewPayload {
            recruiter_id: "nope".to_string(),
            rating: Some(9),
            description: "x".repeat(501),
        };
        let failure = check(&payload).unwrap_err();

        let fields: Vec<&str> = failure.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["recruiterId", "rating", "description"]);
        assert!(failure.to_string().starts_with("recruiterId: must be a valid uuid"));
    }

    #[test]
    fn test_recruiter_violations_use_wire_names() {
        let payload = RecruiterPayload {
            name: "Jane Doe".to_string(),
            linkedin: "janedoe".to_string(),
            ..Default::default()
        };
        let failure = check(&payload).unwrap_err();

        let fields: Vec<&str> = failure.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["firstName", "lastName"]);
    }
}
