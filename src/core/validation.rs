use serde::Serialize;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Constraint violations found on a populated structure, in field
/// declaration order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.violations))]
pub struct ValidationFailure {
    pub violations: Vec<FieldViolation>,
}

/// Declared fields of a validated structure as `(field name, wire name)`
/// pairs, in declaration order
pub trait FieldOrder {
    const ORDER: &'static [(&'static str, &'static str)];
}

impl ValidationFailure {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    /// The violation reported first
    pub fn first(&self) -> Option<&FieldViolation> {
        self.violations.first()
    }

    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Collect violations, renaming fields to their wire names and ordering
    /// them as declared. Fields missing from `order` go last.
    pub fn from_errors(errors: &ValidationErrors, order: &[(&str, &str)]) -> Self {
        let mut ranked: Vec<(usize, FieldViolation)> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let key = field.to_string();
                let (rank, wire) = order
                    .iter()
                    .position(|(name, wire)| *name == key || *wire == key)
                    .map(|i| (i, order[i].1.to_string()))
                    .unwrap_or((order.len(), key));

                errs.iter().map(move |err| {
                    (
                        rank,
                        FieldViolation {
                            field: wire.clone(),
                            message: describe(err),
                        },
                    )
                })
            })
            .collect();

        // Stable, so several errors on one field keep their order
        ranked.sort_by_key(|(rank, _)| *rank);

        Self {
            violations: ranked.into_iter().map(|(_, v)| v).collect(),
        }
    }
}

/// Run the declared constraints of `value`
pub fn check<T: Validate + FieldOrder>(value: &T) -> Result<(), ValidationFailure> {
    value
        .validate()
        .map_err(|errors| ValidationFailure::from_errors(&errors, T::ORDER))
}

fn render(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe(err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }

    let param = |key: &str| err.params.get(key).map(|v| v.to_string());

    match &*err.code {
        "required" => "is required".to_string(),
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("length must be between {min} and {max}"),
            (Some(min), None) => format!("length must be at least {min}"),
            (None, Some(max)) => format!("length must be at most {max}"),
            (None, None) => "has an invalid length".to_string(),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("must be between {min} and {max}"),
            (Some(min), None) => format!("must be at least {min}"),
            (None, Some(max)) => format!("must be at most {max}"),
            (None, None) => "is out of range".to_string(),
        },
        code => format!("failed {code} check"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Validate)]
    struct Sample {
        #[validate(length(min = 1))]
        title: String,
        #[validate(range(min = 0, max = 5))]
        score: i32,
        #[validate(length(max = 3))]
        note: String,
    }

    impl FieldOrder for Sample {
        const ORDER: &'static [(&'static str, &'static str)] =
            &[("title", "title"), ("score", "score"), ("note", "noteText")];
    }

    #[test]
    fn test_valid_structure_passes() {
        let sample = Sample {
            title: "ok".to_string(),
            score: 5,
            note: "abc".to_string(),
        };
        assert!(check(&sample).is_ok());
    }

    #[test]
    fn test_violations_follow_declaration_order() {
        let sample = Sample {
            title: String::new(),
            score: 9,
            note: "abcd".to_string(),
        };
        let failure = check(&sample).unwrap_err();

        let fields: Vec<&str> = failure.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "score", "noteText"]);
        assert_eq!(failure.first().unwrap().field, "title");
    }

    #[test]
    fn test_message_names_field() {
        let sample = Sample {
            title: "ok".to_string(),
            score: -1,
            note: String::new(),
        };
        let failure = check(&sample).unwrap_err();

        assert!(failure.mentions("score"));
        assert_eq!(failure.violations.len(), 1);
        assert!(failure.to_string().starts_with("score: must be between"));
    }
}
