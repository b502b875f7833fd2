use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while binding query parameters onto a typed structure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("Missing query param: {0}")]
    MissingParameter(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: String, value: String },

    #[error("Unsupported field type for {0}")]
    UnsupportedFieldType(String),
}

/// Primitive kinds a query value can be converted into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
}

/// Declared metadata for one bindable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub external: Option<&'static str>,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            external: None,
            required: true,
            kind,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            external: None,
            required: false,
            kind,
        }
    }

    /// Name of the query key on the wire
    pub const fn external(mut self, key: &'static str) -> Self {
        self.external = Some(key);
        self
    }

    /// Query key used for lookup. Falls back to the field name, which is
    /// rarely what the client sends.
    pub fn key(&self) -> &'static str {
        self.external.unwrap_or(self.name)
    }
}

/// Mutable handle on a field of the destination structure
#[derive(Debug)]
pub enum FieldSlot<'a> {
    Text(&'a mut String),
    Integer(&'a mut i64),
    Boolean(&'a mut bool),
}

/// A structure that can be populated from a flat query map.
///
/// `FIELDS` is the descriptor table walked by [`bind`]; `slot` hands out
/// the typed storage for each declared field name.
pub trait QueryParams: Default {
    const FIELDS: &'static [FieldSpec];

    fn slot(&mut self, field: &str) -> Option<FieldSlot<'_>>;
}

/// Build a `T` from query parameters
pub fn bind<T: QueryParams>(query: &HashMap<String, String>) -> Result<T, BindError> {
    let mut target = T::default();
    bind_into(&mut target, query)?;
    Ok(target)
}

/// Populate `target` in place, field by field in declaration order.
///
/// Fields set before an error stay set; callers must discard `target`
/// when this returns `Err`.
pub fn bind_into<T: QueryParams>(
    target: &mut T,
    query: &HashMap<String, String>,
) -> Result<(), BindError> {
    for spec in T::FIELDS {
        let key = spec.key();

        let value = match query.get(key).filter(|v| !v.is_empty()) {
            Some(value) => value,
            None if spec.required => return Err(BindError::MissingParameter(key.to_string())),
            None => continue,
        };

        let invalid = || BindError::InvalidParameter {
            name: key.to_string(),
            value: value.clone(),
        };

        match (spec.kind, target.slot(spec.name)) {
            (FieldKind::Text, Some(FieldSlot::Text(slot))) => {
                *slot = value.clone();
            }
            (FieldKind::Integer, Some(FieldSlot::Integer(slot))) => {
                *slot = value.parse::<i64>().map_err(|_| invalid())?;
            }
            (FieldKind::Boolean, Some(FieldSlot::Boolean(slot))) => {
                *slot = parse_bool(value).ok_or_else(invalid)?;
            }
            _ => return Err(BindError::UnsupportedFieldType(spec.name.to_string())),
        }
    }

    Ok(())
}

/// Accepts the usual boolean spellings: 1, t, T, TRUE, true, True and
/// their false counterparts
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
