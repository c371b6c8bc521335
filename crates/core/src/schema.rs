//! Declarative validation for JSON request bodies.
//!
//! A [`Schema`] is an ordered list of [`FieldRule`]s evaluated generically
//! against a `serde_json::Value`. Declared fields are checked in declaration
//! order and then any undeclared keys are reported, so the first violation is
//! always the one a caller sees.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// Label used when the body itself, rather than a field, is at fault.
const ROOT_LABEL: &str = "value";

/// Schema accepted by the create and update course operations.
pub const COURSE_SCHEMA: Schema =
    Schema::new(&[FieldRule::string("name").required().min_length(3)]);

/// Constraints applied to a single string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    name: &'static str,
    required: bool,
    min_length: Option<usize>,
}

impl FieldRule {
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            min_length: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Minimum length measured in UTF-16 code units.
    pub const fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    fn check(&self, value: Option<&Value>) -> Option<ViolationKind> {
        let Some(value) = value else {
            return self.required.then_some(ViolationKind::Required);
        };

        let Value::String(text) = value else {
            return Some(ViolationKind::NotAString);
        };

        if text.is_empty() {
            return Some(ViolationKind::Empty);
        }

        match self.min_length {
            Some(min) if text.encode_utf16().count() < min => {
                Some(ViolationKind::TooShort { min })
            }
            _ => None,
        }
    }
}

/// Ordered set of field rules describing an object body.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    fields: &'static [FieldRule],
}

impl Schema {
    pub const fn new(fields: &'static [FieldRule]) -> Self {
        Self { fields }
    }

    /// Validates `value`, returning every violation in evaluation order.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let Value::Object(object) = value else {
            return Err(ValidationError::single(Violation::new(
                ROOT_LABEL,
                ViolationKind::NotAnObject,
            )));
        };

        let mut violations: Vec<Violation> = self
            .fields
            .iter()
            .filter_map(|rule| {
                rule.check(object.get(rule.name))
                    .map(|kind| Violation::new(rule.name, kind))
            })
            .collect();
        violations.extend(self.unknown_keys(object));

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }

    fn unknown_keys<'a>(
        &'a self,
        object: &'a Map<String, Value>,
    ) -> impl Iterator<Item = Violation> + 'a {
        object
            .keys()
            .filter(|key| !self.fields.iter().any(|rule| rule.name == key.as_str()))
            .map(|key| Violation::new(key.clone(), ViolationKind::NotAllowed))
    }
}

/// The specific constraint a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    NotAnObject,
    Required,
    NotAString,
    Empty,
    TooShort { min: usize },
    NotAllowed,
}

/// A single failed constraint, tied to the field it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new<S: Into<String>>(field: S, kind: ViolationKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }

    /// Human readable description, e.g. `"name" is required`.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = &self.field;
        match self.kind {
            ViolationKind::NotAnObject => write!(f, "\"{field}\" must be an object"),
            ViolationKind::Required => write!(f, "\"{field}\" is required"),
            ViolationKind::NotAString => write!(f, "\"{field}\" must be a string"),
            ViolationKind::Empty => write!(f, "\"{field}\" is not allowed to be empty"),
            ViolationKind::TooShort { min } => {
                write!(f, "\"{field}\" length must be at least {min} characters long")
            }
            ViolationKind::NotAllowed => write!(f, "\"{field}\" is not allowed"),
        }
    }
}

/// Non-empty, ordered list of violations produced by [`Schema::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .violations[0])]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// The violation surfaced to API callers.
    pub fn first(&self) -> &Violation {
        &self.violations[0]
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

/// Validated body of a create or update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseInput {
    pub name: String,
}

impl CourseInput {
    /// Checks `body` against [`COURSE_SCHEMA`] and extracts the course name.
    pub fn from_body(body: &Value) -> Result<Self, ValidationError> {
        COURSE_SCHEMA.validate(body)?;
        let name = body.get("name").and_then(Value::as_str).ok_or_else(|| {
            ValidationError::single(Violation::new("name", ViolationKind::Required))
        })?;
        Ok(Self {
            name: name.to_string(),
        })
    }
}
