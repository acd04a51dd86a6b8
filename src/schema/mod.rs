//! # Record Schema
//!
//! Validation contracts for the four shapes a restaurant takes:
//!
//! - [`SchemaKind::Create`]: every field required except `description`.
//! - [`SchemaKind::Update`]: every field optional (partial update).
//! - [`SchemaKind::Read`]: the create shape plus a positive integer `id`.
//! - [`SchemaKind::Form`]: the create shape with a stricter image rule; an
//!   empty description counts as omitted.
//!
//! Input is untyped JSON so that wrong types are reported as field errors
//! rather than deserialization failures. Each field reports at most one
//! issue: the first rule it fails.

mod rules;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{RestaurantDraft, RestaurantPatch, RestaurantRecord};
use rules::FieldSpec;

/// Which contract to validate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Create,
    Update,
    Read,
    Form,
}

impl SchemaKind {
    fn fields(self) -> &'static [FieldSpec] {
        match self {
            SchemaKind::Create => rules::CREATE,
            SchemaKind::Update => rules::UPDATE,
            SchemaKind::Read => rules::READ,
            SchemaKind::Form => rules::FORM,
        }
    }
}

/// The typed result of a successful validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRecord {
    Create(RestaurantDraft),
    Update(RestaurantPatch),
    Read(RestaurantRecord),
    Form(RestaurantDraft),
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Wire name of the field (`"type"`, `"priceRange"`, ...); `""` for the root.
    pub path: String,
    pub message: String,
}

/// All issues found in one validation pass, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("{}", format_issues(&self.issues))]
pub struct ValidationErrors {
    issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// The message reported for `path`, if any.
    pub fn message_for(&self, path: &str) -> Option<&str> {
        self.issues
            .iter()
            .find(|issue| issue.path == path)
            .map(|issue| issue.message.as_str())
    }
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| {
            if issue.path.is_empty() {
                issue.message.clone()
            } else {
                format!("{}: {}", issue.path, issue.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validates `data` against the `kind` contract.
pub fn validate(kind: SchemaKind, data: &Value) -> Result<ParsedRecord, ValidationErrors> {
    match kind {
        SchemaKind::Create => parse_as(kind, data).map(ParsedRecord::Create),
        SchemaKind::Update => parse_as(kind, data).map(ParsedRecord::Update),
        SchemaKind::Read => parse_as(kind, data).map(ParsedRecord::Read),
        SchemaKind::Form => parse_as(kind, data).map(ParsedRecord::Form),
    }
}

pub fn validate_create(data: &Value) -> Result<RestaurantDraft, ValidationErrors> {
    parse_as(SchemaKind::Create, data)
}

pub fn validate_update(data: &Value) -> Result<RestaurantPatch, ValidationErrors> {
    parse_as(SchemaKind::Update, data)
}

pub fn validate_read(data: &Value) -> Result<RestaurantRecord, ValidationErrors> {
    parse_as(SchemaKind::Read, data)
}

pub fn validate_form(data: &Value) -> Result<RestaurantDraft, ValidationErrors> {
    parse_as(SchemaKind::Form, data)
}

fn parse_as<T: DeserializeOwned>(kind: SchemaKind, data: &Value) -> Result<T, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let Some(object) = data.as_object() else {
        errors.push("", format!("Expected object, received {}", rules::type_name(data)));
        return Err(errors);
    };

    let mut cleaned = Map::new();
    for field in kind.fields() {
        match field.check(object.get(field.key)) {
            Ok(Some(value)) => {
                cleaned.insert(field.key.to_string(), value);
            }
            Ok(None) => {}
            Err(message) => errors.push(field.key, message),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value(Value::Object(cleaned)).map_err(|e| {
        let mut errors = ValidationErrors::default();
        errors.push("", e.to_string());
        errors
    })
}
