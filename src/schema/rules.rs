//! Field rule tables for each schema variant.
//!
//! Each field is described by a [`FieldSpec`]: its wire key, whether it may be
//! omitted, the JSON type it must have, and an ordered list of [`Check`]s.
//! Checks run in order and stop at the first failure.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expect {
    Text,
    Number,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Check {
    MinChars(usize, &'static str),
    MaxChars(usize, &'static str),
    Url(&'static str),
    WholeNumber(&'static str),
    AtLeast(i64, &'static str),
    AtMost(i64, &'static str),
    Positive(&'static str),
    OneOf(&'static [&'static str], &'static str),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldSpec {
    pub key: &'static str,
    pub optional: bool,
    /// Treat `""` as if the field were omitted.
    pub empty_is_absent: bool,
    pub expect: Expect,
    pub checks: &'static [Check],
}

const PRICE_SYMBOLS: &[&str] = &["$", "$$", "$$$"];
const PRICE_MESSAGE: &str = "Invalid enum value. Expected '$' | '$$' | '$$$'";

const fn required(key: &'static str, expect: Expect, checks: &'static [Check]) -> FieldSpec {
    FieldSpec { key, optional: false, empty_is_absent: false, expect, checks }
}

const fn optional(key: &'static str, expect: Expect, checks: &'static [Check]) -> FieldSpec {
    FieldSpec { key, optional: true, empty_is_absent: false, expect, checks }
}

const NAME: &[Check] = &[
    Check::MinChars(1, "Restaurant name is required"),
    Check::MaxChars(120, "Restaurant name must be 120 characters or less"),
];
const CUISINE: &[Check] = &[
    Check::MinChars(1, "Cuisine type is required"),
    Check::MaxChars(80, "Cuisine type must be 80 characters or less"),
];
const IMAGE: &[Check] = &[
    Check::MinChars(5, "Image URL must be at least 5 characters"),
    Check::Url("Must be a valid URL"),
];
const LOCATION: &[Check] = &[
    Check::MinChars(1, "Location is required"),
    Check::MaxChars(80, "Location must be 80 characters or less"),
];
const RATING: &[Check] = &[
    Check::WholeNumber("Rating must be a whole number"),
    Check::AtLeast(0, "Rating must be at least 0"),
    Check::AtMost(5, "Rating must be at most 5"),
];
const DESCRIPTION: &[Check] = &[Check::MaxChars(400, "Description must be 400 characters or less")];
const PRICE: &[Check] = &[Check::OneOf(PRICE_SYMBOLS, PRICE_MESSAGE)];

pub(crate) const CREATE: &[FieldSpec] = &[
    required("name", Expect::Text, NAME),
    required("type", Expect::Text, CUISINE),
    required("image", Expect::Text, IMAGE),
    required("location", Expect::Text, LOCATION),
    required("rating", Expect::Number, RATING),
    optional("description", Expect::Text, DESCRIPTION),
    required("priceRange", Expect::Text, PRICE),
];

pub(crate) const UPDATE: &[FieldSpec] = &[
    optional(
        "name",
        Expect::Text,
        &[
            Check::MinChars(1, "Restaurant name must be at least 1 character"),
            Check::MaxChars(120, "Restaurant name must be 120 characters or less"),
        ],
    ),
    optional(
        "type",
        Expect::Text,
        &[
            Check::MinChars(1, "Cuisine type must be at least 1 character"),
            Check::MaxChars(80, "Cuisine type must be 80 characters or less"),
        ],
    ),
    optional("image", Expect::Text, IMAGE),
    optional(
        "location",
        Expect::Text,
        &[
            Check::MinChars(1, "Location must be at least 1 character"),
            Check::MaxChars(80, "Location must be 80 characters or less"),
        ],
    ),
    optional("rating", Expect::Number, RATING),
    optional("description", Expect::Text, DESCRIPTION),
    optional("priceRange", Expect::Text, PRICE),
];

pub(crate) const READ: &[FieldSpec] = &[
    required(
        "id",
        Expect::Number,
        &[
            Check::WholeNumber("Expected integer, received float"),
            Check::Positive("ID must be a positive integer"),
        ],
    ),
    required("name", Expect::Text, NAME),
    required("type", Expect::Text, CUISINE),
    required("image", Expect::Text, IMAGE),
    required("location", Expect::Text, LOCATION),
    required("rating", Expect::Number, RATING),
    optional("description", Expect::Text, DESCRIPTION),
    required("priceRange", Expect::Text, PRICE),
];

pub(crate) const FORM: &[FieldSpec] = &[
    required("name", Expect::Text, NAME),
    required("type", Expect::Text, CUISINE),
    required(
        "image",
        Expect::Text,
        &[
            Check::MinChars(1, "Image URL is required"),
            Check::Url("Please enter a valid image URL"),
        ],
    ),
    required("location", Expect::Text, LOCATION),
    required("rating", Expect::Number, RATING),
    FieldSpec {
        key: "description",
        optional: true,
        empty_is_absent: true,
        expect: Expect::Text,
        checks: DESCRIPTION,
    },
    required("priceRange", Expect::Text, PRICE),
];

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_url(text: &str) -> bool {
    reqwest::Url::parse(text).is_ok()
}

impl Check {
    fn run(&self, value: &Value) -> Result<(), &'static str> {
        let text = value.as_str().unwrap_or_default();
        let number = value.as_f64().unwrap_or_default();
        let passed = match *self {
            Check::MinChars(min, _) => text.chars().count() >= min,
            Check::MaxChars(max, _) => text.chars().count() <= max,
            Check::Url(_) => is_url(text),
            Check::WholeNumber(_) => number.fract() == 0.0,
            Check::AtLeast(min, _) => number >= min as f64,
            Check::AtMost(max, _) => number <= max as f64,
            Check::Positive(_) => number > 0.0,
            Check::OneOf(allowed, _) => allowed.contains(&text),
        };
        if passed {
            Ok(())
        } else {
            Err(self.message())
        }
    }

    fn message(&self) -> &'static str {
        match *self {
            Check::MinChars(_, m)
            | Check::MaxChars(_, m)
            | Check::Url(m)
            | Check::WholeNumber(m)
            | Check::AtLeast(_, m)
            | Check::AtMost(_, m)
            | Check::Positive(m)
            | Check::OneOf(_, m) => m,
        }
    }
}

impl FieldSpec {
    /// Checks one field. `Ok(None)` means the field is absent and allowed to be.
    ///
    /// Whole numbers are normalized to integer JSON values so `5.0` parses
    /// into an integer field.
    pub(crate) fn check(&self, value: Option<&Value>) -> Result<Option<Value>, String> {
        let value = match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if self.empty_is_absent && s.is_empty() => None,
            Some(v) => Some(v),
        };
        let Some(value) = value else {
            return if self.optional { Ok(None) } else { Err("Required".to_string()) };
        };

        let type_ok = match self.expect {
            Expect::Text => value.is_string(),
            Expect::Number => value.is_number(),
        };
        if !type_ok {
            let expected = match self.expect {
                Expect::Text => "string",
                Expect::Number => "number",
            };
            return Err(format!("Expected {expected}, received {}", type_name(value)));
        }

        for check in self.checks {
            check.run(value).map_err(str::to_string)?;
        }

        match value.as_f64() {
            Some(n) if self.expect == Expect::Number && n.fract() == 0.0 => Ok(Some(Value::from(n as i64))),
            _ => Ok(Some(value.clone())),
        }
    }
}
