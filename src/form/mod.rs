//! # Form Controller
//!
//! Draft state for the add/edit dialog. Values are kept as raw JSON so a user
//! can type anything; nothing is coerced until [`RestaurantForm::submit`] runs
//! the form contract from [`crate::schema`].

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::model::{RestaurantId, RestaurantRecord};
use crate::model::RestaurantDraft;
use crate::schema::validate_form;

pub const DESCRIPTION_MAX: usize = 400;

/// The editable fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    CuisineType,
    ImageUrl,
    Location,
    Rating,
    PriceRange,
    Description,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Name,
        FormField::CuisineType,
        FormField::ImageUrl,
        FormField::Location,
        FormField::Rating,
        FormField::PriceRange,
        FormField::Description,
    ];

    /// Wire name, also the path used in validation issues.
    pub fn key(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::CuisineType => "type",
            FormField::ImageUrl => "image",
            FormField::Location => "location",
            FormField::Rating => "rating",
            FormField::PriceRange => "priceRange",
            FormField::Description => "description",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Restaurant Name *",
            FormField::CuisineType => "Cuisine Type *",
            FormField::ImageUrl => "Image URL *",
            FormField::Location => "Location *",
            FormField::Rating => "Rating *",
            FormField::PriceRange => "Price Range *",
            FormField::Description => "Description (Optional)",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Name => "Enter restaurant name",
            FormField::CuisineType => "e.g., Italian, Mexican, Asian, American",
            FormField::ImageUrl => "https://example.com/restaurant-image.jpg",
            FormField::Location => "Restaurant address",
            FormField::Rating => "0",
            FormField::PriceRange => "Select price range",
            FormField::Description => "Tell us about this restaurant...",
        }
    }

    fn default_value(self) -> Value {
        match self {
            FormField::Rating => Value::from(0),
            FormField::PriceRange => Value::from("$"),
            _ => Value::from(""),
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Field-level error messages from the last submit.
pub type FieldErrors = BTreeMap<FormField, String>;

/// Draft values plus the errors of the last submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantForm {
    values: Map<String, Value>,
    errors: FieldErrors,
    editing: Option<RestaurantId>,
}

impl Default for RestaurantForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RestaurantForm {
    /// An empty form in create mode.
    pub fn new() -> Self {
        let values = FormField::ALL
            .into_iter()
            .map(|field| (field.key().to_string(), field.default_value()))
            .collect();
        Self {
            values,
            errors: FieldErrors::new(),
            editing: None,
        }
    }

    /// A form in edit mode, pre-filled from `record`.
    pub fn for_record(record: &RestaurantRecord) -> Self {
        let mut form = Self::new();
        form.editing = Some(record.id);
        if let Ok(Value::Object(prefill)) = serde_json::to_value(record.to_draft()) {
            form.values.extend(prefill);
        }
        form
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Id of the record being edited.
    pub fn editing_id(&self) -> Option<RestaurantId> {
        self.editing
    }

    pub fn value(&self, field: FormField) -> &Value {
        self.values.get(field.key()).unwrap_or(&Value::Null)
    }

    /// Updates one field and clears its error.
    pub fn set(&mut self, field: FormField, value: impl Into<Value>) {
        self.values.insert(field.key().to_string(), value.into());
        self.errors.remove(&field);
    }

    pub fn error(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Validates the draft. On success the caller routes the payload to
    /// create or update depending on [`is_editing`](Self::is_editing).
    pub fn submit(&mut self) -> Result<RestaurantDraft, &FieldErrors> {
        self.errors.clear();
        match validate_form(&Value::Object(self.values.clone())) {
            Ok(draft) => Ok(draft),
            Err(issues) => {
                for issue in issues.issues() {
                    if let Some(field) = FormField::from_key(&issue.path) {
                        self.errors.insert(field, issue.message.clone());
                    }
                }
                Err(&self.errors)
            }
        }
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Restaurant"
        } else {
            "Add New Restaurant"
        }
    }

    pub fn subtitle(&self) -> &'static str {
        if self.is_editing() {
            "Update the restaurant information below."
        } else {
            "Fill out the form below to add a new restaurant to your list."
        }
    }

    pub fn submit_label(&self, is_loading: bool) -> &'static str {
        match (self.is_editing(), is_loading) {
            (false, false) => "Create Restaurant",
            (true, false) => "Update Restaurant",
            (false, true) => "Creating Restaurant...",
            (true, true) => "Updating Restaurant...",
        }
    }

    /// Character count of the description, e.g. `(12/400)`.
    pub fn description_counter(&self) -> String {
        let len = self
            .value(FormField::Description)
            .as_str()
            .map_or(0, |d| d.chars().count());
        format!("({len}/{DESCRIPTION_MAX})")
    }
}
