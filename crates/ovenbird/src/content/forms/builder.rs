use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::content::forms::field::{FieldType, FormField, FormValue};
use crate::content::forms::fieldsets::FieldsetPlan;

/// Raw submitted answers keyed by field clean name.
pub type SubmissionPayload = BTreeMap<String, FormValue>;

const REQUIRED_MESSAGE: &str = "This field is required.";

/// Owns one form's ordered field list and builds everything derived from it:
/// the answerable subset, the fieldset plan, and bound forms for rendering and
/// submission.
#[derive(Debug, Clone)]
pub struct FormBuilder {
    fields: Vec<FormField>,
    marker: FieldType,
}

impl FormBuilder {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            marker: FieldType::Section,
        }
    }

    pub fn with_marker(mut self, marker: FieldType) -> Self {
        self.marker = marker;
        self
    }

    pub fn all_fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Fields that collect an answer, in editor order. Marker fields group
    /// their neighbours but never bind a value themselves.
    pub fn answerable(&self) -> impl Iterator<Item = &FormField> {
        let marker = self.marker;
        self.fields
            .iter()
            .filter(move |field| field.field_type != marker)
    }

    pub fn fieldset_plan(&self, allow_empty: bool) -> FieldsetPlan {
        FieldsetPlan::prepare(&self.fields, allow_empty, self.marker)
    }

    /// An unsubmitted form: values seeded from editor defaults, no errors.
    pub fn bind_initial(&self) -> BoundForm {
        let fields = self
            .answerable()
            .map(|field| BoundField {
                value: initial_value(field),
                errors: Vec::new(),
                field: field.clone(),
            })
            .collect();
        BoundForm { fields }
    }

    /// Binds a submitted payload, validating every answerable field. Payload
    /// keys the form does not declare are ignored.
    pub fn bind(&self, payload: &SubmissionPayload) -> BoundForm {
        let fields = self
            .answerable()
            .map(|field| {
                let (value, errors) = validate(field, payload.get(&field.clean_name));
                BoundField {
                    field: field.clone(),
                    value,
                    errors,
                }
            })
            .collect();
        BoundForm { fields }
    }
}

/// One answerable field with its bound value and any validation errors.
#[derive(Debug, Clone, Serialize)]
pub struct BoundField {
    #[serde(flatten)]
    pub field: FormField,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FormValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl BoundField {
    pub fn display_value(&self) -> String {
        self.value.as_ref().map(FormValue::display).unwrap_or_default()
    }
}

/// A form resolved against one payload (or against defaults).
#[derive(Debug, Clone, Serialize)]
pub struct BoundForm {
    fields: Vec<BoundField>,
}

impl BoundForm {
    pub fn fields(&self) -> &[BoundField] {
        &self.fields
    }

    pub fn field(&self, clean_name: &str) -> Option<&BoundField> {
        self.fields
            .iter()
            .find(|bound| bound.field.clean_name == clean_name)
    }

    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|bound| bound.errors.is_empty())
    }

    /// Validation messages keyed by clean name, empty when the form is valid.
    pub fn errors(&self) -> BTreeMap<String, Vec<String>> {
        self.fields
            .iter()
            .filter(|bound| !bound.errors.is_empty())
            .map(|bound| (bound.field.clean_name.clone(), bound.errors.clone()))
            .collect()
    }

    /// Answered values keyed by clean name, for storage and notifications.
    pub fn cleaned_values(&self) -> BTreeMap<String, FormValue> {
        self.fields
            .iter()
            .filter_map(|bound| {
                bound
                    .value
                    .as_ref()
                    .map(|value| (bound.field.clean_name.clone(), value.clone()))
            })
            .collect()
    }
}

fn validate(field: &FormField, supplied: Option<&FormValue>) -> (Option<FormValue>, Vec<String>) {
    let mut errors = Vec::new();

    let value = match supplied {
        Some(raw) => coerce(field, raw, &mut errors),
        None => initial_value(field),
    };

    let answered = value.as_ref().map(|v| !v.is_empty()).unwrap_or(false);
    if field.required && !answered {
        errors.push(REQUIRED_MESSAGE.to_string());
    }

    (value, errors)
}

/// Editor defaults are stored as text; multi-valued kinds split on commas.
fn initial_value(field: &FormField) -> Option<FormValue> {
    let default = field.default_value.trim();
    if default.is_empty() {
        return None;
    }

    Some(match field.field_type {
        FieldType::Checkbox => FormValue::Toggle(truthy(default)),
        FieldType::Checkboxes | FieldType::MultiSelect => FormValue::Many(
            default
                .split(',')
                .map(|choice| choice.trim().to_string())
                .filter(|choice| !choice.is_empty())
                .collect(),
        ),
        _ => FormValue::Single(field.default_value.clone()),
    })
}

fn truthy(text: &str) -> bool {
    matches!(
        text.to_ascii_lowercase().as_str(),
        "on" | "true" | "yes" | "1"
    )
}

/// Type-checks a raw value against the field kind. The raw value is kept even
/// when invalid so a redisplayed form can show what was submitted.
fn coerce(field: &FormField, raw: &FormValue, errors: &mut Vec<String>) -> Option<FormValue> {
    match field.field_type {
        FieldType::SingleLine | FieldType::MultiLine | FieldType::Hidden => {
            expect_single(raw, errors, |_| true, "Enter text for this field.")
        }
        FieldType::Email => expect_single(raw, errors, valid_email, "Enter a valid email address."),
        FieldType::Number => expect_single(
            raw,
            errors,
            |text| text.parse::<f64>().is_ok(),
            "Enter a number.",
        ),
        FieldType::Url => expect_single(
            raw,
            errors,
            |text| text.starts_with("http://") || text.starts_with("https://"),
            "Enter a valid URL.",
        ),
        FieldType::Date => expect_single(
            raw,
            errors,
            |text| NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok(),
            "Enter a valid date.",
        ),
        FieldType::DateTime => expect_single(
            raw,
            errors,
            |text| {
                NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M").is_ok()
                    || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M").is_ok()
            },
            "Enter a valid date/time.",
        ),
        FieldType::Dropdown | FieldType::Radio => expect_single(
            raw,
            errors,
            |text| field.choices.iter().any(|choice| choice == text),
            "Select a valid choice.",
        ),
        FieldType::Checkboxes | FieldType::MultiSelect => match raw {
            FormValue::Many(values) => {
                if !values
                    .iter()
                    .all(|value| field.choices.iter().any(|choice| choice == value))
                {
                    errors.push("Select valid choices.".to_string());
                }
                Some(raw.clone())
            }
            FormValue::Single(value) if value.trim().is_empty() => {
                Some(FormValue::Many(Vec::new()))
            }
            FormValue::Single(value) => {
                if !field.choices.iter().any(|choice| choice == value) {
                    errors.push("Select valid choices.".to_string());
                }
                Some(FormValue::Many(vec![value.clone()]))
            }
            FormValue::Toggle(_) => {
                errors.push("Select valid choices.".to_string());
                Some(raw.clone())
            }
        },
        FieldType::Checkbox => match raw {
            FormValue::Toggle(checked) => Some(FormValue::Toggle(*checked)),
            FormValue::Single(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() || truthy(trimmed) || falsy(trimmed) {
                    Some(FormValue::Toggle(truthy(trimmed)))
                } else {
                    errors.push("Select a valid value.".to_string());
                    Some(raw.clone())
                }
            }
            FormValue::Many(_) => {
                errors.push("Select a valid value.".to_string());
                Some(raw.clone())
            }
        },
        // Marker fields are filtered out before binding.
        FieldType::Section => Some(raw.clone()),
    }
}

fn falsy(text: &str) -> bool {
    matches!(
        text.to_ascii_lowercase().as_str(),
        "off" | "false" | "no" | "0"
    )
}

fn valid_email(text: &str) -> bool {
    let mut parts = text.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !text.chars().any(char::is_whitespace)
}

fn expect_single(
    raw: &FormValue,
    errors: &mut Vec<String>,
    valid: impl Fn(&str) -> bool,
    message: &str,
) -> Option<FormValue> {
    match raw {
        FormValue::Single(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() && !valid(trimmed) {
                errors.push(message.to_string());
            }
            Some(raw.clone())
        }
        _ => {
            errors.push(message.to_string());
            Some(raw.clone())
        }
    }
}
