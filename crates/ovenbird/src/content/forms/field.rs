use serde::{Deserialize, Serialize};

/// Field kinds an editor can place on a form, plus the `Section` marker that
/// groups the fields that follow it without collecting an answer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    SingleLine,
    MultiLine,
    Email,
    Number,
    Url,
    Checkbox,
    Checkboxes,
    Dropdown,
    MultiSelect,
    Radio,
    Date,
    DateTime,
    Hidden,
    Section,
}

impl FieldType {
    pub const fn label(self) -> &'static str {
        match self {
            FieldType::SingleLine => "Single line text",
            FieldType::MultiLine => "Multi-line text",
            FieldType::Email => "Email",
            FieldType::Number => "Number",
            FieldType::Url => "URL",
            FieldType::Checkbox => "Checkbox",
            FieldType::Checkboxes => "Checkboxes",
            FieldType::Dropdown => "Drop down",
            FieldType::MultiSelect => "Multiple select",
            FieldType::Radio => "Radio buttons",
            FieldType::Date => "Date",
            FieldType::DateTime => "Date/time",
            FieldType::Hidden => "Hidden field",
            FieldType::Section => "Section",
        }
    }

    /// Whether answers for this kind are drawn from an editor-supplied choice list.
    pub const fn takes_choices(self) -> bool {
        matches!(
            self,
            FieldType::Checkboxes | FieldType::Dropdown | FieldType::MultiSelect | FieldType::Radio
        )
    }
}

/// Derives the unique key for a field from its label: lowercased, with runs of
/// anything that is not ASCII alphanumeric collapsed into single hyphens.
pub fn clean_name(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut gap = false;
    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            gap = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            gap = true;
        }
    }
    slug
}

/// One editor-defined field on a form, in the order the editor placed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub label: String,
    pub clean_name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub help_text: String,
}

impl FormField {
    pub fn new(field_type: FieldType, label: impl Into<String>) -> Self {
        let label = label.into();
        let clean_name = clean_name(&label);
        Self {
            label,
            clean_name,
            field_type,
            required: false,
            choices: Vec::new(),
            default_value: String::new(),
            help_text: String::new(),
        }
    }

    /// Convenience for the grouping marker described on the owning form.
    pub fn section(label: impl Into<String>) -> Self {
        Self::new(FieldType::Section, label)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    pub fn with_help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }
}

/// A submitted answer. Untagged so JSON payloads stay as plain scalars and
/// arrays: `true`, `"rye"`, `["rye", "spelt"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Toggle(bool),
    Single(String),
    Many(Vec<String>),
}

impl FormValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FormValue::Toggle(checked) => !checked,
            FormValue::Single(value) => value.trim().is_empty(),
            FormValue::Many(values) => values.is_empty(),
        }
    }

    /// Human readable rendering used for notification bodies.
    pub fn display(&self) -> String {
        match self {
            FormValue::Toggle(true) => "yes".to_string(),
            FormValue::Toggle(false) => "no".to_string(),
            FormValue::Single(value) => value.clone(),
            FormValue::Many(values) => values.join(", "),
        }
    }
}
