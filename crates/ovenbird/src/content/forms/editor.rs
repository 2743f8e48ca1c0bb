use serde::Serialize;

use crate::content::forms::field::{FieldType, FormField};

/// Option inputs present on every field row of the form editor.
pub const FIELD_OPTION_NAMES: [&str; 6] = [
    "label",
    "field_type",
    "required",
    "choices",
    "default_value",
    "help_text",
];

/// Declares which option inputs stay visible for rows of one field kind.
/// Rows with no matching rule show everything.
#[derive(Debug, Clone)]
pub struct EditorRule {
    pub field_type: FieldType,
    pub shown: &'static [&'static str],
}

/// Rule set for forms with section markers: a marker row only needs its label
/// and help text, the answer-related options are meaningless for it.
pub fn section_rules() -> Vec<EditorRule> {
    vec![EditorRule {
        field_type: FieldType::Section,
        shown: &["label", "help_text"],
    }]
}

/// One editor row with the visibility of each of its option widgets.
#[derive(Debug, Clone, Serialize)]
pub struct EditorRow {
    pub clean_name: String,
    pub field_type: FieldType,
    pub widgets: Vec<OptionWidget>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionWidget {
    pub option: &'static str,
    pub hidden: bool,
}

impl EditorRow {
    pub fn widget(&self, option: &str) -> Option<&OptionWidget> {
        self.widgets.iter().find(|widget| widget.option == option)
    }
}

/// Builds editor rows for a field list. Widgets a rule excludes are hidden
/// rather than removed, so a submitted row always carries every option and
/// server side validation sees the same shape for every row.
pub fn editor_rows(fields: &[FormField], rules: &[EditorRule]) -> Vec<EditorRow> {
    fields
        .iter()
        .map(|field| {
            let shown = rules
                .iter()
                .find(|rule| rule.field_type == field.field_type)
                .map(|rule| rule.shown);

            EditorRow {
                clean_name: field.clean_name.clone(),
                field_type: field.field_type,
                widgets: FIELD_OPTION_NAMES
                    .iter()
                    .map(|&option| OptionWidget {
                        option,
                        hidden: shown.map(|list| !list.contains(&option)).unwrap_or(false),
                    })
                    .collect(),
            }
        })
        .collect()
}
