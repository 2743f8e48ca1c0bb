use serde::{Deserialize, Serialize};

use super::{BoardError, BoardRecord};

/// Declares how one record type is projected onto a board. Every knob is an
/// explicit field here; nothing is discovered by attribute probing at request
/// time, and `validate_for` runs once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Field whose value decides column membership. `None` projects every
    /// record into one default column.
    pub column_field: Option<String>,
    /// Column label shown when the column field is null, empty, or not
    /// configured.
    pub column_default: String,
    /// Fields rendered on each card, with their headings, in order.
    pub display_fields: Vec<DisplayField>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            column_field: None,
            column_default: "Other".to_string(),
            display_fields: Vec::new(),
        }
    }
}

impl BoardConfig {
    /// Checks every referenced field against the record type's known names.
    pub fn validate_for<R: BoardRecord>(&self) -> Result<(), BoardError> {
        let known = R::field_names();
        if let Some(field) = &self.column_field {
            if !known.contains(&field.as_str()) {
                return Err(BoardError::UnknownField {
                    field: field.clone(),
                });
            }
        }
        for display in &self.display_fields {
            if !known.contains(&display.name.as_str()) {
                return Err(BoardError::UnknownField {
                    field: display.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// One card field: the record field to read and the heading to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayField {
    pub name: String,
    pub label: String,
}

impl DisplayField {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}
