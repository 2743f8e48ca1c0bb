use serde::{Deserialize, Serialize};

use crate::admin::board::{BoardConfig, BoardError, BoardRecord, DisplayField};

/// A bakery production order, tracked on the admin board by `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionOrder {
    pub id: u64,
    pub title: String,
    /// Workflow status; `None` until triage picks the order up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub category: String,
    pub submitted_by: String,
}

impl BoardRecord for ProductionOrder {
    fn primary_key(&self) -> String {
        self.id.to_string()
    }

    fn attribute(&self, field: &str) -> Result<Option<String>, BoardError> {
        match field {
            "title" => Ok(Some(self.title.clone())),
            "status" => Ok(self.status.clone()),
            "category" => Ok(Some(self.category.clone())),
            "submitted_by" => Ok(Some(self.submitted_by.clone())),
            other => Err(BoardError::UnknownField {
                field: other.to_string(),
            }),
        }
    }

    fn field_names() -> &'static [&'static str] {
        &["title", "status", "category", "submitted_by"]
    }
}

/// Board layout for production orders: columns by `status`, unset statuses
/// gathered under "Other", cards showing category and requester.
pub fn orders_board_config() -> BoardConfig {
    BoardConfig {
        column_field: Some("status".to_string()),
        column_default: "Other".to_string(),
        display_fields: vec![
            DisplayField::new("category", "Category"),
            DisplayField::new("submitted_by", "Submitted by"),
        ],
    }
}

/// Seed orders for the demo board.
pub fn standard_orders() -> Vec<ProductionOrder> {
    vec![
        ProductionOrder {
            id: 1,
            title: "Three-tier wedding cake".to_string(),
            status: Some("new".to_string()),
            category: "Cakes".to_string(),
            submitted_by: "Rosie Mills".to_string(),
        },
        ProductionOrder {
            id: 2,
            title: "Weekly sourdough standing order".to_string(),
            status: Some("new".to_string()),
            category: "Bread".to_string(),
            submitted_by: "Marchetti's Deli".to_string(),
        },
        ProductionOrder {
            id: 3,
            title: "Anniversary macaron tower".to_string(),
            status: Some("done".to_string()),
            category: "Pastry".to_string(),
            submitted_by: "Priya Raman".to_string(),
        },
        ProductionOrder {
            id: 4,
            title: "Harvest festival pie order".to_string(),
            status: None,
            category: "Pies".to_string(),
            submitted_by: "Town Hall Events".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::board::{build_columns, TableBoardRenderer};

    #[test]
    fn config_names_only_real_fields() {
        orders_board_config()
            .validate_for::<ProductionOrder>()
            .expect("configuration is valid");
    }

    #[test]
    fn seed_orders_project_onto_three_columns() {
        let columns = build_columns(
            &standard_orders(),
            &orders_board_config(),
            &TableBoardRenderer,
        )
        .expect("projection succeeds");

        let names: Vec<&str> = columns.iter().map(|column| column.name.as_str()).collect();
        assert_eq!(names, ["Other", "done", "new"]);
        let counts: Vec<usize> = columns.iter().map(|column| column.count).collect();
        assert_eq!(counts, [1, 1, 2]);
    }
}
