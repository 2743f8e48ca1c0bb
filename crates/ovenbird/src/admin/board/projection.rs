use std::collections::BTreeMap;

use serde::Serialize;

use super::config::BoardConfig;
use super::render::{BoardRenderer, FieldCell, ItemContext};
use super::{BoardError, BoardRecord};

/// One column of the projected board, in display order.
#[derive(Debug, Clone, Serialize)]
pub struct BoardColumn {
    pub id: String,
    /// Raw column field value backing this column. `None` both for the null
    /// column and for boards without a column field; change application
    /// writes this value back through the column writer.
    pub value: Option<String>,
    /// Display name: the raw value, or the configured default when the value
    /// is null or empty.
    pub name: String,
    pub count: usize,
    /// Rendered heading fragment embedding name and count.
    pub title: String,
    pub items: Vec<BoardItem>,
}

/// One card, annotated with the display name of the column it sits in.
#[derive(Debug, Clone, Serialize)]
pub struct BoardItem {
    pub id: String,
    pub column: String,
    pub title: String,
}

struct ItemSeed {
    pk: String,
    title: String,
}

/// Projects records into columns. Columns appear in ascending order of the
/// column field's value with the null column first; with no column field
/// configured every record lands in one default column. Within a column,
/// items keep the source collection's order.
pub fn build_columns<R>(
    records: &[R],
    config: &BoardConfig,
    renderer: &dyn BoardRenderer,
) -> Result<Vec<BoardColumn>, BoardError>
where
    R: BoardRecord,
{
    // Annotate each record with its raw column value and rendered card; the
    // BTreeMap over Option<String> gives nulls-first ascending column order.
    let mut grouped: BTreeMap<Option<String>, Vec<ItemSeed>> = BTreeMap::new();
    for record in records {
        let value = match &config.column_field {
            Some(field) => record.attribute(field)?,
            None => None,
        };

        let fields = card_fields(record, config)?;
        let pk = record.primary_key();
        let title = renderer.item_title(&ItemContext {
            pk: &pk,
            fields: &fields,
        });

        grouped.entry(value).or_default().push(ItemSeed { pk, title });
    }

    let mut columns = Vec::with_capacity(grouped.len());
    for (index, (value, seeds)) in grouped.into_iter().enumerate() {
        let name = value
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| config.column_default.clone());
        let count = seeds.len();
        let items = seeds
            .into_iter()
            .map(|seed| BoardItem {
                id: format!("item-id-{}", seed.pk),
                column: name.clone(),
                title: seed.title,
            })
            .collect();

        columns.push(BoardColumn {
            id: format!("column-id-{index}"),
            value,
            title: renderer.column_title(&name, count),
            name,
            count,
            items,
        });
    }

    Ok(columns)
}

fn card_fields<R: BoardRecord>(
    record: &R,
    config: &BoardConfig,
) -> Result<Vec<FieldCell>, BoardError> {
    let mut cells = Vec::with_capacity(config.display_fields.len());
    for display in &config.display_fields {
        let value = record.attribute(&display.name)?.unwrap_or_default();
        cells.push(FieldCell {
            label: display.label.clone(),
            value,
        });
    }
    Ok(cells)
}

/// Options payload consumed by the drag and drop board widget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardOptions {
    pub add_item_button: bool,
    pub boards: Vec<ColumnView>,
    pub drag_boards: bool,
    pub drag_items: bool,
}

/// Column as the widget expects it; the member list key is singular.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnView {
    pub id: String,
    pub title: String,
    pub item: Vec<ItemView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub id: String,
    pub title: String,
}

pub fn board_options(columns: &[BoardColumn], drag_items: bool) -> BoardOptions {
    BoardOptions {
        add_item_button: false,
        boards: columns
            .iter()
            .map(|column| ColumnView {
                id: column.id.clone(),
                title: column.title.clone(),
                item: column
                    .items
                    .iter()
                    .map(|item| ItemView {
                        id: item.id.clone(),
                        title: item.title.clone(),
                    })
                    .collect(),
            })
            .collect(),
        drag_boards: false,
        drag_items,
    }
}
