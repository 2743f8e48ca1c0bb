use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::projection::BoardColumn;
use super::{BoardError, ColumnWriter};

/// Drag and drop changes as posted by the widget: a JSON object mapping item
/// ids to `[source-column-id, destination-column-id]` pairs. Entries keep the
/// document order of the object so application order matches what the widget
/// sent; only the destination id is used.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeSet {
    entries: Vec<ChangeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub item: String,
    pub source: String,
    pub destination: String,
}

impl ChangeSet {
    pub fn parse(json: &str) -> Result<Self, BoardError> {
        serde_json::from_str(json).map_err(|err| BoardError::MalformedChanges {
            detail: err.to_string(),
        })
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for ChangeSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ChangeSetVisitor;

        impl<'de> Visitor<'de> for ChangeSetVisitor {
            type Value = ChangeSet;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map from item id to a [source, destination] column id pair")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((item, (source, destination))) =
                    map.next_entry::<String, (String, String)>()?
                {
                    entries.push(ChangeEntry {
                        item,
                        source,
                        destination,
                    });
                }
                Ok(ChangeSet { entries })
            }
        }

        deserializer.deserialize_map(ChangeSetVisitor)
    }
}

/// Summary of an applied change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppliedChanges {
    pub moved: usize,
}

/// Applies each change in document order: parse the primary key out of the
/// item id, resolve the destination column's underlying value, and hand both
/// to the writer. Each entry is an independent write; a failure stops the
/// scan and propagates unmodified.
pub fn apply_changes<W>(
    changes: &ChangeSet,
    column_field: &str,
    columns: &[BoardColumn],
    writer: &W,
) -> Result<AppliedChanges, BoardError>
where
    W: ColumnWriter + ?Sized,
{
    let mut moved = 0usize;
    for entry in &changes.entries {
        let pk = item_pk(&entry.item)?;
        let index = column_index(&entry.destination)?;
        let column = columns
            .get(index)
            .ok_or_else(|| BoardError::UnknownColumn {
                id: entry.destination.clone(),
            })?;

        writer.write_column(pk, column_field, column.value.as_deref())?;
        moved += 1;
    }
    Ok(AppliedChanges { moved })
}

fn item_pk(id: &str) -> Result<&str, BoardError> {
    match id.strip_prefix("item-id-") {
        Some(pk) if !pk.is_empty() => Ok(pk),
        _ => Err(BoardError::MalformedChanges {
            detail: format!("bad item id '{id}'"),
        }),
    }
}

fn column_index(id: &str) -> Result<usize, BoardError> {
    id.strip_prefix("column-id-")
        .and_then(|index| index.parse::<usize>().ok())
        .ok_or_else(|| BoardError::MalformedChanges {
            detail: format!("bad column id '{id}'"),
        })
}
