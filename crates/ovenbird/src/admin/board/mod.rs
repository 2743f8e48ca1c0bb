pub mod changes;
pub mod config;
pub mod projection;
pub mod render;
pub mod router;

pub use changes::{apply_changes, AppliedChanges, ChangeSet};
pub use config::{BoardConfig, DisplayField};
pub use projection::{board_options, build_columns, BoardColumn, BoardItem, BoardOptions};
pub use render::{BoardRenderer, TableBoardRenderer};
pub use router::{BoardAdmin, NoWriter, ReadOnlyBoard};

/// A record that can appear on a board. Field access goes through names so
/// the projection stays generic over the record type.
pub trait BoardRecord: Send + Sync {
    /// Stable primary key embedded in generated item ids.
    fn primary_key(&self) -> String;

    /// Value of a named field; `Ok(None)` means the field is unset.
    fn attribute(&self, field: &str) -> Result<Option<String>, BoardError>;

    /// Field names `attribute` understands, used to validate board
    /// configuration at startup instead of probing per request.
    fn field_names() -> &'static [&'static str];
}

/// Source of the unpaginated record collection backing one board. Column
/// partitioning needs the full collection, so implementations must not
/// paginate or truncate.
pub trait BoardSource: Send + Sync {
    type Record: BoardRecord;

    fn records(&self) -> Result<Vec<Self::Record>, BoardError>;
}

/// Persistence hook invoked once per drag and drop move. `None` clears the
/// column field on the record.
pub trait ColumnWriter: Send + Sync {
    fn write_column(
        &self,
        pk: &str,
        field: &str,
        value: Option<&str>,
    ) -> Result<(), ColumnWriteError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("record type has no field '{field}'")]
    UnknownField { field: String },
    #[error("board has no column field configured")]
    MissingColumnField,
    #[error("malformed change payload: {detail}")]
    MalformedChanges { detail: String },
    #[error("unknown column id '{id}'")]
    UnknownColumn { id: String },
    #[error("record source unavailable: {0}")]
    Source(String),
    #[error(transparent)]
    Write(#[from] ColumnWriteError),
}

#[derive(Debug, thiserror::Error)]
pub enum ColumnWriteError {
    #[error("record '{0}' not found")]
    NotFound(String),
    #[error("field '{0}' is not writable")]
    ReadOnly(String),
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}
