use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::changes::{apply_changes, AppliedChanges, ChangeSet};
use super::config::BoardConfig;
use super::projection::{board_options, build_columns, BoardColumn, BoardOptions};
use super::render::{BoardRenderer, TableBoardRenderer};
use super::{BoardError, BoardSource, ColumnWriteError, ColumnWriter};

/// One registered board: a record source projected into columns at a fixed
/// admin path. Boards start read only; attaching a writer enables drag and
/// drop and the change handling on POST.
pub struct BoardAdmin<S, W> {
    path: String,
    config: BoardConfig,
    source: Arc<S>,
    writer: Option<Arc<W>>,
    renderer: Arc<dyn BoardRenderer>,
}

/// Read-only board with no writer attached.
pub type ReadOnlyBoard<S> = BoardAdmin<S, NoWriter>;

impl<S> BoardAdmin<S, NoWriter>
where
    S: BoardSource,
{
    pub fn new(path: impl Into<String>, config: BoardConfig, source: Arc<S>) -> Self {
        Self {
            path: path.into(),
            config,
            source,
            writer: None,
            renderer: Arc::new(TableBoardRenderer),
        }
    }
}

impl<S, W> BoardAdmin<S, W>
where
    S: BoardSource,
    W: ColumnWriter,
{
    /// Attaches the writer invoked once per dropped item.
    pub fn with_writer<T: ColumnWriter>(self, writer: Arc<T>) -> BoardAdmin<S, T> {
        BoardAdmin {
            path: self.path,
            config: self.config,
            source: self.source,
            writer: Some(writer),
            renderer: self.renderer,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn BoardRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn has_writer(&self) -> bool {
        self.writer.is_some()
    }

    /// Startup check that the configuration names real record fields.
    pub fn validate(&self) -> Result<(), BoardError> {
        self.config.validate_for::<S::Record>()
    }

    pub fn build(&self) -> Result<Vec<BoardColumn>, BoardError> {
        let records = self.source.records()?;
        build_columns(&records, &self.config, self.renderer.as_ref())
    }

    /// Widget payload for the current state of the source.
    pub fn options(&self) -> Result<BoardOptions, BoardError> {
        let columns = self.build()?;
        Ok(board_options(&columns, self.writer.is_some()))
    }

    /// Applies a change set against the current columns. `Ok(None)` means the
    /// board has no writer and the changes were ignored.
    pub fn apply(&self, changes: &ChangeSet) -> Result<Option<AppliedChanges>, BoardError> {
        let writer = match &self.writer {
            Some(writer) => writer,
            None => return Ok(None),
        };
        let field = self
            .config
            .column_field
            .as_deref()
            .ok_or(BoardError::MissingColumnField)?;
        let columns = self.build()?;
        let applied = apply_changes(changes, field, &columns, writer.as_ref())?;
        Ok(Some(applied))
    }
}

impl<S, W> BoardAdmin<S, W>
where
    S: BoardSource + 'static,
    W: ColumnWriter + 'static,
{
    /// Router serving the widget payload on GET and accepting posted changes
    /// at the same path.
    pub fn router(self: Arc<Self>) -> Router {
        let path = self.path.clone();
        Router::new()
            .route(&path, get(board_handler::<S, W>).post(changes_handler::<S, W>))
            .with_state(self)
    }
}

/// Writer type for boards registered without one. Never invoked: `apply`
/// short-circuits before reaching a writer that was never attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWriter;

impl ColumnWriter for NoWriter {
    fn write_column(
        &self,
        _pk: &str,
        _field: &str,
        _value: Option<&str>,
    ) -> Result<(), ColumnWriteError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ChangesForm {
    changes: Option<String>,
}

pub(crate) async fn board_handler<S, W>(State(board): State<Arc<BoardAdmin<S, W>>>) -> Response
where
    S: BoardSource + 'static,
    W: ColumnWriter + 'static,
{
    match board.options() {
        Ok(options) => (StatusCode::OK, Json(options)).into_response(),
        Err(error) => board_error_response(&error),
    }
}

pub(crate) async fn changes_handler<S, W>(
    State(board): State<Arc<BoardAdmin<S, W>>>,
    Form(form): Form<ChangesForm>,
) -> Response
where
    S: BoardSource + 'static,
    W: ColumnWriter + 'static,
{
    // A board without a writer redisplays without even parsing the payload.
    if board.has_writer() {
        let raw = form.changes.unwrap_or_default();
        let changes = if raw.trim().is_empty() {
            ChangeSet::default()
        } else {
            match ChangeSet::parse(&raw) {
                Ok(changes) => changes,
                Err(error) => return board_error_response(&error),
            }
        };
        match board.apply(&changes) {
            Ok(Some(applied)) => {
                info!(
                    board = %board.path,
                    moved = applied.moved,
                    "board changes applied"
                );
            }
            Ok(None) => {}
            Err(error) => return board_error_response(&error),
        }
    }

    match board.options() {
        Ok(options) => (StatusCode::OK, Json(options)).into_response(),
        Err(error) => board_error_response(&error),
    }
}

fn board_error_response(error: &BoardError) -> Response {
    let status = match error {
        BoardError::MalformedChanges { .. } | BoardError::UnknownColumn { .. } => {
            StatusCode::BAD_REQUEST
        }
        BoardError::Write(ColumnWriteError::NotFound(_)) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::admin::board::{BoardRecord, DisplayField};

    #[derive(Debug, Clone)]
    struct Ticket {
        id: u64,
        title: String,
        status: Option<String>,
    }

    impl BoardRecord for Ticket {
        fn primary_key(&self) -> String {
            self.id.to_string()
        }

        fn attribute(&self, field: &str) -> Result<Option<String>, BoardError> {
            match field {
                "title" => Ok(Some(self.title.clone())),
                "status" => Ok(self.status.clone()),
                other => Err(BoardError::UnknownField {
                    field: other.to_string(),
                }),
            }
        }

        fn field_names() -> &'static [&'static str] {
            &["title", "status"]
        }
    }

    struct TicketSource {
        tickets: Vec<Ticket>,
    }

    impl BoardSource for TicketSource {
        type Record = Ticket;

        fn records(&self) -> Result<Vec<Ticket>, BoardError> {
            Ok(self.tickets.clone())
        }
    }

    #[derive(Default)]
    struct RecordingWriter {
        writes: Mutex<Vec<(String, String, Option<String>)>>,
    }

    impl RecordingWriter {
        fn writes(&self) -> Vec<(String, String, Option<String>)> {
            self.writes.lock().expect("writer mutex poisoned").clone()
        }
    }

    impl ColumnWriter for RecordingWriter {
        fn write_column(
            &self,
            pk: &str,
            field: &str,
            value: Option<&str>,
        ) -> Result<(), ColumnWriteError> {
            let mut writes = self.writes.lock().expect("writer mutex poisoned");
            writes.push((pk.to_string(), field.to_string(), value.map(str::to_string)));
            Ok(())
        }
    }

    fn source() -> Arc<TicketSource> {
        Arc::new(TicketSource {
            tickets: vec![
                Ticket {
                    id: 7,
                    title: "Sourdough batch".to_string(),
                    status: None,
                },
                Ticket {
                    id: 8,
                    title: "Rye order".to_string(),
                    status: Some("done".to_string()),
                },
            ],
        })
    }

    fn config() -> BoardConfig {
        BoardConfig {
            column_field: Some("status".to_string()),
            column_default: "Other".to_string(),
            display_fields: vec![DisplayField::new("title", "Title")],
        }
    }

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn board_route_serves_widget_options() {
        let board = Arc::new(BoardAdmin::new("/admin/api/boards/tickets", config(), source()));

        let response = board
            .router()
            .oneshot(
                Request::get("/admin/api/boards/tickets")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["addItemButton"], Value::Bool(false));
        assert_eq!(payload["dragItems"], Value::Bool(false));
        assert_eq!(payload["boards"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn posted_changes_reach_the_writer() {
        let writer = Arc::new(RecordingWriter::default());
        let board = Arc::new(
            BoardAdmin::new("/admin/api/boards/tickets", config(), source())
                .with_writer(writer.clone()),
        );

        let response = changes_handler(
            State(board),
            Form(ChangesForm {
                changes: Some(r#"{"item-id-7": ["column-id-0", "column-id-1"]}"#.to_string()),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            writer.writes(),
            vec![(
                "7".to_string(),
                "status".to_string(),
                Some("done".to_string())
            )]
        );
    }

    #[tokio::test]
    async fn posted_changes_round_trip_through_the_form_body() {
        let writer = Arc::new(RecordingWriter::default());
        let board = Arc::new(
            BoardAdmin::new("/admin/api/boards/tickets", config(), source())
                .with_writer(writer.clone()),
        );

        // changes={"item-id-7":["column-id-0","column-id-1"]}
        let body = "changes=%7B%22item-id-7%22%3A%5B%22column-id-0%22%2C%22column-id-1%22%5D%7D";
        let response = board
            .router()
            .oneshot(
                Request::post("/admin/api/boards/tickets")
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(writer.writes().len(), 1);
        let payload = read_json_body(response).await;
        assert_eq!(payload["dragItems"], Value::Bool(true));
    }

    #[tokio::test]
    async fn boards_without_a_writer_ignore_posted_changes() {
        let board = Arc::new(BoardAdmin::new("/admin/api/boards/tickets", config(), source()));

        let response = changes_handler(
            State(board),
            Form(ChangesForm {
                changes: Some("certainly not json".to_string()),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_changes_are_rejected_when_a_writer_is_attached() {
        let writer = Arc::new(RecordingWriter::default());
        let board = Arc::new(
            BoardAdmin::new("/admin/api/boards/tickets", config(), source())
                .with_writer(writer.clone()),
        );

        let response = changes_handler(
            State(board),
            Form(ChangesForm {
                changes: Some("certainly not json".to_string()),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(writer.writes().is_empty());
    }

    #[tokio::test]
    async fn missing_changes_field_redisplays_the_board() {
        let writer = Arc::new(RecordingWriter::default());
        let board = Arc::new(
            BoardAdmin::new("/admin/api/boards/tickets", config(), source())
                .with_writer(writer.clone()),
        );

        let response = changes_handler(State(board), Form(ChangesForm { changes: None })).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(writer.writes().is_empty());
    }

    #[test]
    fn validate_flags_unknown_display_fields() {
        let mut config = config();
        config.display_fields.push(DisplayField::new("priority", "Priority"));
        let board = BoardAdmin::new("/admin/api/boards/tickets", config, source());

        let error = board.validate().expect_err("unknown field rejected");
        assert!(matches!(error, BoardError::UnknownField { field } if field == "priority"));
    }
}
