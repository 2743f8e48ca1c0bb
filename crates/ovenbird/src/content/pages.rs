use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::blocks::StreamBlock;
use super::snippets::SnippetStore;

/// A published site page. `body` is the structured stream content; `live`
/// and `archived_on` track publication state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub slug: String,
    pub title: String,
    pub introduction: String,
    #[serde(default)]
    pub body: Vec<StreamBlock>,
    pub live: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_on: Option<NaiveDateTime>,
}

impl Page {
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        introduction: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            introduction: introduction.into(),
            body: Vec::new(),
            live: true,
            archived_on: None,
        }
    }

    pub fn with_body(mut self, body: Vec<StreamBlock>) -> Self {
        self.body = body;
        self
    }

    /// Whether archiving is offered for this page. Currently every page
    /// reports archivable; this is where a narrower policy would hook in.
    pub fn can_archive(&self) -> bool {
        true
    }
}

/// Read/write access to the page store.
pub trait PageRepository: Send + Sync {
    fn all(&self) -> Result<Vec<Page>, PageStoreError>;

    fn find(&self, slug: &str) -> Result<Page, PageStoreError>;

    fn update(&self, page: Page) -> Result<(), PageStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PageStoreError {
    #[error("page '{0}' not found")]
    NotFound(String),
    #[error("{0}")]
    Protected(String),
    #[error("page store unavailable: {0}")]
    Unavailable(String),
}

/// Result of a successful archive, echoing the editor-facing message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveOutcome {
    pub slug: String,
    pub archived_on: NaiveDateTime,
    pub message: String,
}

/// Page lifecycle operations over a [`PageRepository`].
pub struct PageService<P> {
    repository: Arc<P>,
}

impl<P> PageService<P>
where
    P: PageRepository,
{
    pub fn new(repository: Arc<P>) -> Self {
        Self { repository }
    }

    pub fn get(&self, slug: &str) -> Result<Page, PageStoreError> {
        self.repository.find(slug)
    }

    /// Archives a page: stamps `archived_on`, unpublishes, and persists.
    pub fn archive(&self, slug: &str, now: NaiveDateTime) -> Result<ArchiveOutcome, PageStoreError> {
        let mut page = self.repository.find(slug)?;
        if !page.can_archive() {
            return Err(PageStoreError::Protected(format!(
                "Page '{}' cannot be archived.",
                page.title
            )));
        }

        page.archived_on = Some(now);
        page.live = false;
        let title = page.title.clone();
        self.repository.update(page)?;

        info!(page = slug, action = "archive", "page archived");
        Ok(ArchiveOutcome {
            slug: slug.to_string(),
            archived_on: now,
            message: format!("Page '{title}' has been archived."),
        })
    }

    /// Deleting is refused for every page, published or not. The guard fires
    /// before the store is touched and never actually inspects publication
    /// state.
    pub fn delete(&self, slug: &str) -> Result<(), PageStoreError> {
        self.repository.find(slug)?;
        Err(PageStoreError::Protected(
            "Only unpublished posts can be deleted.".to_string(),
        ))
    }
}

/// Public page payload: the page content plus the site footer snippet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub slug: String,
    pub title: String,
    pub introduction: String,
    pub body: Vec<StreamBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
}

/// State for the public page routes: pages plus the snippet store supplying
/// the footer.
pub struct PageRoutes<P, S> {
    pub pages: Arc<PageService<P>>,
    pub snippets: Arc<S>,
}

impl<P, S> Clone for PageRoutes<P, S> {
    fn clone(&self) -> Self {
        Self {
            pages: self.pages.clone(),
            snippets: self.snippets.clone(),
        }
    }
}

/// Public site routes for page content.
pub fn page_router<P, S>(state: PageRoutes<P, S>) -> Router
where
    P: PageRepository + 'static,
    S: SnippetStore + 'static,
{
    Router::new()
        .route("/api/v1/pages/:slug", get(page_handler::<P, S>))
        .with_state(state)
}

/// Admin routes for the archive flow and the guarded delete.
pub fn page_admin_router<P>(service: Arc<PageService<P>>) -> Router
where
    P: PageRepository + 'static,
{
    Router::new()
        .route("/admin/api/pages/:slug/archive", post(archive_handler::<P>))
        .route("/admin/api/pages/:slug", delete(delete_handler::<P>))
        .with_state(service)
}

pub(crate) async fn page_handler<P, S>(
    State(state): State<PageRoutes<P, S>>,
    Path(slug): Path<String>,
) -> Response
where
    P: PageRepository + 'static,
    S: SnippetStore + 'static,
{
    let page = match state.pages.get(&slug) {
        Ok(page) => page,
        Err(PageStoreError::NotFound(_)) => return unknown_page_response(),
        Err(other) => return store_error_response(&other),
    };
    // Unpublished pages are invisible on the public site.
    if !page.live {
        return unknown_page_response();
    }

    let footer_text = match state.snippets.footer() {
        Ok(footer) => footer.map(|footer| footer.body),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
        }
    };

    let view = PageView {
        slug: page.slug,
        title: page.title,
        introduction: page.introduction,
        body: page.body,
        footer_text,
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn archive_handler<P>(
    State(service): State<Arc<PageService<P>>>,
    Path(slug): Path<String>,
) -> Response
where
    P: PageRepository + 'static,
{
    match service.archive(&slug, Local::now().naive_local()) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(PageStoreError::NotFound(_)) => unknown_page_response(),
        Err(other) => store_error_response(&other),
    }
}

pub(crate) async fn delete_handler<P>(
    State(service): State<Arc<PageService<P>>>,
    Path(slug): Path<String>,
) -> Response
where
    P: PageRepository + 'static,
{
    match service.delete(&slug) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(PageStoreError::NotFound(_)) => unknown_page_response(),
        Err(PageStoreError::Protected(message)) => {
            let payload = json!({
                "error": message,
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        Err(other) => store_error_response(&other),
    }
}

fn unknown_page_response() -> Response {
    let payload = json!({
        "error": "unknown page",
    });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

fn store_error_response(error: &PageStoreError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
