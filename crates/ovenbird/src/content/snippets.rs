use serde::{Deserialize, Serialize};

/// Reusable person record shown on the home page and in admin listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
}

impl Person {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        job_title: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            job_title: job_title.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Site-wide footer fragment appended to every rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterText {
    pub body: String,
}

impl FooterText {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

/// Read access to the non-hierarchical editable records.
pub trait SnippetStore: Send + Sync {
    fn people(&self) -> Result<Vec<Person>, SnippetStoreError>;

    fn footer(&self) -> Result<Option<FooterText>, SnippetStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SnippetStoreError {
    #[error("snippet store unavailable: {0}")]
    Unavailable(String),
}
