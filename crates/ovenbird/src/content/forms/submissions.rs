use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::content::forms::field::FormValue;

/// One accepted submission as persisted by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub submission_id: String,
    pub form_slug: String,
    pub submitted_at: NaiveDateTime,
    pub values: BTreeMap<String, FormValue>,
}

/// Storage abstraction so the form service can be exercised in isolation.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, SubmissionStoreError>;
    fn for_form(&self, form_slug: &str) -> Result<Vec<SubmissionRecord>, SubmissionStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionStoreError {
    #[error("submission already exists")]
    Conflict,
    #[error("submission store unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing the outbound notification hook for accepted submissions.
pub trait FormNotifier: Send + Sync {
    fn notify(&self, email: FormEmail) -> Result<(), NotifyError>;
}

/// Notification payload assembled from the form's email settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormEmail {
    pub to_address: String,
    pub from_address: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
