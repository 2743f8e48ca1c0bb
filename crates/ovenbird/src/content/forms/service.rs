use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use super::builder::{FormBuilder, SubmissionPayload};
use super::field::FormField;
use super::fieldsets::BoundFieldset;
use super::submissions::{
    FormEmail, FormNotifier, NotifyError, SubmissionRecord, SubmissionRepository,
    SubmissionStoreError,
};

/// Editor-authored definition of one site form: the ordered field list plus
/// the email settings used when a submission is accepted.
#[derive(Debug, Clone)]
pub struct FormDefinition {
    pub slug: String,
    pub title: String,
    pub introduction: String,
    pub fields: Vec<FormField>,
    pub thank_you_text: String,
    pub from_address: String,
    pub to_address: String,
    pub subject: String,
}

impl FormDefinition {
    pub fn builder(&self) -> FormBuilder {
        FormBuilder::new(self.fields.clone())
    }
}

/// What a template needs to render a form page: the ordered fieldsets
/// resolved against a bound form.
#[derive(Debug, Clone, Serialize)]
pub struct FormRenderModel {
    pub slug: String,
    pub title: String,
    pub introduction: String,
    pub fieldsets: Vec<BoundFieldset>,
}

/// Confirmation returned for an accepted submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub submission_id: String,
    pub thank_you_text: String,
}

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> String {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("sub-{id:06}")
}

/// Service composing form definitions with the submission store and the
/// notification hook.
pub struct FormSubmissionService<R, N> {
    forms: Vec<FormDefinition>,
    repository: Arc<R>,
    notifier: Arc<N>,
}

impl<R, N> FormSubmissionService<R, N>
where
    R: SubmissionRepository + 'static,
    N: FormNotifier + 'static,
{
    pub fn new(forms: Vec<FormDefinition>, repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            forms,
            repository,
            notifier,
        }
    }

    pub fn form(&self, slug: &str) -> Result<&FormDefinition, FormError> {
        self.forms
            .iter()
            .find(|form| form.slug == slug)
            .ok_or_else(|| FormError::UnknownForm(slug.to_string()))
    }

    /// Unsubmitted render model with editor defaults filled in.
    pub fn render(&self, slug: &str) -> Result<FormRenderModel, FormError> {
        let form = self.form(slug)?;
        let builder = form.builder();
        let bound = builder.bind_initial();
        let fieldsets = builder.fieldset_plan(false).apply(&bound);
        Ok(render_model(form, fieldsets))
    }

    /// Validates a payload, persists the accepted submission, and sends the
    /// notification email. Invalid payloads are rejected with the per-field
    /// messages and nothing is stored.
    pub fn submit(
        &self,
        slug: &str,
        payload: &SubmissionPayload,
        submitted_at: NaiveDateTime,
    ) -> Result<SubmissionReceipt, FormError> {
        let form = self.form(slug)?;
        let builder = form.builder();
        let bound = builder.bind(payload);

        if !bound.is_valid() {
            return Err(FormError::Rejected {
                issues: bound.errors(),
            });
        }

        let record = SubmissionRecord {
            submission_id: next_submission_id(),
            form_slug: form.slug.clone(),
            submitted_at,
            values: bound.cleaned_values(),
        };
        let stored = self.repository.insert(record)?;

        let body: Vec<String> = bound
            .fields()
            .iter()
            .map(|field| format!("{}: {}", field.field.label, field.display_value()))
            .collect();
        self.notifier.notify(FormEmail {
            to_address: form.to_address.clone(),
            from_address: form.from_address.clone(),
            subject: form.subject.clone(),
            body: body.join("\n"),
        })?;

        info!(
            form = %form.slug,
            submission = %stored.submission_id,
            "form submission accepted"
        );

        Ok(SubmissionReceipt {
            submission_id: stored.submission_id,
            thank_you_text: form.thank_you_text.clone(),
        })
    }
}

fn render_model(form: &FormDefinition, fieldsets: Vec<BoundFieldset>) -> FormRenderModel {
    FormRenderModel {
        slug: form.slug.clone(),
        title: form.title.clone(),
        introduction: form.introduction.clone(),
        fieldsets,
    }
}

/// Error raised by the form service.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("unknown form '{0}'")]
    UnknownForm(String),
    #[error("submission failed validation")]
    Rejected { issues: BTreeMap<String, Vec<String>> },
    #[error(transparent)]
    Store(#[from] SubmissionStoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDate;

    use super::*;
    use crate::content::forms::field::{FieldType, FormValue};

    #[derive(Default)]
    struct RecordingStore {
        records: Mutex<Vec<SubmissionRecord>>,
    }

    impl SubmissionRepository for RecordingStore {
        fn insert(
            &self,
            record: SubmissionRecord,
        ) -> Result<SubmissionRecord, SubmissionStoreError> {
            let mut records = self.records.lock().expect("store mutex poisoned");
            records.push(record.clone());
            Ok(record)
        }

        fn for_form(&self, form_slug: &str) -> Result<Vec<SubmissionRecord>, SubmissionStoreError> {
            let records = self.records.lock().expect("store mutex poisoned");
            Ok(records
                .iter()
                .filter(|record| record.form_slug == form_slug)
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        emails: Mutex<Vec<FormEmail>>,
    }

    impl FormNotifier for RecordingNotifier {
        fn notify(&self, email: FormEmail) -> Result<(), NotifyError> {
            let mut emails = self.emails.lock().expect("notifier mutex poisoned");
            emails.push(email);
            Ok(())
        }
    }

    fn contact_form() -> FormDefinition {
        FormDefinition {
            slug: "contact".to_string(),
            title: "Contact us".to_string(),
            introduction: "Questions about an order?".to_string(),
            fields: vec![
                FormField::new(FieldType::SingleLine, "Name").required(),
                FormField::section("Your message"),
                FormField::new(FieldType::MultiLine, "Message").required(),
            ],
            thank_you_text: "Thanks, we will be in touch.".to_string(),
            from_address: "noreply@example.com".to_string(),
            to_address: "shop@example.com".to_string(),
            subject: "New contact enquiry".to_string(),
        }
    }

    fn service() -> (
        FormSubmissionService<RecordingStore, RecordingNotifier>,
        Arc<RecordingStore>,
        Arc<RecordingNotifier>,
    ) {
        let store = Arc::new(RecordingStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let service =
            FormSubmissionService::new(vec![contact_form()], store.clone(), notifier.clone());
        (service, store, notifier)
    }

    fn when() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 9)
            .expect("valid date")
            .and_hms_opt(9, 30, 0)
            .expect("valid time")
    }

    #[test]
    fn render_groups_fields_into_fieldsets() {
        let (service, _, _) = service();

        let model = service.render("contact").expect("form renders");

        assert_eq!(model.fieldsets.len(), 2);
        assert!(model.fieldsets[0].meta.is_none());
        assert_eq!(
            model.fieldsets[1]
                .meta
                .as_ref()
                .map(|meta| meta.id.as_str()),
            Some("fieldset-your-message")
        );
    }

    #[test]
    fn submit_stores_and_notifies() {
        let (service, store, notifier) = service();
        let payload: SubmissionPayload = [
            ("name".to_string(), FormValue::Single("Olivia".to_string())),
            (
                "message".to_string(),
                FormValue::Single("More rye please".to_string()),
            ),
        ]
        .into_iter()
        .collect();

        let receipt = service
            .submit("contact", &payload, when())
            .expect("valid submission accepted");

        assert!(receipt.submission_id.starts_with("sub-"));
        assert_eq!(receipt.thank_you_text, "Thanks, we will be in touch.");

        let stored = store.for_form("contact").expect("store readable");
        assert_eq!(stored.len(), 1);
        assert_eq!(
            stored[0].values.get("message"),
            Some(&FormValue::Single("More rye please".to_string()))
        );

        let emails = notifier.emails.lock().expect("notifier mutex poisoned");
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].to_address, "shop@example.com");
        assert!(emails[0].body.contains("Name: Olivia"));
        assert!(emails[0].body.contains("Message: More rye please"));
    }

    #[test]
    fn submit_rejects_invalid_payloads_without_storing() {
        let (service, store, notifier) = service();
        let payload: SubmissionPayload = [(
            "name".to_string(),
            FormValue::Single("Olivia".to_string()),
        )]
        .into_iter()
        .collect();

        let err = service
            .submit("contact", &payload, when())
            .expect_err("missing message rejected");

        match err {
            FormError::Rejected { issues } => {
                assert!(issues.contains_key("message"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(store
            .for_form("contact")
            .expect("store readable")
            .is_empty());
        assert!(notifier
            .emails
            .lock()
            .expect("notifier mutex poisoned")
            .is_empty());
    }

    #[test]
    fn unknown_slugs_are_reported() {
        let (service, _, _) = service();

        let err = service.render("missing").expect_err("unknown form");
        assert!(matches!(err, FormError::UnknownForm(slug) if slug == "missing"));
    }
}
