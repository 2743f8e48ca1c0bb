//! Integration scenarios for the dynamic form pipeline: fieldset grouping,
//! validation, submission storage, and notification, exercised through the
//! service facade and the HTTP router.

mod common {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use ovenbird::content::forms::builder::SubmissionPayload;
    use ovenbird::content::forms::submissions::{
        FormEmail, FormNotifier, NotifyError, SubmissionRecord, SubmissionRepository,
        SubmissionStoreError,
    };
    use ovenbird::content::forms::{FormSubmissionService, FormValue};
    use ovenbird::site::standard_contact_form;

    #[derive(Default)]
    pub(super) struct MemorySubmissions {
        records: Mutex<Vec<SubmissionRecord>>,
    }

    impl MemorySubmissions {
        pub(super) fn records(&self) -> Vec<SubmissionRecord> {
            self.records.lock().expect("lock").clone()
        }
    }

    impl SubmissionRepository for MemorySubmissions {
        fn insert(
            &self,
            record: SubmissionRecord,
        ) -> Result<SubmissionRecord, SubmissionStoreError> {
            let mut records = self.records.lock().expect("lock");
            if records
                .iter()
                .any(|existing| existing.submission_id == record.submission_id)
            {
                return Err(SubmissionStoreError::Conflict);
            }
            records.push(record.clone());
            Ok(record)
        }

        fn for_form(&self, form_slug: &str) -> Result<Vec<SubmissionRecord>, SubmissionStoreError> {
            let records = self.records.lock().expect("lock");
            Ok(records
                .iter()
                .filter(|record| record.form_slug == form_slug)
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    pub(super) struct MemoryNotifier {
        emails: Mutex<Vec<FormEmail>>,
    }

    impl MemoryNotifier {
        pub(super) fn emails(&self) -> Vec<FormEmail> {
            self.emails.lock().expect("lock").clone()
        }
    }

    impl FormNotifier for MemoryNotifier {
        fn notify(&self, email: FormEmail) -> Result<(), NotifyError> {
            self.emails.lock().expect("lock").push(email);
            Ok(())
        }
    }

    pub(super) fn build_service() -> (
        Arc<FormSubmissionService<MemorySubmissions, MemoryNotifier>>,
        Arc<MemorySubmissions>,
        Arc<MemoryNotifier>,
    ) {
        let repository = Arc::new(MemorySubmissions::default());
        let notifier = Arc::new(MemoryNotifier::default());
        let service = Arc::new(FormSubmissionService::new(
            vec![standard_contact_form()],
            repository.clone(),
            notifier.clone(),
        ));
        (service, repository, notifier)
    }

    pub(super) fn valid_payload() -> SubmissionPayload {
        let mut payload = BTreeMap::new();
        payload.insert(
            "your-name".to_string(),
            FormValue::Single("June Okafor".to_string()),
        );
        payload.insert(
            "email-address".to_string(),
            FormValue::Single("june@example.com".to_string()),
        );
        payload.insert(
            "phone-number".to_string(),
            FormValue::Single("01632 960417".to_string()),
        );
        payload.insert(
            "reason".to_string(),
            FormValue::Single("Wholesale".to_string()),
        );
        payload.insert(
            "message".to_string(),
            FormValue::Single("Do you supply rye loaves to cafes?".to_string()),
        );
        payload
    }

    pub(super) fn noon() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2025, 11, 3)
            .expect("valid date")
            .and_hms_opt(12, 0, 0)
            .expect("valid time")
    }
}

mod rendering {
    use super::common::*;

    #[test]
    fn render_model_groups_fields_at_section_markers() {
        let (service, _, _) = build_service();

        let model = service.render("contact-us").expect("render succeeds");

        assert_eq!(model.fieldsets.len(), 3);
        assert!(model.fieldsets[0].meta.is_none());
        let contact = model.fieldsets[1]
            .meta
            .as_ref()
            .expect("second group has metadata");
        assert_eq!(contact.id, "fieldset-contact-details");
        assert_eq!(contact.label, "Contact details");
        assert_eq!(contact.help_text, "How should we reach you?");

        let member_names: Vec<&str> = model.fieldsets[1]
            .fields
            .iter()
            .map(|field| field.field.clean_name.as_str())
            .collect();
        assert_eq!(member_names, ["email-address", "phone-number"]);
    }

    #[test]
    fn section_markers_are_not_answerable() {
        let (service, _, _) = build_service();

        let model = service.render("contact-us").expect("render succeeds");

        let all_fields: Vec<&str> = model
            .fieldsets
            .iter()
            .flat_map(|fieldset| {
                fieldset
                    .fields
                    .iter()
                    .map(|field| field.field.clean_name.as_str())
            })
            .collect();
        assert!(!all_fields.contains(&"contact-details"));
        assert!(!all_fields.contains(&"your-enquiry"));
        assert_eq!(all_fields.len(), 5);
    }
}

mod submissions {
    use super::common::*;
    use ovenbird::content::forms::FormError;

    #[test]
    fn valid_submissions_are_stored_and_notified() {
        let (service, repository, notifier) = build_service();

        let receipt = service
            .submit("contact-us", &valid_payload(), noon())
            .expect("submission accepted");

        assert!(receipt.submission_id.starts_with("sub-"));
        assert_eq!(
            receipt.thank_you_text,
            "Thank you for getting in touch. We reply within two working days."
        );

        let stored = repository.records();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].form_slug, "contact-us");
        assert_eq!(stored[0].submitted_at, noon());

        let emails = notifier.emails();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].to_address, "counter@oldegreentree.example");
        assert_eq!(emails[0].subject, "Contact form submission");
        assert!(emails[0].body.contains("Email address: june@example.com"));
        assert!(emails[0]
            .body
            .contains("Message: Do you supply rye loaves to cafes?"));
    }

    #[test]
    fn missing_required_fields_reject_the_submission() {
        let (service, repository, _) = build_service();
        let mut payload = valid_payload();
        payload.remove("message");

        let error = service
            .submit("contact-us", &payload, noon())
            .expect_err("submission rejected");

        match error {
            FormError::Rejected { issues } => {
                assert_eq!(
                    issues.get("message").map(Vec::as_slice),
                    Some(&["This field is required.".to_string()][..])
                );
            }
            other => panic!("expected a rejected submission, got {other:?}"),
        }
        assert!(repository.records().is_empty());
    }

    #[test]
    fn invalid_email_addresses_are_rejected_with_the_field_message() {
        let (service, _, _) = build_service();
        let mut payload = valid_payload();
        payload.insert(
            "email-address".to_string(),
            ovenbird::content::forms::FormValue::Single("not-an-address".to_string()),
        );

        let error = service
            .submit("contact-us", &payload, noon())
            .expect_err("submission rejected");

        match error {
            FormError::Rejected { issues } => {
                assert_eq!(
                    issues.get("email-address").map(Vec::as_slice),
                    Some(&["Enter a valid email address.".to_string()][..])
                );
            }
            other => panic!("expected a rejected submission, got {other:?}"),
        }
    }
}

mod routing {
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::common::*;
    use ovenbird::content::forms::router::form_router;

    async fn read_json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn get_renders_the_grouped_form() {
        let (service, _, _) = build_service();

        let response = form_router(service)
            .oneshot(
                Request::get("/api/v1/forms/contact-us")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["fieldsets"].as_array().map(Vec::len), Some(3));
        assert_eq!(payload["fieldsets"][1]["meta"]["label"], "Contact details");
    }

    #[tokio::test]
    async fn get_unknown_forms_is_not_found() {
        let (service, _, _) = build_service();

        let response = form_router(service)
            .oneshot(
                Request::get("/api/v1/forms/missing")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn post_accepts_valid_submissions() {
        let (service, repository, _) = build_service();

        let body = json!({
            "your-name": "June Okafor",
            "email-address": "june@example.com",
            "message": "Do you supply rye loaves to cafes?",
        });
        let response = form_router(service)
            .oneshot(
                Request::post("/api/v1/forms/contact-us")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&body).expect("serializes")))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let payload = read_json_body(response).await;
        assert!(payload.get("submission_id").is_some());
        assert_eq!(repository.records().len(), 1);
    }

    #[tokio::test]
    async fn post_reports_field_errors_as_unprocessable() {
        let (service, repository, _) = build_service();

        let body = json!({
            "your-name": "June Okafor",
        });
        let response = form_router(service)
            .oneshot(
                Request::post("/api/v1/forms/contact-us")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&body).expect("serializes")))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let payload = read_json_body(response).await;
        assert_eq!(
            payload["errors"]["email-address"][0],
            "This field is required."
        );
        assert_eq!(payload["errors"]["message"][0], "This field is required.");
        assert!(repository.records().is_empty());
    }
}
