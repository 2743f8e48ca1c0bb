use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use ovenbird::admin::board::{BoardError, BoardSource, ColumnWriteError, ColumnWriter};
use ovenbird::content::forms::submissions::{
    FormEmail, FormNotifier, NotifyError, SubmissionRecord, SubmissionRepository,
    SubmissionStoreError,
};
use ovenbird::content::pages::{Page, PageRepository, PageStoreError};
use ovenbird::content::snippets::{FooterText, Person, SnippetStore, SnippetStoreError};
use ovenbird::site::{
    footer_text, standard_home_page, standard_orders, standard_people, ProductionOrder,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Order store backing the admin board: the board reads the full collection
/// and writes status changes back per dropped card.
#[derive(Clone)]
pub(crate) struct InMemoryOrderStore {
    orders: Arc<Mutex<Vec<ProductionOrder>>>,
}

impl InMemoryOrderStore {
    pub(crate) fn seeded() -> Self {
        Self {
            orders: Arc::new(Mutex::new(standard_orders())),
        }
    }
}

impl BoardSource for InMemoryOrderStore {
    type Record = ProductionOrder;

    fn records(&self) -> Result<Vec<ProductionOrder>, BoardError> {
        Ok(self.orders.lock().expect("order mutex poisoned").clone())
    }
}

impl ColumnWriter for InMemoryOrderStore {
    fn write_column(
        &self,
        pk: &str,
        field: &str,
        value: Option<&str>,
    ) -> Result<(), ColumnWriteError> {
        if field != "status" {
            return Err(ColumnWriteError::ReadOnly(field.to_string()));
        }
        let id: u64 = pk
            .parse()
            .map_err(|_| ColumnWriteError::NotFound(pk.to_string()))?;
        let mut orders = self.orders.lock().expect("order mutex poisoned");
        let order = orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or_else(|| ColumnWriteError::NotFound(pk.to_string()))?;
        order.status = value.map(str::to_string);
        Ok(())
    }
}

#[derive(Clone)]
pub(crate) struct InMemoryPageStore {
    pages: Arc<Mutex<Vec<Page>>>,
}

impl InMemoryPageStore {
    pub(crate) fn seeded() -> Self {
        Self {
            pages: Arc::new(Mutex::new(vec![standard_home_page()])),
        }
    }
}

impl PageRepository for InMemoryPageStore {
    fn all(&self) -> Result<Vec<Page>, PageStoreError> {
        Ok(self.pages.lock().expect("page mutex poisoned").clone())
    }

    fn find(&self, slug: &str) -> Result<Page, PageStoreError> {
        let pages = self.pages.lock().expect("page mutex poisoned");
        pages
            .iter()
            .find(|page| page.slug == slug)
            .cloned()
            .ok_or_else(|| PageStoreError::NotFound(slug.to_string()))
    }

    fn update(&self, page: Page) -> Result<(), PageStoreError> {
        let mut pages = self.pages.lock().expect("page mutex poisoned");
        match pages.iter_mut().find(|existing| existing.slug == page.slug) {
            Some(existing) => {
                *existing = page;
                Ok(())
            }
            None => Err(PageStoreError::NotFound(page.slug)),
        }
    }
}

pub(crate) struct InMemorySnippetStore {
    people: Vec<Person>,
    footer: Option<FooterText>,
}

impl InMemorySnippetStore {
    pub(crate) fn seeded() -> Self {
        Self {
            people: standard_people(),
            footer: Some(footer_text()),
        }
    }
}

impl SnippetStore for InMemorySnippetStore {
    fn people(&self) -> Result<Vec<Person>, SnippetStoreError> {
        Ok(self.people.clone())
    }

    fn footer(&self) -> Result<Option<FooterText>, SnippetStoreError> {
        Ok(self.footer.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionStore {
    records: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl SubmissionRepository for InMemorySubmissionStore {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, SubmissionStoreError> {
        let mut records = self.records.lock().expect("submission mutex poisoned");
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
        let records = self.records.lock().expect("submission mutex poisoned");
        Ok(records
            .iter()
            .filter(|record| record.form_slug == form_slug)
            .cloned()
            .collect())
    }
}

/// Notifier that records outbound form emails instead of sending them.
#[derive(Default, Clone)]
pub(crate) struct InMemoryFormNotifier {
    emails: Arc<Mutex<Vec<FormEmail>>>,
}

impl InMemoryFormNotifier {
    pub(crate) fn sent(&self) -> Vec<FormEmail> {
        self.emails.lock().expect("notifier mutex poisoned").clone()
    }
}

impl FormNotifier for InMemoryFormNotifier {
    fn notify(&self, email: FormEmail) -> Result<(), NotifyError> {
        let mut emails = self.emails.lock().expect("notifier mutex poisoned");
        emails.push(email);
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
