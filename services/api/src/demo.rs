use crate::infra::{
    InMemoryFormNotifier, InMemoryOrderStore, InMemoryPageStore, InMemorySnippetStore,
    InMemorySubmissionStore,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::Args;
use std::collections::BTreeMap;
use std::sync::Arc;

use ovenbird::admin::board::render::{BoardRenderer, ItemContext};
use ovenbird::admin::board::{BoardAdmin, BoardColumn, ChangeSet};
use ovenbird::content::forms::builder::SubmissionPayload;
use ovenbird::content::forms::{FormError, FormSubmissionService, FormValue};
use ovenbird::content::pages::{PageService, PageStoreError};
use ovenbird::content::snippets::SnippetStore;
use ovenbird::error::AppError;
use ovenbird::site::{onboarding_process, orders_board_config, standard_contact_form};

#[derive(Args, Debug, Default)]
pub(crate) struct BoardShowArgs {
    /// Only print the column with this display name
    #[arg(long)]
    pub(crate) column: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Submission date for the form portion (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) submitted_on: Option<NaiveDate>,
    /// Skip the order board portion of the demo.
    #[arg(long)]
    pub(crate) skip_board: bool,
    /// Skip the contact form portion of the demo.
    #[arg(long)]
    pub(crate) skip_form: bool,
}

/// Renderer producing plain text instead of HTML fragments, for terminal
/// output.
struct TextBoardRenderer;

impl BoardRenderer for TextBoardRenderer {
    fn item_title(&self, item: &ItemContext<'_>) -> String {
        let parts: Vec<String> = item
            .fields
            .iter()
            .map(|cell| format!("{}: {}", cell.label, cell.value))
            .collect();
        parts.join(" | ")
    }

    fn column_title(&self, name: &str, count: usize) -> String {
        format!("{name} ({count})")
    }
}

pub(crate) fn run_board_show(args: BoardShowArgs) -> Result<(), AppError> {
    let orders = Arc::new(InMemoryOrderStore::seeded());
    let board = BoardAdmin::new(
        "/admin/api/boards/orders",
        orders_board_config(),
        orders,
    )
    .with_renderer(Arc::new(TextBoardRenderer));
    board.validate()?;
    let columns = board.build()?;

    match args.column {
        Some(wanted) => match columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(&wanted))
        {
            Some(column) => print_column(column),
            None => {
                let names: Vec<&str> = columns.iter().map(|column| column.name.as_str()).collect();
                println!("No column named '{}'. Columns: {}", wanted, names.join(", "));
            }
        },
        None => {
            println!("Orders board");
            for column in &columns {
                print_column(column);
            }
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        submitted_on,
        skip_board,
        skip_form,
    } = args;

    let submitted_at = submitted_on
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .unwrap_or_else(|| Local::now().naive_local());

    println!("Bakery content service demo");

    if !skip_board {
        run_board_portion()?;
    }
    if !skip_form {
        run_form_portion(submitted_at)?;
    }
    run_page_portion(submitted_at);
    run_content_portion();

    Ok(())
}

fn run_board_portion() -> Result<(), AppError> {
    println!("\nOrder board");
    let orders = Arc::new(InMemoryOrderStore::seeded());
    let board = BoardAdmin::new(
        "/admin/api/boards/orders",
        orders_board_config(),
        orders.clone(),
    )
    .with_writer(orders)
    .with_renderer(Arc::new(TextBoardRenderer));
    board.validate()?;

    for column in board.build()? {
        print_column(&column);
    }

    println!("\nDragging order 1 from 'new' to 'done'");
    let changes = ChangeSet::parse(r#"{"item-id-1": ["column-id-2", "column-id-1"]}"#)?;
    match board.apply(&changes)? {
        Some(applied) => println!("Applied {} move(s)", applied.moved),
        None => println!("Board has no writer; changes ignored"),
    }

    println!("\nBoard after the move");
    for column in board.build()? {
        print_column(&column);
    }

    Ok(())
}

fn run_form_portion(submitted_at: NaiveDateTime) -> Result<(), AppError> {
    println!("\nContact form");
    let submissions = Arc::new(InMemorySubmissionStore::default());
    let notifier = Arc::new(InMemoryFormNotifier::default());
    let service = FormSubmissionService::new(
        vec![standard_contact_form()],
        submissions,
        notifier.clone(),
    );

    let model = service.render("contact-us")?;
    println!("'{}' renders as {} fieldsets:", model.title, model.fieldsets.len());
    for fieldset in &model.fieldsets {
        match &fieldset.meta {
            Some(meta) => println!("- {}", meta.label),
            None => println!("- (lead fields)"),
        }
        for bound in &fieldset.fields {
            let marker = if bound.field.required { " *" } else { "" };
            println!("    {}{}", bound.field.label, marker);
        }
    }

    let mut payload: SubmissionPayload = BTreeMap::new();
    payload.insert(
        "your-name".to_string(),
        FormValue::Single("Nora Pemberton".to_string()),
    );
    payload.insert(
        "email-address".to_string(),
        FormValue::Single("nora@harbourmarket.example".to_string()),
    );
    payload.insert(
        "reason".to_string(),
        FormValue::Single("Wholesale".to_string()),
    );
    payload.insert(
        "message".to_string(),
        FormValue::Single("Could you supply forty rye loaves for Saturday's market?".to_string()),
    );

    let receipt = service.submit("contact-us", &payload, submitted_at)?;
    println!("\nAccepted submission {}", receipt.submission_id);
    println!("{}", receipt.thank_you_text);

    for email in notifier.sent() {
        println!("\nNotification to {} ({})", email.to_address, email.subject);
        println!("{}", email.body);
    }

    let empty = SubmissionPayload::new();
    match service.submit("contact-us", &empty, submitted_at) {
        Err(FormError::Rejected { issues }) => {
            println!("\nEmpty submission rejected:");
            for (field, messages) in &issues {
                println!("- {}: {}", field, messages.join(" "));
            }
        }
        Err(err) => println!("\nEmpty submission failed: {}", err),
        Ok(receipt) => println!("\nEmpty submission accepted as {}", receipt.submission_id),
    }

    Ok(())
}

fn run_page_portion(now: NaiveDateTime) {
    println!("\nPage lifecycle");
    let pages = PageService::new(Arc::new(InMemoryPageStore::seeded()));

    match pages.archive("home", now) {
        Ok(outcome) => println!("{}", outcome.message),
        Err(err) => println!("Archive failed: {}", err),
    }

    match pages.delete("home") {
        Err(PageStoreError::Protected(message)) => println!("Delete refused: {}", message),
        Err(err) => println!("Delete failed: {}", err),
        Ok(()) => println!("Page deleted"),
    }
}

fn run_content_portion() {
    println!("\nSeed content");
    let process = onboarding_process();
    let violations = process.validate();
    if violations.is_empty() {
        println!("Process '{}' is structurally valid", process.title);
    } else {
        println!("Process '{}' has violations:", process.title);
        for violation in &violations {
            println!("- {}: {}", violation.block, violation.message);
        }
    }

    let snippets = InMemorySnippetStore::seeded();
    match snippets.people() {
        Ok(people) => {
            println!("Team:");
            for person in people {
                println!("- {} ({})", person.full_name(), person.job_title);
            }
        }
        Err(err) => println!("People unavailable: {}", err),
    }
}

fn print_column(column: &BoardColumn) {
    println!("\n{}", column.title);
    for item in &column.items {
        println!("  [{}] {}", item.id, item.title);
    }
}
