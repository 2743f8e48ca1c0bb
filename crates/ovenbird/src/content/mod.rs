//! Content types: structured blocks, dynamic forms, pages, and snippets.

pub mod blocks;
pub mod forms;
pub mod pages;
pub mod snippets;

pub use pages::{Page, PageRepository, PageService, PageStoreError};
pub use snippets::{FooterText, Person, SnippetStore, SnippetStoreError};
