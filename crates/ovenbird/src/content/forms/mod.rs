pub mod builder;
pub mod editor;
pub mod field;
pub mod fieldsets;
pub mod router;
pub mod service;
pub mod submissions;

pub use field::{clean_name, FieldType, FormField, FormValue};
pub use service::{FormDefinition, FormError, FormSubmissionService};
