//! Admin surface: the explicit extension registry, menu/panel chrome, and
//! the kanban board admins.

pub mod board;
pub mod menu;
pub mod registry;

pub use board::{BoardAdmin, BoardConfig, ReadOnlyBoard};
pub use menu::{HomePanel, MenuItem};
pub use registry::{AdminChrome, AdminRegistry, AdminSite, RegistryError};
