use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::menu::{HomePanel, MenuItem};

/// Explicit admin extension registry. Features register menu items, panels,
/// assets, and routers during startup; `build` validates the whole set and
/// produces the merged admin router. Nothing registers itself as a side
/// effect of being linked in.
#[derive(Default)]
pub struct AdminRegistry {
    menu: Vec<MenuItem>,
    panels: Vec<HomePanel>,
    scripts: Vec<String>,
    stylesheets: Vec<String>,
    routes: Vec<(String, Router)>,
}

/// Menu, panels, and asset URLs served to the admin shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminChrome {
    pub menu: Vec<MenuItem>,
    pub panels: Vec<HomePanel>,
    pub scripts: Vec<String>,
    pub stylesheets: Vec<String>,
}

/// Output of a successful `build`: the merged router plus the chrome it
/// serves at `/admin/api/chrome`.
#[derive(Debug)]
pub struct AdminSite {
    pub router: Router,
    pub chrome: Arc<AdminChrome>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("menu item '{0}' registered twice")]
    DuplicateMenuItem(String),
    #[error("admin route '{0}' registered twice")]
    DuplicateRoute(String),
}

impl AdminRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_menu_item(&mut self, item: MenuItem) {
        self.menu.push(item);
    }

    pub fn register_panel(&mut self, panel: HomePanel) {
        self.panels.push(panel);
    }

    pub fn register_script(&mut self, url: impl Into<String>) {
        self.scripts.push(url.into());
    }

    pub fn register_stylesheet(&mut self, url: impl Into<String>) {
        self.stylesheets.push(url.into());
    }

    /// Mounts a feature router. `path` is the advertised mount path and is
    /// used for duplicate detection; the router itself carries full route
    /// paths.
    pub fn register_routes(&mut self, path: impl Into<String>, router: Router) {
        self.routes.push((path.into(), router));
    }

    /// Validates registrations, sorts menu and panels by `order`, and merges
    /// the feature routers behind the chrome endpoint.
    pub fn build(self) -> Result<AdminSite, RegistryError> {
        let mut names = BTreeSet::new();
        for item in &self.menu {
            if !names.insert(item.name.clone()) {
                return Err(RegistryError::DuplicateMenuItem(item.name.clone()));
            }
        }
        let mut paths = BTreeSet::new();
        for (path, _) in &self.routes {
            if !paths.insert(path.clone()) {
                return Err(RegistryError::DuplicateRoute(path.clone()));
            }
        }

        let mut menu = self.menu;
        menu.sort_by_key(|item| item.order);
        let mut panels = self.panels;
        panels.sort_by_key(|panel| panel.order);

        let chrome = Arc::new(AdminChrome {
            menu,
            panels,
            scripts: self.scripts,
            stylesheets: self.stylesheets,
        });

        let mut router = Router::new()
            .route("/admin/api/chrome", get(chrome_handler))
            .with_state(chrome.clone());
        for (_, feature) in self.routes {
            router = router.merge(feature);
        }

        Ok(AdminSite { router, chrome })
    }
}

async fn chrome_handler(State(chrome): State<Arc<AdminChrome>>) -> Response {
    (StatusCode::OK, Json(chrome.as_ref().clone())).into_response()
}
