use std::collections::BTreeMap;

use serde::Serialize;

/// One admin menu entry. `name` is the stable registration key; `order`
/// controls placement, lower values first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub order: u32,
    pub url: String,
    /// Extra anchor attributes, e.g. `target`/`rel` on external links.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            icon: None,
            order: 1000,
            url: url.into(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}

/// Dashboard panel fragment, sorted by `order` ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomePanel {
    pub order: u32,
    pub html: String,
}

impl HomePanel {
    pub fn new(order: u32, html: impl Into<String>) -> Self {
        Self {
            order,
            html: html.into(),
        }
    }
}
