use serde::Serialize;

use crate::content::forms::builder::{BoundField, BoundForm};
use crate::content::forms::field::{FieldType, FormField};

/// Presentation metadata for one fieldset, seeded from the marker field that
/// opened it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldsetMeta {
    pub id: String,
    pub label: String,
    pub help_text: String,
}

impl FieldsetMeta {
    fn from_marker(marker: &FormField) -> Self {
        Self {
            id: format!("fieldset-{}", marker.clean_name),
            label: marker.label.clone(),
            help_text: marker.help_text.clone(),
        }
    }
}

/// One planned group: the clean names of its member fields plus optional
/// metadata. The leading group before any marker has no metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldsetGroup {
    pub meta: Option<FieldsetMeta>,
    pub members: Vec<String>,
}

/// Precomputed grouping of a form's fields, split at marker fields. Built once
/// per form build and applied to any number of bound forms afterwards.
#[derive(Debug, Clone)]
pub struct FieldsetPlan {
    groups: Vec<FieldsetGroup>,
}

impl FieldsetPlan {
    /// Single left-to-right scan over the ordered field list. A marker closes
    /// the group being accumulated and opens a new one carrying the marker's
    /// own label and help text; every other field appends its clean name to
    /// the open group.
    ///
    /// A group with no members is dropped unless `allow_empty` is set and the
    /// group has metadata, so an anonymous leading group never survives empty.
    pub fn prepare(fields: &[FormField], allow_empty: bool, marker: FieldType) -> Self {
        let mut groups: Vec<FieldsetGroup> = Vec::new();
        let mut current = FieldsetGroup {
            meta: None,
            members: Vec::new(),
        };

        for field in fields {
            if field.field_type == marker {
                Self::close(&mut groups, current, allow_empty);
                current = FieldsetGroup {
                    meta: Some(FieldsetMeta::from_marker(field)),
                    members: Vec::new(),
                };
            } else {
                current.members.push(field.clean_name.clone());
            }
        }
        Self::close(&mut groups, current, allow_empty);

        Self { groups }
    }

    fn close(groups: &mut Vec<FieldsetGroup>, group: FieldsetGroup, allow_empty: bool) {
        if !group.members.is_empty() || (allow_empty && group.meta.is_some()) {
            groups.push(group);
        }
    }

    pub fn groups(&self) -> &[FieldsetGroup] {
        &self.groups
    }

    /// Resolves the planned member names against a bound form, yielding the
    /// ordered fieldsets a template renders. Names the bound form does not
    /// know are skipped; the uniqueness of clean names is the caller's
    /// responsibility.
    pub fn apply(&self, form: &BoundForm) -> Vec<BoundFieldset> {
        self.groups
            .iter()
            .map(|group| BoundFieldset {
                meta: group.meta.clone(),
                fields: group
                    .members
                    .iter()
                    .filter_map(|name| form.field(name).cloned())
                    .collect(),
            })
            .collect()
    }
}

/// A fieldset resolved against one bound form, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct BoundFieldset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<FieldsetMeta>,
    pub fields: Vec<BoundField>,
}
