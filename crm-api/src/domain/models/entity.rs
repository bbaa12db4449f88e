//! Traits shared by every stored record.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use time::OffsetDateTime;

use crate::domain::CrmError;

/// A record that can be persisted by an `EntityStore`.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name, used both as the local namespace suffix and the SQL table.
    const COLLECTION: &'static str;

    type Id: AsRef<str> + From<String> + Clone + fmt::Display + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;

    /// The owning record (project for tasks, client for projects, ...).
    fn parent_id(&self) -> Option<&str>;

    fn created_at(&self) -> OffsetDateTime;
}

/// A record that can be created from a client-supplied draft and listed with filters.
pub trait Record: Entity {
    type Draft: DeserializeOwned + Send + 'static;
    type Filter: DeserializeOwned + Default + Send + Sync + 'static;

    fn from_draft(id: Self::Id, draft: Self::Draft, now: OffsetDateTime) -> Result<Self, CrmError>;

    fn matches(&self, filter: &Self::Filter) -> bool;
}

/// A record that may be updated and deleted after creation.
pub trait Editable: Record {
    type Patch: DeserializeOwned + Send + 'static;

    fn apply_patch(&mut self, patch: Self::Patch, now: OffsetDateTime) -> Result<(), CrmError>;
}

/// Case-insensitive substring match over a record's searchable text fields.
pub(crate) fn text_matches<'a>(
    needle: Option<&str>,
    haystack: impl IntoIterator<Item = Option<&'a str>>,
) -> bool {
    let Some(needle) = needle.map(str::trim).filter(|n| !n.is_empty()) else {
        return true;
    };
    let needle = needle.to_lowercase();
    haystack
        .into_iter()
        .flatten()
        .any(|value| value.to_lowercase().contains(&needle))
}

/// Returns true when the filter is unset or equals the value.
pub(crate) fn filter_eq<T: PartialEq>(filter: &Option<T>, value: &T) -> bool {
    filter.as_ref().map_or(true, |expected| expected == value)
}

/// Like [`filter_eq`] for optional record fields; a set filter never matches `None`.
pub(crate) fn filter_eq_opt<T: PartialEq>(filter: &Option<T>, value: Option<&T>) -> bool {
    match filter {
        None => true,
        Some(expected) => value == Some(expected),
    }
}
