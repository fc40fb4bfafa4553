//! Plain column records, not yet validated into [`Column`](super::Column)s.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::columns::column::{IntoCellValue, Producer, RowId};

/// Describes a column to add to a registry.
///
/// Descriptors can come from code or from YAML/JSON definitions. The value
/// producer never round-trips through serde; definitions bind it later by
/// column id.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip)]
    pub value: Option<Producer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl ColumnDescriptor {
    /// A descriptor with the two required fields set.
    pub fn new<F, R>(label: impl Into<String>, value: F) -> Self
    where
        F: Fn(Option<RowId>) -> R + Send + Sync + 'static,
        R: IntoCellValue,
    {
        Self::default().label(label).value(value)
    }

    /// Set the heading label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the value producer from a closure.
    pub fn value<F, R>(mut self, value: F) -> Self
    where
        F: Fn(Option<RowId>) -> R + Send + Sync + 'static,
        R: IntoCellValue,
    {
        self.value = Some(Arc::new(value));
        self
    }

    /// Set the value producer from an existing shared handle.
    pub fn producer(mut self, producer: Producer) -> Self {
        self.value = Some(producer);
        self
    }

    /// Request an insertion position.
    pub fn order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Use `id` instead of the slug of the label.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the sort value (`numeric` or `alphabetically`).
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("label", &self.label)
            .field("has_value", &self.value.is_some())
            .field("order", &self.order)
            .field("id", &self.id)
            .field("sort", &self.sort)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let descriptor = ColumnDescriptor::new("Price", |_| "£900")
            .order(2)
            .id("price")
            .sort("numeric");

        assert_eq!(descriptor.label.as_deref(), Some("Price"));
        assert!(descriptor.value.is_some());
        assert_eq!(descriptor.order, Some(2));
        assert_eq!(descriptor.id.as_deref(), Some("price"));
        assert_eq!(descriptor.sort.as_deref(), Some("numeric"));
    }

    #[test]
    fn deserializes_without_producer() {
        let descriptor: ColumnDescriptor = serde_json::from_value(serde_json::json!({
            "label": "Price",
            "order": 0,
            "sort": "numeric"
        }))
        .unwrap();

        assert_eq!(descriptor.label.as_deref(), Some("Price"));
        assert!(descriptor.value.is_none());
        assert_eq!(descriptor.order, Some(0));
        assert_eq!(descriptor.id, None);
    }

    #[test]
    fn yaml_round_trip_skips_producer() {
        let descriptor = ColumnDescriptor::new("Photo", |_| "photo.jpg").id("photo");
        let yaml = serde_yaml_ng::to_string(&descriptor).unwrap();
        assert!(yaml.contains("label: Photo"));
        assert!(!yaml.contains("value"));

        let parsed: ColumnDescriptor = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(parsed.id.as_deref(), Some("photo"));
        assert!(parsed.value.is_none());
    }
}
