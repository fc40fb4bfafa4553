//! YAML content type definitions.
//!
//! A definition carries everything about a content type except its value
//! producers, which are code. [`Producers`] binds them by column id when
//! the definition is built.
//!
//! ```yaml
//! name: products
//! singular: Product
//! plural: Products
//! labels:
//!   menu_name: Shop
//! columns:
//!   remove: [author]
//!   add:
//!     - { label: Price, order: 2, sort: numeric }
//!   reorder: [cb, price, title, date]
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::columns::{ColumnDescriptor, IntoCellValue, Producer, RowId};
use crate::content_type::ContentType;
use crate::error::Result;
use crate::slug::slugify;

/// Declarative form of a [`ContentType`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentTypeDef {
    pub name: String,
    pub singular: String,
    pub plural: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub labels: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub arguments: Map<String, Value>,
    #[serde(default)]
    pub columns: ColumnsDef,
}

/// Column changes applied on top of the built-in columns, in field order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnsDef {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<ColumnDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reorder: Vec<String>,
}

/// Value producers keyed by column id.
#[derive(Default)]
pub struct Producers {
    by_id: IndexMap<String, Producer>,
}

impl Producers {
    /// Create an empty producer table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a producer to the column `id`.
    pub fn with<F, R>(mut self, id: impl Into<String>, value: F) -> Self
    where
        F: Fn(Option<RowId>) -> R + Send + Sync + 'static,
        R: IntoCellValue,
    {
        self.by_id.insert(id.into(), std::sync::Arc::new(value));
        self
    }

    /// Producer bound to the column `id`, if any.
    pub fn get(&self, id: &str) -> Option<&Producer> {
        self.by_id.get(id)
    }
}

impl ContentTypeDef {
    /// Parse a definition from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Serialize the definition to YAML. Producers are not included.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Build the content type, binding producers to added columns by id.
    ///
    /// Labels and arguments are applied first, then column removals,
    /// additions and the reorder. An added column with no bound producer
    /// fails as a descriptor without a value.
    pub fn build(self, producers: &Producers) -> Result<ContentType> {
        let mut content_type = ContentType::new(self.name, self.singular, self.plural);
        if !self.labels.is_empty() {
            content_type.set_labels(self.labels);
        }
        if !self.arguments.is_empty() {
            content_type.set_arguments(self.arguments);
        }

        let ColumnsDef {
            remove,
            add,
            reorder,
        } = self.columns;

        let add: Vec<ColumnDescriptor> = add
            .into_iter()
            .map(|descriptor| bind_producer(descriptor, producers))
            .collect();

        content_type.remove_columns(remove)?.add_columns(add)?;
        if !reorder.is_empty() {
            content_type.reorder_columns(reorder)?;
        }

        debug!(
            content_type = %content_type.name(),
            columns = ?content_type.columns().column_ids(),
            "content type built from definition"
        );
        Ok(content_type)
    }
}

fn bind_producer(mut descriptor: ColumnDescriptor, producers: &Producers) -> ColumnDescriptor {
    if descriptor.value.is_some() {
        return descriptor;
    }
    let id = match (&descriptor.id, &descriptor.label) {
        (Some(id), _) => id.clone(),
        (None, Some(label)) => slugify(label),
        (None, None) => return descriptor,
    };
    descriptor.value = producers.get(&id).cloned();
    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::SortStrategy;
    use crate::error::PostyError;

    const PRODUCTS: &str = r#"
name: products
singular: Product
plural: Products
labels:
  menu_name: Shop
arguments:
  public: false
columns:
  remove: [author]
  add:
    - { label: Price, order: 2, sort: numeric }
    - { label: Photo, id: photo_url }
  reorder: [cb, price, title, date]
"#;

    fn producers() -> Producers {
        Producers::new()
            .with("price", |_| "£900")
            .with("photo_url", |_| "photo.jpg")
    }

    #[test]
    fn parses_yaml() {
        let def = ContentTypeDef::from_yaml(PRODUCTS).unwrap();
        assert_eq!(def.name, "products");
        assert_eq!(def.labels["menu_name"], "Shop");
        assert_eq!(def.columns.remove, vec!["author"]);
        assert_eq!(def.columns.add.len(), 2);
        assert_eq!(def.columns.add[0].order, Some(2));
    }

    #[test]
    fn builds_content_type() {
        let products = ContentTypeDef::from_yaml(PRODUCTS)
            .unwrap()
            .build(&producers())
            .unwrap();

        assert_eq!(products.labels()["menu_name"], "Shop");
        assert_eq!(products.arguments()["public"], Value::Bool(false));
        assert_eq!(
            products.columns().column_ids(),
            vec!["cb", "price", "title", "date", "photo_url"]
        );

        let price = products.columns().find("price").unwrap();
        assert_eq!(price.sort_strategy(), SortStrategy::Numeric);
        assert_eq!(price.value(Some(1)).unwrap().as_deref(), Some("£900"));
    }

    #[test]
    fn unbound_column_is_missing_its_value() {
        let err = ContentTypeDef::from_yaml(PRODUCTS)
            .unwrap()
            .build(&Producers::new().with("price", |_| "£900"))
            .unwrap_err();
        assert!(matches!(err, PostyError::MissingField { field: "value" }));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let err = ContentTypeDef::from_yaml("name: [unterminated").unwrap_err();
        assert!(matches!(err, PostyError::Yaml(_)));
    }

    #[test]
    fn minimal_definition_keeps_defaults() {
        let def = ContentTypeDef::from_yaml("name: faq\nsingular: Question\nplural: Questions\n")
            .unwrap();
        let faq = def.build(&Producers::new()).unwrap();
        assert_eq!(faq.columns().column_ids(), vec!["cb", "title", "author", "date"]);
        assert_eq!(faq.labels()["name"], "Questions");
    }

    #[test]
    fn to_yaml_round_trips() {
        let def = ContentTypeDef::from_yaml(PRODUCTS).unwrap();
        let yaml = def.to_yaml().unwrap();
        let parsed = ContentTypeDef::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.columns.reorder, def.columns.reorder);
        assert_eq!(parsed.columns.add[1].id.as_deref(), Some("photo_url"));
    }
}
