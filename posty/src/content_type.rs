//! Content types: labels, registration arguments and list-table columns of
//! one kind of managed item.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::columns::{ColumnDescriptor, ColumnRegistry, ColumnSource};
use crate::error::Result;
use crate::host::{points, ContentTypeRegistrar, ExtensionPoints, Handler, InitHandler};
use crate::slug::slugify;

/// Features a content type supports unless its arguments say otherwise.
const DEFAULT_SUPPORTS: [&str; 6] = [
    "title",
    "editor",
    "excerpt",
    "author",
    "thumbnail",
    "revisions",
];

/// Builder for one content type.
///
/// ```
/// use posty::{ColumnDescriptor, ContentType};
///
/// let mut products = ContentType::new("products", "Product", "Products");
/// products
///     .add_columns(vec![ColumnDescriptor::new("Price", |_| "£900").sort("numeric")])?
///     .remove_columns(["author"])?;
///
/// assert_eq!(products.labels()["add_new_item"], "Add New Product");
/// assert_eq!(products.columns().column_ids(), ["cb", "title", "date", "price"]);
/// # Ok::<(), posty::PostyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ContentType {
    name: String,
    singular: String,
    plural: String,
    labels: IndexMap<String, String>,
    arguments: Map<String, Value>,
    columns: ColumnRegistry,
}

impl ContentType {
    /// Create a content type with the default labels and built-in columns.
    pub fn new(
        name: impl Into<String>,
        singular: impl Into<String>,
        plural: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let mut content_type = Self {
            columns: ColumnRegistry::new(name.clone()),
            name,
            singular: singular.into(),
            plural: plural.into(),
            labels: IndexMap::new(),
            arguments: Map::new(),
        };
        content_type.labels = content_type.default_labels();
        content_type
    }

    /// Alias of [`ContentType::new`].
    pub fn make(
        name: impl Into<String>,
        singular: impl Into<String>,
        plural: impl Into<String>,
    ) -> Self {
        Self::new(name, singular, plural)
    }

    /// Registered name of the content type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Singular display name.
    pub fn singular(&self) -> &str {
        &self.singular
    }

    /// Plural display name.
    pub fn plural(&self) -> &str {
        &self.plural
    }

    /// Current labels, in registration order.
    pub fn labels(&self) -> &IndexMap<String, String> {
        &self.labels
    }

    /// Replace the labels with the defaults overlaid by `labels`.
    pub fn set_labels<K, V>(&mut self, labels: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut merged = self.default_labels();
        merged.extend(labels.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.labels = merged;
        self
    }

    /// Replace the argument overrides. Keys given here win over the defaults.
    pub fn set_arguments(&mut self, arguments: Map<String, Value>) -> &mut Self {
        self.arguments = arguments;
        self
    }

    /// Final registration arguments: the defaults, with the current labels,
    /// overlaid by the overrides.
    pub fn arguments(&self) -> Map<String, Value> {
        let mut merged = self.default_arguments();
        merged.extend(self.arguments.clone());
        merged
    }

    /// The list-table columns.
    pub fn columns(&self) -> &ColumnRegistry {
        &self.columns
    }

    /// The list-table columns, for configuration before registering.
    pub fn columns_mut(&mut self) -> &mut ColumnRegistry {
        &mut self.columns
    }

    /// Add columns. See [`ColumnRegistry::add`].
    pub fn add_columns(
        &mut self,
        columns: impl Into<ColumnSource<ColumnDescriptor>>,
    ) -> Result<&mut Self> {
        self.columns.add(columns)?;
        Ok(self)
    }

    /// Remove columns. See [`ColumnRegistry::remove`].
    pub fn remove_columns(&mut self, ids: impl Into<ColumnSource<String>>) -> Result<&mut Self> {
        self.columns.remove(ids)?;
        Ok(self)
    }

    /// Reorder columns. See [`ColumnRegistry::reorder`].
    pub fn reorder_columns(&mut self, ids: impl Into<ColumnSource<String>>) -> Result<&mut Self> {
        self.columns.reorder(ids)?;
        Ok(self)
    }

    /// Bind the content type and its columns onto the host.
    ///
    /// The content type itself is registered when the host fires
    /// [`points::INIT`]; the column handlers are bound immediately.
    pub fn register(self, host: &mut dyn ExtensionPoints) -> Registration {
        let arguments = self.arguments();
        host.on(
            points::INIT,
            Handler::Init(Arc::new(RegisterContentType {
                name: self.name.clone(),
                arguments,
            })),
            points::DEFAULT_PRIORITY,
            1,
        );
        debug!(content_type = %self.name, "content type registration bound");

        let columns = self.columns.register(host);
        Registration {
            name: self.name,
            columns,
        }
    }

    fn default_labels(&self) -> IndexMap<String, String> {
        let singular = &self.singular;
        let plural = &self.plural;
        let plural_lower = plural.to_lowercase();

        [
            ("name", plural.clone()),
            ("singular_name", singular.clone()),
            ("add_new", "Add New".to_string()),
            ("add_new_item", format!("Add New {singular}")),
            ("edit_item", format!("Edit {singular}")),
            ("new_item", format!("New {singular}")),
            ("all_items", format!("All {plural}")),
            ("view_item", format!("View {plural}")),
            ("search_items", format!("Search {plural}")),
            ("not_found", format!("No {plural_lower} found")),
            (
                "not_found_in_trash",
                format!("No {plural_lower} found in Trash"),
            ),
            ("parent_item_colon", String::new()),
            ("menu_name", plural.clone()),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
    }

    fn default_arguments(&self) -> Map<String, Value> {
        let mut arguments = Map::new();
        arguments.insert("labels".into(), json!(self.labels));
        arguments.insert("public".into(), Value::Bool(true));
        arguments.insert("rewrite".into(), json!({ "slug": slugify(&self.plural) }));
        arguments.insert("has_archive".into(), Value::Bool(true));
        arguments.insert("supports".into(), json!(DEFAULT_SUPPORTS));
        arguments
    }
}

/// Init handler that hands the content type to the host's registrar.
struct RegisterContentType {
    name: String,
    arguments: Map<String, Value>,
}

impl InitHandler for RegisterContentType {
    fn init(&self, registrar: &mut dyn ContentTypeRegistrar) {
        debug!(content_type = %self.name, "registering content type");
        registrar.register_content_type(&self.name, &self.arguments);
    }
}

/// A content type after [`ContentType::register`].
#[derive(Debug, Clone)]
pub struct Registration {
    name: String,
    columns: Arc<ColumnRegistry>,
}

impl Registration {
    /// Registered name of the content type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The frozen column registry the bound handlers read from.
    pub fn columns(&self) -> &Arc<ColumnRegistry> {
        &self.columns
    }
}
