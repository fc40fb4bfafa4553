//! Boundary with the host platform.
//!
//! posty never renders, persists or queries anything itself. Everything it
//! produces is handed to the host through the traits in this module:
//!
//! - [`ExtensionPoints`] accepts typed [`Handler`]s for named extension points
//! - [`ContentTypeRegistrar`] receives the final content type arguments
//! - [`Query`] is the host's mutable list query
//! - [`Environment`] answers context checks such as "is this the admin area"

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::columns::RowId;
use crate::error::Result;

/// Ordered `id -> label` mapping used for table headings.
pub type Headings = IndexMap<String, String>;

/// Ordered `id -> id` mapping the host uses as its set of sortable columns.
pub type SortableIds = IndexMap<String, String>;

/// Host query parameter holding the active sort key.
pub const ORDER_BY: &str = "orderby";
/// Host query parameter naming the meta field to sort on.
pub const META_KEY: &str = "meta_key";
/// Host query parameter hinting how meta values compare.
pub const META_TYPE: &str = "meta_type";

/// Registers handlers against named host extension points.
///
/// Multiple handlers per point are allowed. `priority` and `accepted_args`
/// are passed through untouched; their meaning belongs to the host.
pub trait ExtensionPoints {
    fn on(&mut self, point: &str, handler: Handler, priority: i32, accepted_args: usize);
}

/// Receives content type registrations.
pub trait ContentTypeRegistrar {
    fn register_content_type(&mut self, name: &str, arguments: &Map<String, Value>);
}

/// The host's list query.
pub trait Query {
    /// Current value of a query parameter
    fn get(&self, name: &str) -> Option<&Value>;

    /// Replace a query parameter
    fn set(&mut self, name: &str, value: Value);

    /// Whether this is the main query of the current request
    fn is_main_query(&self) -> bool;
}

/// Host context checks.
pub trait Environment {
    /// Whether the current request is served in the admin area
    fn is_admin(&self) -> bool;
}

/// Runs when the host fires its initialisation point.
pub trait InitHandler: Send + Sync {
    fn init(&self, registrar: &mut dyn ContentTypeRegistrar);
}

/// Supplies the table headings.
pub trait HeadingsFilter: Send + Sync {
    fn filter(&self, existing: Headings) -> Headings;
}

/// Produces the value of one cell.
pub trait CellRenderer: Send + Sync {
    /// Render `column` for `row`. `Ok(None)` means there is nothing to emit.
    fn render(&self, column: &str, row: RowId) -> Result<Option<String>>;
}

/// Extends the host's set of sortable columns.
pub trait SortableFilter: Send + Sync {
    fn filter(&self, existing: SortableIds) -> SortableIds;
}

/// Adjusts a query before the host runs it.
pub trait QueryFilter: Send + Sync {
    fn filter(&self, env: &dyn Environment, query: &mut dyn Query);
}

/// A typed handler bound to an extension point.
#[derive(Clone)]
pub enum Handler {
    Init(Arc<dyn InitHandler>),
    Headings(Arc<dyn HeadingsFilter>),
    Cell(Arc<dyn CellRenderer>),
    Sortable(Arc<dyn SortableFilter>),
    Query(Arc<dyn QueryFilter>),
}

impl Handler {
    /// Short name of the handler kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Handler::Init(_) => "init",
            Handler::Headings(_) => "headings",
            Handler::Cell(_) => "cell",
            Handler::Sortable(_) => "sortable",
            Handler::Query(_) => "query",
        }
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Handler").field(&self.kind()).finish()
    }
}

/// Extension point names and priorities, scoped per content type.
pub mod points {
    /// Priority the host uses when none is given.
    pub const DEFAULT_PRIORITY: i32 = 10;

    /// Fired once the host is ready to accept content type registrations.
    pub const INIT: &str = "init";

    /// Fired before the host runs any list query.
    ///
    /// The point is not scoped per content type. Every registered content
    /// type binds its sort rewriter here, and a rewriter does not check
    /// which content type the query lists. When two content types have a
    /// sortable column with the same id, the first rewriter to run claims
    /// any query ordered by that id.
    pub const PRE_GET_POSTS: &str = "pre_get_posts";

    /// Filter for the list-table headings of a content type.
    pub fn columns(content_type: &str) -> String {
        format!("manage_{content_type}_posts_columns")
    }

    /// Action rendering a custom cell of a content type's list table.
    pub fn custom_column(content_type: &str) -> String {
        format!("manage_{content_type}_posts_custom_column")
    }

    /// Filter for the sortable columns of a content type's list table.
    pub fn sortable_columns(content_type: &str) -> String {
        format!("manage_edit-{content_type}_sortable_columns")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_scoped_by_content_type() {
        assert_eq!(points::columns("products"), "manage_products_posts_columns");
        assert_eq!(
            points::custom_column("products"),
            "manage_products_posts_custom_column"
        );
        assert_eq!(
            points::sortable_columns("products"),
            "manage_edit-products_sortable_columns"
        );
    }

    struct NoopInit;

    impl InitHandler for NoopInit {
        fn init(&self, _registrar: &mut dyn ContentTypeRegistrar) {}
    }

    #[test]
    fn handler_debug_shows_kind() {
        let handler = Handler::Init(Arc::new(NoopInit));
        assert_eq!(handler.kind(), "init");
        assert_eq!(format!("{handler:?}"), "Handler(\"init\")");
    }
}
