//! Declarative content types and list-table columns for CMS hosts
//!
//! `posty` prepares structured descriptions of a content type (labels,
//! registration arguments, list-table columns) and hands them to a host
//! platform at its extension points. The host keeps ownership of
//! rendering, persistence and querying; posty only talks to it through the
//! traits in [`host`].
//!
//! # Architecture
//!
//! - **Columns**: [`Column`]s with deferred value producers, kept in display
//!   order by a [`ColumnRegistry`] that starts with the host's built-in columns
//! - **Registration**: [`ColumnRegistry::register`] freezes the registry and
//!   binds typed [`Handler`]s for headings, cells, sortable columns and query
//!   sorting
//! - **Content types**: [`ContentType`] wraps labels, arguments and columns
//! - **Definitions**: [`ContentTypeDef`] loads all of the above from YAML,
//!   binding value producers by column id
//!
//! ```
//! use posty::{ColumnDescriptor, ColumnRegistry};
//!
//! let mut columns = ColumnRegistry::new("products");
//! columns
//!     .add(vec![ColumnDescriptor::new("Price", |_| "£900").order(1).sort("numeric")])?
//!     .remove(["author"])?
//!     .reorder(["cb", "title", "price"])?;
//!
//! assert_eq!(columns.column_ids(), ["cb", "title", "price", "date"]);
//! assert_eq!(columns.find("price")?.value(Some(7))?.as_deref(), Some("£900"));
//! # Ok::<(), posty::PostyError>(())
//! ```

pub mod columns;
pub mod content_type;
pub mod definition;
pub mod error;
pub mod host;
pub mod slug;

pub use columns::{
    Column, ColumnDescriptor, ColumnRegistry, ColumnSource, IntoCellValue, Producer, RowId,
    SortStrategy, ValueProducer,
};
pub use content_type::{ContentType, Registration};
pub use definition::{ColumnsDef, ContentTypeDef, Producers};
pub use error::{PostyError, Result, ValueError};
pub use host::{
    ContentTypeRegistrar, Environment, ExtensionPoints, Handler, Headings, Query, SortableIds,
};
pub use slug::slugify;
