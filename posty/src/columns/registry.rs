//! ColumnRegistry: the ordered column set of one content type's list table.
//!
//! A registry starts with the host's four built-in columns and is then
//! configured with [`add`](ColumnRegistry::add),
//! [`remove`](ColumnRegistry::remove) and
//! [`reorder`](ColumnRegistry::reorder). [`register`](ColumnRegistry::register)
//! freezes it behind an `Arc` and binds the handlers the host needs to draw
//! and sort the table.

use std::sync::Arc;

use tracing::debug;

use crate::columns::column::{Column, RowId};
use crate::columns::descriptor::ColumnDescriptor;
use crate::columns::hooks::{ColumnCells, ColumnHeadings, ColumnSortQuery, SortableColumns};
use crate::columns::source::ColumnSource;
use crate::error::{PostyError, Result};
use crate::host::{points, ExtensionPoints, Handler, Headings, SortableIds};

/// Built-in columns every list table starts with, in display order.
const DEFAULT_COLUMNS: [(&str, &str); 4] = [
    ("cb", "<input type=\"checkbox\" />"),
    ("title", "Title"),
    ("author", "Author"),
    ("date", "Date"),
];

/// Ordered collection of the columns shown in a content type's list table.
#[derive(Debug, Clone)]
pub struct ColumnRegistry {
    content_type: String,
    items: Vec<Column>,
}

impl ColumnRegistry {
    /// Create a registry for `content_type` holding the built-in columns.
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            items: DEFAULT_COLUMNS
                .iter()
                .map(|(id, label)| Column::builtin(id, label))
                .collect(),
        }
    }

    /// Name of the content type this registry belongs to.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// All columns, in display order.
    pub fn all(&self) -> &[Column] {
        &self.items
    }

    /// Number of columns, built-ins included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when every column has been removed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add columns from descriptors.
    ///
    /// Each descriptor is inserted in turn: at its `order` when given
    /// (clamped to the front or the end), otherwise appended. Positions are
    /// evaluated against the registry as it stands when that descriptor is
    /// processed. Processing stops at the first invalid descriptor; columns
    /// added before it remain.
    pub fn add(&mut self, columns: impl Into<ColumnSource<ColumnDescriptor>>) -> Result<&mut Self> {
        let descriptors = columns.into().resolve(&self.column_ids())?;

        for descriptor in descriptors {
            let column = Column::from_descriptor(descriptor)?;
            if self.position(column.id()).is_some() {
                return Err(PostyError::DuplicateColumn {
                    id: column.id().to_string(),
                });
            }

            let index = match column.order() {
                Some(order) => insertion_index(order, self.items.len()),
                None => self.items.len(),
            };
            debug!(
                content_type = %self.content_type,
                column = %column.id(),
                index,
                "column added"
            );
            self.items.insert(index, column);
        }

        Ok(self)
    }

    /// Remove columns by id. Unknown ids are ignored.
    ///
    /// A deferred source receives the current column ids.
    pub fn remove(&mut self, ids: impl Into<ColumnSource<String>>) -> Result<&mut Self> {
        let ids = ids.into().resolve(&self.column_ids())?;

        for id in ids {
            match self.position(&id) {
                Some(index) => {
                    self.items.remove(index);
                    debug!(content_type = %self.content_type, column = %id, "column removed");
                }
                None => {
                    debug!(content_type = %self.content_type, column = %id, "no column to remove")
                }
            }
        }

        Ok(self)
    }

    /// Reorder columns to follow `ids`.
    ///
    /// Columns named in `ids` fill the slots currently held by named
    /// columns, in the order given. Columns not named keep their slots. A
    /// deferred source receives the current column ids.
    pub fn reorder(&mut self, ids: impl Into<ColumnSource<String>>) -> Result<&mut Self> {
        let target = ids.into().resolve(&self.column_ids())?;
        let rank = |column: &Column| target.iter().position(|id| id == column.id());

        let slots: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, column)| rank(column).is_some())
            .map(|(index, _)| index)
            .collect();

        let mut listed: Vec<Column> = slots.iter().map(|&i| self.items[i].clone()).collect();
        listed.sort_by_key(|column| rank(column));

        for (slot, column) in slots.into_iter().zip(listed) {
            self.items[slot] = column;
        }

        debug!(
            content_type = %self.content_type,
            order = ?self.column_ids(),
            "columns reordered"
        );
        Ok(self)
    }

    /// Find a column by id.
    pub fn find(&self, id: &str) -> Result<&Column> {
        self.items
            .iter()
            .find(|column| column.id() == id)
            .ok_or_else(|| PostyError::ColumnNotFound { id: id.to_string() })
    }

    /// Configure the column `id` in place.
    ///
    /// The edit is applied to a copy and only kept when the resulting id is
    /// non-empty and not held by another column; otherwise the registry is
    /// left unchanged.
    pub fn configure<F>(&mut self, id: &str, configure: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Column),
    {
        let index = self
            .position(id)
            .ok_or_else(|| PostyError::ColumnNotFound { id: id.to_string() })?;

        let mut column = self.items[index].clone();
        configure(&mut column);

        if column.id().is_empty() {
            return Err(PostyError::EmptyColumnId {
                label: column.label().to_string(),
            });
        }
        let taken = self
            .items
            .iter()
            .enumerate()
            .any(|(other, existing)| other != index && existing.id() == column.id());
        if taken {
            return Err(PostyError::DuplicateColumn {
                id: column.id().to_string(),
            });
        }

        debug!(
            content_type = %self.content_type,
            column = %id,
            id = %column.id(),
            "column configured"
        );
        self.items[index] = column;
        Ok(self)
    }

    /// Render the cell of column `id` for `row`.
    pub fn render(&self, id: &str, row: Option<RowId>) -> Result<Option<String>> {
        self.find(id)?.value(row)
    }

    /// Column ids, in display order.
    pub fn column_ids(&self) -> Vec<String> {
        self.items.iter().map(|c| c.id().to_string()).collect()
    }

    /// `id -> label` for every column, in display order.
    pub fn headings(&self) -> Headings {
        self.items
            .iter()
            .map(|c| (c.id().to_string(), c.label().to_string()))
            .collect()
    }

    /// Columns with a sort strategy, in display order.
    pub fn sortable_columns(&self) -> Vec<&Column> {
        self.items
            .iter()
            .filter(|c| c.sort_strategy().is_sortable())
            .collect()
    }

    /// Merge the sortable column ids into the host's existing sortable set.
    pub fn sortable_column_ids(&self, mut existing: SortableIds) -> SortableIds {
        for column in self.sortable_columns() {
            existing.insert(column.id().to_string(), column.id().to_string());
        }
        existing
    }

    /// Freeze the registry and bind its handlers onto the host.
    ///
    /// Binds the headings filter, the cell renderer, the sortable-columns
    /// filter and the query sort rewriter. The returned handle is the same
    /// registry the handlers read from.
    pub fn register(self, host: &mut dyn ExtensionPoints) -> Arc<ColumnRegistry> {
        let registry = Arc::new(self);
        let name = registry.content_type.clone();

        host.on(
            &points::columns(&name),
            Handler::Headings(Arc::new(ColumnHeadings::new(Arc::clone(&registry)))),
            points::DEFAULT_PRIORITY,
            1,
        );
        host.on(
            &points::custom_column(&name),
            Handler::Cell(Arc::new(ColumnCells::new(Arc::clone(&registry)))),
            points::DEFAULT_PRIORITY,
            2,
        );
        host.on(
            &points::sortable_columns(&name),
            Handler::Sortable(Arc::new(SortableColumns::new(Arc::clone(&registry)))),
            points::DEFAULT_PRIORITY,
            1,
        );
        host.on(
            points::PRE_GET_POSTS,
            Handler::Query(Arc::new(ColumnSortQuery::new(Arc::clone(&registry)))),
            points::DEFAULT_PRIORITY,
            1,
        );

        debug!(
            content_type = %name,
            columns = registry.len(),
            sortable = registry.sortable_columns().len(),
            "column handlers registered"
        );
        registry
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|column| column.id() == id)
    }
}

/// Index at which a column with the requested `order` is inserted into a
/// list of `len` columns.
fn insertion_index(order: i64, len: usize) -> usize {
    if order <= 0 {
        0
    } else {
        usize::try_from(order).map_or(len, |order| order.min(len))
    }
}
