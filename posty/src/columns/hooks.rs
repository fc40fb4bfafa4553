//! Handlers a registered [`ColumnRegistry`] binds onto the host.
//!
//! Each handler holds a shared reference to the frozen registry and nothing
//! else.

use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::columns::column::{RowId, SortStrategy};
use crate::columns::registry::ColumnRegistry;
use crate::error::Result;
use crate::host::{
    CellRenderer, Environment, Headings, HeadingsFilter, Query, QueryFilter, SortableFilter,
    SortableIds, META_KEY, META_TYPE, ORDER_BY,
};

/// Query `orderby` value that sorts by the meta field named in `meta_key`.
pub const META_VALUE: &str = "meta_value";

/// `meta_type` hint making the host compare meta values numerically.
pub const NUMERIC_META_TYPE: &str = "numeric";

/// Supplies the registry's headings in place of the host's.
pub struct ColumnHeadings {
    registry: Arc<ColumnRegistry>,
}

impl ColumnHeadings {
    /// Create the handler for a frozen registry.
    pub fn new(registry: Arc<ColumnRegistry>) -> Self {
        Self { registry }
    }
}

impl HeadingsFilter for ColumnHeadings {
    fn filter(&self, _existing: Headings) -> Headings {
        self.registry.headings()
    }
}

/// Renders custom cells through each column's value producer.
pub struct ColumnCells {
    registry: Arc<ColumnRegistry>,
}

impl ColumnCells {
    /// Create the handler for a frozen registry.
    pub fn new(registry: Arc<ColumnRegistry>) -> Self {
        Self { registry }
    }
}

impl CellRenderer for ColumnCells {
    fn render(&self, column: &str, row: RowId) -> Result<Option<String>> {
        self.registry.render(column, Some(row))
    }
}

/// Adds the registry's sortable columns to the host's sortable set.
pub struct SortableColumns {
    registry: Arc<ColumnRegistry>,
}

impl SortableColumns {
    /// Create the handler for a frozen registry.
    pub fn new(registry: Arc<ColumnRegistry>) -> Self {
        Self { registry }
    }
}

impl SortableFilter for SortableColumns {
    fn filter(&self, existing: SortableIds) -> SortableIds {
        self.registry.sortable_column_ids(existing)
    }
}

/// Rewrites the main admin list query when it is ordered by one of the
/// registry's sortable columns.
pub struct ColumnSortQuery {
    registry: Arc<ColumnRegistry>,
}

impl ColumnSortQuery {
    /// Create the handler for a frozen registry.
    pub fn new(registry: Arc<ColumnRegistry>) -> Self {
        Self { registry }
    }
}

impl QueryFilter for ColumnSortQuery {
    fn filter(&self, env: &dyn Environment, query: &mut dyn Query) {
        for column in self.registry.sortable_columns() {
            // The context check runs per column and the first failure ends
            // the whole rewrite.
            if !env.is_admin() || !query.is_main_query() {
                trace!(
                    content_type = %self.registry.content_type(),
                    "not the main admin query, leaving sort untouched"
                );
                return;
            }

            let ordered_by_column =
                matches!(query.get(ORDER_BY), Some(Value::String(key)) if key == column.id());
            if !ordered_by_column {
                continue;
            }

            query.set(ORDER_BY, Value::from(META_VALUE));
            query.set(META_KEY, Value::from(column.id()));
            if column.sort_strategy() == SortStrategy::Numeric {
                query.set(META_TYPE, Value::from(NUMERIC_META_TYPE));
            }
            trace!(
                content_type = %self.registry.content_type(),
                column = %column.id(),
                sort = %column.sort_strategy(),
                "query sort rewritten"
            );
        }
    }
}
