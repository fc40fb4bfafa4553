//! List-table columns and the registry that orders them.

pub mod column;
pub mod descriptor;
pub mod hooks;
pub mod registry;
pub mod source;

pub use column::{Column, IntoCellValue, Producer, RowId, SortStrategy, ValueProducer};
pub use descriptor::ColumnDescriptor;
pub use hooks::{ColumnCells, ColumnHeadings, ColumnSortQuery, SortableColumns};
pub use registry::ColumnRegistry;
pub use source::ColumnSource;
