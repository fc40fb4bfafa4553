//! A single list-table column.

use std::fmt;
use std::sync::Arc;

use crate::columns::descriptor::ColumnDescriptor;
use crate::error::{PostyError, Result, ValueError};
use crate::slug::slugify;

/// Identifier of the row (content item) a cell is rendered for.
pub type RowId = u64;

/// Shared handle to a value producer.
pub type Producer = Arc<dyn ValueProducer>;

/// Computes a column's cell value for one row.
///
/// Implemented for any `Fn(Option<RowId>) -> R` where `R` is a string, an
/// optional string, or a `Result` of either.
pub trait ValueProducer: Send + Sync {
    fn produce(&self, row: Option<RowId>) -> std::result::Result<Option<String>, ValueError>;
}

impl<F, R> ValueProducer for F
where
    F: Fn(Option<RowId>) -> R + Send + Sync,
    R: IntoCellValue,
{
    fn produce(&self, row: Option<RowId>) -> std::result::Result<Option<String>, ValueError> {
        self(row).into_cell_value()
    }
}

/// Conversion of a producer's return value into a cell value.
pub trait IntoCellValue {
    fn into_cell_value(self) -> std::result::Result<Option<String>, ValueError>;
}

impl IntoCellValue for String {
    fn into_cell_value(self) -> std::result::Result<Option<String>, ValueError> {
        Ok(Some(self))
    }
}

impl IntoCellValue for &str {
    fn into_cell_value(self) -> std::result::Result<Option<String>, ValueError> {
        Ok(Some(self.to_string()))
    }
}

impl IntoCellValue for Option<String> {
    fn into_cell_value(self) -> std::result::Result<Option<String>, ValueError> {
        Ok(self)
    }
}

impl IntoCellValue for Option<&str> {
    fn into_cell_value(self) -> std::result::Result<Option<String>, ValueError> {
        Ok(self.map(str::to_string))
    }
}

impl<T, E> IntoCellValue for std::result::Result<T, E>
where
    T: IntoCellValue,
    E: Into<ValueError>,
{
    fn into_cell_value(self) -> std::result::Result<Option<String>, ValueError> {
        self.map_err(Into::into)?.into_cell_value()
    }
}

/// How a column sorts when the host orders the list by it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortStrategy {
    /// Not sortable
    #[default]
    None,
    /// Sort by the numeric value of the column's meta field
    Numeric,
    /// Sort by the string value of the column's meta field
    Alphabetical,
}

impl SortStrategy {
    /// Parse a descriptor `sort` value. Unrecognised values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "numeric" => Some(SortStrategy::Numeric),
            "alphabetically" => Some(SortStrategy::Alphabetical),
            _ => None,
        }
    }

    /// Returns `true` unless this is [`SortStrategy::None`].
    pub fn is_sortable(self) -> bool {
        !matches!(self, SortStrategy::None)
    }

    /// The descriptor spelling of this strategy.
    pub fn as_str(self) -> &'static str {
        match self {
            SortStrategy::None => "none",
            SortStrategy::Numeric => "numeric",
            SortStrategy::Alphabetical => "alphabetically",
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of a content type's list table.
///
/// The value producer is never called eagerly; [`Column::value`] invokes it
/// on every call.
#[derive(Clone)]
pub struct Column {
    id: String,
    label: String,
    value: Option<Producer>,
    order: Option<i64>,
    sort: SortStrategy,
    is_default: bool,
}

impl Column {
    /// Create a column whose id is the slug of `label`.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: slugify(&label),
            label,
            value: None,
            order: None,
            sort: SortStrategy::None,
            is_default: false,
        }
    }

    /// Build a column from a descriptor.
    ///
    /// `label` and `value` are required. An unrecognised `sort` value is
    /// ignored and leaves the column unsortable.
    pub fn from_descriptor(descriptor: ColumnDescriptor) -> Result<Self> {
        let ColumnDescriptor {
            label,
            value,
            order,
            id,
            sort,
        } = descriptor;

        let label = label.ok_or(PostyError::MissingField { field: "label" })?;
        let value = value.ok_or(PostyError::MissingField { field: "value" })?;

        let mut column = Column::new(label);
        column.value = Some(value);
        column.order = order;
        if let Some(id) = id {
            column.id = id;
        }
        if let Some(sort) = sort {
            match SortStrategy::parse(&sort) {
                Some(strategy) => column.sort = strategy,
                None => {
                    tracing::warn!(column = %column.id, sort = %sort, "ignoring unrecognised sort strategy")
                }
            }
        }

        if column.id.is_empty() {
            return Err(PostyError::EmptyColumnId {
                label: column.label,
            });
        }

        Ok(column)
    }

    /// A column the host renders itself, with no value producer.
    pub(crate) fn builtin(id: &str, label: &str) -> Self {
        let mut column = Column::new(label);
        column.id = id.to_string();
        column.is_default = true;
        column
    }

    /// Builder form of [`set_id`](Self::set_id).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder form of [`set_order`](Self::set_order).
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Builder form of [`set_value`](Self::set_value).
    pub fn with_value<F, R>(mut self, value: F) -> Self
    where
        F: Fn(Option<RowId>) -> R + Send + Sync + 'static,
        R: IntoCellValue,
    {
        self.value = Some(Arc::new(value));
        self
    }

    /// Column identifier, unique within its registry.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Heading shown in the list table.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Position requested at insertion time, if any.
    pub fn order(&self) -> Option<i64> {
        self.order
    }

    /// How the host sorts by this column.
    pub fn sort_strategy(&self) -> SortStrategy {
        self.sort
    }

    /// Returns `true` for the built-in columns the host renders itself.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Returns `true` when a value producer is set.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Compute the cell value for `row`.
    ///
    /// Columns without a producer yield `Ok(None)`. Producer failures are
    /// returned as [`PostyError::Value`] untouched.
    pub fn value(&self, row: Option<RowId>) -> Result<Option<String>> {
        match &self.value {
            Some(producer) => producer.produce(row).map_err(PostyError::Value),
            None => Ok(None),
        }
    }

    /// Replace the label. The id is left as is.
    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = label.into();
        self
    }

    /// Replace the value producer.
    pub fn set_value<F, R>(&mut self, value: F) -> &mut Self
    where
        F: Fn(Option<RowId>) -> R + Send + Sync + 'static,
        R: IntoCellValue,
    {
        self.value = Some(Arc::new(value));
        self
    }

    /// Replace the producer with an existing shared handle.
    pub fn set_producer(&mut self, producer: Producer) -> &mut Self {
        self.value = Some(producer);
        self
    }

    /// Replace the id.
    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self
    }

    /// Set the insertion position.
    pub fn set_order(&mut self, order: i64) -> &mut Self {
        self.order = Some(order);
        self
    }

    /// Set the label, and the id (derived from the label when `id` is `None`).
    pub fn set_label_and_id(&mut self, label: impl Into<String>, id: Option<&str>) -> &mut Self {
        self.label = label.into();
        self.id = match id {
            Some(id) => id.to_string(),
            None => slugify(&self.label),
        };
        self
    }

    /// Sort by this column as numbers.
    pub fn sort_numerically(&mut self) -> &mut Self {
        self.sort = SortStrategy::Numeric;
        self
    }

    /// Sort by this column as text.
    pub fn sort_alphabetically(&mut self) -> &mut Self {
        self.sort = SortStrategy::Alphabetical;
        self
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("has_value", &self.value.is_some())
            .field("order", &self.order)
            .field("sort", &self.sort)
            .field("is_default", &self.is_default)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn price(extra: impl FnOnce(ColumnDescriptor) -> ColumnDescriptor) -> Result<Column> {
        Column::from_descriptor(extra(ColumnDescriptor::new("Price", |_| "£900")))
    }

    #[test]
    fn from_descriptor_reads_label_and_value() {
        let column = price(|d| d).unwrap();
        assert_eq!(column.label(), "Price");
        assert_eq!(column.value(None).unwrap().as_deref(), Some("£900"));
    }

    #[test]
    fn from_descriptor_requires_label_and_value() {
        let err = Column::from_descriptor(ColumnDescriptor::default()).unwrap_err();
        assert!(matches!(err, PostyError::MissingField { field: "label" }));

        let err = Column::from_descriptor(ColumnDescriptor::default().label("Price")).unwrap_err();
        assert!(matches!(err, PostyError::MissingField { field: "value" }));
    }

    #[test]
    fn id_defaults_to_slug_of_label() {
        assert_eq!(price(|d| d).unwrap().id(), "price");
        assert_eq!(Column::new("Sale Price").id(), "sale-price");
    }

    #[test]
    fn explicit_id_wins() {
        let column = price(|d| d.id("sale_price")).unwrap();
        assert_eq!(column.label(), "Price");
        assert_eq!(column.id(), "sale_price");
    }

    #[test]
    fn empty_id_is_rejected() {
        let err = Column::from_descriptor(ColumnDescriptor::new("£", |_| "x")).unwrap_err();
        assert!(matches!(err, PostyError::EmptyColumnId { .. }));
    }

    #[test]
    fn sort_values_map_to_strategies() {
        assert_eq!(
            price(|d| d.sort("numeric")).unwrap().sort_strategy(),
            SortStrategy::Numeric
        );
        assert_eq!(
            price(|d| d.sort("alphabetically")).unwrap().sort_strategy(),
            SortStrategy::Alphabetical
        );
        assert_eq!(
            price(|d| d.sort("by-magic")).unwrap().sort_strategy(),
            SortStrategy::None
        );
        assert_eq!(price(|d| d).unwrap().sort_strategy(), SortStrategy::None);
    }

    #[test]
    fn setters_chain() {
        let mut column = price(|d| d).unwrap();
        column
            .set_label("Sale Price")
            .set_id("sale_price")
            .set_order(5)
            .set_value(|_| "£250")
            .sort_numerically();

        assert_eq!(column.label(), "Sale Price");
        assert_eq!(column.id(), "sale_price");
        assert_eq!(column.order(), Some(5));
        assert_eq!(column.value(None).unwrap().as_deref(), Some("£250"));
        assert_eq!(column.sort_strategy(), SortStrategy::Numeric);

        column.sort_alphabetically();
        assert_eq!(column.sort_strategy(), SortStrategy::Alphabetical);
    }

    #[test]
    fn set_label_and_id() {
        let mut column = price(|d| d).unwrap();

        column.set_label_and_id("Sale Price", Some("sale_price"));
        assert_eq!(column.label(), "Sale Price");
        assert_eq!(column.id(), "sale_price");

        column.set_label_and_id("Was Price", None);
        assert_eq!(column.label(), "Was Price");
        assert_eq!(column.id(), "was-price");
    }

    #[test]
    fn value_receives_row_and_is_never_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let column = Column::new("Row").with_value(move |row: Option<RowId>| {
            counter.fetch_add(1, Ordering::SeqCst);
            row.map(|id| format!("row-{id}"))
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(column.value(Some(7)).unwrap().as_deref(), Some("row-7"));
        assert_eq!(column.value(Some(7)).unwrap().as_deref(), Some("row-7"));
        assert_eq!(column.value(None).unwrap(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn producer_errors_propagate() {
        let column = Column::new("Stock")
            .with_value(|_| Err::<String, _>(std::io::Error::other("inventory offline")));
        let err = column.value(Some(1)).unwrap_err();
        assert!(matches!(err, PostyError::Value(_)));
        assert_eq!(err.to_string(), "inventory offline");
    }

    #[test]
    fn builtin_columns_have_no_value() {
        let column = Column::builtin("cb", "<input type=\"checkbox\" />");
        assert_eq!(column.id(), "cb");
        assert!(column.is_default());
        assert!(!column.has_value());
        assert_eq!(column.value(Some(1)).unwrap(), None);
    }
}
