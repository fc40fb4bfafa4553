//! Inputs accepted by the bulk registry operations.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{PostyError, Result};

/// Items for `add`, `remove` or `reorder`, resolved once when the
/// operation starts.
pub enum ColumnSource<T> {
    /// A ready list
    Literal(Vec<T>),
    /// A list computed from the registry's current column ids
    Deferred(Box<dyn FnOnce(&[String]) -> Vec<T>>),
    /// Untyped input from the host or a definition file
    Raw(Value),
}

impl<T> ColumnSource<T> {
    /// A list computed on resolution, ignoring the current ids.
    pub fn deferred(f: impl FnOnce() -> Vec<T> + 'static) -> Self {
        ColumnSource::Deferred(Box::new(move |_| f()))
    }

    /// A list computed from the current column ids.
    pub fn from_ids(f: impl FnOnce(&[String]) -> Vec<T> + 'static) -> Self {
        ColumnSource::Deferred(Box::new(f))
    }
}

impl<T: DeserializeOwned> ColumnSource<T> {
    /// Resolve into a list. `Raw` input must be a JSON array whose items
    /// deserialize as `T`.
    pub fn resolve(self, current_ids: &[String]) -> Result<Vec<T>> {
        match self {
            ColumnSource::Literal(items) => Ok(items),
            ColumnSource::Deferred(f) => Ok(f(current_ids)),
            ColumnSource::Raw(value @ Value::Array(_)) => serde_json::from_value(value)
                .map_err(|e| PostyError::invalid_input(e.to_string())),
            ColumnSource::Raw(other) => Err(PostyError::invalid_input(format!(
                "expected a list, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

impl<T, I: Into<T>> From<Vec<I>> for ColumnSource<T> {
    fn from(items: Vec<I>) -> Self {
        ColumnSource::Literal(items.into_iter().map(Into::into).collect())
    }
}

impl<T, I: Into<T>, const N: usize> From<[I; N]> for ColumnSource<T> {
    fn from(items: [I; N]) -> Self {
        ColumnSource::Literal(items.into_iter().map(Into::into).collect())
    }
}

impl<T> From<Value> for ColumnSource<T> {
    fn from(value: Value) -> Self {
        ColumnSource::Raw(value)
    }
}

impl<T> std::fmt::Debug for ColumnSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnSource::Literal(items) => write!(f, "Literal({} items)", items.len()),
            ColumnSource::Deferred(_) => f.write_str("Deferred"),
            ColumnSource::Raw(value) => write!(f, "Raw({value})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids() -> Vec<String> {
        vec!["cb".into(), "title".into()]
    }

    #[test]
    fn literal_resolves_to_itself() {
        let source: ColumnSource<String> = ["title", "date"].into();
        assert_eq!(source.resolve(&ids()).unwrap(), vec!["title", "date"]);
    }

    #[test]
    fn deferred_receives_current_ids() {
        let source: ColumnSource<String> =
            ColumnSource::from_ids(|current| current.iter().rev().cloned().collect());
        assert_eq!(source.resolve(&ids()).unwrap(), vec!["title", "cb"]);
    }

    #[test]
    fn deferred_without_ids() {
        let source: ColumnSource<String> = ColumnSource::deferred(|| vec!["date".to_string()]);
        assert_eq!(source.resolve(&ids()).unwrap(), vec!["date"]);
    }

    #[test]
    fn raw_array_deserializes() {
        let source: ColumnSource<String> = json!(["title"]).into();
        assert_eq!(source.resolve(&ids()).unwrap(), vec!["title"]);
    }

    #[test]
    fn raw_non_array_is_invalid() {
        let source: ColumnSource<String> =
            json!("I should be an array or a closure returning an array.").into();
        let err = source.resolve(&ids()).unwrap_err();
        assert!(matches!(err, PostyError::InvalidInput { .. }));
        assert!(err.to_string().contains("a string"));
    }

    #[test]
    fn raw_array_with_wrong_items_is_invalid() {
        let source: ColumnSource<String> = json!([1, 2]).into();
        assert!(matches!(
            source.resolve(&ids()),
            Err(PostyError::InvalidInput { .. })
        ));
    }
}
