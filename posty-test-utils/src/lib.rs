//! Test utilities for posty crates
//!
//! This crate provides an in-memory stand-in for the host platform so
//! registrations can be driven end to end without a real CMS.
//!
//! # Core Concepts
//!
//! ## MemoryHost
//!
//! Records every handler bound through [`ExtensionPoints`], answers the
//! admin-context check, collects content type registrations, and lets a test
//! fire extension points the way the host would:
//!
//! - [`MemoryHost::fire_init`] runs init handlers against its registrar
//! - [`MemoryHost::apply_headings`] / [`MemoryHost::apply_sortable`] run filters
//! - [`MemoryHost::render_cell`] runs cell renderers and collects their output
//! - [`MemoryHost::run_query`] runs query filters against a [`MemoryQuery`]
//!
//! ## Usage
//!
//! ```no_run
//! use posty::ColumnRegistry;
//! use posty_test_utils::MemoryHost;
//!
//! let mut host = MemoryHost::admin();
//! ColumnRegistry::new("products").register(&mut host);
//! let headings = host.apply_headings("manage_products_posts_columns", Default::default());
//! assert_eq!(headings.len(), 4);
//! ```

use indexmap::IndexMap;
use posty::host::{ContentTypeRegistrar, Environment, ExtensionPoints, Handler, Query};
use posty::{Headings, Result, RowId, SortableIds};
use serde_json::{Map, Value};

/// A handler bound to an extension point, with its registration details.
#[derive(Debug, Clone)]
pub struct BoundHandler {
    pub point: String,
    pub handler: Handler,
    pub priority: i32,
    pub accepted_args: usize,
}

/// Content type registrations received from init handlers, by name.
#[derive(Debug, Default)]
pub struct MemoryRegistrar {
    registered: IndexMap<String, Map<String, Value>>,
}

impl MemoryRegistrar {
    /// Arguments registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Map<String, Value>> {
        self.registered.get(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.registered.keys().map(String::as_str).collect()
    }
}

impl ContentTypeRegistrar for MemoryRegistrar {
    fn register_content_type(&mut self, name: &str, arguments: &Map<String, Value>) {
        self.registered.insert(name.to_string(), arguments.clone());
    }
}

/// In-memory host platform.
#[derive(Debug, Default)]
pub struct MemoryHost {
    admin: bool,
    handlers: Vec<BoundHandler>,
    registrar: MemoryRegistrar,
    output: String,
}

impl MemoryHost {
    /// A host serving a front-end (non-admin) request.
    pub fn new() -> Self {
        Self::default()
    }

    /// A host serving an admin request.
    pub fn admin() -> Self {
        Self {
            admin: true,
            ..Self::default()
        }
    }

    /// Switch between admin and front-end requests.
    pub fn set_admin(&mut self, admin: bool) {
        self.admin = admin;
    }

    /// Every handler bound so far, in binding order.
    pub fn handlers(&self) -> &[BoundHandler] {
        &self.handlers
    }

    /// Handlers bound to `point`, in the order the host would run them.
    pub fn handlers_at(&self, point: &str) -> Vec<BoundHandler> {
        let mut bound: Vec<BoundHandler> = self
            .handlers
            .iter()
            .filter(|h| h.point == point)
            .cloned()
            .collect();
        bound.sort_by_key(|h| h.priority);
        bound
    }

    /// Content types registered so far.
    pub fn registrar(&self) -> &MemoryRegistrar {
        &self.registrar
    }

    /// Everything cell renderers have emitted.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Run the init handlers bound to `point`.
    pub fn fire_init(&mut self, point: &str) {
        for bound in self.handlers_at(point) {
            if let Handler::Init(handler) = bound.handler {
                handler.init(&mut self.registrar);
            }
        }
    }

    /// Pass `headings` through the headings filters bound to `point`.
    pub fn apply_headings(&self, point: &str, headings: Headings) -> Headings {
        self.handlers_at(point)
            .into_iter()
            .fold(headings, |headings, bound| match bound.handler {
                Handler::Headings(filter) => filter.filter(headings),
                _ => headings,
            })
    }

    /// Pass `sortable` through the sortable filters bound to `point`.
    pub fn apply_sortable(&self, point: &str, sortable: SortableIds) -> SortableIds {
        self.handlers_at(point)
            .into_iter()
            .fold(sortable, |sortable, bound| match bound.handler {
                Handler::Sortable(filter) => filter.filter(sortable),
                _ => sortable,
            })
    }

    /// Run the cell renderers bound to `point`, emitting their output.
    pub fn render_cell(&mut self, point: &str, column: &str, row: RowId) -> Result<()> {
        for bound in self.handlers_at(point) {
            if let Handler::Cell(renderer) = bound.handler {
                if let Some(value) = renderer.render(column, row)? {
                    self.output.push_str(&value);
                }
            }
        }
        Ok(())
    }

    /// Run the query filters bound to `point` against `query`.
    pub fn run_query(&self, point: &str, query: &mut MemoryQuery) {
        for bound in self.handlers_at(point) {
            if let Handler::Query(filter) = bound.handler {
                filter.filter(self, query);
            }
        }
    }
}

impl ExtensionPoints for MemoryHost {
    fn on(&mut self, point: &str, handler: Handler, priority: i32, accepted_args: usize) {
        tracing::debug!(point, kind = handler.kind(), priority, "handler bound");
        self.handlers.push(BoundHandler {
            point: point.to_string(),
            handler,
            priority,
            accepted_args,
        });
    }
}

impl Environment for MemoryHost {
    fn is_admin(&self) -> bool {
        self.admin
    }
}

/// In-memory list query.
#[derive(Debug, Clone)]
pub struct MemoryQuery {
    main: bool,
    vars: IndexMap<String, Value>,
}

impl MemoryQuery {
    /// The main query of the request.
    pub fn main() -> Self {
        Self {
            main: true,
            vars: IndexMap::new(),
        }
    }

    /// A secondary query.
    pub fn secondary() -> Self {
        Self {
            main: false,
            vars: IndexMap::new(),
        }
    }

    /// Set a query variable.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.vars.insert(name.to_string(), value.into());
        self
    }

    /// Shorthand for reading a string parameter.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.vars.get(name).and_then(Value::as_str)
    }

    /// All query variables, in insertion order.
    pub fn vars(&self) -> &IndexMap<String, Value> {
        &self.vars
    }
}

impl Query for MemoryQuery {
    fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    fn set(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }

    fn is_main_query(&self) -> bool {
        self.main
    }
}
