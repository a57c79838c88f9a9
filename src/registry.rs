//! # Handler Registry
//!
//! A closed, explicit mapping from handler identifiers (the right-hand side of a
//! route line) to resource kinds. The registry is filled once at startup and is
//! read-only afterwards, so one instance can serve any number of concurrent
//! requests.
//!
//! ```rust,ignore
//! let registry = HandlerRegistry::builder()
//!     .register::<Root>("Root")
//!     .register::<BooksCollection>("BooksCollection")
//!     .build();
//!
//! match registry.resolve("Book") {
//!     Resolved::Kind(kind) => { /* instantiate and dispatch */ }
//!     Resolved::Unresolved => { /* 500 */ }
//! }
//! ```
//!
//! Each kind's operation table is built at registration from
//! [`Resource::OPERATIONS`], with [`default_options`] filling the `OPTIONS`
//! slot unless the kind provides its own.

use crate::context::RequestContext;
use crate::resource::{capabilities, default_options, Construction, Operation, OperationFn, Resource};
use crate::response::ResponseState;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{info, warn};

/// A registered resource kind, with its type erased.
pub trait HandlerKind: Send + Sync {
    /// Identifier the kind was registered under.
    fn name(&self) -> &str;

    /// Operations this kind implements, `OPTIONS` included.
    fn capabilities(&self) -> &[Operation];

    /// Construct an instance for one request.
    fn instantiate<'k>(
        &'k self,
        ctx: &RequestContext,
        res: &mut ResponseState,
    ) -> Instantiated<'k>;
}

/// A resource instance living for one request.
pub trait HandlerInstance {
    fn supports(&self, op: Operation) -> bool;

    /// Run `op`. Returns `None` when the instance does not implement it.
    fn invoke(
        &self,
        op: Operation,
        ctx: &RequestContext,
        res: &mut ResponseState,
    ) -> Option<anyhow::Result<()>>;
}

/// Outcome of [`HandlerKind::instantiate`].
pub enum Instantiated<'k> {
    Ready(Box<dyn HandlerInstance + 'k>),
    Halted,
}

/// Outcome of [`HandlerRegistry::resolve`].
pub enum Resolved<'a> {
    Kind(&'a dyn HandlerKind),
    Unresolved,
}

struct Kind<R: Resource> {
    name: String,
    table: [Option<OperationFn<R>>; 7],
    capabilities: Vec<Operation>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Kind<R> {
    fn new(name: &str) -> Self {
        let mut table: [Option<OperationFn<R>>; 7] = [None; 7];
        table[Operation::Options.index()] = Some(default_options::<R> as OperationFn<R>);
        for (op, f) in R::OPERATIONS {
            table[op.index()] = Some(*f);
        }
        Self {
            name: name.to_string(),
            table,
            capabilities: capabilities::<R>(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> HandlerKind for Kind<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &[Operation] {
        &self.capabilities
    }

    fn instantiate<'k>(
        &'k self,
        ctx: &RequestContext,
        res: &mut ResponseState,
    ) -> Instantiated<'k> {
        match R::construct(ctx, res) {
            Construction::Ready(resource) => Instantiated::Ready(Box::new(Instance {
                table: &self.table,
                resource,
            })),
            Construction::Halted => Instantiated::Halted,
        }
    }
}

struct Instance<'k, R: Resource> {
    table: &'k [Option<OperationFn<R>>; 7],
    resource: R,
}

impl<R: Resource> HandlerInstance for Instance<'_, R> {
    fn supports(&self, op: Operation) -> bool {
        self.table[op.index()].is_some()
    }

    fn invoke(
        &self,
        op: Operation,
        ctx: &RequestContext,
        res: &mut ResponseState,
    ) -> Option<anyhow::Result<()>> {
        self.table[op.index()].map(|f| f(&self.resource, ctx, res))
    }
}

/// Collects resource kinds before the registry is frozen.
#[derive(Default)]
pub struct HandlerRegistryBuilder {
    kinds: HashMap<String, Arc<dyn HandlerKind>>,
}

impl HandlerRegistryBuilder {
    /// Register resource kind `R` under `name`. A second registration under the
    /// same name replaces the first.
    #[must_use]
    pub fn register<R: Resource>(mut self, name: &str) -> Self {
        let kind = Kind::<R>::new(name);
        let caps: Vec<&str> = kind.capabilities.iter().map(Operation::as_str).collect();
        if self.kinds.insert(name.to_string(), Arc::new(kind)).is_some() {
            warn!(handler_name = %name, "Replaced existing handler kind");
        }
        info!(
            handler_name = %name,
            capabilities = ?caps,
            total_handlers = self.kinds.len(),
            "Handler kind registered"
        );
        self
    }

    #[must_use]
    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry { kinds: self.kinds }
    }
}

/// Read-only map from handler identifier to resource kind.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    kinds: HashMap<String, Arc<dyn HandlerKind>>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    /// Look up a handler identifier.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Resolved<'_> {
        match self.kinds.get(name) {
            Some(kind) => Resolved::Kind(kind.as_ref()),
            None => Resolved::Unresolved,
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.names())
            .finish()
    }
}
