//! Registry and dispatcher for type transforms.

use crate::{Strategy, TransformId, TransformRef, TypeTransform};
use arc_swap::ArcSwap;
use declare_types::{Context, DeclareError, Direction, EngineConfig, Result, Value, ValueKind};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use uuid::Uuid;

type Filter = Box<dyn Fn(&dyn TypeTransform) -> bool + Send + Sync>;

/// Everything registered with an engine. Replaced wholesale on each change.
#[derive(Clone, Default)]
struct Registry {
    /// Registered transforms, in registration order.
    transforms: IndexMap<TransformId, TransformRef>,
    /// Alias id -> (alias handle, canonical id).
    aliases: HashMap<TransformId, (TransformRef, TransformId)>,
    /// Explicit dynamic registrations.
    by_kind: HashMap<(Direction, ValueKind), TransformRef>,
}

impl Registry {
    fn canonical(&self, id: TransformId) -> Option<(TransformId, &TransformRef)> {
        let canonical = self.aliases.get(&id).map_or(id, |(_, target)| *target);
        self.transforms.get(&canonical).map(|t| (canonical, t))
    }
}

/// Builder for a [`TypeEngine`].
pub struct TypeEngineBuilder {
    namespace: String,
    config: EngineConfig,
    filter: Option<Filter>,
}

impl TypeEngineBuilder {
    /// Configuration handed to every transform's `bind_load`/`bind_dump`.
    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Restricts which transforms may be registered.
    ///
    /// Registering a transform the filter rejects fails with
    /// [`DeclareError::Incompatible`].
    #[must_use]
    pub fn compatible_with<F>(mut self, filter: F) -> Self
    where
        F: Fn(&dyn TypeTransform) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn build(self) -> Arc<TypeEngine> {
        debug!("Built type engine `{}`", self.namespace);
        Arc::new(TypeEngine {
            namespace: self.namespace,
            config: self.config,
            filter: self.filter,
            registry: ArcSwap::from_pointee(Registry::default()),
            cache: ArcSwap::from_pointee(HashMap::new()),
        })
    }
}

/// Collection of registered transforms for one namespace, plus the dispatch
/// cache that binds them.
///
/// Explicit dispatch ([`TypeEngine::load`], [`TypeEngine::dump`]) takes the
/// transform to use and requires it to be registered. Dynamic dispatch
/// ([`TypeEngine::load_dynamic`], [`TypeEngine::dump_dynamic`]) picks a
/// transform from the value itself: its [`ValueKind`], or whatever finer shape
/// a transform's [`TypeTransform::accepts`] checks.
///
/// Engines compare by identity and are meant to be shared as `Arc<TypeEngine>`.
///
/// # Example
///
/// ```
/// use declare_engine::{Context, Passthrough, TypeEngine, Value};
///
/// let engine = TypeEngine::unique();
/// let typedef = Passthrough::shared();
/// engine.register(&typedef).unwrap();
///
/// let mut cx = Context::new();
/// let out = engine.dump(&typedef, &Value::from("Jill"), &mut cx).unwrap();
/// assert_eq!(out, Value::from("Jill"));
/// ```
pub struct TypeEngine {
    namespace: String,
    config: EngineConfig,
    filter: Option<Filter>,
    registry: ArcSwap<Registry>,
    cache: ArcSwap<HashMap<TransformId, Arc<Strategy>>>,
}

impl TypeEngine {
    /// Starts building an engine for `namespace`.
    pub fn builder(namespace: impl Into<String>) -> TypeEngineBuilder {
        TypeEngineBuilder {
            namespace: namespace.into(),
            config: EngineConfig::default(),
            filter: None,
        }
    }

    /// An engine with default configuration.
    pub fn new(namespace: impl Into<String>) -> Arc<Self> {
        Self::builder(namespace).build()
    }

    /// An engine with a random (UUID v4) namespace.
    pub fn unique() -> Arc<Self> {
        Self::new(Uuid::new_v4().to_string())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── registration ─────────────────────────────────────────────

    /// Checks that `transform` and everything it wraps could be registered,
    /// without registering anything.
    pub fn check(&self, transform: &TransformRef) -> Result<()> {
        if self.contains(transform) {
            return Ok(());
        }
        if let Some(filter) = &self.filter {
            if !filter(transform.as_ref()) {
                return Err(DeclareError::Incompatible {
                    transform: transform.name().into_owned(),
                    engine: self.namespace.clone(),
                });
            }
        }
        if let Some(direction) = transform.capabilities().missing() {
            return Err(DeclareError::MissingCapability {
                transform: transform.name().into_owned(),
                direction,
            });
        }
        transform.children().iter().try_for_each(|child| self.check(child))
    }

    /// Adds a transform, and every transform it wraps, to this engine.
    ///
    /// Registering an already-registered transform does nothing. The
    /// transform is not bound until it is first resolved or [`TypeEngine::bind`]
    /// is called.
    pub fn register(&self, transform: &TransformRef) -> Result<()> {
        self.check(transform)?;
        for child in transform.children() {
            self.register(&child)?;
        }

        let id = TransformId::of(transform);
        let previous = self.registry.rcu(|current| {
            let mut next = Registry::clone(current);
            next.transforms
                .entry(id)
                .or_insert_with(|| Arc::clone(transform));
            next
        });
        if !previous.transforms.contains_key(&id) {
            debug!(
                "Registered transform `{}` with engine `{}`",
                transform.name(),
                self.namespace
            );
            transform.on_register(self);
        }
        Ok(())
    }

    /// Registers `transform` as the explicit dynamic match for values of
    /// `kind` in `direction`. Explicit entries win over structural matches and
    /// replace any earlier entry for the same key.
    pub fn register_kind(
        &self,
        direction: Direction,
        kind: ValueKind,
        transform: &TransformRef,
    ) -> Result<()> {
        self.register(transform)?;
        self.registry.rcu(|current| {
            let mut next = Registry::clone(current);
            next.by_kind.insert((direction, kind), Arc::clone(transform));
            next
        });
        debug!(
            "Registered `{}` for dynamic {direction} of {kind} values in engine `{}`",
            transform.name(),
            self.namespace
        );
        Ok(())
    }

    /// Makes `alias` dispatch exactly like `canonical`, which must already be
    /// registered. Both then share one cached strategy.
    pub fn register_equivalent(&self, alias: &TransformRef, canonical: &TransformRef) -> Result<()> {
        let canonical_id = TransformId::of(canonical);
        if !self.registry.load().transforms.contains_key(&canonical_id) {
            return Err(self.unregistered(canonical));
        }
        let alias_id = TransformId::of(alias);
        if alias_id == canonical_id {
            return Ok(());
        }
        self.registry.rcu(|current| {
            let mut next = Registry::clone(current);
            next.aliases
                .insert(alias_id, (Arc::clone(alias), canonical_id));
            next
        });
        // A strategy bound for the alias before it became one is stale.
        self.cache.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.remove(&alias_id);
            next
        });
        debug!(
            "Registered `{}` as equivalent to `{}` in engine `{}`",
            alias.name(),
            canonical.name(),
            self.namespace
        );
        Ok(())
    }

    /// Returns true if the transform (or an alias of it) is registered.
    pub fn contains(&self, transform: &TransformRef) -> bool {
        let id = TransformId::of(transform);
        let registry = self.registry.load();
        registry.transforms.contains_key(&id) || registry.aliases.contains_key(&id)
    }

    /// Returns true if a strategy for the transform is already cached.
    pub fn is_bound(&self, transform: &TransformRef) -> bool {
        self.cache.load().contains_key(&TransformId::of(transform))
    }

    /// Binds every registered transform now instead of on first use.
    ///
    /// A transform whose binding fails stays unbound; the first error is returned.
    pub fn bind(&self) -> Result<()> {
        let registry = self.registry.load_full();
        for transform in registry.transforms.values() {
            self.resolve(transform)?;
        }
        Ok(())
    }

    // ── resolution ───────────────────────────────────────────────

    /// Returns the bound strategy for a registered transform.
    ///
    /// The first call binds the transform and caches the result; later calls
    /// return the same `Arc`. Concurrent first calls may each bind, in which
    /// case the last store wins. Every binding of one transform is equivalent.
    pub fn resolve(&self, transform: &TransformRef) -> Result<Arc<Strategy>> {
        let id = TransformId::of(transform);
        if let Some(strategy) = self.cache.load().get(&id) {
            return Ok(Arc::clone(strategy));
        }

        let registry = self.registry.load();
        let (canonical, target) = registry
            .canonical(id)
            .ok_or_else(|| self.unregistered(transform))?;

        let strategy = match self.cache.load().get(&canonical) {
            Some(strategy) => Arc::clone(strategy),
            None => Arc::new(Strategy::bind(Arc::clone(target), &self.config)?),
        };

        self.cache.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.insert(id, Arc::clone(&strategy));
            next.insert(canonical, Arc::clone(&strategy));
            next
        });
        debug!(
            "Bound transform `{}` in engine `{}`",
            target.name(),
            self.namespace
        );
        Ok(strategy)
    }

    /// Picks a transform for `value` in `direction`.
    ///
    /// Explicit [`TypeEngine::register_kind`] entries for the value's kind come
    /// first. Otherwise the first registered transform that
    /// [accepts](TypeTransform::accepts) the value is used.
    pub fn resolve_dynamic(&self, direction: Direction, value: &Value) -> Result<Arc<Strategy>> {
        let kind = value.kind();
        let registry = self.registry.load();
        if let Some(transform) = registry.by_kind.get(&(direction, kind)) {
            return self.resolve(transform);
        }

        let mut candidates = registry
            .transforms
            .values()
            .filter(|t| t.accepts(direction, value));
        let Some(first) = candidates.next() else {
            return Err(DeclareError::NoDynamicMatch {
                direction,
                kind,
                engine: self.namespace.clone(),
            });
        };
        let others = candidates.count();
        if others > 0 {
            warn!(
                "{others} other transforms also {direction} this {kind} value in engine `{}`; using `{}`",
                self.namespace,
                first.name()
            );
        }
        self.resolve(first)
    }

    // ── dispatch ─────────────────────────────────────────────────

    /// Loads `value` through `transform`.
    pub fn load(&self, transform: &TransformRef, value: &Value, cx: &mut Context) -> Result<Value> {
        trace!("load via `{}`", transform.name());
        self.resolve(transform)?.load(self, value, cx)
    }

    /// Dumps `value` through `transform`.
    pub fn dump(&self, transform: &TransformRef, value: &Value, cx: &mut Context) -> Result<Value> {
        trace!("dump via `{}`", transform.name());
        self.resolve(transform)?.dump(self, value, cx)
    }

    /// [`TypeEngine::load`] or [`TypeEngine::dump`], chosen by `direction`.
    pub fn apply(
        &self,
        direction: Direction,
        transform: &TransformRef,
        value: &Value,
        cx: &mut Context,
    ) -> Result<Value> {
        match direction {
            Direction::Load => self.load(transform, value, cx),
            Direction::Dump => self.dump(transform, value, cx),
        }
    }

    /// Loads `value` with whichever transform handles its shape.
    pub fn load_dynamic(&self, value: &Value, cx: &mut Context) -> Result<Value> {
        self.resolve_dynamic(Direction::Load, value)?
            .load(self, value, cx)
    }

    /// Dumps `value` with whichever transform handles its shape.
    pub fn dump_dynamic(&self, value: &Value, cx: &mut Context) -> Result<Value> {
        self.resolve_dynamic(Direction::Dump, value)?
            .dump(self, value, cx)
    }

    fn unregistered(&self, transform: &TransformRef) -> DeclareError {
        DeclareError::Unregistered {
            transform: transform.name().into_owned(),
            engine: self.namespace.clone(),
        }
    }
}

impl PartialEq for TypeEngine {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for TypeEngine {}

impl fmt::Debug for TypeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEngine")
            .field("namespace", &self.namespace)
            .field("registered", &self.registry.load().transforms.len())
            .field("bound", &self.cache.load().len())
            .finish_non_exhaustive()
    }
}
