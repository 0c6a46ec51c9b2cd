use crate::{TransformRef, TypeEngine};
use declare_types::{Context, DeclareError, Direction, EngineConfig, Result, Value};
use std::fmt;
use std::sync::Arc;

/// A load or dump function produced by binding a transform to an engine.
pub type ConvertFn = Arc<dyn Fn(&TypeEngine, &Value, &mut Context) -> Result<Value> + Send + Sync>;

/// A transform resolved for one engine: its load/dump pair, ready to call.
///
/// Strategies are immutable once built and are shared out of the engine's
/// cache as `Arc<Strategy>`.
#[derive(Clone)]
pub struct Strategy {
    transform: TransformRef,
    load: ConvertFn,
    dump: ConvertFn,
}

impl Strategy {
    /// Binds `transform` against `config`.
    ///
    /// Uses the transform's `bind_load`/`bind_dump` results when it provides
    /// them and falls back to its `load`/`dump` methods otherwise. Fails if a
    /// direction has neither.
    pub fn bind(transform: TransformRef, config: &EngineConfig) -> Result<Self> {
        let load = Self::bind_direction(&transform, config, Direction::Load)?;
        let dump = Self::bind_direction(&transform, config, Direction::Dump)?;
        Ok(Self {
            transform,
            load,
            dump,
        })
    }

    fn bind_direction(
        transform: &TransformRef,
        config: &EngineConfig,
        direction: Direction,
    ) -> Result<ConvertFn> {
        let specialized = match direction {
            Direction::Load => transform.bind_load(config),
            Direction::Dump => transform.bind_dump(config),
        };
        if let Some(f) = specialized {
            return Ok(f);
        }
        if !transform.capabilities().supports(direction) {
            return Err(DeclareError::MissingCapability {
                transform: transform.name().into_owned(),
                direction,
            });
        }

        let target = Arc::clone(transform);
        let f: ConvertFn = match direction {
            Direction::Load => {
                Arc::new(move |engine: &TypeEngine, value: &Value, cx: &mut Context| {
                    target.load(engine, value, cx)
                })
            }
            Direction::Dump => {
                Arc::new(move |engine: &TypeEngine, value: &Value, cx: &mut Context| {
                    target.dump(engine, value, cx)
                })
            }
        };
        Ok(f)
    }

    /// The transform this strategy was bound from.
    pub fn transform(&self) -> &TransformRef {
        &self.transform
    }

    pub fn load(&self, engine: &TypeEngine, value: &Value, cx: &mut Context) -> Result<Value> {
        (self.load)(engine, value, cx)
    }

    pub fn dump(&self, engine: &TypeEngine, value: &Value, cx: &mut Context) -> Result<Value> {
        (self.dump)(engine, value, cx)
    }

    pub fn apply(
        &self,
        direction: Direction,
        engine: &TypeEngine,
        value: &Value,
        cx: &mut Context,
    ) -> Result<Value> {
        match direction {
            Direction::Load => self.load(engine, value, cx),
            Direction::Dump => self.dump(engine, value, cx),
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("transform", &self.transform.name())
            .finish_non_exhaustive()
    }
}
