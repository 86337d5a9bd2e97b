use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;

use crate::{
    accumulation::{functions, AccumulatorImpl},
    expression::ParseError,
};

/// Process-wide mapping from operator name to factory.
///
/// The lifecycle is two-phase: fully populated before the first parse
/// request is served, read-only for the remainder of the process. Concurrent
/// lookups after that point need no locking.
#[derive(Default)]
pub struct AccumulatorRegistry {
    by_name: IndexMap<String, Arc<dyn AccumulatorImpl>>,
}

impl AccumulatorRegistry {
    pub fn new() -> Self {
        Self {
            by_name: IndexMap::new(),
        }
    }

    /// Registers `factory` under its own name. Panics on a name without the
    /// operator sigil or on a duplicate: both are startup configuration
    /// errors, not runtime conditions.
    pub fn register(&mut self, factory: Arc<dyn AccumulatorImpl>) {
        let name = factory.name();
        assert!(
            name.len() > 1 && name.starts_with('$'),
            "accumulator name '{name}' must start with '$'"
        );
        if self.by_name.insert(name.to_string(), factory).is_some() {
            panic!("duplicate registration of accumulator '{name}'");
        }
    }

    /// Exact-match factory lookup. The name originates from an untrusted
    /// query document, so a miss is a parse error, not a defect.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn AccumulatorImpl>, ParseError> {
        self.by_name.get(name).cloned().ok_or_else(|| {
            ParseError::UnknownOperator {
                name: name.to_string(),
            }
        })
    }

    /// Registered operator names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.by_name.keys().map(String::as_str).collect()
    }

    /// Builds a registry from the built-in operator modules. This is the
    /// single startup routine that registers each module's factory in a
    /// fixed order, so the populated set never depends on link order.
    pub fn built_ins() -> Self {
        let mut registry = Self::new();
        for factory in functions::built_in_factories() {
            registry.register(factory);
        }
        tracing::debug!(
            operators = registry.by_name.len(),
            "accumulator registry populated"
        );
        registry
    }
}

static GLOBAL: OnceCell<AccumulatorRegistry> = OnceCell::new();

/// Installs a custom registry (built-ins plus any third-party operators) as
/// the process-wide instance. Must run before the first parse; returns the
/// rejected registry if one is already installed.
pub fn install_global_registry(
    registry: AccumulatorRegistry,
) -> Result<(), AccumulatorRegistry> {
    GLOBAL.set(registry)
}

/// The process-wide registry, initialized with the built-ins on first use
/// and immutable afterwards.
pub fn global_registry() -> &'static AccumulatorRegistry {
    GLOBAL.get_or_init(AccumulatorRegistry::built_ins)
}
