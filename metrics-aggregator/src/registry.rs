use std::sync::Arc;

use hashbrown::HashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::collector::Collector;
use crate::error::Error;
use crate::kind::MetricKind;
use crate::labels::is_valid_metric_name;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// A set of collectors, keyed by metric name.
///
/// `Registry` is a handle: clones refer to the same set of collectors.  Collectors created without
/// an explicit registry are registered into [`Registry::global`].
#[derive(Clone, Default)]
pub struct Registry {
    collectors: Arc<RwLock<HashMap<String, Arc<dyn Collector>>>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Gets the process-wide default registry.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Registers `collector` under its name.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidCollector`] if the collector reports an invalid name or the
    /// untyped kind, and with [`Error::DuplicateName`] if its name is already taken.
    pub fn register<C: Collector>(&self, collector: C) -> Result<(), Error> {
        let name = collector.name().to_string();
        if collector.kind() == MetricKind::Untyped || !is_valid_metric_name(&name) {
            return Err(Error::InvalidCollector { name });
        }

        let mut collectors = self.collectors.write();
        if collectors.contains_key(&name) {
            return Err(Error::DuplicateName { name });
        }

        debug!(metric = %name, kind = %collector.kind(), "registering collector");
        collectors.insert(name, Arc::new(collector));
        Ok(())
    }

    /// Removes the collector registered under `name`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotFound`] if nothing is registered under `name`.
    pub fn deregister(&self, name: &str) -> Result<(), Error> {
        match self.collectors.write().remove(name) {
            Some(_) => {
                debug!(metric = %name, "deregistered collector");
                Ok(())
            }
            None => Err(Error::NotFound { name: name.to_string() }),
        }
    }

    /// Gets the collector registered under `name`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotFound`] if nothing is registered under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Collector>, Error> {
        self.collectors
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound { name: name.to_string() })
    }

    /// Gets the collector registered under `name` as its concrete handle type.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotFound`] if nothing is registered under `name`, and with
    /// [`Error::InvalidCollector`] if the collector is not a `C`.
    pub fn get_as<C: Collector + Clone>(&self, name: &str) -> Result<C, Error> {
        let collector = self.get(name)?;
        collector
            .as_any()
            .downcast_ref::<C>()
            .cloned()
            .ok_or_else(|| Error::InvalidCollector { name: name.to_string() })
    }

    /// Gets every registered collector, in no particular order.
    pub fn get_all(&self) -> Vec<Arc<dyn Collector>> {
        self.collectors.read().values().cloned().collect()
    }

    /// Removes every registered collector.
    pub fn clear(&self) {
        self.collectors.write().clear();
    }

    /// Gets the number of registered collectors.
    pub fn len(&self) -> usize {
        self.collectors.read().len()
    }

    /// Returns `true` if no collector is registered.
    pub fn is_empty(&self) -> bool {
        self.collectors.read().is_empty()
    }
}
