//! Read-only configuration sources consulted on every dial attempt.
//!
//! The dialer never reads the process environment on its own. Instead it is
//! given a [`ConfigSource`], which is read (never written) at the start of
//! each dial attempt, so that changes take effect on the very next attempt.
//!
//! - [`ProcessEnv`] reads the ambient process environment;
//! - [`StaticConfig`] is an explicit in-memory source, shared between its clones.

use parking_lot::RwLock;
use std::{collections::HashMap, fmt, sync::Arc};

/// Primary configuration key for the forward proxy URL.
pub const HTTP_PROXY: &str = "HTTP_PROXY";

/// Fallback configuration key for the forward proxy URL,
/// only consulted when [`HTTP_PROXY`] is unset or empty.
pub const HTTPS_PROXY: &str = "HTTPS_PROXY";

/// Configuration key for the comma separated bypass list.
pub const NO_PROXY: &str = "NO_PROXY";

/// A read-only key/value configuration provider.
///
/// `None` means the key is absent, which is a distinct state
/// from a key which is present with an empty value.
pub trait ConfigSource: Send + Sync + 'static {
    /// Get the current value for the given key.
    fn get(&self, key: &str) -> Option<String>;
}

impl<S: ConfigSource> ConfigSource for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
/// [`ConfigSource`] backed by the environment of the current process.
pub struct ProcessEnv;

impl ProcessEnv {
    /// Create a new [`ProcessEnv`] source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ConfigSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        let value = std::env::var(key).ok();
        tracing::trace!(key, present = value.is_some(), "read process env config");
        value
    }
}

#[derive(Clone, Default)]
/// In-memory [`ConfigSource`].
///
/// Clones share the same underlying storage, so a value set through
/// one clone is observed by every dialer holding another clone.
pub struct StaticConfig {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl StaticConfig {
    /// Create a new empty [`StaticConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the given key to the given value,
    /// returning `self` to allow chaining at construction time.
    #[must_use]
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set (or overwrite) the given key.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    /// Remove the given key, returning its previous value if any.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.write().remove(key)
    }

    /// Remove all keys.
    pub fn clear(&self) {
        self.values.write().clear();
    }
}

impl fmt::Debug for StaticConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticConfig")
            .field("values", &*self.values.read())
            .finish()
    }
}

impl ConfigSource for StaticConfig {
    fn get(&self, key: &str) -> Option<String> {
        let value = self.values.read().get(key).cloned();
        tracing::trace!(key, present = value.is_some(), "read static config");
        value
    }
}

impl<K, V> FromIterator<(K, V)> for StaticConfig
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let values = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }
}
