//! Named argument providers for method sources.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::ArgumentRow;
use crate::errors::ConfigurationError;

/// A function producing the rows of a method source.
pub type Provider = Arc<dyn Fn() -> Vec<ArgumentRow> + Send + Sync>;

/// Providers looked up by name when a `Method` source is opened.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Provider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under `name`, replacing any earlier registration.
    pub fn register<F>(&mut self, name: impl Into<String>, provider: F) -> &mut Self
    where
        F: Fn() -> Vec<ArgumentRow> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::trace!(provider = %name, "registered argument provider");
        self.providers.insert(name, Arc::new(provider));
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, name: impl Into<String>, provider: F) -> Self
    where
        F: Fn() -> Vec<ArgumentRow> + Send + Sync + 'static,
    {
        self.register(name, provider);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Look up the provider registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<Provider, ConfigurationError> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigurationError::UnknownProvider(name.to_string()))
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.providers.keys().collect();
        names.sort();
        f.debug_struct("ProviderRegistry").field("providers", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_registration_replaces_earlier() {
        let registry = ProviderRegistry::new()
            .with("rows", || vec![ArgumentRow::of_texts(["a"])])
            .with("rows", || vec![ArgumentRow::of_texts(["b"]), ArgumentRow::of_texts(["c"])]);
        assert!(registry.contains("rows"));
        assert_eq!(registry.resolve("rows").unwrap()().len(), 2);
    }

    #[test]
    fn test_debug_lists_names_only() {
        let registry = ProviderRegistry::new().with("b", Vec::new).with("a", Vec::new);
        assert_eq!(format!("{registry:?}"), r#"ProviderRegistry { providers: ["a", "b"] }"#);
    }
}
