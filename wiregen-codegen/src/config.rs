//! Generator configuration.

/// Default path of the runtime crate used by generated code.
pub const DEFAULT_RUNTIME_CRATE: &str = "wiregen_core";

/// Cargo feature guarding the generic-output visitors.
pub const GENERIC_VISITORS_FEATURE: &str = "generic-visitors";

/// Options controlling what the generator emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    runtime_crate: String,
    generic_visitors: bool,
    server_extras: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            generic_visitors: true,
            server_extras: false,
        }
    }
}

impl GeneratorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path generated code uses to reach the runtime crate.
    #[must_use]
    pub fn runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = path.into();
        self
    }

    /// Enables or disables the generic-output union visitors.
    #[must_use]
    pub fn generic_visitors(mut self, enabled: bool) -> Self {
        self.generic_visitors = enabled;
        self
    }

    /// Enables or disables the server integration hooks on errors.
    #[must_use]
    pub fn server_extras(mut self, enabled: bool) -> Self {
        self.server_extras = enabled;
        self
    }

    /// Returns the runtime crate path.
    #[must_use]
    pub fn runtime_crate_path(&self) -> &str {
        &self.runtime_crate
    }

    /// Returns true if generic-output visitors are emitted.
    #[must_use]
    pub const fn emits_generic_visitors(&self) -> bool {
        self.generic_visitors
    }

    /// Returns true if server integration hooks are emitted.
    #[must_use]
    pub const fn emits_server_extras(&self) -> bool {
        self.server_extras
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::new();
        assert_eq!(config.runtime_crate_path(), "wiregen_core");
        assert!(config.emits_generic_visitors());
        assert!(!config.emits_server_extras());
    }

    #[test]
    fn test_builder() {
        let config = GeneratorConfig::new()
            .runtime_crate("::my_runtime")
            .generic_visitors(false)
            .server_extras(true);
        assert_eq!(config.runtime_crate_path(), "::my_runtime");
        assert!(!config.emits_generic_visitors());
        assert!(config.emits_server_extras());
    }
}
