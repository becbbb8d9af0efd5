// Default configuration constants
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Settings shared by the pickler and unpickler of one registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    make_refs: bool,
    max_depth: usize,
    pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::default().build()
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Whether repeated shared values are written as references
    pub fn make_refs(&self) -> bool {
        self.make_refs
    }

    /// Deepest nesting accepted while encoding or decoding
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether output JSON is indented
    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

/// Builder for creating a [`Config`]
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    make_refs: bool,
    max_depth: usize,
    pretty: bool,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            make_refs: true,
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: false,
        }
    }
}

impl ConfigBuilder {
    /// Create a new ConfigBuilder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit references for repeated shared values; when disabled every
    /// occurrence is written in full and decodes to its own copy
    pub fn with_make_refs(mut self, make_refs: bool) -> Self {
        self.make_refs = make_refs;
        self
    }

    /// Set the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Indent the JSON output
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn build(self) -> Config {
        Config {
            make_refs: self.make_refs,
            max_depth: self.max_depth,
            pretty: self.pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.make_refs());
        assert_eq!(config.max_depth(), DEFAULT_MAX_DEPTH);
        assert!(!config.pretty());
    }

    #[test]
    fn test_builder_overrides() {
        let config = Config::builder()
            .with_make_refs(false)
            .with_max_depth(4)
            .with_pretty(true)
            .build();
        assert!(!config.make_refs());
        assert_eq!(config.max_depth(), 4);
        assert!(config.pretty());
    }
}
