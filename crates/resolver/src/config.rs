/// Group used when a request names none.
pub const DEFAULT_GROUP: &str = "machine";

/// Startup configuration owned by the resolver.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Group applied to requests that do not specify one.
    pub default_group: String,
}

impl ResolverConfig {
    #[must_use]
    pub fn new(default_group: impl Into<String>) -> Self {
        Self {
            default_group: default_group.into(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GROUP)
    }
}
