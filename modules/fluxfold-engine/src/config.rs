use typed_builder::TypedBuilder;

/// Per-store settings.
#[derive(Debug, Clone, TypedBuilder)]
pub struct StoreConfig {
    /// Label attached to the store's tracing span.
    #[builder(default = String::from("store"), setter(into))]
    pub name: String,
    /// Start with the diagnostic log side channel switched on.
    #[builder(default)]
    pub log: bool,
}

impl StoreConfig {
    /// Load from `FLUXFOLD_STORE_NAME` and `FLUXFOLD_LOG`, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            name: std::env::var("FLUXFOLD_STORE_NAME").unwrap_or(defaults.name),
            log: std::env::var("FLUXFOLD_LOG")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.log),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.name, "store");
        assert!(!config.log);
    }

    #[test]
    fn builder_overrides() {
        let config = StoreConfig::builder().name("todos").log(true).build();
        assert_eq!(config.name, "todos");
        assert!(config.log);
    }

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("on"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
