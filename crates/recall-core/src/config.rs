use serde::de::DeserializeOwned;

/// Load a TOML config whose path comes from `env_var`, falling back to
/// `default_path`. Missing files yield `T::default()`; unparseable files log a
/// warning and also yield the default.
pub fn load_toml_or_default<T>(env_var: &str, default_path: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let path = std::env::var(env_var).unwrap_or_else(|_| default_path.to_string());
    match std::fs::read_to_string(&path) {
        Ok(content) => parse_toml_or_default(&path, &content),
        Err(_) => T::default(),
    }
}

/// Parse TOML text, logging and returning the default on failure.
pub fn parse_toml_or_default<T>(source: &str, content: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match toml::from_str::<T>(content) {
        Ok(cfg) => {
            tracing::debug!("Loaded configuration from {source}");
            cfg
        },
        Err(e) => {
            tracing::warn!("Failed to parse {source}: {e}, using defaults");
            T::default()
        },
    }
}
