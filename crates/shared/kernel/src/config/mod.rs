use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix for structured environment overrides (`OGMAP__PLACES__API_KEY`).
pub const ENV_PREFIX: &str = "OGMAP";
/// Config file looked up when no explicit path is given (any `config` format extension).
pub const DEFAULT_CONFIG_FILE: &str = "ogmap";

/// Plain environment variables honoured for compatibility with `.env` based deployments.
const LEGACY_ENV: &[(&str, &str)] =
    &[("GOOGLE_MAPS_API_KEY", "places.api_key"), ("PORT", "server.port")];

/// Custom error type for config loading.
#[ogmap_derive::ogmap_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Environment snapshot used instead of the process environment (mainly for tests).
pub type EnvMap = config::Map<String, String>;

/// Loads layered configuration into `T` from the process environment.
///
/// Layers, lowest precedence first:
/// 1. **File**: `path` (required when given) or the optional `ogmap.{toml,yaml,json,...}`
///    in the working directory.
/// 2. **Structured environment**: variables prefixed with `OGMAP__`, nested with `__`
///    (`OGMAP__SWEEP__PAUSE_MS` maps to `sweep.pause_ms`). `sweep.categories` and
///    `sweep.locations` accept `;`-separated lists.
/// 3. **Legacy environment**: `GOOGLE_MAPS_API_KEY` and `PORT`.
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing, a source is malformed,
/// or the merged values do not fit `T`.
///
/// # Example
/// ```rust
/// use ogmap_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_config_with_env(path, None)
}

/// Same as [`load_config`], reading environment layers from `env` when provided.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_with_env<T>(
    path: Option<impl AsRef<Path>>,
    env: Option<EnvMap>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (file, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    info!(path = %file.display(), required, "Loading configuration");

    let legacy: Vec<(&str, Option<String>)> = LEGACY_ENV
        .iter()
        .map(|&(var, key)| {
            let value = env
                .as_ref()
                .map_or_else(|| std::env::var(var).ok(), |map| map.get(var).cloned())
                .filter(|v| !v.trim().is_empty());
            if value.is_some() {
                debug!(var, key, "Applying legacy environment override");
            }
            (key, value)
        })
        .collect();

    let mut builder = Config::builder()
        .add_source(File::from(file.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(";")
                .with_list_parse_key("sweep.categories")
                .with_list_parse_key("sweep.locations")
                .source(env),
        );

    for (key, value) in legacy {
        builder = builder
            .set_override_option(key, value)
            .context(format!("Failed to apply override for {key}"))?;
    }

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ogmap_domain::config::ApiConfig;
    use std::fs;

    fn env(pairs: &[(&str, &str)]) -> Option<EnvMap> {
        Some(pairs.iter().map(|&(k, v)| (k.to_owned(), v.to_owned())).collect())
    }

    #[test]
    fn missing_default_file_yields_defaults() -> Result<(), ConfigError> {
        let cfg: ApiConfig = load_config_with_env(None::<&str>, env(&[]))?;

        assert_eq!(cfg.server.port, 3000);
        assert!(cfg.places.api_key.is_none());
        assert_eq!(cfg.sweep.categories.len(), 6);
        Ok(())
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result =
            load_config_with_env::<ApiConfig>(Some("/definitely/not/here/ogmap.toml"), env(&[]));
        assert!(matches!(result, Err(ConfigError::Config { .. })));
    }

    #[test]
    fn file_then_env_layers_apply_in_order() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("ogmap.toml");
        fs::write(
            &path,
            "[server]\nport = 4000\n\n[places]\napi_key = \"from-file\"\n\n[sweep]\npause_ms = 2000\n",
        )?;

        let cfg: ApiConfig = load_config_with_env(
            Some(&path),
            env(&[
                ("OGMAP__SWEEP__PAUSE_MS", "1200"),
                ("OGMAP__SWEEP__LOCATIONS", "Lagos, Nigeria;Warri, Nigeria"),
                ("GOOGLE_MAPS_API_KEY", "from-legacy-env"),
                ("PORT", "8081"),
            ]),
        )?;

        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.places.api_key.as_deref(), Some("from-legacy-env"));
        assert_eq!(cfg.sweep.pause_ms, 1200);
        assert_eq!(cfg.sweep.locations, vec!["Lagos, Nigeria", "Warri, Nigeria"]);
        Ok(())
    }

    #[test]
    fn blank_legacy_key_does_not_override_the_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("ogmap.toml");
        fs::write(&path, "[places]\napi_key = \"from-file\"\n")?;

        let cfg: ApiConfig =
            load_config_with_env(Some(&path), env(&[("GOOGLE_MAPS_API_KEY", "   ")]))?;

        assert_eq!(cfg.places.api_key.as_deref(), Some("from-file"));
        Ok(())
    }
}
