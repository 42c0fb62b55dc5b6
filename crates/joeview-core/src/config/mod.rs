//! Application configuration schemas.
//!
//! Configuration is layered with the `config` crate: optional TOML files,
//! then `JOEVIEW__`-prefixed environment variables, then the conventional
//! `SUPABASE_*` variables. Each sub-module represents a logical section.

pub mod app;
pub mod logging;
pub mod supabase;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::logging::LoggingConfig;
use self::supabase::SupabaseConfig;

pub use self::app::CorsConfig;

use crate::error::AppError;

/// Environment variables accepted for the store URL, in priority order.
const URL_VARS: &[&str] = &["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
/// Environment variables accepted for the session-bound key.
const ANON_KEY_VARS: &[&str] = &["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"];
/// Environment variables accepted for the elevated key.
const SERVICE_ROLE_KEY_VARS: &[&str] = &["SUPABASE_SERVICE_ROLE_KEY"];

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Data store and identity provider settings.
    #[serde(default)]
    pub supabase: SupabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Merges `config/default.toml`, `config/{env}.toml`, `JOEVIEW__*`
    /// environment variables and the conventional `SUPABASE_*` variables,
    /// then validates that every required key is present.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("JOEVIEW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("supabase.url", first_env(URL_VARS))?
            .set_override_option("supabase.anon_key", first_env(ANON_KEY_VARS))?
            .set_override_option("supabase.service_role_key", first_env(SERVICE_ROLE_KEY_VARS))?;

        let config: Self = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check that every required key is present.
    ///
    /// Reports all missing keys at once rather than the first one found.
    pub fn validate(&self) -> Result<(), AppError> {
        let missing = self.supabase.missing_keys();
        if missing.is_empty() {
            return Ok(());
        }

        Err(AppError::configuration(format!(
            "Missing required configuration: {}. Set SUPABASE_URL, SUPABASE_ANON_KEY and \
             SUPABASE_SERVICE_ROLE_KEY (or the matching JOEVIEW__SUPABASE__* variables).",
            missing.join(", ")
        )))
    }
}

/// Return the first non-empty value among the named environment variables.
fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
