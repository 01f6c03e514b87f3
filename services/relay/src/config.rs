use gemini_client::{ApiKey, DEFAULT_API_BASE, GeminiConfig};
use relay_core::BroadcastGuard;
use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub gemini_api_base: String,
    /// Name of the variable holding the Gemini key. The key itself is read
    /// on every request, not here.
    pub gemini_api_key_var: String,
    pub ai_replies: bool,
    pub broadcast_guard: BroadcastGuard,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let gemini_api_base =
            std::env::var("GEMINI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let gemini_api_key_var =
            std::env::var("GEMINI_API_KEY_VAR").unwrap_or_else(|_| "GEMINI_API_KEY".to_string());
        if gemini_api_key_var.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "GEMINI_API_KEY_VAR".to_string(),
                "must name an environment variable".to_string(),
            ));
        }

        let ai_replies_str = std::env::var("AI_REPLIES").unwrap_or_else(|_| "on".to_string());
        let ai_replies = match ai_replies_str.to_lowercase().as_str() {
            "on" | "true" | "1" | "yes" => true,
            "off" | "false" | "0" | "no" => false,
            _ => {
                return Err(ConfigError::InvalidValue(
                    "AI_REPLIES".to_string(),
                    format!("'{}' is not on/off", ai_replies_str),
                ));
            }
        };

        let broadcast_guard = std::env::var("BROADCAST_GUARD")
            .unwrap_or_else(|_| "strict".to_string())
            .parse::<BroadcastGuard>()
            .map_err(|e| ConfigError::InvalidValue("BROADCAST_GUARD".to_string(), e))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            gemini_api_base,
            gemini_api_key_var,
            ai_replies,
            broadcast_guard,
            log_level,
        })
    }

    /// Whether the Gemini key is currently set. A missing key is not fatal at
    /// startup; reply generation fails on first use instead.
    pub fn gemini_key_present(&self) -> bool {
        std::env::var(&self.gemini_api_key_var)
            .map(|key| !key.is_empty())
            .unwrap_or(false)
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            base_url: self.gemini_api_base.clone(),
            api_key: ApiKey::Env(self.gemini_api_key_var.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tracing::Level;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("BIND_ADDRESS");
            env::remove_var("GEMINI_API_BASE");
            env::remove_var("GEMINI_API_KEY_VAR");
            env::remove_var("GEMINI_API_KEY");
            env::remove_var("AI_REPLIES");
            env::remove_var("BROADCAST_GUARD");
            env::remove_var("RUST_LOG");
        }
    }

    #[test]
    fn test_config_error_display() {
        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        clear_env_vars();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.gemini_api_base, DEFAULT_API_BASE);
        assert_eq!(config.gemini_api_key_var, "GEMINI_API_KEY");
        assert!(config.ai_replies);
        assert_eq!(config.broadcast_guard, BroadcastGuard::Strict);
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
            env::set_var("GEMINI_API_BASE", "http://localhost:9999");
            env::set_var("GEMINI_API_KEY_VAR", "MY_GEMINI_KEY");
            env::set_var("AI_REPLIES", "off");
            env::set_var("BROADCAST_GUARD", "legacy");
            env::set_var("RUST_LOG", "debug");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.gemini_api_base, "http://localhost:9999");
        assert_eq!(config.gemini_api_key_var, "MY_GEMINI_KEY");
        assert!(!config.ai_replies);
        assert_eq!(config.broadcast_guard, BroadcastGuard::Legacy);
        assert_eq!(config.log_level, Level::DEBUG);

        let gemini = config.gemini_config();
        assert_eq!(gemini.base_url, "http://localhost:9999");
        assert!(matches!(gemini.api_key, ApiKey::Env(ref var) if var == "MY_GEMINI_KEY"));
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_missing_key_is_not_a_startup_error() {
        clear_env_vars();

        let config = Config::from_env().expect("Config should load without a key");
        assert!(!config.gemini_key_present());

        unsafe {
            env::set_var("GEMINI_API_KEY", "test-gemini-key");
        }
        assert!(config.gemini_key_present());

        unsafe {
            env::set_var("GEMINI_API_KEY", "");
        }
        assert!(!config.gemini_key_present());
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_invalid_bind_address() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "not-a-valid-address");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "BIND_ADDRESS"),
        }
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
        }
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_invalid_toggles() {
        clear_env_vars();
        unsafe {
            env::set_var("AI_REPLIES", "sometimes");
        }
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("AI_REPLIES"));

        clear_env_vars();
        unsafe {
            env::set_var("BROADCAST_GUARD", "lenient");
        }
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("BROADCAST_GUARD"));

        clear_env_vars();
        unsafe {
            env::set_var("GEMINI_API_KEY_VAR", " ");
        }
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY_VAR"));
        clear_env_vars();
    }
}
