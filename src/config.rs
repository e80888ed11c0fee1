use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

/// Runtime configuration, sourced from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    /// Base URL encoded into visit passes; the gate scanner opens it.
    pub public_base_url: String,
    pub webhook_secret: Option<String>,
    pub identity_api_url: String,
    pub identity_api_key: Option<String>,
    pub visit_expiry_sweep_secs: u64,
    pub debug_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            database_path: PathBuf::from("data/estate.db"),
            log_dir: PathBuf::from("logs"),
            log_level: "info".into(),
            public_base_url: "http://localhost:8080".into(),
            webhook_secret: None,
            identity_api_url: "https://api.clerk.com/v1".into(),
            identity_api_key: None,
            visit_expiry_sweep_secs: 300,
            debug_mode: false,
        }
    }
}

impl AppConfig {
    /// Read the environment. Fallbacks are returned rather than logged because
    /// the subscriber is installed from this config; emit them with
    /// [`EnvFallback::log`] once logging is up.
    pub fn from_env() -> (Self, Vec<EnvFallback>) {
        // A missing .env is the normal case in containers.
        let _ = dotenvy::dotenv();

        let d = Self::default();
        let mut env = EnvLoader::default();
        let config = Self {
            host: env.try_load("ESTATE_HOST", d.host),
            port: env.try_load("ESTATE_PORT", d.port),
            database_path: PathBuf::from(env.try_load(
                "ESTATE_DATABASE_PATH",
                d.database_path.display().to_string(),
            )),
            log_dir: PathBuf::from(
                env.try_load("ESTATE_LOG_DIR", d.log_dir.display().to_string()),
            ),
            log_level: env.try_load("ESTATE_LOG_LEVEL", d.log_level),
            public_base_url: env
                .try_load::<String>("ESTATE_PUBLIC_BASE_URL", d.public_base_url)
                .trim_end_matches('/')
                .to_string(),
            webhook_secret: optional("ESTATE_WEBHOOK_SECRET"),
            identity_api_url: env
                .try_load::<String>("ESTATE_IDENTITY_API_URL", d.identity_api_url)
                .trim_end_matches('/')
                .to_string(),
            identity_api_key: optional("ESTATE_IDENTITY_API_KEY"),
            visit_expiry_sweep_secs: env
                .try_load("ESTATE_VISIT_EXPIRY_SWEEP_SECS", d.visit_expiry_sweep_secs)
                .max(1),
            debug_mode: env.try_load("ESTATE_DEBUG_MODE", d.debug_mode),
        };
        (config, env.fallbacks)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// A variable that was missing or unparsable and fell back to its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFallback {
    pub key: String,
    pub default: String,
    /// Parse error for an invalid value; `None` when the variable was unset.
    pub invalid: Option<(String, String)>,
}

impl EnvFallback {
    pub fn log(&self) {
        let key = &self.key;
        let default = &self.default;
        match &self.invalid {
            Some((raw, e)) => warn!("Invalid {key} value '{raw}': {e}, using default: {default}"),
            None => info!("{key} not set, using default: {default}"),
        }
    }
}

#[derive(Default)]
struct EnvLoader {
    fallbacks: Vec<EnvFallback>,
}

impl EnvLoader {
    fn try_load<T>(&mut self, key: &str, default: T) -> T
    where
        T: FromStr + Display,
        T::Err: Display,
    {
        let invalid = match env::var(key) {
            Ok(raw) => match raw.trim().parse() {
                Ok(v) => return v,
                Err(e) => Some((raw, e.to_string())),
            },
            Err(_) => None,
        };
        self.fallbacks.push(EnvFallback {
            key: key.to_string(),
            default: default.to_string(),
            invalid,
        });
        default
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_load_falls_back_on_parse_error() {
        env::set_var("ESTATE_TEST_BAD_PORT", "not-a-port");
        let mut loader = EnvLoader::default();
        let port: u16 = loader.try_load("ESTATE_TEST_BAD_PORT", 9000);
        assert_eq!(port, 9000);
        let fallback = &loader.fallbacks[0];
        assert_eq!(fallback.key, "ESTATE_TEST_BAD_PORT");
        assert_eq!(fallback.default, "9000");
        assert_eq!(
            fallback.invalid.as_ref().map(|(raw, _)| raw.as_str()),
            Some("not-a-port")
        );
        env::remove_var("ESTATE_TEST_BAD_PORT");
    }

    #[test]
    fn try_load_reads_value() {
        env::set_var("ESTATE_TEST_FLAG", "true");
        let mut loader = EnvLoader::default();
        let flag: bool = loader.try_load("ESTATE_TEST_FLAG", false);
        assert!(flag);
        assert!(loader.fallbacks.is_empty());
        env::remove_var("ESTATE_TEST_FLAG");
    }

    #[test]
    fn missing_value_is_recorded_for_later_logging() {
        let mut loader = EnvLoader::default();
        let dir: String = loader.try_load("ESTATE_TEST_UNSET_DIR", "logs".to_string());
        assert_eq!(dir, "logs");
        assert_eq!(
            loader.fallbacks,
            vec![EnvFallback {
                key: "ESTATE_TEST_UNSET_DIR".into(),
                default: "logs".into(),
                invalid: None,
            }]
        );
    }

    #[test]
    fn optional_ignores_blank_values() {
        env::set_var("ESTATE_TEST_BLANK", "   ");
        assert_eq!(optional("ESTATE_TEST_BLANK"), None);
        env::remove_var("ESTATE_TEST_BLANK");
    }
}
