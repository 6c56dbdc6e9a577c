//! Server configuration

/// Which document store backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    /// Volatile in-process store, for local runs without a database
    Memory,
}

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_db: String,
    pub store_backend: StoreBackend,
    pub bind_address: String,
    pub api_key: Option<String>,
    pub cors_origins: Vec<String>,
    pub rate_limit_rps: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = var("PORT").unwrap_or_else(|| "3000".into());

        let store_backend = match var("STORE_BACKEND").as_deref() {
            Some(b) if b.eq_ignore_ascii_case("memory") => StoreBackend::Memory,
            _ => StoreBackend::Mongo,
        };

        Self {
            mongo_uri: var("MONGO_URI").unwrap_or_else(|| "mongodb://localhost:27017".into()),
            mongo_db: var("MONGO_DB").unwrap_or_else(|| "shop".into()),
            store_backend,
            bind_address: format!("{}:{}", host, port.trim()),
            api_key: var("API_KEY"),
            cors_origins: var("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| vec!["*".to_string()]),
            rate_limit_rps: var("RATE_LIMIT_RPS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|rps| *rps > 0)
                .unwrap_or(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]);
        assert_eq!(config.mongo_uri, "mongodb://localhost:27017");
        assert_eq!(config.mongo_db, "shop");
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.store_backend, StoreBackend::Mongo);
        assert_eq!(config.api_key, None);
        assert_eq!(config.cors_origins, vec!["*"]);
        assert_eq!(config.rate_limit_rps, 100);
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("MONGO_URI", "mongodb://db:27017"),
            ("PORT", "8081"),
            ("API_KEY", "s3cret"),
            ("STORE_BACKEND", "Memory"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("RATE_LIMIT_RPS", "5"),
        ]);
        assert_eq!(config.mongo_uri, "mongodb://db:27017");
        assert_eq!(config.bind_address, "0.0.0.0:8081");
        assert_eq!(config.api_key.as_deref(), Some("s3cret"));
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.rate_limit_rps, 5);
    }

    #[test]
    fn blank_api_key_disables_auth() {
        let config = config_from(&[("API_KEY", "  ")]);
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn invalid_rate_limit_falls_back() {
        assert_eq!(config_from(&[("RATE_LIMIT_RPS", "0")]).rate_limit_rps, 100);
        assert_eq!(config_from(&[("RATE_LIMIT_RPS", "lots")]).rate_limit_rps, 100);
    }
}
