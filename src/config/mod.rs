use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub filter: FilterConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub max_limit: Option<usize>,
    pub max_nested_depth: u32,
    pub max_query_length: usize,
    pub debug_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub default_page_size: usize,
    pub debounce_ms: u64,
    /// Reject sorting on undeclared attributes instead of ignoring the request
    pub strict_attributes: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        AppConfig::development().filter
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        AppConfig::development().query
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Filter overrides
        if let Ok(v) = env::var("FILTER_MAX_LIMIT") {
            self.filter.max_limit = v.parse().ok();
        }
        if let Ok(v) = env::var("FILTER_MAX_NESTED_DEPTH") {
            self.filter.max_nested_depth = v.parse().unwrap_or(self.filter.max_nested_depth);
        }
        if let Ok(v) = env::var("FILTER_MAX_QUERY_LENGTH") {
            self.filter.max_query_length = v.parse().unwrap_or(self.filter.max_query_length);
        }
        if let Ok(v) = env::var("FILTER_DEBUG_LOGGING") {
            self.filter.debug_logging = v.parse().unwrap_or(self.filter.debug_logging);
        }

        // Query overrides
        if let Ok(v) = env::var("QUERY_DEFAULT_PAGE_SIZE") {
            self.query.default_page_size = v.parse().unwrap_or(self.query.default_page_size);
        }
        if let Ok(v) = env::var("QUERY_DEBOUNCE_MS") {
            self.query.debounce_ms = v.parse().unwrap_or(self.query.debounce_ms);
        }
        if let Ok(v) = env::var("QUERY_STRICT_ATTRIBUTES") {
            self.query.strict_attributes = v.parse().unwrap_or(self.query.strict_attributes);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            filter: FilterConfig {
                max_limit: Some(1000),
                max_nested_depth: 10,
                max_query_length: 4096,
                debug_logging: true,
            },
            query: QueryConfig {
                default_page_size: 10,
                debounce_ms: 1000,
                strict_attributes: true,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            filter: FilterConfig {
                max_limit: Some(500),
                max_nested_depth: 5,
                max_query_length: 1024,
                debug_logging: false,
            },
            query: QueryConfig {
                default_page_size: 10,
                debounce_ms: 1000,
                strict_attributes: false,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            filter: FilterConfig {
                max_limit: Some(100),
                max_nested_depth: 3,
                max_query_length: 512,
                debug_logging: false,
            },
            query: QueryConfig {
                default_page_size: 10,
                debounce_ms: 500,
                strict_attributes: false,
            },
        }
    }
}

// Process-wide snapshot, read once at startup and handed to the engine explicitly
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
