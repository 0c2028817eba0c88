use serde::Deserialize;
use std::fs;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing required config value '{0}'")]
    Missing(&'static str),
    #[error("default household '{0}' is not in dashboard.households")]
    UnknownDefaultHousehold(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub uri: String,
    pub database: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    4
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionsConfig {
    pub water: String,
    pub electricity: String,
    pub electricity_reference: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub households: Vec<String>,
    pub default_household: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            households: vec!["Home_2127".to_string()],
            default_household: "Home_2127".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub collections: CollectionsConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Load from `DASHBOARD_CONFIG`, falling back to `dashboard-config.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        use std::env;

        let path = env::var("DASHBOARD_CONFIG").unwrap_or_else(|_| "dashboard-config.toml".to_string());
        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read { path, source })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: AppConfig = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject present-but-empty required values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("store.uri", &self.store.uri),
            ("store.database", &self.store.database),
            ("collections.water", &self.collections.water),
            ("collections.electricity", &self.collections.electricity),
            ("collections.electricity_reference", &self.collections.electricity_reference),
            ("http.bind_addr", &self.http.bind_addr),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(key));
            }
        }

        if self.dashboard.households.is_empty() {
            return Err(ConfigError::Missing("dashboard.households"));
        }
        if !self.dashboard.households.contains(&self.dashboard.default_household) {
            return Err(ConfigError::UnknownDefaultHousehold(
                self.dashboard.default_household.clone(),
            ));
        }

        Ok(())
    }
}
