use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub ledger: LedgerConfig,
    pub chart: ChartConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub data_dir: String,
    pub users_file: String,
    pub templates_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub bcrypt_cost: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    pub cookie_name: String,
    pub cookie_max_age_days: i64,
    pub max_increment_hours: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Settings rooted at `data_dir`, used by tests and tooling that don't read `config/`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                max_body_bytes: 64 * 1024,
            },
            storage: StorageConfig {
                data_dir: data_dir.into().to_string_lossy().into_owned(),
                users_file: "users.json".into(),
                templates_dir: "templates".into(),
            },
            auth: AuthConfig {
                bcrypt_cost: 4,
            },
            ledger: LedgerConfig {
                cookie_name: "atividades_data".into(),
                cookie_max_age_days: 30,
                max_increment_hours: 168.0,
            },
            chart: ChartConfig {
                width: 600,
                height: 600,
            },
        }
    }

    pub fn users_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir).join(&self.storage.users_file)
    }

    pub fn template_path(&self, name: &str) -> PathBuf {
        PathBuf::from(&self.storage.templates_dir).join(name)
    }
}
