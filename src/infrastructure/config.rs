use crate::domain::dashboard::DashboardLabels;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub labels: DashboardLabels,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataSettings {
    pub path: PathBuf,
    pub primary_encoding: String,
    pub fallback_encoding: String,
    pub delimiter: char,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/microdato.csv"),
            primary_encoding: "utf-8".to_string(),
            fallback_encoding: "latin1".to_string(),
            delimiter: ',',
        }
    }
}

impl DataSettings {
    pub fn delimiter_byte(&self) -> anyhow::Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| anyhow::anyhow!("delimiter '{}' is not a single ASCII byte", self.delimiter))
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CacheSettings {
    pub ttl_seconds: Option<u64>,
}

impl CacheSettings {
    /// Time-to-live as a chrono duration, rejecting values chrono cannot hold
    pub fn ttl(&self) -> anyhow::Result<Option<chrono::Duration>> {
        self.ttl_seconds
            .map(|secs| {
                i64::try_from(secs)
                    .ok()
                    .and_then(chrono::Duration::try_seconds)
                    .ok_or_else(|| anyhow::anyhow!("cache.ttl_seconds {} is out of range", secs))
            })
            .transpose()
    }
}

/// Settings from `config/dashboard.*`, overridden by `INVENTORY__SECTION__KEY` variables
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("INVENTORY").separator("__"))
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.cache.ttl()?;
    config.data.delimiter_byte()?;
    Ok(config)
}
