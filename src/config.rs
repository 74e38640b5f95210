use crate::service::math_check::DEFAULT_TOLERANCE;
use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

/// 环境变量前缀, 如 `INVOICE_EXPORT_SERVER__PORT=9090`
pub const ENV_PREFIX: &str = "INVOICE_EXPORT";

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// 金额核对容差
    pub tolerance: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            export: ExportConfig {
                tolerance: DEFAULT_TOLERANCE,
            },
        }
    }
}

impl AppConfig {
    /// 默认值 + 环境变量覆盖
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_environment(env: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default("export.tolerance", defaults.export.tolerance)?
            .add_source(
                env.prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
