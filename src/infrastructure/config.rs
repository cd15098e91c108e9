//! 配置基础设施
//!
//! 配置来源优先级：环境变量 > 配置文件 (`config.toml` / `./config/config.toml`) > 默认值。

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// 配置文件查找路径
const CONFIG_PATHS: [&str; 2] = ["config.toml", "./config/config.toml"];

/// 服务配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// 监听端口
    pub port: u16,
    /// 唯一允许跨域访问的来源
    pub allowed_origin: String,
}

/// 静态资源与上传存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 前端页面和上传图片所在的公共目录
    pub public_dir: PathBuf,
    /// 公共目录下存放上传图片的子目录
    pub uploads_subdir: String,
    /// 单次请求体上限（字节）
    pub max_upload_bytes: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("./public"),
            uploads_subdir: "uploads".to_string(),
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| ConfigError::Validation(format!("无效的监听地址: {}", e)))
    }

    pub fn origin_header(&self) -> Result<HeaderValue, ConfigError> {
        HeaderValue::from_str(&self.allowed_origin)
            .map_err(|e| ConfigError::Validation(format!("无效的跨域来源: {}", e)))
    }
}

impl StorageConfig {
    pub fn upload_dir(&self) -> PathBuf {
        self.public_dir.join(&self.uploads_subdir)
    }
}

impl AppConfig {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 加载配置文件（若存在）并应用环境变量覆盖，返回配置及其来源文件
    pub fn load() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let source = CONFIG_PATHS
            .into_iter()
            .map(PathBuf::from)
            .find(|path| path.exists());

        let mut config = match &source {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;

        Ok((config, source))
    }

    /// 用 `lookup` 提供的变量覆盖配置项
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.http.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Validation(format!("PORT 不是有效端口: {}", port)))?;
        }
        if let Some(bind_address) = lookup("BIND_ADDRESS") {
            self.http.bind_address = bind_address;
        }
        if let Some(origin) = lookup("CORS_ORIGIN") {
            self.http.allowed_origin = origin;
        }
        if let Some(public_dir) = lookup("PUBLIC_DIR") {
            self.storage.public_dir = PathBuf::from(public_dir);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }
        if self.http.allowed_origin.is_empty() {
            return Err(ConfigError::Validation("跨域来源不能为空".to_string()));
        }
        self.http.origin_header()?;

        if self.storage.public_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("公共目录不能为空".to_string()));
        }
        if self.storage.uploads_subdir.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation("上传子目录不能为空".to_string()));
        }
        if self.storage.max_upload_bytes == 0 {
            return Err(ConfigError::Validation("上传大小上限必须大于0".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.storage.upload_dir(), PathBuf::from("./public/uploads"));
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.http.port = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.http.allowed_origin = "http://bad\norigin".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.storage.uploads_subdir = "/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "[http]\nport = 8081\n\n[storage]\npublic_dir = \"/srv/market\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.http.port, 8081);
        assert_eq!(config.http.bind_address, "0.0.0.0");
        assert_eq!(config.storage.upload_dir(), PathBuf::from("/srv/market/uploads"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "[http\nport = ").unwrap();

        assert!(matches!(
            AppConfig::load_from_file(&config_path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "5000"),
            ("CORS_ORIGIN", "https://market.example.com"),
            ("LOG_LEVEL", "DEBUG"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.http.port, 5000);
        assert_eq!(config.http.allowed_origin, "https://market.example.com");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.http.socket_addr().unwrap().port(), 5000);
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| (key == "PORT").then(|| "http".to_string()));
        assert!(result.is_err());
    }
}
