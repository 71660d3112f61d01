//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，API_KEY / WEAPP_BASE_URL 环境变量优先

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::services::weapp::WEAPP_BASE_URL;

/// 配置文件查找路径
const CONFIG_PATHS: [&str; 2] = ["config.json", "config/config.json"];

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API Key（为空则不启用认证）
    #[serde(default)]
    pub api_key: String,
    /// 请求微信接口的超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 微信接口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeappConfig {
    /// 接口域名
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub weapp: WeappConfig,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_base_url() -> String { WEAPP_BASE_URL.to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for WeappConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件 {} 失败", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 {} 失败", path.display()))?;
        Ok(config)
    }

    /// 加载配置
    ///
    /// 按顺序查找配置文件，均不存在时使用默认值；文件存在但解析失败视为错误。
    /// 返回配置及其来源文件，日志尚未初始化，由调用方输出
    pub fn load() -> Result<(Self, Option<PathBuf>)> {
        let found = CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists());

        let mut config = match &found {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());

        Ok((config, found))
    }

    /// 应用环境变量覆盖
    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("API_KEY") {
            self.api.api_key = api_key;
        }
        if let Some(base_url) = lookup("WEAPP_BASE_URL") {
            self.weapp.base_url = base_url;
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// 测试默认配置
    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.connect_timeout_secs, 10);
        assert!(config.api.api_key.is_empty());
        assert_eq!(config.weapp.base_url, "https://api.weixin.qq.com");
        assert_eq!(config.log.level, "info");
    }

    /// 测试部分字段缺省
    #[test]
    fn test_partial_config() {
        println!("\n========== 测试部分配置解析 ==========");
        let config: AppConfig = serde_json::from_str(
            r#"{"server": {"port": 9090}, "weapp": {"base_url": "http://127.0.0.1:9000"}}"#,
        )
        .unwrap();
        println!("  {:?}", config);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.weapp.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api.timeout_secs, 30);
        println!("✅ 部分配置解析测试通过！");
    }

    /// 测试从文件加载
    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("weapp-retain-{}.json", std::process::id()));
        fs::write(&path, r#"{"api": {"api_key": "secret", "timeout_secs": 5}}"#).unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.api.api_key, "secret");
        assert_eq!(config.api.timeout_secs, 5);

        fs::write(&path, "{ not json").unwrap();
        assert!(AppConfig::from_file(&path).is_err());

        fs::remove_file(&path).unwrap();
    }

    /// 测试环境变量覆盖
    #[test]
    fn test_apply_env() {
        let env: HashMap<&str, &str> = [("API_KEY", "from-env"), ("WEAPP_BASE_URL", "http://mock")]
            .into_iter()
            .collect();
        let mut config = AppConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.api_key, "from-env");
        assert_eq!(config.weapp.base_url, "http://mock");

        let mut config = AppConfig::default();
        config.apply_env(|_| None);
        assert!(config.api.api_key.is_empty());
    }
}
