use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 默认配置文件
pub const DEFAULT_CONFIG_FILE: &str = "label_fetch.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- ShipStation 订单 API ---
    pub order_api_url: String,
    /// 两行格式的密钥文件 (PUBLIC KEY / PRIVATE KEY)
    pub api_key_file: PathBuf,
    // --- Google Drive ---
    /// OAuth 客户端配置 JSON
    pub drive_credentials_file: PathBuf,
    /// 授权成功后保存的会话令牌
    pub drive_token_file: PathBuf,
    pub drive_api_base_url: String,
    /// 存放标签图片的共享盘 ID
    pub shared_drive_id: String,
    /// 直接指定访问令牌时跳过交互式授权
    pub drive_access_token: Option<String>,
    // --- 输出 ---
    pub output_dir: PathBuf,
    /// 输出日志文件
    pub log_file: PathBuf,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 网络 ---
    pub request_timeout_secs: u64,
    /// 同时进行的搜索/下载请求数量，1 表示完全顺序执行
    pub max_concurrent_requests: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            order_api_url: "https://ssapi.shipstation.com/orders".to_string(),
            api_key_file: PathBuf::from("ShipstationApI-KeyAccess.txt"),
            drive_credentials_file: PathBuf::from("GoogleDriveCredentials.json"),
            drive_token_file: PathBuf::from("token.json"),
            drive_api_base_url: "https://www.googleapis.com".to_string(),
            shared_drive_id: "0ALwW2dhzNkP8Uk9PVA".to_string(),
            drive_access_token: None,
            output_dir: PathBuf::from("Pictures"),
            log_file: PathBuf::from("app.log"),
            verbose_logging: false,
            request_timeout_secs: 30,
            max_concurrent_requests: 4,
        }
    }
}

impl Config {
    /// 仅从环境变量加载（未设置的项使用默认值）
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// 加载完整配置：默认值 ← TOML 文件（可选） ← 环境变量
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("LABEL_FETCH_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let path = Path::new(&path);

        let base = if path.exists() {
            Self::from_toml_file(path)?
        } else {
            Self::default()
        };

        base.apply_env().validated()
    }

    /// 从 TOML 文件加载，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("无法解析配置文件 {}: {}", path.display(), e)))
    }

    fn apply_env(self) -> Self {
        Self {
            order_api_url: std::env::var("ORDER_API_URL").unwrap_or(self.order_api_url),
            api_key_file: std::env::var("API_KEY_FILE").map(PathBuf::from).unwrap_or(self.api_key_file),
            drive_credentials_file: std::env::var("DRIVE_CREDENTIALS_FILE").map(PathBuf::from).unwrap_or(self.drive_credentials_file),
            drive_token_file: std::env::var("DRIVE_TOKEN_FILE").map(PathBuf::from).unwrap_or(self.drive_token_file),
            drive_api_base_url: std::env::var("DRIVE_API_BASE_URL").unwrap_or(self.drive_api_base_url),
            shared_drive_id: std::env::var("SHARED_DRIVE_ID").unwrap_or(self.shared_drive_id),
            drive_access_token: std::env::var("DRIVE_ACCESS_TOKEN").ok().or(self.drive_access_token),
            output_dir: std::env::var("OUTPUT_DIR").map(PathBuf::from).unwrap_or(self.output_dir),
            log_file: std::env::var("LOG_FILE").map(PathBuf::from).unwrap_or(self.log_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            max_concurrent_requests: std::env::var("MAX_CONCURRENT_REQUESTS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_concurrent_requests),
        }
    }

    fn validated(self) -> AppResult<Self> {
        if self.max_concurrent_requests == 0 {
            return Err(AppError::Config("max_concurrent_requests 必须大于 0".to_string()));
        }
        if self.shared_drive_id.trim().is_empty() {
            return Err(AppError::Config("shared_drive_id 不能为空".to_string()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            output_dir = "labels"
            max_concurrent_requests = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("labels"));
        assert_eq!(config.max_concurrent_requests, 1);
        assert_eq!(config.order_api_url, "https://ssapi.shipstation.com/orders");
        assert_eq!(config.log_file, PathBuf::from("app.log"));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let config = Config {
            max_concurrent_requests: 0,
            ..Config::default()
        };
        assert!(matches!(config.validated(), Err(AppError::Config(_))));
    }
}
