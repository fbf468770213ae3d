#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::collections::HashMap;
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/";
/// 表格中的時間格式
pub const DEFAULT_TABLE_DATE_FORMAT: &str = "%d.%m.%Y %H:%M";
/// 日期時間選擇器的顯示格式：day month year, HH:mm:ss
pub const DEFAULT_PICKER_DATE_FORMAT: &str = "%d %B %Y, %H:%M:%S";

/// 合併 TOML 檔案與命令列參數後的最終設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub timeout_seconds: Option<u64>,
    pub headers: HashMap<String, String>,
    pub table_date_format: String,
    pub picker_date_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: None,
            headers: HashMap::new(),
            table_date_format: DEFAULT_TABLE_DATE_FORMAT.to_string(),
            picker_date_format: DEFAULT_PICKER_DATE_FORMAT.to_string(),
        }
    }
}

impl AppConfig {
    /// 優先順序：命令列 > TOML 檔案 > 預設值
    pub fn resolve(file: Option<&TomlConfig>, api_base_override: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(file) = file {
            file.validate()?;
            if let Some(base_url) = file.base_url() {
                config.api_base_url = base_url.to_string();
            }
            config.timeout_seconds = file.timeout_seconds();
            config.headers = file.headers();
            if let Some(format) = file.table_date_format() {
                config.table_date_format = format.to_string();
            }
            if let Some(format) = file.picker_date_format() {
                config.picker_date_format = format.to_string();
            }
        }

        if let Some(base_url) = api_base_override {
            config.api_base_url = base_url.to_string();
        }

        config.validate()?;
        Ok(config)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api_base_url)?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("api.timeout_seconds", timeout, 1)?;
        }
        validation::validate_date_format("display.table_date_format", &self.table_date_format)?;
        validation::validate_date_format("display.picker_date_format", &self.picker_date_format)?;
        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn default_headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    fn table_date_format(&self) -> &str {
        &self.table_date_format
    }

    fn picker_date_format(&self) -> &str {
        &self.picker_date_format
    }
}
