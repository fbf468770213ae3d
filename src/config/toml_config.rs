use crate::utils::error::{Result, VoyageError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: Option<ApiConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub table_date_format: Option<String>,
    pub picker_date_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(VoyageError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| VoyageError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_TOKEN})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            VoyageError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.api.as_ref().and_then(|api| api.base_url.as_deref())
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.api.as_ref().and_then(|api| api.timeout_seconds)
    }

    pub fn headers(&self) -> HashMap<String, String> {
        self.api
            .as_ref()
            .and_then(|api| api.headers.clone())
            .unwrap_or_default()
    }

    pub fn table_date_format(&self) -> Option<&str> {
        self.display
            .as_ref()
            .and_then(|display| display.table_date_format.as_deref())
    }

    pub fn picker_date_format(&self) -> Option<&str> {
        self.display
            .as_ref()
            .and_then(|display| display.picker_date_format.as_deref())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(base_url) = self.base_url() {
            crate::utils::validation::validate_url("api.base_url", base_url)?;
        }
        if let Some(timeout) = self.timeout_seconds() {
            crate::utils::validation::validate_positive_number("api.timeout_seconds", timeout, 1)?;
        }
        if let Some(format) = self.table_date_format() {
            crate::utils::validation::validate_date_format("display.table_date_format", format)?;
        }
        if let Some(format) = self.picker_date_format() {
            crate::utils::validation::validate_date_format("display.picker_date_format", format)?;
        }
        Ok(())
    }
}
