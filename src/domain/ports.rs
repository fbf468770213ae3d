use crate::domain::notification::Notification;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// 與遠端 REST API 溝通的最小介面，路徑皆相對於 API base
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// GET 並回傳 JSON，非 2xx 視為錯誤
    async fn fetch_data(&self, path: &str) -> Result<serde_json::Value>;

    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<()>;

    async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<()>;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
    fn default_headers(&self) -> &HashMap<String, String>;
    fn table_date_format(&self) -> &str;
    fn picker_date_format(&self) -> &str;
}
