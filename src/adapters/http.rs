use crate::domain::ports::{ApiTransport, ConfigProvider};
use crate::utils::error::{Result, VoyageError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response};
use url::Url;

/// 以 reqwest 實作的 REST transport，所有路徑相對於 base URL
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base_url: normalize_base(base_url)?,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in config.default_headers() {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                VoyageError::InvalidConfigValueError {
                    field: "api.headers".to_string(),
                    value: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| VoyageError::InvalidConfigValueError {
                    field: format!("api.headers.{}", name),
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
            headers.insert(header_name, header_value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: normalize_base(config.api_base_url())?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn ensure_success(method: &Method, path: &str, response: Response) -> Result<Response> {
        let status = response.status();
        tracing::debug!("API response status for {} {}: {}", method, path, status);
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if !body.is_empty() {
            tracing::debug!("Error body from {} {}: {}", method, path, body);
        }
        Err(VoyageError::HttpStatusError {
            method: method.to_string(),
            path: path.to_string(),
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl ApiTransport for HttpApi {
    async fn fetch_data(&self, path: &str) -> Result<serde_json::Value> {
        let url = self.endpoint(path)?;
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(&Method::GET, path, response).await?;
        Ok(response.json().await?)
    }

    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<()> {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {} with body {}", url, body);

        let response = self.client.post(url).json(body).send().await?;
        Self::ensure_success(&Method::POST, path, response).await?;
        Ok(())
    }

    async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<()> {
        let url = self.endpoint(path)?;
        tracing::debug!("DELETE {} {:?}", url, query);

        let response = self.client.delete(url).query(query).send().await?;
        Self::ensure_success(&Method::DELETE, path, response).await?;
        Ok(())
    }
}

// Url::join 會把最後一段當檔名取代，base 必須以 '/' 結尾
fn normalize_base(base_url: &str) -> Result<Url> {
    crate::utils::validation::validate_url("api.base_url", base_url)?;
    let mut url = Url::parse(base_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
