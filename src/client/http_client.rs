//! reqwest-backed implementation of [`MediaApi`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

use super::{parse_document_list, parse_media_list, ApiError, MediaApi};
use crate::config::Settings;
use crate::models::{DocumentRecord, MediaKind, UploadResponse, UploadTask};

const USER_AGENT: &str = concat!("nrspace/", env!("CARGO_PKG_VERSION"));

/// Resolve user agent from config value.
/// - None or empty => default nrspace user agent
/// - other => custom user agent string
pub fn resolve_user_agent(config: Option<&str>) -> String {
    match config.map(str::trim) {
        None | Some("") => USER_AGENT.to_string(),
        Some(custom) => custom.to_string(),
    }
}

/// HTTP client for one NR Space server.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for `base_url`.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        user_agent_config: Option<&str>,
    ) -> Result<Self, ApiError> {
        let user_agent = resolve_user_agent(user_agent_config);
        let client = Client::builder()
            .user_agent(&user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base(base_url)?,
        })
    }

    /// Create a client from application settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Self::new(
            &settings.base_url,
            settings.request_timeout(),
            settings.user_agent.as_deref(),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint or server-relative media URL against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// GET a JSON document.
    pub async fn get_json(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        let url = self.resolve(path)?;
        let response = self.send_checked(self.client.get(url.clone()), &url).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::malformed(path, e.to_string()))
    }

    /// Download raw bytes from a (possibly relative) URL.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.resolve(path)?;
        let response = self.send_checked(self.client.get(url.clone()), &url).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn send_checked(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<Response, ApiError> {
        let start = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        debug!(
            url = %url,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "request finished"
        );

        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl MediaApi for ApiClient {
    async fn fetch_media(&self, kind: MediaKind) -> Result<Vec<String>, ApiError> {
        let value = self.get_json(kind.endpoint()).await?;
        parse_media_list(kind.endpoint(), value)
    }

    async fn fetch_documents(&self) -> Result<Vec<DocumentRecord>, ApiError> {
        let value = self.get_json(crate::models::Category::Documents.list_endpoint()).await?;
        parse_document_list(value)
    }

    /// The JSON body is read regardless of status, since the server reports
    /// per-file failures as `{ success: false, error }`.
    async fn upload(&self, task: &UploadTask) -> Result<UploadResponse, ApiError> {
        let endpoint = task.category.upload_endpoint();
        let url = self.resolve(&endpoint)?;

        let mut part = Part::bytes(task.file.bytes.clone()).file_name(task.file.name.clone());
        if let Some(ref mime) = task.file.mime {
            part = part.mime_str(mime)?;
        }
        let form = Form::new().part("file", part);

        let start = Instant::now();
        let response = self.client.post(url.clone()).multipart(form).send().await?;
        debug!(
            url = %url,
            file = %task.file.name,
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "upload finished"
        );

        response
            .json::<UploadResponse>()
            .await
            .map_err(|e| ApiError::malformed(&endpoint, e.to_string()))
    }
}

/// Ensure the base URL ends with `/` so relative joins keep its path.
fn normalize_base(base_url: &str) -> Result<Url, ApiError> {
    let trimmed = base_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Ok(Url::parse(&with_slash)?)
}
