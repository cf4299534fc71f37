use std::time::Duration;

use thiserror::Error;
use tracing::debug;

pub const DEFAULT_ORIGIN: &str = "https://en.numista.com";
pub const DEFAULT_API_BASE: &str = "https://api.numista.com/api/v3";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    SaveItem,
    RemoveItem,
    UploadPicture,
    ModifyWishes,
    SaveQuantity,
    SaveComment,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::SaveItem => "/vous/save_collection.php",
            Self::RemoveItem => "/vous/remove_collection_item.php",
            Self::UploadPicture => "/vous/upload_picture.php",
            Self::ModifyWishes => "/souhaits/modifier_veux.php",
            Self::SaveQuantity => "/vous/save_collection_old_style.php",
            Self::SaveComment => "/vous/save_comment.php",
        }
    }

    pub fn method(self) -> reqwest::Method {
        match self {
            Self::SaveItem | Self::RemoveItem | Self::UploadPicture => reqwest::Method::POST,
            Self::ModifyWishes | Self::SaveQuantity | Self::SaveComment => reqwest::Method::GET,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl ApiMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    fn method(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One call to the public JSON API. `path` is relative to the versioned
/// API root, e.g. `/users/12/collected_items`.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: ApiMethod,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: ApiMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    /// Adds a query parameter unless `value` is empty.
    pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.query.push((key, value));
        }
        self
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// Status and raw body of an API call. Non-2xx answers are not transport
/// errors; the caller decides what they mean.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("invalid session cookie")]
    InvalidSessionCookie,

    #[error("no API key configured")]
    MissingApiKey,

    #[error("invalid API key")]
    InvalidApiKey,

    #[error("API call {method} {path} failed: {source}")]
    Api {
        method: &'static str,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("failed to read response from {endpoint}: {source}")]
    Body {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Raw exchange with the site: one request, one text body back.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Sends `params` form-encoded (POST endpoints) or as a query string
    /// (GET endpoints). Repeated keys are sent as repeated pairs.
    async fn send(
        &self,
        endpoint: Endpoint,
        params: &[(&'static str, String)],
    ) -> Result<String, TransportError>;

    /// Posts one file as the `file` field of a multipart body.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, TransportError>;

    /// Calls the public JSON API with the configured API key.
    async fn api(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[derive(Clone, Debug)]
pub struct TransportOptions {
    pub base_url: String,
    pub session_cookie: Option<String>,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
    pub api_base_url: String,
    pub api_key: Option<String>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ORIGIN.to_string(),
            session_cookie: None,
            timeout_seconds: 10,
            proxy: None,
            api_base_url: DEFAULT_API_BASE.to_string(),
            api_key: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base: reqwest::Url,
    api_client: reqwest::Client,
    api_base: String,
    has_api_key: bool,
}

impl HttpTransport {
    pub fn new(options: &TransportOptions) -> Result<Self, TransportError> {
        let base = reqwest::Url::parse(options.base_url.trim()).map_err(|_| {
            TransportError::InvalidBaseUrl {
                url: options.base_url.clone(),
            }
        })?;
        if base.cannot_be_a_base() {
            return Err(TransportError::InvalidBaseUrl {
                url: options.base_url.clone(),
            });
        }
        let api_base = options.api_base_url.trim().trim_end_matches('/').to_string();
        if reqwest::Url::parse(&api_base).map_or(true, |u| u.cannot_be_a_base()) {
            return Err(TransportError::InvalidBaseUrl {
                url: options.api_base_url.clone(),
            });
        }
        let client = build_client(
            site_headers(options.session_cookie.as_deref())?,
            options.proxy.as_deref(),
            options.timeout_seconds,
        )?;
        let api_key = options
            .api_key
            .as_deref()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty());
        let api_client = build_client(
            api_headers(api_key)?,
            options.proxy.as_deref(),
            options.timeout_seconds,
        )?;
        Ok(Self {
            client,
            base,
            api_client,
            api_base,
            has_api_key: api_key.is_some(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn url_for(&self, endpoint: Endpoint) -> Result<reqwest::Url, TransportError> {
        self.base
            .join(endpoint.path())
            .map_err(|_| TransportError::InvalidBaseUrl {
                url: self.base.to_string(),
            })
    }

    async fn read_body(
        endpoint: Endpoint,
        resp: reqwest::Response,
    ) -> Result<String, TransportError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint: endpoint.path(),
                status: status.as_u16(),
            });
        }
        resp.text().await.map_err(|e| TransportError::Body {
            endpoint: endpoint.path(),
            source: e,
        })
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    match lower.rsplit_once('.').map(|(_, ext)| ext) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

impl Transport for HttpTransport {
    async fn send(
        &self,
        endpoint: Endpoint,
        params: &[(&'static str, String)],
    ) -> Result<String, TransportError> {
        let url = self.url_for(endpoint)?;
        debug!(endpoint = endpoint.path(), params = params.len(), "sending request");
        let builder = if endpoint.method() == reqwest::Method::GET {
            self.client.get(url).query(params)
        } else {
            self.client.post(url).form(params)
        };
        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError::Request {
                endpoint: endpoint.path(),
                source: e,
            })?;
        Self::read_body(endpoint, resp).await
    }

    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, TransportError> {
        let endpoint = Endpoint::UploadPicture;
        let url = self.url_for(endpoint)?;
        debug!(file = file_name, size = bytes.len(), "uploading picture");
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))
            .map_err(|e| TransportError::Request {
                endpoint: endpoint.path(),
                source: e,
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let resp = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                endpoint: endpoint.path(),
                source: e,
            })?;
        Self::read_body(endpoint, resp).await
    }

    async fn api(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        if !self.has_api_key {
            return Err(TransportError::MissingApiKey);
        }
        let failed = |source: reqwest::Error| TransportError::Api {
            method: request.method.as_str(),
            path: request.path.clone(),
            source,
        };
        debug!(
            method = request.method.as_str(),
            path = %request.path,
            params = request.query.len(),
            "calling api"
        );
        let mut builder = self
            .api_client
            .request(request.method.method(), self.api_url(&request.path))
            .query(&request.query);
        if let Some(token) = request.bearer.as_deref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body.as_ref() {
            builder = builder.json(body);
        }
        let resp = builder.send().await.map_err(failed)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(failed)?;
        Ok(ApiResponse { status, body })
    }
}

fn site_headers(session_cookie: Option<&str>) -> Result<reqwest::header::HeaderMap, TransportError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:95.0) Gecko/20100101 Firefox/95.0",
        ),
    );
    headers.insert(
        reqwest::header::HeaderName::from_static("x-requested-with"),
        reqwest::header::HeaderValue::from_static("XMLHttpRequest"),
    );
    if let Some(cookie) = session_cookie.map(|c| c.trim()).filter(|c| !c.is_empty()) {
        let mut value = reqwest::header::HeaderValue::from_str(cookie)
            .map_err(|_| TransportError::InvalidSessionCookie)?;
        value.set_sensitive(true);
        headers.insert(reqwest::header::COOKIE, value);
    }
    Ok(headers)
}

fn api_headers(api_key: Option<&str>) -> Result<reqwest::header::HeaderMap, TransportError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(concat!("numicollec/", env!("CARGO_PKG_VERSION"))),
    );
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    if let Some(key) = api_key {
        let mut value =
            reqwest::header::HeaderValue::from_str(key).map_err(|_| TransportError::InvalidApiKey)?;
        value.set_sensitive(true);
        headers.insert(reqwest::header::HeaderName::from_static("numista-api-key"), value);
    }
    Ok(headers)
}

fn build_client(
    headers: reqwest::header::HeaderMap,
    proxy: Option<&str>,
    timeout_seconds: usize,
) -> Result<reqwest::Client, TransportError> {
    let timeout = Duration::from_secs(timeout_seconds.try_into().unwrap_or(10));
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::none())
        .timeout(timeout);

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| TransportError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| TransportError::HttpClientBuild { source: e })
}
