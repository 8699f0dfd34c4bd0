//! Low-level HTTP transport for the Telegram Bot API.
//!
//! One blocking request per call against `<api-base>/bot<token>/<method>`:
//! a form-encoded POST when the request carries the POST flag, a bodiless
//! GET otherwise. POSTs carrying an [`InputFile`] go out as
//! `multipart/form-data`. No retries, no rate limiting.

use crate::error::{BotApiError, BotApiResult};
use crate::sink::{ErrorSink, NoopSink};
use crate::types::*;
use log::{debug, warn};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Performs one request per Bot API call.
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// Returns the raw response body, or `None` when the request could not
    /// complete at the transport level. Non-2xx responses still yield their
    /// body.
    fn send(&self, request: &OperationRequest) -> Option<String>;
}

/// Blocking `reqwest` transport.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    token: String,
    api_base: String,
    log_errors: bool,
    sink: Arc<dyn ErrorSink>,
}

impl HttpTransport {
    /// Create a transport from a [`BotConfig`] with no error sink.
    pub fn new(config: &BotConfig) -> BotApiResult<Self> {
        Self::with_sink(config, Arc::new(NoopSink))
    }

    /// Create a transport that reports transport failures to `sink`.
    pub fn with_sink(config: &BotConfig, sink: Arc<dyn ErrorSink>) -> BotApiResult<Self> {
        url::Url::parse(config.api_base())
            .map_err(|_| BotApiError::InvalidBaseUrl(config.api_base().to_string()))?;

        // The Bot API host is fixed and trusted; peer verification is off.
        let mut builder = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(Option::<Duration>::None)
            .danger_accept_invalid_certs(true);

        if let Some(ref proxy_config) = config.proxy {
            match proxy_config.proxy_url()? {
                Some(proxy_url) => {
                    let mut proxy = reqwest::Proxy::all(proxy_url.as_str())
                        .map_err(|e| BotApiError::InvalidProxy(e.to_string()))?;
                    if let Some((user, pass)) = proxy_config.credentials() {
                        proxy = proxy.basic_auth(&user, &pass);
                    }
                    debug!("Telegram transport using proxy {}", proxy_label(&proxy_url));
                    builder = builder.proxy(proxy);
                }
                None => {
                    warn!("Proxy configured without a host; port/scheme/auth ignored");
                }
            }
        }

        Self::with_client(config, sink, builder.build()?)
    }

    /// Create a transport around a caller-built HTTP client. The proxy in
    /// `config` is not applied; the client's own settings are used as-is.
    pub fn with_client(
        config: &BotConfig,
        sink: Arc<dyn ErrorSink>,
        http: Client,
    ) -> BotApiResult<Self> {
        if config.token.is_empty() {
            return Err(BotApiError::EmptyToken);
        }
        Ok(Self {
            http,
            token: config.token.clone(),
            api_base: config.api_base().to_string(),
            log_errors: config.log_errors,
            sink,
        })
    }

    /// Build the full URL for a Bot API method.
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// `text` with every occurrence of the token masked.
    fn redact(&self, text: &str) -> String {
        text.replace(&self.token, &mask_token(&self.token))
    }

    fn fail(&self, url: &str, request: &OperationRequest, err: &str) -> Option<String> {
        warn!("Telegram request to {} failed: {}", self.redact(url), self.redact(err));
        if self.log_errors {
            self.sink.log(url, &request.params, err);
        }
        None
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("token", &mask_token(&self.token))
            .field("api_base", &self.api_base)
            .field("log_errors", &self.log_errors)
            .finish()
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &OperationRequest) -> Option<String> {
        let url = self.method_url(&request.name);
        debug!(
            "Telegram API → {} ({})",
            request.name,
            if request.post { "POST" } else { "GET" }
        );

        let result = if request.post && has_files(&request.params) {
            match multipart_form(&request.params) {
                Ok(form) => self.http.post(&url).multipart(form).send(),
                Err(e) => return self.fail(&url, request, &e),
            }
        } else if request.post {
            self.http.post(&url).form(&form_fields(&request.params)).send()
        } else {
            self.http.get(&url).send()
        };

        let outcome = result.and_then(|resp| {
            let status = resp.status();
            if !status.is_success() {
                debug!("Telegram API ← {} HTTP {}", request.name, status);
            }
            resp.text()
        });

        match outcome {
            Ok(body) => Some(body),
            Err(e) => self.fail(&url, request, &e.without_url().to_string()),
        }
    }
}

/// `scheme://host:port` of a proxy URL, without any embedded credentials.
fn proxy_label(url: &url::Url) -> String {
    format!(
        "{}://{}:{}",
        url.scheme(),
        url.host_str().unwrap_or_default(),
        url.port_or_known_default().unwrap_or_default()
    )
}

/// Flatten parameters into form fields.
///
/// Strings are sent verbatim, numbers and booleans as their JSON text,
/// arrays and objects JSON-encoded into a single field; `null` is dropped.
pub fn form_fields(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| Some((key.clone(), field_text(value)?)))
        .collect()
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Whether any parameter is an [`InputFile`] upload.
pub fn has_files(params: &Params) -> bool {
    params.values().any(|v| InputFile::from_value(v).is_some())
}

/// Build a multipart body: files as parts read from disk, every other value
/// as a text field encoded like [`form_fields`].
pub fn multipart_form(params: &Params) -> Result<Form, String> {
    let mut form = Form::new();
    for (key, value) in params {
        if let Some(file) = InputFile::from_value(value) {
            let data = std::fs::read(&file.path)
                .map_err(|e| format!("cannot read {}: {e}", file.path.display()))?;
            let mut part = Part::bytes(data).file_name(file.upload_name());
            if let Some(mime) = file.mime_type.as_deref() {
                part = part
                    .mime_str(mime)
                    .map_err(|e| format!("invalid MIME type '{mime}': {e}"))?;
            }
            form = form.part(key.clone(), part);
        } else if let Some(text) = field_text(value) {
            form = form.text(key.clone(), text);
        }
    }
    Ok(form)
}
