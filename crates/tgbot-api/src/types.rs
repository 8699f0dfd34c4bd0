//! Shared types: client configuration, proxy descriptor, and the per-call
//! operation request.

use crate::error::{BotApiError, BotApiResult};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// Default Bot API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Port assumed for a proxy host that does not name one (libcurl's default).
pub const DEFAULT_PROXY_PORT: u16 = 1080;

/// Parameter mapping for a single Bot API call.
pub type Params = serde_json::Map<String, serde_json::Value>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Bot Configuration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Configuration for one bot client.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    /// Bot API token (from @BotFather).
    #[serde(default)]
    pub token: String,
    /// Whether transport failures are reported to the error sink.
    #[serde(default = "default_true")]
    pub log_errors: bool,
    /// Optional proxy; every sub-field is independently optional.
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
    /// Optional custom API base URL (for self-hosted Bot API servers).
    #[serde(default)]
    pub api_base_url: Option<String>,
}

fn default_true() -> bool {
    true
}

impl BotConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }

    /// The effective API base, without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }

    /// Token masked for display: first five and last four characters.
    pub fn masked_token(&self) -> String {
        mask_token(&self.token)
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            log_errors: true,
            proxy: None,
            api_base_url: None,
        }
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &self.masked_token())
            .field("log_errors", &self.log_errors)
            .field("proxy", &self.proxy)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

pub(crate) fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 10 {
        let head: String = chars[..5].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}

/// Replace the token segment of a Bot API URL (`.../bot<token>/...`).
///
/// The segment is searched from the end of the URL, preferring one shaped
/// like a token (`<id>:<secret>`), so a host or base path that happens to
/// start with `bot` is left alone.
pub fn redact_url(url: &str) -> String {
    let segment_end = |start: usize| {
        url[start..]
            .find(['/', '?', '#'])
            .map(|i| start + i)
            .unwrap_or(url.len())
    };
    let candidates: Vec<usize> = url
        .rmatch_indices("/bot")
        .map(|(i, _)| i + "/bot".len())
        .collect();
    let token_start = candidates
        .iter()
        .copied()
        .find(|&start| url[start..segment_end(start)].contains(':'))
        .or_else(|| candidates.first().copied());

    match token_start {
        Some(start) => {
            let end = segment_end(start);
            format!("{}{}{}", &url[..start], mask_token(&url[start..end]), &url[end..])
        }
        None => url.to_string(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Proxy
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Proxy protocol. Deserialises from its name or from a libcurl
/// `CURLPROXY_*` code (`0`/`1` http, `2` https, `5` socks5, `7` socks5h).
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProxyScheme {
    #[default]
    Http,
    Https,
    Socks5,
    /// SOCKS5 with hostname resolution on the proxy side.
    Socks5h,
}

impl ProxyScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
            Self::Socks5 => "socks5",
            Self::Socks5h => "socks5h",
        }
    }

    /// Map a libcurl `CURLPROXY_*` code; SOCKS4 variants are unsupported.
    pub fn from_curl_code(code: i64) -> Option<Self> {
        match code {
            0 | 1 => Some(Self::Http),
            2 => Some(Self::Https),
            5 => Some(Self::Socks5),
            7 => Some(Self::Socks5h),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for ProxyScheme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(i64),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => Self::from_curl_code(code)
                .ok_or_else(|| de::Error::custom(format!("unsupported proxy type {code}"))),
            Raw::Name(name) => name.parse().map_err(de::Error::custom),
        }
    }
}

impl FromStr for ProxyScheme {
    type Err = BotApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.trim().parse::<i64>() {
            return Self::from_curl_code(code).ok_or_else(|| {
                BotApiError::InvalidProxy(format!("unsupported proxy type {code}"))
            });
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            "socks5" => Ok(Self::Socks5),
            "socks5h" => Ok(Self::Socks5h),
            other => Err(BotApiError::InvalidProxy(format!(
                "unsupported proxy scheme '{other}'"
            ))),
        }
    }
}

/// Proxy descriptor. Absent sub-fields fall back to the transport default
/// for that sub-field only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxyConfig {
    #[serde(default, alias = "url")]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default, alias = "type")]
    pub scheme: Option<ProxyScheme>,
    /// `user:password`; the password part may be omitted.
    #[serde(default)]
    pub auth: Option<String>,
}

impl ProxyConfig {
    /// Proxy with only the host set.
    pub fn host(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            ..Default::default()
        }
    }

    /// Resolve the descriptor into a proxy URL.
    ///
    /// Returns `Ok(None)` when no host is configured. A scheme or port
    /// embedded in `host` is kept unless the explicit field overrides it.
    pub fn proxy_url(&self) -> BotApiResult<Option<Url>> {
        let host = match self.host.as_deref().map(str::trim) {
            Some(h) if !h.is_empty() => h,
            _ => return Ok(None),
        };

        let (embedded_scheme, rest) = match host.split_once("://") {
            Some((scheme, rest)) => (Some(scheme), rest),
            None => (None, host),
        };

        let scheme = match (self.scheme, embedded_scheme) {
            (Some(s), _) => s,
            (None, Some(s)) => s.parse()?,
            (None, None) => ProxyScheme::default(),
        };

        let mut url = Url::parse(&format!("{}://{}", scheme.as_str(), rest))
            .map_err(|e| BotApiError::InvalidProxy(format!("{host}: {e}")))?;

        let port = match self.port {
            Some(p) => Some(p),
            None if has_explicit_port(rest) => None,
            None => Some(DEFAULT_PROXY_PORT),
        };
        if let Some(p) = port {
            url.set_port(Some(p))
                .map_err(|_| BotApiError::InvalidProxy(format!("{host}: cannot carry a port")))?;
        }

        Ok(Some(url))
    }

    /// Split `auth` into `(user, password)`.
    pub fn credentials(&self) -> Option<(String, String)> {
        let auth = self.auth.as_deref()?;
        if auth.is_empty() {
            return None;
        }
        Some(match auth.split_once(':') {
            Some((user, pass)) => (user.to_string(), pass.to_string()),
            None => (auth.to_string(), String::new()),
        })
    }
}

fn has_explicit_port(authority_and_path: &str) -> bool {
    let authority = authority_and_path
        .split('/')
        .next()
        .unwrap_or(authority_and_path);
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    match host_port.rfind(']') {
        Some(end) => host_port[end..].contains(':'),
        None => host_port.contains(':'),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  File uploads
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const INPUT_FILE_KEY: &str = "input_file";

/// A local file uploaded as a multipart part.
///
/// Put it into [`Params`] with `InputFile::path(..).into()`; a POST carrying
/// at least one such value is sent as `multipart/form-data` instead of a
/// urlencoded form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    pub path: PathBuf,
    /// Name reported to the server; defaults to the path's file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl InputFile {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_name: None,
            mime_type: None,
        }
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    /// Recognise a parameter value produced by `InputFile::into`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if object.len() != 1 {
            return None;
        }
        serde_json::from_value(object.get(INPUT_FILE_KEY)?.clone()).ok()
    }

    /// Name sent in the part's `filename`.
    pub fn upload_name(&self) -> String {
        self.file_name.clone().unwrap_or_else(|| {
            self.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "file".to_string())
        })
    }
}

impl From<InputFile> for Value {
    fn from(file: InputFile) -> Self {
        let mut marker = serde_json::Map::new();
        marker.insert(
            INPUT_FILE_KEY.to_string(),
            serde_json::to_value(file).unwrap_or_default(),
        );
        Value::Object(marker)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Operation request
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One outbound Bot API call.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    pub name: String,
    pub params: Params,
    /// `true` sends `params` as a form body; `false` issues a bodiless GET.
    pub post: bool,
}

impl OperationRequest {
    pub fn new(name: impl Into<String>, params: Params, post: bool) -> Self {
        Self {
            name: name.into(),
            params,
            post,
        }
    }
}
