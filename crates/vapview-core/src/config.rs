//! Configuration Resolver
//!
//! Turns the raw `config` parameter into a [`PlayerConfiguration`]:
//! - empty string: empty configuration
//! - `http://` / `https://` URL: fetched and parsed as JSON
//! - anything else: percent-decoded inline JSON
//!
//! Resolution is best effort. Every failure is logged under the
//! `vapview::config` target and degrades to the empty configuration so a
//! broken config never blocks playback of a valid source.

use crate::{Error, Result};
use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

/// Tracing target for configuration degradation
pub const CONFIG_LOG_TARGET: &str = "vapview::config";

/// Default render width
pub const DEFAULT_WIDTH: f64 = 375.0;
/// Default render height
pub const DEFAULT_HEIGHT: f64 = 375.0;
/// Default frame rate
pub const DEFAULT_FPS: f64 = 20.0;

/// Where the configuration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Empty,
    Remote(String),
    Inline(String),
}

impl ConfigSource {
    /// Classify the raw `config` parameter
    pub fn classify(raw: &str) -> Self {
        if raw.is_empty() {
            ConfigSource::Empty
        } else if has_http_scheme(raw) {
            ConfigSource::Remote(raw.to_string())
        } else {
            ConfigSource::Inline(raw.to_string())
        }
    }
}

fn has_http_scheme(raw: &str) -> bool {
    let starts_with = |prefix: &str| {
        raw.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    starts_with("http://") || starts_with("https://")
}

/// Width, height and frame rate handed to the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub fps: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}@{}fps", self.width, self.height, self.fps)
    }
}

/// Open-ended configuration document passed through to the player.
///
/// Only `info.w`, `info.h` and `info.fps` are interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerConfiguration(Map<String, Value>);

impl PlayerConfiguration {
    /// The empty configuration object
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap a parsed JSON value; only objects are accepted
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(Error::ConfigNotObject),
        }
    }

    /// Parse a JSON document
    pub fn parse(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Top-level entries of the document
    pub fn entries(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Document as a JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// The `info` object, if present
    pub fn info(&self) -> Option<&Map<String, Value>> {
        self.0.get("info").and_then(Value::as_object)
    }

    /// Dimensions from `info`, each field falling back to its default
    pub fn dimensions(&self) -> Dimensions {
        let defaults = Dimensions::default();
        let Some(info) = self.info() else {
            return defaults;
        };

        let field = |key: &str, default: f64| {
            info.get(key)
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(default)
        };

        Dimensions {
            width: field("w", defaults.width),
            height: field("h", defaults.height),
            fps: field("fps", defaults.fps),
        }
    }
}

/// Fetches a remote configuration document
#[async_trait(?Send)]
pub trait ConfigFetcher {
    /// Return the response body as text
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// HTTP fetcher backed by reqwest
#[cfg(feature = "http")]
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "http")]
#[async_trait(?Send)]
impl ConfigFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.clone()).send().await?;
        // The body is parsed whatever the status; an error page fails as JSON
        debug!(url = %url, status = %response.status(), "Configuration response");
        Ok(response.text().await?)
    }
}

/// Resolves the raw `config` parameter into a [`PlayerConfiguration`]
#[derive(Debug, Clone)]
pub struct ConfigResolver<F> {
    fetcher: F,
}

#[cfg(feature = "http")]
impl Default for ConfigResolver<HttpFetcher> {
    fn default() -> Self {
        Self::new(HttpFetcher::new())
    }
}

impl<F: ConfigFetcher> ConfigResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolve, degrading to the empty configuration on any failure
    pub async fn resolve(&self, raw: &str) -> PlayerConfiguration {
        match self.try_resolve(raw).await {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    target: CONFIG_LOG_TARGET,
                    code = e.error_code(),
                    error = %e,
                    "Configuration unavailable, continuing with empty configuration"
                );
                PlayerConfiguration::empty()
            }
        }
    }

    /// Resolve, reporting the failure instead of degrading
    pub async fn try_resolve(&self, raw: &str) -> Result<PlayerConfiguration> {
        match ConfigSource::classify(raw) {
            ConfigSource::Empty => Ok(PlayerConfiguration::empty()),
            ConfigSource::Remote(location) => {
                let url = Url::parse(&location)
                    .map_err(|e| Error::InvalidConfigUrl(format!("{location}: {e}")))?;
                let body = self.fetcher.fetch(&url).await?;
                PlayerConfiguration::parse(&body)
            }
            ConfigSource::Inline(encoded) => {
                check_escapes(&encoded)?;
                let decoded = percent_decode_str(&encoded)
                    .decode_utf8()
                    .map_err(|e| Error::ConfigDecode(e.to_string()))?;
                PlayerConfiguration::parse(&decoded)
            }
        }
    }
}

/// Every `%` must start a two hex digit escape
fn check_escapes(encoded: &str) -> Result<()> {
    let bytes = encoded.as_bytes();
    let mut i = 0;
    while let Some(offset) = bytes[i..].iter().position(|&b| b == b'%') {
        let at = i + offset;
        match bytes.get(at + 1..at + 3) {
            Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i = at + 3,
            _ => {
                return Err(Error::ConfigDecode(format!(
                    "malformed percent escape at byte {at}"
                )))
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    struct StaticFetcher {
        body: Option<String>,
        requested: RefCell<Vec<String>>,
    }

    impl StaticFetcher {
        fn ok(body: &str) -> Self {
            Self {
                body: Some(body.to_string()),
                requested: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                body: None,
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl ConfigFetcher for StaticFetcher {
        async fn fetch(&self, url: &Url) -> Result<String> {
            self.requested.borrow_mut().push(url.to_string());
            self.body.clone().ok_or_else(|| Error::ConfigFetch {
                url: url.to_string(),
                reason: "connection refused".into(),
            })
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(ConfigSource::classify(""), ConfigSource::Empty);
        assert_eq!(
            ConfigSource::classify("https://cdn.example.com/c.json"),
            ConfigSource::Remote("https://cdn.example.com/c.json".into())
        );
        assert_eq!(
            ConfigSource::classify("HTTP://cdn.example.com/c.json"),
            ConfigSource::Remote("HTTP://cdn.example.com/c.json".into())
        );
        assert_eq!(
            ConfigSource::classify("%7B%7D"),
            ConfigSource::Inline("%7B%7D".into())
        );
        assert_eq!(
            ConfigSource::classify("httpish"),
            ConfigSource::Inline("httpish".into())
        );
    }

    #[test]
    fn test_dimensions_from_info() {
        let config = PlayerConfiguration::from_value(json!({
            "info": { "w": 640, "h": 480, "fps": 30 }
        }))
        .unwrap();
        let dims = config.dimensions();
        assert_eq!((dims.width, dims.height, dims.fps), (640.0, 480.0, 30.0));
    }

    #[test]
    fn test_dimensions_default_without_info() {
        let config = PlayerConfiguration::from_value(json!({ "src": [] })).unwrap();
        assert_eq!(config.dimensions(), Dimensions::default());
        assert_eq!(PlayerConfiguration::empty().dimensions(), Dimensions::default());
    }

    #[test]
    fn test_dimensions_fall_back_per_field() {
        let config = PlayerConfiguration::from_value(json!({
            "info": { "w": 0, "h": "480", "fps": 24.5 }
        }))
        .unwrap();
        let dims = config.dimensions();
        assert_eq!(dims.width, DEFAULT_WIDTH);
        assert_eq!(dims.height, DEFAULT_HEIGHT);
        assert_eq!(dims.fps, 24.5);
    }

    #[test]
    fn test_non_object_documents_rejected() {
        assert!(matches!(
            PlayerConfiguration::parse("[1, 2]"),
            Err(Error::ConfigNotObject)
        ));
        assert!(matches!(
            PlayerConfiguration::parse("null"),
            Err(Error::ConfigNotObject)
        ));
    }

    #[tokio::test]
    async fn test_resolve_empty() {
        let fetcher = StaticFetcher::ok("{\"info\":{}}");
        let resolver = ConfigResolver::new(fetcher);
        assert!(resolver.resolve("").await.is_empty());
        assert!(resolver.fetcher().requested.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_inline() {
        let resolver = ConfigResolver::new(StaticFetcher::ok(""));
        let config = resolver
            .resolve("%7B%22info%22%3A%7B%22w%22%3A640%2C%22h%22%3A480%2C%22fps%22%3A30%7D%7D")
            .await;
        assert_eq!(config.dimensions().width, 640.0);
        assert_eq!(config.dimensions().fps, 30.0);
    }

    #[tokio::test]
    async fn test_resolve_inline_plain_json() {
        let resolver = ConfigResolver::new(StaticFetcher::ok(""));
        let config = resolver.resolve(r#"{"info":{"h":200}}"#).await;
        assert_eq!(config.dimensions().height, 200.0);
    }

    #[tokio::test]
    async fn test_resolve_remote() {
        let resolver = ConfigResolver::new(StaticFetcher::ok(r#"{"info":{"w":100}}"#));
        let config = resolver.resolve("https://cdn.example.com/c.json").await;
        assert_eq!(config.dimensions().width, 100.0);
        assert_eq!(
            resolver.fetcher().requested.borrow().as_slice(),
            ["https://cdn.example.com/c.json"]
        );
    }

    #[tokio::test]
    async fn test_invalid_inline_json_degrades() {
        let resolver = ConfigResolver::new(StaticFetcher::ok(""));
        assert!(resolver.resolve("%7Bnot json").await.is_empty());
        assert!(matches!(
            resolver.try_resolve("%7Bnot json").await,
            Err(Error::ConfigParse(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_utf8_degrades() {
        let resolver = ConfigResolver::new(StaticFetcher::ok(""));
        assert!(matches!(
            resolver.try_resolve("%FF%FE").await,
            Err(Error::ConfigDecode(_))
        ));
        assert!(resolver.resolve("%FF%FE").await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_escape_degrades() {
        let resolver = ConfigResolver::new(StaticFetcher::ok(""));
        for raw in [r#"{"info":{"w":640},"note":"50%"}"#, "%ZZ%7B%7D", "%7B%7D%7"] {
            assert!(matches!(
                resolver.try_resolve(raw).await,
                Err(Error::ConfigDecode(_))
            ));
            assert_eq!(resolver.resolve(raw).await.dimensions(), Dimensions::default());
        }

        let escaped = resolver
            .try_resolve("%7B%22info%22%3A%7B%22w%22%3A640%7D%7D")
            .await
            .unwrap();
        assert_eq!(escaped.dimensions().width, 640.0);
    }

    #[tokio::test]
    async fn test_invalid_remote_body_degrades() {
        let resolver = ConfigResolver::new(StaticFetcher::ok("<html>404</html>"));
        assert!(resolver.resolve("https://cdn.example.com/missing.json").await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades() {
        let resolver = ConfigResolver::new(StaticFetcher::failing());
        let err = resolver
            .try_resolve("https://cdn.example.com/c.json")
            .await
            .unwrap_err();
        assert!(err.is_config_error());
        assert!(resolver.resolve("https://cdn.example.com/c.json").await.is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_url_degrades() {
        let resolver = ConfigResolver::new(StaticFetcher::ok("{}"));
        assert!(matches!(
            resolver.try_resolve("http://").await,
            Err(Error::InvalidConfigUrl(_))
        ));
        assert!(resolver.fetcher().requested.borrow().is_empty());
    }
}
