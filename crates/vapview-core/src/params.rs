//! Parameter Reader - query string parameters for the viewer page

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

/// Name of the media source parameter
pub const SRC_PARAM: &str = "src";
/// Name of the configuration parameter
pub const CONFIG_PARAM: &str = "config";

/// Parameters read once from the page query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackParameters {
    /// Media resource URL, required
    pub src: String,
    /// Remote configuration URL or URL-encoded inline JSON, optional
    pub config: String,
}

impl PlaybackParameters {
    pub fn new(src: impl Into<String>, config: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            config: config.into(),
        }
    }

    /// Read parameters from a query string, with or without the leading `?`.
    ///
    /// Decoding follows `application/x-www-form-urlencoded` rules and the
    /// first occurrence of a repeated key wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut src = None;
        let mut config = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                SRC_PARAM if src.is_none() => src = Some(value.into_owned()),
                CONFIG_PARAM if config.is_none() => config = Some(value.into_owned()),
                _ => {}
            }
        }

        Self {
            src: src.unwrap_or_default(),
            config: config.unwrap_or_default(),
        }
    }

    /// Read parameters from a full page URL
    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }

    /// True when a media source was supplied
    pub fn has_source(&self) -> bool {
        !self.src.is_empty()
    }

    /// True when a configuration was supplied
    pub fn has_config(&self) -> bool {
        !self.config.is_empty()
    }
}
