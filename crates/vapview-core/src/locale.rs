//! User-facing strings
//!
//! One table per locale; the viewer picks one from its options instead of
//! shipping a copy of the component per language.
//!
//! # Usage
//!
//! ```rust
//! use vapview_core::locale::{Locale, Strings};
//! use vapview_core::status::StatusError;
//!
//! let strings = Strings::for_locale(Locale::English);
//! assert!(strings.error_message(&StatusError::missing_source()).contains("?src="));
//! ```

use crate::status::{PlaybackPhase, PlaybackStatus, StatusError, StatusErrorKind};
use serde::{Deserialize, Serialize};

/// Supported display languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en", alias = "en-US", alias = "en-GB")]
    English,
    #[serde(rename = "zh", alias = "zh-CN", alias = "zh-Hans")]
    Chinese,
}

impl Locale {
    /// Match a BCP 47 tag by its primary language; unknown tags give English
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag.split(['-', '_']).next().unwrap_or_default();
        if primary.eq_ignore_ascii_case("zh") {
            Locale::Chinese
        } else {
            Locale::English
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Chinese => "zh",
        }
    }
}

/// String table for one locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Strings {
    pub missing_source: &'static str,
    pub load_failed: &'static str,
    pub playback_error: &'static str,
    pub initialization_failed: &'static str,
    pub unknown_error: &'static str,
    pub loading: &'static str,
    pub playing: &'static str,
    pub paused: &'static str,
    pub play: &'static str,
    pub pause: &'static str,
    pub restart: &'static str,
}

pub static ENGLISH: Strings = Strings {
    missing_source: "Please provide src parameter in URL, e.g.: ?src=your-video-url.mp4",
    load_failed: "Video loading failed: ",
    playback_error: "Playback error: ",
    initialization_failed: "Initialization failed: ",
    unknown_error: "Unknown error",
    loading: "Loading...",
    playing: "Playing",
    paused: "Paused",
    play: "Play",
    pause: "Pause",
    restart: "Restart",
};

pub static CHINESE: Strings = Strings {
    missing_source: "请在URL中提供src参数，例如：?src=your-video-url.mp4",
    load_failed: "视频加载失败：",
    playback_error: "播放错误：",
    initialization_failed: "初始化失败：",
    unknown_error: "未知错误",
    loading: "加载中...",
    playing: "播放中",
    paused: "已暂停",
    play: "播放",
    pause: "暂停",
    restart: "重新播放",
};

impl Strings {
    pub fn for_locale(locale: Locale) -> &'static Strings {
        match locale {
            Locale::English => &ENGLISH,
            Locale::Chinese => &CHINESE,
        }
    }

    /// Message shown for an error
    pub fn error_message(&self, error: &StatusError) -> String {
        let prefix = match error.kind {
            StatusErrorKind::MissingSource => return self.missing_source.to_string(),
            StatusErrorKind::LoadFailed => self.load_failed,
            StatusErrorKind::Playback => self.playback_error,
            StatusErrorKind::Initialization => self.initialization_failed,
        };
        format!("{prefix}{}", error.cause.as_deref().unwrap_or(self.unknown_error))
    }

    /// One-line status for the status panel
    pub fn status_line(&self, status: &PlaybackStatus) -> String {
        match (status.phase(), &status.error) {
            (PlaybackPhase::Error, Some(error)) => self.error_message(error),
            (PlaybackPhase::Error, None) => self.unknown_error.to_string(),
            (PlaybackPhase::Loading, _) => self.loading.to_string(),
            (PlaybackPhase::Playing, _) => self.playing.to_string(),
            (PlaybackPhase::Paused, _) => self.paused.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(Locale::from_tag("zh-CN"), Locale::Chinese);
        assert_eq!(Locale::from_tag("ZH_tw"), Locale::Chinese);
        assert_eq!(Locale::from_tag("en-US"), Locale::English);
        assert_eq!(Locale::from_tag("fr"), Locale::English);
        assert_eq!(Locale::from_tag(""), Locale::English);
    }

    #[test]
    fn test_serde_tags() {
        let locale: Locale = serde_json::from_str("\"zh-CN\"").unwrap();
        assert_eq!(locale, Locale::Chinese);
        assert_eq!(serde_json::to_string(&Locale::English).unwrap(), "\"en\"");
    }

    #[test]
    fn test_error_messages() {
        let strings = Strings::for_locale(Locale::English);
        let load = StatusError::new(StatusErrorKind::LoadFailed, Some("404".into()));
        assert_eq!(strings.error_message(&load), "Video loading failed: 404");

        let playback = StatusError::new(StatusErrorKind::Playback, None);
        assert_eq!(strings.error_message(&playback), "Playback error: Unknown error");

        let init = StatusError::new(StatusErrorKind::Initialization, Some("no webgl".into()));
        assert_eq!(strings.error_message(&init), "Initialization failed: no webgl");
    }

    #[test]
    fn test_chinese_messages() {
        let strings = Strings::for_locale(Locale::Chinese);
        let playback = StatusError::new(StatusErrorKind::Playback, None);
        assert_eq!(strings.error_message(&playback), "播放错误：未知错误");
        assert!(strings.error_message(&StatusError::missing_source()).contains("src"));
    }

    #[test]
    fn test_status_line() {
        let strings = Strings::for_locale(Locale::English);
        let mut status = PlaybackStatus::default();
        assert_eq!(strings.status_line(&status), "Loading...");
        status.loading = false;
        assert_eq!(strings.status_line(&status), "Paused");
        status.playing = true;
        assert_eq!(strings.status_line(&status), "Playing");
        status.error = Some(StatusError::missing_source());
        assert_eq!(strings.status_line(&status), ENGLISH.missing_source);
    }
}
