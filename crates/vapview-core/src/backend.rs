//! Player capability interface
//!
//! The animation player is an external library. Everything the lifecycle
//! manager needs from it is expressed here so the sequencing logic can run
//! against the browser binding or against a test double.

use crate::config::{Dimensions, PlayerConfiguration};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Events emitted by a player instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerEvent {
    LoadStart,
    CanPlay,
    Playing,
    Pause,
    Ended,
    Error,
    Frame,
}

impl PlayerEvent {
    /// Every event the lifecycle manager observes, in registration order
    pub const ALL: [PlayerEvent; 7] = [
        PlayerEvent::LoadStart,
        PlayerEvent::CanPlay,
        PlayerEvent::Playing,
        PlayerEvent::Pause,
        PlayerEvent::Ended,
        PlayerEvent::Error,
        PlayerEvent::Frame,
    ];

    /// Event name used by the player library
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerEvent::LoadStart => "loadstart",
            PlayerEvent::CanPlay => "canplay",
            PlayerEvent::Playing => "playing",
            PlayerEvent::Pause => "pause",
            PlayerEvent::Ended => "ended",
            PlayerEvent::Error => "error",
            PlayerEvent::Frame => "frame",
        }
    }
}

impl std::fmt::Display for PlayerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| format!("unknown player event: {s}"))
    }
}

/// Data carried by an event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    /// Error message, for `error`
    pub message: Option<String>,
    /// Frame index, for `frame`
    pub frame: Option<u64>,
}

impl EventPayload {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            frame: None,
        }
    }

    pub fn frame(frame: u64) -> Self {
        Self {
            message: None,
            frame: Some(frame),
        }
    }
}

/// Observer registered with [`PlayerHandle::on`]
pub type EventHandler = Box<dyn FnMut(&EventPayload)>;

/// Fixed playback options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaybackFlags {
    pub mute: bool,
    pub looping: bool,
    /// Rendering engine hint understood by the library
    pub player_type: String,
    /// Frame-accurate timing
    pub accurate: bool,
    pub precache: bool,
}

impl Default for PlaybackFlags {
    fn default() -> Self {
        Self {
            mute: false,
            looping: true,
            player_type: "web-player".to_string(),
            accurate: true,
            precache: false,
        }
    }
}

/// Options handed to the player constructor.
///
/// Serializes with the field names the library expects. The mount point and
/// lifecycle callbacks are attached by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerOptions {
    pub src: String,
    pub config: PlayerConfiguration,
    pub width: f64,
    pub height: f64,
    pub fps: f64,
    pub mute: bool,
    #[serde(rename = "loop")]
    pub looping: bool,
    #[serde(rename = "type")]
    pub player_type: String,
    pub accurate: bool,
    pub precache: bool,
}

impl PlayerOptions {
    pub fn new(src: impl Into<String>, config: PlayerConfiguration, flags: &PlaybackFlags) -> Self {
        let Dimensions { width, height, fps } = config.dimensions();
        Self {
            src: src.into(),
            config,
            width,
            height,
            fps,
            mute: flags.mute,
            looping: flags.looping,
            player_type: flags.player_type.clone(),
            accurate: flags.accurate,
            precache: flags.precache,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
            fps: self.fps,
        }
    }
}

/// Callbacks passed at construction time
pub struct LifecycleCallbacks {
    /// Load failure, with the underlying message when available
    pub on_load_error: Box<dyn FnMut(Option<String>)>,
    /// Instance released
    pub on_destroy: Box<dyn FnMut()>,
}

impl std::fmt::Debug for LifecycleCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleCallbacks").finish_non_exhaustive()
    }
}

/// Construction failure reported by a backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct BackendError(pub String);

/// Mount point plus player factory
pub trait PlayerBackend {
    type Handle: PlayerHandle;

    /// Remove everything rendered into the mount point
    fn clear_mount(&mut self);

    /// Construct a player rendering into the mount point
    fn create(
        &mut self,
        options: &PlayerOptions,
        callbacks: LifecycleCallbacks,
    ) -> Result<Self::Handle, BackendError>;
}

/// A live player instance
pub trait PlayerHandle {
    fn on(&mut self, event: PlayerEvent, handler: EventHandler);

    fn play(&self);

    fn pause(&self);

    /// Seek, in seconds
    fn set_time(&self, seconds: f64);

    /// Release the instance; it cannot be used afterwards
    fn destroy(self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_names_round_trip() {
        for event in PlayerEvent::ALL {
            assert_eq!(event.as_str().parse::<PlayerEvent>(), Ok(event));
        }
        assert!("seeked".parse::<PlayerEvent>().is_err());
    }

    #[test]
    fn test_options_use_library_field_names() {
        let config = PlayerConfiguration::from_value(json!({
            "info": { "w": 640, "h": 480, "fps": 30 }
        }))
        .unwrap();
        let options = PlayerOptions::new("a.mp4", config, &PlaybackFlags::default());
        let value = serde_json::to_value(&options).unwrap();

        assert_eq!(value["src"], "a.mp4");
        assert_eq!(value["width"], 640.0);
        assert_eq!(value["height"], 480.0);
        assert_eq!(value["fps"], 30.0);
        assert_eq!(value["mute"], false);
        assert_eq!(value["loop"], true);
        assert_eq!(value["type"], "web-player");
        assert_eq!(value["accurate"], true);
        assert_eq!(value["precache"], false);
        assert_eq!(value["config"]["info"]["w"], 640);
    }
}
