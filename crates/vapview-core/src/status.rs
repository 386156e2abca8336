//! Playback status observed from player events
//!
//! Status is never set by user actions. Controls request transitions, the
//! player's own events confirm them.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Kind of user-visible error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusErrorKind {
    /// No `src` query parameter
    MissingSource,
    /// The player reported a load failure
    LoadFailed,
    /// The player emitted a runtime error
    Playback,
    /// The player could not be constructed
    Initialization,
}

/// Error shown in place of the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusError {
    pub kind: StatusErrorKind,
    /// Underlying message, when the player supplied one
    pub cause: Option<String>,
}

impl StatusError {
    pub fn new(kind: StatusErrorKind, cause: Option<String>) -> Self {
        // Blank messages carry no information
        let cause = cause.filter(|c| !c.trim().is_empty());
        Self { kind, cause }
    }

    pub fn missing_source() -> Self {
        Self::new(StatusErrorKind::MissingSource, None)
    }
}

/// Coarse status for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    Loading,
    Error,
    Playing,
    Paused,
}

impl std::fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackPhase::Loading => write!(f, "loading"),
            PlaybackPhase::Error => write!(f, "error"),
            PlaybackPhase::Playing => write!(f, "playing"),
            PlaybackPhase::Paused => write!(f, "paused"),
        }
    }
}

/// Observed playback status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub loading: bool,
    pub playing: bool,
    pub error: Option<StatusError>,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self {
            loading: true,
            playing: false,
            error: None,
        }
    }
}

impl PlaybackStatus {
    /// Error first, then loading, then transport state
    pub fn phase(&self) -> PlaybackPhase {
        if self.error.is_some() {
            PlaybackPhase::Error
        } else if self.loading {
            PlaybackPhase::Loading
        } else if self.playing {
            PlaybackPhase::Playing
        } else {
            PlaybackPhase::Paused
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Shared, observable playback status
#[derive(Debug, Clone)]
pub struct StatusBoard {
    tx: Arc<watch::Sender<PlaybackStatus>>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(PlaybackStatus::default());
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current status
    pub fn current(&self) -> PlaybackStatus {
        self.tx.borrow().clone()
    }

    /// Subscribe to status changes
    pub fn subscribe(&self) -> watch::Receiver<PlaybackStatus> {
        self.tx.subscribe()
    }

    /// Start of an initialization: loading, previous error cleared
    pub fn begin_loading(&self) {
        self.update(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    /// The player can play
    pub fn mark_ready(&self) {
        self.update(|s| s.loading = false);
    }

    pub fn set_playing(&self, playing: bool) {
        self.update(|s| s.playing = playing);
    }

    /// Surface an error; also ends loading
    pub fn fail(&self, error: StatusError) {
        self.update(|s| {
            s.error = Some(error);
            s.loading = false;
        });
    }

    /// Apply a change, notifying subscribers only when something changed
    fn update(&self, change: impl FnOnce(&mut PlaybackStatus)) {
        self.tx.send_if_modified(|status| {
            let before = status.clone();
            change(status);
            *status != before
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status_is_loading() {
        let board = StatusBoard::new();
        let status = board.current();
        assert!(status.loading);
        assert!(!status.playing);
        assert_eq!(status.phase(), PlaybackPhase::Loading);
    }

    #[test]
    fn test_phase_precedence() {
        let mut status = PlaybackStatus {
            loading: true,
            playing: true,
            error: Some(StatusError::missing_source()),
        };
        assert_eq!(status.phase(), PlaybackPhase::Error);
        status.error = None;
        assert_eq!(status.phase(), PlaybackPhase::Loading);
        status.loading = false;
        assert_eq!(status.phase(), PlaybackPhase::Playing);
        status.playing = false;
        assert_eq!(status.phase(), PlaybackPhase::Paused);
    }

    #[test]
    fn test_fail_clears_loading() {
        let board = StatusBoard::new();
        board.fail(StatusError::new(StatusErrorKind::Playback, Some("decode".into())));
        let status = board.current();
        assert!(!status.loading);
        assert_eq!(status.error.unwrap().cause.as_deref(), Some("decode"));
    }

    #[test]
    fn test_begin_loading_clears_error() {
        let board = StatusBoard::new();
        board.fail(StatusError::missing_source());
        board.begin_loading();
        assert_eq!(board.current(), PlaybackStatus::default());
    }

    #[test]
    fn test_blank_cause_dropped() {
        let error = StatusError::new(StatusErrorKind::LoadFailed, Some("  ".into()));
        assert_eq!(error.cause, None);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes_only() {
        let board = StatusBoard::new();
        let mut rx = board.subscribe();

        board.set_playing(false);
        assert!(!rx.has_changed().unwrap());

        board.mark_ready();
        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().loading);

        board.set_playing(true);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().playing);
    }
}
