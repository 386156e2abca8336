//! Viewer - the page component
//!
//! Ties the Parameter Reader, Configuration Resolver and Lifecycle Manager
//! together, with locale and UI chrome chosen by [`ViewerOptions`].

use crate::{
    backend::{PlaybackFlags, PlayerBackend},
    config::{ConfigFetcher, ConfigResolver, PlayerConfiguration},
    lifecycle::{InitTicket, InstallOutcome, LifecycleManager},
    locale::{Locale, Strings},
    params::PlaybackParameters,
    status::{PlaybackStatus, StatusBoard},
    Result,
};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

/// Viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerOptions {
    /// Language of messages and labels
    pub locale: Locale,
    /// Render a status line next to the player
    pub show_status_panel: bool,
    /// Render play/pause/restart buttons
    pub show_controls: bool,
    /// Playback options passed to every instance; never read from page input
    #[serde(skip)]
    pub flags: PlaybackFlags,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            locale: Locale::English,
            show_status_panel: false,
            show_controls: false,
            flags: PlaybackFlags::default(),
        }
    }
}

impl ViewerOptions {
    /// Status panel and controls shown
    pub fn with_chrome(locale: Locale) -> Self {
        Self {
            locale,
            show_status_panel: true,
            show_controls: true,
            ..Default::default()
        }
    }
}

/// Which controls to show and which are usable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    pub visible: bool,
    pub play_enabled: bool,
    pub pause_enabled: bool,
    pub restart_enabled: bool,
}

impl ControlState {
    /// Derive from status; errors hide the controls
    pub fn derive(status: &PlaybackStatus, show_controls: bool) -> Self {
        if !show_controls || status.has_error() {
            return Self::default();
        }
        let ready = !status.loading;
        Self {
            visible: true,
            play_enabled: ready && !status.playing,
            pause_enabled: ready && status.playing,
            restart_enabled: ready,
        }
    }
}

/// The viewer component
pub struct Viewer<B: PlayerBackend> {
    options: ViewerOptions,
    manager: LifecycleManager<B>,
}

impl<B: PlayerBackend> Viewer<B> {
    pub fn new(backend: B, options: ViewerOptions) -> Self {
        let manager = LifecycleManager::with_flags(backend, options.flags.clone());
        Self { options, manager }
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn strings(&self) -> &'static Strings {
        Strings::for_locale(self.options.locale)
    }

    pub fn manager(&self) -> &LifecycleManager<B> {
        &self.manager
    }

    pub fn status(&self) -> PlaybackStatus {
        self.manager.status()
    }

    pub fn status_board(&self) -> &StatusBoard {
        self.manager.status_board()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackStatus> {
        self.manager.subscribe()
    }

    /// Localized status line
    pub fn status_line(&self) -> String {
        self.strings().status_line(&self.status())
    }

    pub fn controls(&self) -> ControlState {
        ControlState::derive(&self.status(), self.options.show_controls)
    }

    /// Start showing `params`.
    ///
    /// Without a source the status becomes the missing-source error and no
    /// player is ever built.
    pub fn prepare(&mut self, params: &PlaybackParameters) -> Result<InitTicket> {
        if !params.has_source() {
            warn!("No src parameter supplied");
        }
        self.manager.begin(&params.src)
    }

    /// Finish a [`prepare`](Self::prepare) once configuration is resolved
    pub fn complete(
        &mut self,
        ticket: InitTicket,
        config: PlayerConfiguration,
    ) -> Result<InstallOutcome> {
        self.manager.install(ticket, config)
    }

    /// Prepare, resolve and complete in one call
    pub async fn mount<F: ConfigFetcher>(
        &mut self,
        params: &PlaybackParameters,
        resolver: &ConfigResolver<F>,
    ) -> Result<InstallOutcome> {
        let ticket = self.prepare(params)?;
        let config = resolver.resolve(&params.config).await;
        self.complete(ticket, config)
    }

    pub fn play(&self) {
        self.manager.request_play();
    }

    pub fn pause(&self) {
        self.manager.request_pause();
    }

    pub fn restart(&self) {
        self.manager.request_restart();
    }

    /// The host element is going away
    pub fn unmount(&mut self) {
        info!("Viewer unmounted");
        self.manager.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusError;

    fn ready(playing: bool) -> PlaybackStatus {
        PlaybackStatus {
            loading: false,
            playing,
            error: None,
        }
    }

    #[test]
    fn test_controls_hidden_when_disabled() {
        assert_eq!(ControlState::derive(&ready(false), false), ControlState::default());
    }

    #[test]
    fn test_controls_hidden_on_error() {
        let status = PlaybackStatus {
            error: Some(StatusError::missing_source()),
            ..ready(false)
        };
        assert!(!ControlState::derive(&status, true).visible);
    }

    #[test]
    fn test_controls_follow_status() {
        let loading = ControlState::derive(&PlaybackStatus::default(), true);
        assert!(loading.visible);
        assert!(!loading.play_enabled && !loading.pause_enabled && !loading.restart_enabled);

        let paused = ControlState::derive(&ready(false), true);
        assert!(paused.play_enabled && !paused.pause_enabled && paused.restart_enabled);

        let playing = ControlState::derive(&ready(true), true);
        assert!(!playing.play_enabled && playing.pause_enabled && playing.restart_enabled);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ViewerOptions =
            serde_json::from_str(r#"{"locale":"zh-CN","showControls":true}"#).unwrap();
        assert_eq!(options.locale, Locale::Chinese);
        assert!(options.show_controls);
        assert!(!options.show_status_panel);
        assert_eq!(options.flags, PlaybackFlags::default());
    }

    #[test]
    fn test_options_cannot_override_flags() {
        let options: ViewerOptions = serde_json::from_str(
            r#"{"flags":{"mute":true,"loop":false,"precache":true}}"#,
        )
        .unwrap();
        assert_eq!(options.flags, PlaybackFlags::default());
        assert!(!options.flags.mute && options.flags.looping);
    }
}
