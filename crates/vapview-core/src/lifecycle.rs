//! Player Lifecycle Manager
//!
//! Owns at most one player instance and the mount point it renders into:
//! - tears down the previous instance before building a new one
//! - resolves configuration before construction
//! - wires player events into [`StatusBoard`]
//! - forwards play/pause/restart requests
//!
//! Initialization is split into [`LifecycleManager::begin`] and
//! [`LifecycleManager::install`] so a caller can await configuration without
//! holding the manager. Every `begin` and `teardown` bumps a generation
//! counter; an install whose ticket is stale does nothing, so a teardown
//! always wins over an in-flight initialization.

use crate::{
    backend::{
        EventHandler, EventPayload, LifecycleCallbacks, PlaybackFlags, PlayerBackend, PlayerEvent,
        PlayerHandle, PlayerOptions,
    },
    config::{ConfigFetcher, ConfigResolver, PlayerConfiguration},
    status::{PlaybackStatus, StatusBoard, StatusError, StatusErrorKind},
    Error, Result,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, trace};

/// Permission to install a player, issued by [`LifecycleManager::begin`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an initialization only completes through install()"]
pub struct InitTicket {
    generation: u64,
    src: String,
}

impl InitTicket {
    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of [`LifecycleManager::install`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// A new instance is live
    Installed,
    /// A later initialization or a teardown happened first; nothing built
    Superseded,
}

/// Generation shared with the callbacks of one instance
#[derive(Debug, Clone, Default)]
struct Generation(Arc<AtomicU64>);

impl Generation {
    fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Manages a single player instance
pub struct LifecycleManager<B: PlayerBackend> {
    /// Mount point and player factory
    backend: B,
    /// Live instance, if any
    instance: Option<B::Handle>,
    /// Observed status
    status: StatusBoard,
    /// Fixed playback options
    flags: PlaybackFlags,
    /// Bumped on every begin/teardown
    generation: Generation,
}

impl<B: PlayerBackend> LifecycleManager<B> {
    /// Create a manager with default playback flags
    pub fn new(backend: B) -> Self {
        Self::with_flags(backend, PlaybackFlags::default())
    }

    pub fn with_flags(backend: B, flags: PlaybackFlags) -> Self {
        Self {
            backend,
            instance: None,
            status: StatusBoard::new(),
            flags,
            generation: Generation::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn flags(&self) -> &PlaybackFlags {
        &self.flags
    }

    /// True while an instance is live
    pub fn is_live(&self) -> bool {
        self.instance.is_some()
    }

    /// Current status snapshot
    pub fn status(&self) -> PlaybackStatus {
        self.status.current()
    }

    /// Subscribe to status changes
    pub fn subscribe(&self) -> watch::Receiver<PlaybackStatus> {
        self.status.subscribe()
    }

    pub fn status_board(&self) -> &StatusBoard {
        &self.status
    }

    /// Resolve configuration and build a new instance.
    ///
    /// Callers that must not hold the manager across the configuration fetch
    /// use [`begin`](Self::begin) and [`install`](Self::install) directly.
    pub async fn initialize<F: ConfigFetcher>(
        &mut self,
        src: &str,
        raw_config: &str,
        resolver: &ConfigResolver<F>,
    ) -> Result<InstallOutcome> {
        let ticket = self.begin(src)?;
        let config = resolver.resolve(raw_config).await;
        self.install(ticket, config)
    }

    /// First half of an initialization.
    ///
    /// Releases any live instance, clears the mount point and marks status
    /// loading. An empty `src` fails with [`Error::MissingSource`] and
    /// touches nothing but the status.
    #[instrument(skip(self))]
    pub fn begin(&mut self, src: &str) -> Result<InitTicket> {
        if src.is_empty() {
            self.status.fail(StatusError::missing_source());
            return Err(Error::MissingSource);
        }

        let generation = self.generation.advance();
        self.status.begin_loading();
        self.release();
        self.backend.clear_mount();

        debug!(generation, "Initialization started");

        Ok(InitTicket {
            generation,
            src: src.to_string(),
        })
    }

    /// Second half of an initialization: construct and wire the instance.
    #[instrument(skip(self, ticket, config), fields(src = %ticket.src, generation = ticket.generation))]
    pub fn install(
        &mut self,
        ticket: InitTicket,
        config: PlayerConfiguration,
    ) -> Result<InstallOutcome> {
        if ticket.generation != self.generation.current() {
            debug!(current = self.generation.current(), "Initialization superseded");
            return Ok(InstallOutcome::Superseded);
        }

        // Whatever appeared since begin() goes before the new instance is built
        if self.instance.is_some() {
            self.release();
            self.backend.clear_mount();
        }

        let options = PlayerOptions::new(ticket.src, config, &self.flags);
        let callbacks = self.callbacks(ticket.generation);

        let mut handle = match self.backend.create(&options, callbacks) {
            Ok(handle) => handle,
            Err(e) => {
                error!(error = %e, "Player initialization failed");
                self.status.fail(StatusError::new(
                    StatusErrorKind::Initialization,
                    Some(e.0.clone()),
                ));
                return Err(Error::Initialization(e.0));
            }
        };

        for event in PlayerEvent::ALL {
            handle.on(event, self.observer(event, ticket.generation));
        }

        info!(dimensions = %options.dimensions(), "Player created");
        self.instance = Some(handle);

        Ok(InstallOutcome::Installed)
    }

    /// Release the live instance, if any.
    ///
    /// Also invalidates any initialization still waiting on configuration.
    /// Runs automatically when the manager is dropped.
    pub fn teardown(&mut self) {
        self.generation.advance();
        if self.release() {
            info!("Player torn down");
        }
    }

    /// Ask the instance to play
    pub fn request_play(&self) {
        match &self.instance {
            Some(handle) => handle.play(),
            None => debug!("Play requested without a live player"),
        }
    }

    /// Ask the instance to pause
    pub fn request_pause(&self) {
        match &self.instance {
            Some(handle) => handle.pause(),
            None => debug!("Pause requested without a live player"),
        }
    }

    /// Seek to zero, then play, whatever the current status
    pub fn request_restart(&self) {
        match &self.instance {
            Some(handle) => {
                handle.set_time(0.0);
                handle.play();
            }
            None => debug!("Restart requested without a live player"),
        }
    }

    /// Destroy the live instance; returns whether one existed
    fn release(&mut self) -> bool {
        match self.instance.take() {
            Some(handle) => {
                handle.destroy();
                true
            }
            None => false,
        }
    }

    fn callbacks(&self, generation: u64) -> LifecycleCallbacks {
        let load_error = Observer::new(&self.status, &self.generation, generation);
        let destroyed = self.status.clone();

        LifecycleCallbacks {
            on_load_error: Box::new(move |message| {
                load_error.run(|status| {
                    error!(cause = message.as_deref().unwrap_or_default(), "Player load error");
                    status.fail(StatusError::new(StatusErrorKind::LoadFailed, message));
                });
            }),
            // Applies even to a replaced instance: nothing plays once destroyed
            on_destroy: Box::new(move || {
                debug!("Player destroyed");
                destroyed.set_playing(false);
            }),
        }
    }

    fn observer(&self, event: PlayerEvent, generation: u64) -> EventHandler {
        let observer = Observer::new(&self.status, &self.generation, generation);

        Box::new(move |payload: &EventPayload| {
            observer.run(|status| match event {
                PlayerEvent::LoadStart => debug!("Player load started"),
                PlayerEvent::CanPlay => {
                    debug!("Player can play");
                    status.mark_ready();
                }
                PlayerEvent::Playing => status.set_playing(true),
                PlayerEvent::Pause | PlayerEvent::Ended => status.set_playing(false),
                PlayerEvent::Error => {
                    error!(cause = payload.message.as_deref().unwrap_or_default(), "Playback error");
                    status.fail(StatusError::new(
                        StatusErrorKind::Playback,
                        payload.message.clone(),
                    ));
                }
                PlayerEvent::Frame => trace!(frame = payload.frame, "Frame"),
            });
        })
    }
}

impl<B: PlayerBackend> Drop for LifecycleManager<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Status access for one instance's callbacks, ignored once superseded
struct Observer {
    status: StatusBoard,
    current: Generation,
    generation: u64,
}

impl Observer {
    fn new(status: &StatusBoard, current: &Generation, generation: u64) -> Self {
        Self {
            status: status.clone(),
            current: current.clone(),
            generation,
        }
    }

    fn run(&self, apply: impl FnOnce(&StatusBoard)) {
        if self.current.current() == self.generation {
            apply(&self.status);
        } else {
            trace!(generation = self.generation, "Ignoring event from a released player");
        }
    }
}
