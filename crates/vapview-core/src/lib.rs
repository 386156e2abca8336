//! VAP Viewer Core - page logic for the VAP animation viewer
//!
//! This crate provides everything the viewer page does around the external
//! animation player:
//! - Query parameter reading (`src`, `config`)
//! - Best-effort configuration resolution (remote or inline JSON)
//! - Player lifecycle: teardown, construction, event wiring
//! - Observable playback status and localized messages
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        VAP Viewer                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐     │
//! │  │  Parameter   │──▶│    Config    │──▶│  Lifecycle   │     │
//! │  │   Reader     │   │   Resolver   │   │   Manager    │     │
//! │  └──────────────┘   └──────────────┘   └──────┬───────┘     │
//! │                                               │             │
//! │                     ┌──────────────┐   ┌──────┴───────┐     │
//! │                     │    Status    │◀──│    Player    │     │
//! │                     │    Board     │   │   Backend    │     │
//! │                     └──────────────┘   └──────────────┘     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod params;
pub mod config;
pub mod backend;
pub mod status;
pub mod lifecycle;
pub mod locale;
pub mod viewer;

pub use error::{Error, Result};
pub use params::PlaybackParameters;
pub use config::{ConfigFetcher, ConfigResolver, ConfigSource, Dimensions, PlayerConfiguration};
#[cfg(feature = "http")]
pub use config::HttpFetcher;
pub use backend::{
    BackendError, EventHandler, EventPayload, LifecycleCallbacks, PlaybackFlags, PlayerBackend,
    PlayerEvent, PlayerHandle, PlayerOptions,
};
pub use status::{PlaybackPhase, PlaybackStatus, StatusBoard, StatusError, StatusErrorKind};
pub use lifecycle::{InitTicket, InstallOutcome, LifecycleManager};
pub use locale::{Locale, Strings};
pub use viewer::{ControlState, Viewer, ViewerOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version
pub fn init() {
    tracing::info!(version = VERSION, "VAP Viewer Core initialized");
}
