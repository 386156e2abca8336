//! VAP Viewer WASM - browser front-end for the VAP animation player
//!
//! Reads `src` and `config` from the page URL, resolves the configuration
//! and drives a single `Vap` instance rendered into a host element:
//! - Player lifecycle from `vapview-core`
//! - Optional status panel and play/pause/restart buttons
//! - tracing output on the browser console
//!
//! ## Usage
//!
//! ```javascript
//! import init, { VapViewer } from '@vapview/wasm';
//!
//! await init();
//! const viewer = new VapViewer(document.getElementById('app'), {
//!   locale: 'en',
//!   showStatusPanel: true,
//!   showControls: true,
//! });
//! await viewer.start();
//! ```

use js_sys::{Function, Promise};
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::watch;
use tracing::{debug, warn};
use vapview_core::{
    ConfigResolver, Error, HttpFetcher, InstallOutcome, PlaybackParameters, PlaybackStatus,
    Strings, Viewer, ViewerOptions,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::HtmlElement;

mod backend;
mod bindings;
mod chrome;
mod logging;

pub use backend::{JsVapBackend, VapHandle};
use chrome::Chrome;

pub(crate) type ViewerCell = RefCell<Viewer<JsVapBackend>>;
type SharedViewer = Rc<ViewerCell>;
type StatusListeners = Rc<RefCell<Vec<Function>>>;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init();
    vapview_core::init();
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Viewer bound to a host element
#[wasm_bindgen]
pub struct VapViewer {
    viewer: SharedViewer,
    resolver: Rc<ConfigResolver<HttpFetcher>>,
    listeners: StatusListeners,
}

#[wasm_bindgen]
impl VapViewer {
    /// Create the mount point (and chrome) inside `host`
    #[wasm_bindgen(constructor)]
    pub fn new(host: HtmlElement, options: JsValue) -> Result<VapViewer, JsValue> {
        let options: ViewerOptions = if options.is_undefined() || options.is_null() {
            ViewerOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };

        let document = host
            .owner_document()
            .ok_or_else(|| JsValue::from_str("host element has no document"))?;
        let mount: HtmlElement = document.create_element("div")?.dyn_into()?;
        mount.set_class_name("vapview-mount");
        host.append_child(&mount)?;

        let strings = Strings::for_locale(options.locale);
        let viewer: SharedViewer = Rc::new(RefCell::new(Viewer::new(
            JsVapBackend::new(mount),
            options.clone(),
        )));
        let chrome = Chrome::build(&document, &host, &options, strings, Rc::downgrade(&viewer))?;

        let listeners = StatusListeners::default();
        let status_rx = viewer.borrow().subscribe();
        spawn_local(watch_status(status_rx, chrome, listeners.clone()));

        Ok(Self {
            viewer,
            resolver: Rc::new(ConfigResolver::default()),
            listeners,
        })
    }

    /// Load the player from the page's `src` and `config` query parameters
    pub fn start(&self) -> Promise {
        let viewer = self.viewer.clone();
        let resolver = self.resolver.clone();
        future_to_promise(async move {
            let search = web_sys::window()
                .ok_or_else(|| JsValue::from_str("no window"))?
                .location()
                .search()?;
            run(viewer, resolver, PlaybackParameters::from_query(&search)).await
        })
    }

    /// Load the player from explicit parameters
    pub fn load(&self, src: String, config: Option<String>) -> Promise {
        let params = PlaybackParameters::new(src, config.unwrap_or_default());
        future_to_promise(run(self.viewer.clone(), self.resolver.clone(), params))
    }

    pub fn play(&self) {
        if let Ok(viewer) = self.viewer.try_borrow() {
            viewer.play();
        }
    }

    pub fn pause(&self) {
        if let Ok(viewer) = self.viewer.try_borrow() {
            viewer.pause();
        }
    }

    /// Seek to the start and play
    pub fn restart(&self) {
        if let Ok(viewer) = self.viewer.try_borrow() {
            viewer.restart();
        }
    }

    /// Release the player; also happens when this object is freed
    pub fn destroy(&self) {
        unmount(&self.viewer);
    }

    /// Current status as `{ loading, playing, error }`
    pub fn status(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.viewer.borrow().status())?)
    }

    /// Localized one-line status
    #[wasm_bindgen(js_name = statusLine)]
    pub fn status_line(&self) -> String {
        self.viewer.borrow().status_line()
    }

    /// Call `callback(status)` on every status change
    #[wasm_bindgen(js_name = onStatusChange)]
    pub fn on_status_change(&self, callback: Function) {
        self.listeners.borrow_mut().push(callback);
    }
}

/// Prepare, resolve configuration, complete.
///
/// The viewer is only borrowed around the synchronous steps so controls and
/// teardown stay usable while the configuration is fetched.
async fn run(
    viewer: SharedViewer,
    resolver: Rc<ConfigResolver<HttpFetcher>>,
    params: PlaybackParameters,
) -> Result<JsValue, JsValue> {
    let prepared = viewer.borrow_mut().prepare(&params);
    let ticket = prepared.map_err(|e| rejection(&viewer, e))?;

    let config = resolver.resolve(&params.config).await;

    let completed = viewer.borrow_mut().complete(ticket, config);
    match completed.map_err(|e| rejection(&viewer, e))? {
        InstallOutcome::Installed => Ok(JsValue::from_str("installed")),
        InstallOutcome::Superseded => {
            debug!("Load superseded before the player was built");
            Ok(JsValue::from_str("superseded"))
        }
    }
}

/// Tear down now, or right after the borrow in progress ends.
///
/// No borrow is held across an await, so the deferred task always finds the
/// cell free.
fn unmount(viewer: &SharedViewer) {
    if let Ok(mut current) = viewer.try_borrow_mut() {
        current.unmount();
        return;
    }
    debug!("Viewer busy, deferring teardown");
    let viewer = viewer.clone();
    spawn_local(async move {
        match viewer.try_borrow_mut() {
            Ok(mut current) => current.unmount(),
            Err(_) => warn!("Viewer still busy, teardown left to drop"),
        }
    });
}

/// Reject with the localized message the user sees
fn rejection(viewer: &SharedViewer, error: Error) -> JsValue {
    warn!(code = error.error_code(), error = %error, "Viewer load failed");
    js_sys::Error::new(&viewer.borrow().status_line()).into()
}

async fn watch_status(
    mut rx: watch::Receiver<PlaybackStatus>,
    chrome: Chrome,
    listeners: StatusListeners,
) {
    let initial = rx.borrow_and_update().clone();
    chrome.render(&initial);

    // Ends once the viewer, and with it every status sender, is gone
    while rx.changed().await.is_ok() {
        let status = rx.borrow_and_update().clone();
        chrome.render(&status);

        let Ok(value) = serde_wasm_bindgen::to_value(&status) else {
            continue;
        };
        for callback in listeners.borrow().iter() {
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                warn!(error = ?e, "Status listener threw");
            }
        }
    }
}
