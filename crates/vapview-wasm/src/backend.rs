//! Player backend over the JS `Vap` class

use crate::bindings::{error_message, Vap};
use serde::Serialize;
use vapview_core::{
    BackendError, EventHandler, EventPayload, LifecycleCallbacks, PlayerBackend, PlayerEvent,
    PlayerHandle, PlayerOptions,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// Mount element plus `Vap` factory
pub struct JsVapBackend {
    mount: HtmlElement,
}

impl JsVapBackend {
    pub fn new(mount: HtmlElement) -> Self {
        Self { mount }
    }

    pub fn mount(&self) -> &HtmlElement {
        &self.mount
    }

    fn options_object(&self, options: &PlayerOptions) -> Result<JsValue, BackendError> {
        // Plain objects, not Maps, for the configuration document
        let value = options
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| BackendError(e.to_string()))?;
        set(&value, "container", self.mount.as_ref())?;
        Ok(value)
    }
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), BackendError> {
    js_sys::Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|e| BackendError(error_message(&e).unwrap_or_default()))
}

impl PlayerBackend for JsVapBackend {
    type Handle = VapHandle;

    fn clear_mount(&mut self) {
        self.mount.set_inner_html("");
    }

    fn create(
        &mut self,
        options: &PlayerOptions,
        callbacks: LifecycleCallbacks,
    ) -> Result<VapHandle, BackendError> {
        let js_options = self.options_object(options)?;

        let LifecycleCallbacks {
            mut on_load_error,
            mut on_destroy,
        } = callbacks;
        let load_error = Closure::<dyn FnMut(JsValue)>::new(move |err: JsValue| {
            on_load_error(error_message(&err));
        });
        let destroyed = Closure::<dyn FnMut()>::new(move || on_destroy());
        set(&js_options, "onLoadError", load_error.as_ref())?;
        set(&js_options, "onDestroy", destroyed.as_ref())?;

        // An empty message becomes the localized "unknown error"
        let vap = Vap::new(&js_options)
            .map_err(|e| BackendError(error_message(&e).unwrap_or_default()))?;

        Ok(VapHandle {
            vap,
            _load_error: load_error,
            _destroyed: destroyed,
            listeners: Vec::new(),
        })
    }
}

/// A live `Vap` and the closures it calls into
pub struct VapHandle {
    vap: Vap,
    _load_error: Closure<dyn FnMut(JsValue)>,
    _destroyed: Closure<dyn FnMut()>,
    listeners: Vec<Closure<dyn FnMut(JsValue)>>,
}

fn payload(event: PlayerEvent, detail: &JsValue) -> EventPayload {
    match event {
        PlayerEvent::Error => EventPayload {
            message: error_message(detail),
            frame: None,
        },
        PlayerEvent::Frame => EventPayload {
            message: None,
            frame: detail.as_f64().map(|f| f as u64),
        },
        _ => EventPayload::default(),
    }
}

impl PlayerHandle for VapHandle {
    fn on(&mut self, event: PlayerEvent, mut handler: EventHandler) {
        let listener = Closure::<dyn FnMut(JsValue)>::new(move |detail: JsValue| {
            handler(&payload(event, &detail));
        });
        self.vap.on(event.as_str(), listener.as_ref().unchecked_ref());
        self.listeners.push(listener);
    }

    fn play(&self) {
        self.vap.play();
    }

    fn pause(&self) {
        self.vap.pause();
    }

    fn set_time(&self, seconds: f64) {
        self.vap.set_time(seconds);
    }

    fn destroy(self) {
        // onDestroy runs inside destroy(); closures are dropped only after it returns
        self.vap.destroy();
    }
}
