//! Bindings to the `video-animation-player` library
//!
//! The library is loaded by the host page and exposes a global `Vap` class.

use js_sys::Function;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// A VAP player instance
    pub type Vap;

    /// `new Vap(options)`; throws when the player cannot be built
    #[wasm_bindgen(constructor, catch)]
    pub fn new(options: &JsValue) -> Result<Vap, JsValue>;

    #[wasm_bindgen(method)]
    pub fn on(this: &Vap, event: &str, handler: &Function);

    #[wasm_bindgen(method)]
    pub fn play(this: &Vap);

    #[wasm_bindgen(method)]
    pub fn pause(this: &Vap);

    #[wasm_bindgen(method, js_name = setTime)]
    pub fn set_time(this: &Vap, seconds: f64);

    #[wasm_bindgen(method)]
    pub fn destroy(this: &Vap);
}

/// Best-effort message from a thrown JS value
pub fn error_message(value: &JsValue) -> Option<String> {
    if let Some(text) = value.as_string() {
        return Some(text);
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
}
