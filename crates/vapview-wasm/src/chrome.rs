//! Status panel and transport buttons around the mount point

use crate::ViewerCell;
use std::rc::Weak;
use vapview_core::{ControlState, PlaybackStatus, Strings, ViewerOptions};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, MouseEvent};

type ClickListener = Closure<dyn FnMut(MouseEvent)>;

/// Optional UI around the player
pub struct Chrome {
    strings: &'static Strings,
    show_controls: bool,
    status: Option<Element>,
    controls: Option<ControlBar>,
}

struct ControlBar {
    root: Element,
    play: HtmlButtonElement,
    pause: HtmlButtonElement,
    restart: HtmlButtonElement,
    _listeners: Vec<ClickListener>,
}

#[derive(Clone, Copy)]
enum Action {
    Play,
    Pause,
    Restart,
}

impl Chrome {
    /// Append the configured parts to `host`
    pub fn build(
        document: &Document,
        host: &Element,
        options: &ViewerOptions,
        strings: &'static Strings,
        viewer: Weak<ViewerCell>,
    ) -> Result<Self, JsValue> {
        let status = if options.show_status_panel {
            let panel = document.create_element("div")?;
            panel.set_class_name("vapview-status");
            host.append_child(&panel)?;
            Some(panel)
        } else {
            None
        };

        let controls = if options.show_controls {
            Some(ControlBar::build(document, host, strings, viewer)?)
        } else {
            None
        };

        Ok(Self {
            strings,
            show_controls: options.show_controls,
            status,
            controls,
        })
    }

    /// Reflect `status` in the panel and buttons
    pub fn render(&self, status: &PlaybackStatus) {
        if let Some(panel) = &self.status {
            panel.set_text_content(Some(&self.strings.status_line(status)));
            let _ = panel.set_attribute("data-phase", &status.phase().to_string());
        }

        if let Some(bar) = &self.controls {
            bar.render(ControlState::derive(status, self.show_controls));
        }
    }
}

impl ControlBar {
    fn build(
        document: &Document,
        host: &Element,
        strings: &Strings,
        viewer: Weak<ViewerCell>,
    ) -> Result<Self, JsValue> {
        let root = document.create_element("div")?;
        root.set_class_name("vapview-controls");
        host.append_child(&root)?;

        let mut listeners = Vec::with_capacity(3);
        let mut button = |label: &str, action: Action| -> Result<HtmlButtonElement, JsValue> {
            let button: HtmlButtonElement = document.create_element("button")?.dyn_into()?;
            button.set_type("button");
            button.set_text_content(Some(label));
            button.set_disabled(true);

            let viewer = viewer.clone();
            let listener = ClickListener::new(move |_: MouseEvent| dispatch(&viewer, action));
            button.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
            listeners.push(listener);

            root.append_child(&button)?;
            Ok(button)
        };

        let play = button(strings.play, Action::Play)?;
        let pause = button(strings.pause, Action::Pause)?;
        let restart = button(strings.restart, Action::Restart)?;

        Ok(Self {
            root,
            play,
            pause,
            restart,
            _listeners: listeners,
        })
    }

    fn render(&self, state: ControlState) {
        if state.visible {
            let _ = self.root.remove_attribute("hidden");
        } else {
            let _ = self.root.set_attribute("hidden", "");
        }
        self.play.set_disabled(!state.play_enabled);
        self.pause.set_disabled(!state.pause_enabled);
        self.restart.set_disabled(!state.restart_enabled);
    }
}

fn dispatch(viewer: &Weak<ViewerCell>, action: Action) {
    let Some(viewer) = viewer.upgrade() else {
        return;
    };
    // Busy means an initialization step is running; the click is dropped
    let Ok(viewer) = viewer.try_borrow() else {
        return;
    };
    match action {
        Action::Play => viewer.play(),
        Action::Pause => viewer.pause(),
        Action::Restart => viewer.restart(),
    }
}
