//! tracing output to the browser console

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_wasm::{WASMLayer, WASMLayerConfigBuilder};

/// Filter used in the browser, where there is no environment to read
pub const DEFAULT_DIRECTIVES: &str = "info,vapview_core=debug,vapview_wasm=debug";

/// Install the global subscriber; later calls only warn
pub fn init() {
    let filter = EnvFilter::try_new(DEFAULT_DIRECTIVES).unwrap_or_else(|_| EnvFilter::new("info"));

    let console = WASMLayer::new(
        WASMLayerConfigBuilder::new()
            // console output only, no performance marks
            .set_report_logs_in_timings(false)
            .build(),
    );

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .try_init();

    if installed.is_err() {
        web_sys::console::warn_1(&"[VAP Viewer] tracing subscriber already installed".into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        let filter = EnvFilter::try_new(DEFAULT_DIRECTIVES).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("vapview_core=debug"));
        assert!(rendered.contains("vapview_wasm=debug"));
    }
}
