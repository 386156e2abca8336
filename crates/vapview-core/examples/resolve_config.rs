//! Configuration resolution example
//!
//! Reads `src` and `config` from a viewer page URL and prints what the
//! player would be built with.
//!
//! Run with: cargo run -p vapview-core --example resolve_config -- "https://viewer.example.com/?src=a.mp4&config=%7B%22info%22%3A%7B%22w%22%3A640%7D%7D"

use tracing_subscriber::EnvFilter;
use url::Url;
use vapview_core::{ConfigResolver, ConfigSource, PlaybackFlags, PlaybackParameters, PlayerOptions};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let page = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://viewer.example.com/?src=demo.mp4".to_string());
    let params = PlaybackParameters::from_url(&Url::parse(&page)?);

    println!("VAP Viewer - Configuration Example");
    println!("==================================\n");

    if !params.has_source() {
        println!("No src parameter: the viewer would show the missing-source message.");
        return Ok(());
    }

    println!("  Source:  {}", params.src);
    println!("  Config:  {:?}", ConfigSource::classify(&params.config));

    let resolver = ConfigResolver::default();
    let config = resolver.resolve(&params.config).await;
    let options = PlayerOptions::new(params.src.clone(), config, &PlaybackFlags::default());

    println!("  Size:    {}", options.dimensions());
    println!("\nPlayer options:");
    println!("{}", serde_json::to_string_pretty(&options)?);

    Ok(())
}
