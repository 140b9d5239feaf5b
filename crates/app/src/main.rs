//! SoundForge tracker entry point.
//!
//! Wires configuration, tracing, and a tracker [`Session`] together.
//! When `SOUNDFORGE_PROMPT` is set, one generation request is submitted
//! on startup and lifecycle events are printed as they arrive; the
//! process runs until Ctrl-C, then tears the session down.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soundforge_client::{AudioApi, AudioService};
use soundforge_events::TrackerEvent;
use soundforge_tracker::{Session, TrackerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundforge=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = TrackerConfig::from_env();
    tracing::info!(api_base = %config.api_base, "Loaded tracker configuration");

    let api: Arc<dyn AudioService> = Arc::new(AudioApi::with_timeout(
        config.api_base.clone(),
        config.request_timeout,
    ));
    let session = Session::start(api, config).await;

    let mut events = session.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                TrackerEvent::JobQueued { filename, .. } => {
                    println!("queued   {filename}");
                }
                TrackerEvent::JobCompleted { filename, file_url, .. } => {
                    println!("complete {filename} -> {file_url}");
                }
                TrackerEvent::JobFailed { filename, .. } => {
                    println!("error    {filename}");
                }
                TrackerEvent::JobCancelled { filename } => {
                    println!("canceled {filename}");
                }
                TrackerEvent::SubmitFailed { error } => {
                    println!("submit failed: {error}");
                }
            }
        }
    });

    if let Ok(prompt) = std::env::var("SOUNDFORGE_PROMPT") {
        let duration: u32 = std::env::var("SOUNDFORGE_DURATION")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SOUNDFORGE_DURATION must be a valid u32");

        match session.submit(&prompt, duration).await {
            Ok(filename) => tracing::info!(%filename, "Submitted generation request"),
            Err(e) => tracing::error!(error = %e, "Submission failed"),
        }
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Ctrl-C received, shutting down");

    session.shutdown().await;
    printer.abort();

    for entry in session.console_entries().await {
        tracing::debug!("console: {}", entry.render());
    }

    Ok(())
}
