/// Duet Player simulator
use clap::Parser;
use duet_sim::{cli::Cli, SimConfig, Simulator, TrackSource};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "duet_sim=info,duet_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = SimConfig::load(cli.config.as_deref())?;
    config.apply(&cli.overrides());

    let tracks = cli
        .tracks
        .iter()
        .map(|input| TrackSource::parse(input))
        .collect::<Result<Vec<_>, _>>()?;

    let summary = Simulator::new(config, tracks)?.run().await;

    info!(
        "Done: {} played, {} skipped, {} crossfades, {:.1}s of media in {} ticks",
        summary.played.len(),
        summary.failed.len(),
        summary.crossfades,
        summary.media_time.as_secs_f64(),
        summary.ticks
    );
    Ok(())
}
