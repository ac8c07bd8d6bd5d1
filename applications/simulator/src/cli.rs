/// Command-line arguments
use crate::config::Overrides;
use clap::Parser;
use duet_playback::FadeCurve;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "duet-sim")]
#[command(about = "Play a playlist through the Duet crossfade engine on simulated media", long_about = None)]
pub struct Cli {
    /// Audio files, or synthetic:NAME:SECONDS
    #[arg(required = true)]
    pub tracks: Vec<String>,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Crossfade window in milliseconds
    #[arg(short, long)]
    pub window_ms: Option<u32>,

    /// Fade curve: linear, equal-power or s-curve
    #[arg(long)]
    pub curve: Option<FadeCurve>,

    /// Milliseconds between time updates
    #[arg(short, long)]
    pub tick_ms: Option<u64>,

    /// Playback speed multiplier
    #[arg(short, long)]
    pub speed: Option<f64>,

    /// Run as fast as possible instead of sleeping between ticks
    #[arg(long)]
    pub no_realtime: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            window_ms: self.window_ms,
            curve: self.curve,
            tick_ms: self.tick_ms,
            speed: self.speed,
            no_realtime: self.no_realtime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "duet-sim",
            "--window-ms",
            "4000",
            "--curve",
            "equal-power",
            "--tick-ms",
            "100",
            "--speed",
            "8",
            "--no-realtime",
            "one.mp3",
            "synthetic:Two:30",
        ])
        .unwrap();

        assert_eq!(cli.tracks, vec!["one.mp3", "synthetic:Two:30"]);
        assert_eq!(
            cli.overrides(),
            Overrides {
                window_ms: Some(4000),
                curve: Some(FadeCurve::EqualPower),
                tick_ms: Some(100),
                speed: Some(8.0),
                no_realtime: true,
            }
        );
    }

    #[test]
    fn tracks_are_required() {
        assert!(Cli::try_parse_from(["duet-sim"]).is_err());
    }

    #[test]
    fn unknown_curve_is_rejected() {
        assert!(Cli::try_parse_from(["duet-sim", "--curve", "cosine", "a.mp3"]).is_err());
    }
}
