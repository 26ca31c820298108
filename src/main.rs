//! playkit headless runner.
//!
//! Loads a GameData JSON file, plays it for a fixed number of seconds at the
//! configured frame rate, replays scripted key presses and clicks, and
//! prints the final world snapshot as JSON.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- game.json --seconds 10 --key space@1.5 --click 120,80@3
//! ```
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for rule dispatch
//! detail.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use playkit::audio::NullBackend;
use playkit::{GameConfig, GameData, PlaykitError, Session};

/// Headless player for playkit games
#[derive(Parser, Debug)]
#[command(version, about = "Play a game without a window and print the final world state.")]
struct Cli {
    /// GameData JSON file.
    game: PathBuf,

    /// INI configuration file.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seconds of play to simulate.
    #[arg(short, long, default_value_t = 5.0)]
    seconds: f32,

    /// Frame rate; overrides the configuration.
    #[arg(long)]
    fps: Option<u32>,

    /// Random seed; overrides the configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Key press at a time, e.g. `space@1.5`. Repeatable.
    #[arg(long = "key", value_name = "KEY@SECS", value_parser = parse_key)]
    keys: Vec<Scripted<String>>,

    /// Click at stage coordinates and a time, e.g. `120,80@3`. Repeatable.
    #[arg(long = "click", value_name = "X,Y@SECS", value_parser = parse_click)]
    clicks: Vec<Scripted<(f32, f32)>>,

    /// Run without the audio thread.
    #[arg(long)]
    mute: bool,

    /// Pretty-print the snapshot.
    #[arg(long)]
    pretty: bool,
}

/// An input replayed at a point in session time.
#[derive(Debug, Clone)]
struct Scripted<T> {
    at: f32,
    input: T,
}

fn split_time(arg: &str) -> Result<(&str, f32), String> {
    let (input, at) = arg
        .rsplit_once('@')
        .ok_or_else(|| format!("expected INPUT@SECONDS, got '{arg}'"))?;
    let at: f32 = at
        .parse()
        .map_err(|_| format!("invalid time '{at}' in '{arg}'"))?;
    Ok((input, at))
}

fn parse_key(arg: &str) -> Result<Scripted<String>, String> {
    let (key, at) = split_time(arg)?;
    if key.is_empty() {
        return Err(format!("missing key in '{arg}'"));
    }
    Ok(Scripted {
        at,
        input: key.to_string(),
    })
}

fn parse_click(arg: &str) -> Result<Scripted<(f32, f32)>, String> {
    let (point, at) = split_time(arg)?;
    let (x, y) = point
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y in '{arg}'"))?;
    let x: f32 = x.trim().parse().map_err(|_| format!("invalid x in '{arg}'"))?;
    let y: f32 = y.trim().parse().map_err(|_| format!("invalid y in '{arg}'"))?;
    Ok(Scripted { at, input: (x, y) })
}

fn run(cli: Cli) -> Result<(), PlaykitError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::new(),
    };
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if cli.mute {
        config.audio_enabled = false;
    }
    let frame = config.frame_seconds();

    let data = GameData::load(&cli.game)?;
    info!("Playing '{}' for {}s", cli.game.display(), cli.seconds);

    let mut session = Session::new(data, config);
    session.attach_audio(Box::new(NullBackend::new()));
    session.load();
    session.start();

    let mut keys = cli.keys;
    let mut clicks = cli.clicks;
    keys.sort_by(|a, b| a.at.total_cmp(&b.at));
    clicks.sort_by(|a, b| a.at.total_cmp(&b.at));
    let mut keys = keys.into_iter().peekable();
    let mut clicks = clicks.into_iter().peekable();

    let frames = (cli.seconds / frame).ceil() as u64;
    for index in 0..frames {
        let now = index as f32 * frame;
        while let Some(key) = keys.next_if(|k| k.at <= now) {
            session.key_down(key.input);
        }
        while let Some(click) = clicks.next_if(|c| c.at <= now) {
            let (x, y) = click.input;
            if session.click_at(x, y).is_none() {
                info!("Click at ({}, {}) hit nothing", x, y);
            }
        }
        session.tick(frame);
    }

    let snapshot = session.snapshot();
    session.shutdown();
    let json = if cli.pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    println!("{json}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
