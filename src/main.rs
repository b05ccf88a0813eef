//! Exercise alarm: replays a recorded pose stream against the alarm controller.

use anyhow::{Context, Result};
use clap::Parser;
use exercise_alarm::{
    alarm::ExerciseKind,
    clock::ManualClock,
    config::{Config, EXAMPLE_CONFIG},
    controller::AlarmController,
    session::{read_recording, ReplaySession},
};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded pose stream to replay
    #[arg(short, long)]
    frames: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Exercise required to stop the alarm (pushups, situps)
    #[arg(short, long)]
    exercise: Option<ExerciseKind>,

    /// Repetitions required to stop the alarm
    #[arg(short, long)]
    target_reps: Option<u32>,

    /// Seconds until the alarm rings
    #[arg(short, long)]
    delay: Option<f64>,

    /// Frames per second accepted from the pose stream
    #[arg(long)]
    fps: Option<u32>,

    /// Smoothing filter (exponential, exponential:<alpha>, none)
    #[arg(long)]
    filter: Option<String>,

    /// Write an example configuration file and exit
    #[arg(long)]
    write_example_config: Option<String>,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if let Some(path) = &args.write_example_config {
        std::fs::write(path, EXAMPLE_CONFIG).with_context(|| format!("writing {path}"))?;
        info!("Example configuration written to {}", path);
        return Ok(());
    }

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Some(exercise) = args.exercise {
        config.alarm.exercise = exercise;
    }
    if let Some(target) = args.target_reps {
        config.alarm.target_reps = target;
    }
    if let Some(delay) = args.delay {
        config.alarm.delay_seconds = delay;
    }
    if let Some(fps) = args.fps {
        config.session.target_fps = fps;
    }
    if let Some(filter) = args.filter {
        config.smoothing.filter = filter;
    }

    let frames_path = args.frames.context("--frames is required to run a replay")?;
    let frames = read_recording(&frames_path).with_context(|| format!("reading {frames_path}"))?;
    info!("Loaded {} frames from {}", frames.len(), frames_path);

    let clock = ManualClock::new();
    let controller = AlarmController::from_config(&config, Box::new(clock.clone()))?;
    let mut session = ReplaySession::new(controller, clock, config.session.target_fps);
    let summary = session.run(config.alarm.delay_seconds, &frames);

    println!("{summary}");
    Ok(())
}
