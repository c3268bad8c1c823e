//! handflix - drive a media player with hand gestures
//!
//! Reads hand landmarks (a JSON Lines recording or a synthetic script),
//! classifies and debounces gestures, and dispatches media actions. Key
//! presses are logged rather than injected.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use handflix::{HandflixConfig, LandmarkSource, LogDispatcher, Playback, PlaybackSummary};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Config file (JSON, or TOML by extension). Falls back to HANDFLIX_CONFIG.
    #[arg(long, env = "HANDFLIX_CONFIG")]
    config: Option<PathBuf>,
    /// Landmark input: local .jsonl recording or stub://<demo|pinch|sweep|empty>.
    #[arg(long)]
    input: Option<String>,
    /// Frame pacing in frames per second (0 = unpaced).
    #[arg(long)]
    fps: Option<u32>,
    /// Stop after this many frames.
    #[arg(long)]
    max_frames: Option<u64>,
    /// Frames suppressed after each emitted gesture.
    #[arg(long)]
    cooldown: Option<u32>,
    /// Seed for synthetic input jitter.
    #[arg(long)]
    seed: Option<u64>,
    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = HandflixConfig::load_from(args.config.as_deref())?;
    if let Some(input) = args.input {
        cfg.input.path = input;
    }
    if let Some(fps) = args.fps {
        cfg.input.target_fps = fps;
    }
    if let Some(cooldown) = args.cooldown {
        cfg.classifier.cooldown_frames = cooldown;
    }
    if let Some(seed) = args.seed {
        cfg.input.seed = seed;
    }
    cfg.validate()?;

    log::info!("handflix starting");
    log::info!("  input: {}", cfg.input.path);
    log::info!(
        "  window: {} ({}x{})",
        cfg.media.window_name,
        cfg.media.frame_width,
        cfg.media.frame_height
    );
    log::info!(
        "  thresholds: pinch {} left {} right {} ({:?})",
        cfg.classifier.pinch_threshold,
        cfg.classifier.left_threshold,
        cfg.classifier.right_threshold,
        cfg.classifier.zone_layout
    );
    log::info!(
        "  cooldown: {} frames, nop policy {:?}, missing hand {:?}",
        cfg.classifier.cooldown_frames,
        cfg.nop_policy,
        cfg.input.missing_hand
    );

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || {
        handler_stop.store(true, Ordering::SeqCst);
    })
    .context("install Ctrl-C handler")?;

    let source = LandmarkSource::new(cfg.source_config())?;
    let mut playback = Playback::new(source, cfg.controller()?, LogDispatcher::new())
        .with_target_fps(cfg.input.target_fps)
        .with_window_name(cfg.media.window_name.clone());
    let summary = playback.run(&stop, args.max_frames)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, &cfg, playback.dispatcher().dispatched());
    }
    match summary.dispatch_error {
        Some(reason) => Err(anyhow!("playback aborted: {}", reason)),
        None => Ok(()),
    }
}

fn print_summary(summary: &PlaybackSummary, cfg: &HandflixConfig, dispatched: u64) {
    println!(
        "handflix summary [{} {}x{}]:",
        summary.window, cfg.media.frame_width, cfg.media.frame_height
    );
    println!("  frames processed: {}", summary.frames);
    println!("  hands seen: {}", summary.hands_seen);
    println!("  invalid poses skipped: {}", summary.invalid_poses);
    println!("  events: {}", summary.events.len());
    for event in &summary.events {
        println!("    frame {:>5}: {:<10} {}", event.frame, event.gesture.label(), event.text);
    }
    println!("  actions dispatched: {}", dispatched);
    if summary.stopped_early {
        println!("  stopped by Ctrl-C");
    }
    if let Some(reason) = &summary.dispatch_error {
        println!("  dispatch failed: {}", reason);
    }
}
