// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! fretcam - virtual guitar chord detector
//!
//! Overlays a virtual fretboard on a live camera feed and names the open
//! chord being "played" from the fingertip positions a hand-landmark
//! detector reports.

mod app;
mod calibration;
mod detector;
mod error;
mod io;
mod models;
mod ui;

use anyhow::{Context, Result};
use app::FretcamApp;
use clap::Parser;
use io::landmarks::{DetectorConfig, DetectorProcess, LandmarkSource, NoHands, Replay};
use io::media::{FrameSource, ImageSequence};
use models::session::{RegionMode, SessionConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fretcam", version, about = "Virtual guitar chord detector")]
struct Cli {
    /// Camera device index
    #[arg(long, default_value_t = 0)]
    camera: i32,

    /// Play a directory of still images instead of a camera
    #[arg(long, value_name = "DIR")]
    frames: Option<PathBuf>,

    /// Repeat the image directory once it runs out
    #[arg(long, requires = "frames")]
    loop_frames: bool,

    /// Session configuration (.yaml, .yml or .json)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Drag out the fretboard region before playing
    #[arg(long)]
    calibrate: bool,

    /// Write the configuration with the dragged region once calibrated
    #[arg(long, value_name = "FILE")]
    save_calibration: Option<PathBuf>,

    /// Hand-landmark detector command line, e.g. "hand-detector --model hands.task"
    #[arg(long, value_name = "CMD")]
    landmarks_cmd: Option<String>,

    /// Recorded detections, one JSON line per frame
    #[arg(long, value_name = "FILE", conflicts_with = "landmarks_cmd")]
    landmarks_replay: Option<PathBuf>,

    /// Do not mirror frames horizontally
    #[arg(long)]
    no_mirror: bool,

    /// Write the effective configuration and exit
    #[arg(long, value_name = "FILE")]
    export_config: Option<PathBuf>,
}

impl Cli {
    /// Load the configuration file, if any, and apply command-line overrides.
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match self.config {
            Some(ref path) => io::serialization::import_config(path)?,
            None => SessionConfig::default(),
        };
        if self.calibrate {
            config.region = RegionMode::Interactive;
        }
        if self.no_mirror {
            config.mirror = false;
        }
        Ok(config)
    }

    fn frame_source(&self) -> Result<Box<dyn FrameSource>> {
        if let Some(ref dir) = self.frames {
            return Ok(Box::new(ImageSequence::open(dir, self.loop_frames)?));
        }
        open_camera(self.camera)
    }

    fn landmark_source(&self, config: &SessionConfig) -> Result<Box<dyn LandmarkSource>> {
        if let Some(ref command) = self.landmarks_cmd {
            let command: Vec<String> = command.split_whitespace().map(str::to_string).collect();
            let detector = DetectorConfig {
                detection_confidence: config.detection_confidence,
                tracking_confidence: config.tracking_confidence,
            };
            return Ok(Box::new(DetectorProcess::spawn(&command, detector)?));
        }
        if let Some(ref path) = self.landmarks_replay {
            return Ok(Box::new(Replay::open(path)?));
        }
        log::warn!("No landmark detector configured; no hands will be detected");
        Ok(Box::new(NoHands))
    }
}

#[cfg(feature = "video-opencv")]
fn open_camera(index: i32) -> Result<Box<dyn FrameSource>> {
    Ok(Box::new(io::media::Camera::open(index)?))
}

#[cfg(not(feature = "video-opencv"))]
fn open_camera(index: i32) -> Result<Box<dyn FrameSource>> {
    Err(error::FretcamError::CameraUnavailable(format!(
        "camera {} requested but fretcam was built without the video-opencv feature; use --frames",
        index
    ))
    .into())
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.session_config()?;

    if let Some(ref path) = cli.export_config {
        return io::serialization::export_config(&config, path);
    }

    // Open sources before the window so an unavailable camera is fatal at startup
    let frames = cli.frame_source()?;
    let landmarks = cli.landmark_source(&config)?;
    let (width, height) = frames.dimensions();

    let app = FretcamApp::new(frames, landmarks, config, cli.save_calibration.clone())?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32 + 220.0, height as f32 + 40.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Virtual Guitar Chord Detector"),
        ..Default::default()
    };

    eframe::run_native("fretcam", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("Application error: {}", e))
        .context("Window closed with an error")?;

    Ok(())
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["fretcam", "--frames", "clips", "--calibrate", "--no-mirror"]);
        let config = cli.session_config().unwrap();
        assert_eq!(config.region, RegionMode::Interactive);
        assert!(!config.mirror);
    }

    #[test]
    fn test_cli_detector_command() {
        let cli = Cli::parse_from([
            "fretcam",
            "--landmarks-cmd",
            "hand-detector --model hands.task",
        ]);
        assert_eq!(cli.landmarks_cmd.as_deref(), Some("hand-detector --model hands.task"));
        assert!(Cli::try_parse_from([
            "fretcam",
            "--landmarks-cmd",
            "hand-detector",
            "--landmarks-replay",
            "hands.jsonl",
        ])
        .is_err());
    }

    #[test]
    fn test_loop_requires_frames() {
        assert!(Cli::try_parse_from(["fretcam", "--loop-frames"]).is_err());
    }

    #[cfg(not(feature = "video-opencv"))]
    #[test]
    fn test_camera_unavailable_without_opencv() {
        let err = match open_camera(0) {
            Err(e) => e,
            Ok(_) => panic!("camera should be unavailable"),
        };
        assert!(matches!(
            err.downcast_ref::<error::FretcamError>(),
            Some(error::FretcamError::CameraUnavailable(_))
        ));
    }
}
