// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hand landmark sources.
//!
//! Landmark detection itself is delegated: either to an external detector
//! process speaking a small line protocol, or to a recording of earlier
//! detections replayed one line per frame.
//!
//! # Detector protocol
//!
//! The detector is started with `--min-detection-confidence <f>` and
//! `--min-tracking-confidence <f>` appended to its command line and must
//! print `READY` on its own line once loaded. For each frame it receives a
//! header of three little-endian `u32`s (width, height, channels = 3)
//! followed by the raw RGB bytes, and answers with one JSON line:
//!
//! ```json
//! {"hands": [{"handedness": "Left", "score": 0.93, "landmarks": [{"x": 0.41, "y": 0.72}, ...]}]}
//! ```
//!
//! An optional `"error"` string reports a per-frame detector problem.

use crate::error::FretcamError;
use crate::io::media::Frame;
use crate::models::hand::{Hand, JOINTS_PER_HAND};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// Anything that can find hands in a frame.
pub trait LandmarkSource {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Hand>>;
}

/// Detector confidence thresholds, both within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    pub detection_confidence: f32,
    pub tracking_confidence: f32,
}

#[derive(Deserialize, Debug)]
struct DetectionResult {
    #[serde(default)]
    hands: Vec<Hand>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one detector response line.
///
/// Hands without a full joint set are dropped with a warning; a reported
/// detector error yields no hands for the frame.
pub fn parse_detection(line: &str) -> Result<Vec<Hand>> {
    let result: DetectionResult = serde_json::from_str(line.trim())
        .map_err(|e| FretcamError::MalformedLandmarks(format!("{}: {}", e, line.trim())))?;

    if let Some(error) = result.error {
        log::warn!("Landmark detector error: {}", error);
        return Ok(Vec::new());
    }

    let hands = result
        .hands
        .into_iter()
        .filter(|hand| {
            if hand.landmarks.len() != JOINTS_PER_HAND {
                log::warn!(
                    "Expected {} landmarks, got {}",
                    JOINTS_PER_HAND,
                    hand.landmarks.len()
                );
                return false;
            }
            true
        })
        .collect();
    Ok(hands)
}

/// External landmark detector running as a child process.
pub struct DetectorProcess {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl DetectorProcess {
    /// Start `command` and wait for its `READY` line.
    pub fn spawn(command: &[String], config: DetectorConfig) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .context("Landmark detector command is empty")?;

        log::info!("Starting landmark detector: {}", command.join(" "));

        let mut process = Command::new(program)
            .args(args)
            .arg("--min-detection-confidence")
            .arg(config.detection_confidence.to_string())
            .arg("--min-tracking-confidence")
            .arg(config.tracking_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("Failed to start landmark detector '{}'", program))?;

        let stdin = process.stdin.take().context("Failed to get detector stdin")?;
        let stdout = process.stdout.take().context("Failed to get detector stdout")?;
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        let handshake = stdout
            .read_line(&mut ready)
            .context("Failed to read landmark detector handshake")
            .and_then(|_| {
                if ready.trim() == "READY" {
                    Ok(())
                } else {
                    Err(anyhow::anyhow!(
                        "Landmark detector did not signal ready, got: {:?}",
                        ready
                    ))
                }
            });
        if let Err(e) = handshake {
            let _ = process.kill();
            let _ = process.wait();
            return Err(e);
        }

        log::info!("Landmark detector ready");

        Ok(Self {
            process,
            stdin,
            stdout,
        })
    }
}

impl LandmarkSource for DetectorProcess {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Hand>> {
        let (width, height) = frame.dimensions();
        let rgb: Vec<u8> = frame
            .pixels()
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect();

        self.stdin.write_all(&width.to_le_bytes())?;
        self.stdin.write_all(&height.to_le_bytes())?;
        self.stdin.write_all(&3u32.to_le_bytes())?;
        self.stdin.write_all(&rgb)?;
        self.stdin.flush().context("Landmark detector stopped accepting frames")?;

        let mut response = String::new();
        if self.stdout.read_line(&mut response)? == 0 {
            anyhow::bail!("Landmark detector closed its output");
        }

        let hands = parse_detection(&response)?;
        log::debug!("Detector found {} hand(s)", hands.len());
        Ok(hands)
    }
}

impl Drop for DetectorProcess {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

/// Replays recorded detections, one JSON line per frame.
///
/// Each line has the same shape as a detector response. Once the recording
/// runs out every further frame reports no hands.
pub struct Replay {
    lines: Lines<BufReader<File>>,
    exhausted: bool,
}

impl Replay {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open landmark recording {}", path.display()))?;
        log::info!("Replaying landmarks from {}", path.display());
        Ok(Self {
            lines: BufReader::new(file).lines(),
            exhausted: false,
        })
    }
}

impl LandmarkSource for Replay {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Hand>> {
        if self.exhausted {
            return Ok(Vec::new());
        }
        match self.lines.next() {
            Some(line) => {
                let line = line?;
                if line.trim().is_empty() {
                    return Ok(Vec::new());
                }
                parse_detection(&line)
            }
            None => {
                log::info!("Landmark recording exhausted");
                self.exhausted = true;
                Ok(Vec::new())
            }
        }
    }
}

/// Reports no hands. Used when no detector is configured.
pub struct NoHands;

impl LandmarkSource for NoHands {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Hand>> {
        Ok(Vec::new())
    }
}
