// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session configuration serialization and deserialization.
//!
//! This module handles exporting and importing session settings in YAML
//! and JSON formats. The format is chosen from the file extension.

use crate::models::session::SessionConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Export session settings to YAML format.
pub fn export_yaml(config: &SessionConfig, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export session settings to JSON format.
pub fn export_json(config: &SessionConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import session settings from YAML format.
pub fn import_yaml(path: &Path) -> Result<SessionConfig> {
    let yaml = std::fs::read_to_string(path)?;
    let config = serde_yaml::from_str(&yaml)?;
    Ok(config)
}

/// Import session settings from JSON format.
pub fn import_json(path: &Path) -> Result<SessionConfig> {
    let json = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&json)?;
    Ok(config)
}

/// Load and validate a configuration file, picking the format by extension.
pub fn import_config(path: &Path) -> Result<SessionConfig> {
    let extension = path.extension().and_then(|s| s.to_str());
    let config = match extension {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        _ => anyhow::bail!("Unsupported file extension: {:?}", extension),
    }
    .with_context(|| format!("Failed to load configuration {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("Invalid configuration {}", path.display()))?;

    log::info!(
        "Loaded configuration from {} ({} chords)",
        path.display(),
        config.chords.len()
    );
    Ok(config)
}

/// Write a configuration file, picking the format by extension.
pub fn export_config(config: &SessionConfig, path: &Path) -> Result<()> {
    let extension = path.extension().and_then(|s| s.to_str());
    match extension {
        Some("yaml") | Some("yml") => export_yaml(config, path),
        Some("json") => export_json(config, path),
        _ => anyhow::bail!("Unsupported file extension: {:?}", extension),
    }
    .with_context(|| format!("Failed to write configuration {}", path.display()))?;

    log::info!("Exported configuration to {}", path.display());
    Ok(())
}
