// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge settings resolution for the demo host.

use std::path::PathBuf;

use tapconnect_core::BridgeSettings;
use tracing::{debug, info, warn};

use super::data_dir;

const SETTINGS_FILE: &str = "bridge.json";

/// Load settings from `explicit` if given, else from the data directory.
///
/// A missing file means defaults. An unreadable or invalid file is logged and
/// also falls back to defaults, so the demo always starts.
pub fn load_settings(explicit: Option<PathBuf>) -> BridgeSettings {
    let path = explicit.unwrap_or_else(|| data_dir::data_dir().join(SETTINGS_FILE));

    if !path.exists() {
        debug!(path = %path.display(), "no settings file; using defaults");
        return BridgeSettings::default();
    }

    match BridgeSettings::load(&path) {
        Ok(settings) => {
            info!(path = %path.display(), ?settings, "bridge settings loaded");
            settings
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "bridge settings invalid; using defaults");
            BridgeSettings::default()
        }
    }
}
