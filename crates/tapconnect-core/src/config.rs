// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session configuration handed to the embedded UI, and bridge settings.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConnectError, Result};
use crate::types::{Language, Theme};

/// Configuration for one Connect session.
///
/// Built by the host before a session starts and read-only afterwards. The
/// embedded runtime pulls it as a flat JSON object (see [`ConnectConfig::to_json_string`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectConfig {
    pub language: Language,
    pub theme: Theme,
    /// Optional authentication token.
    pub token: Option<String>,
    /// Extra keys merged into the top level of the outbound object. These win
    /// over `language`, `theme` and `token` on collision.
    pub additional_params: Option<Map<String, Value>>,
}

impl ConnectConfig {
    pub fn new(language: Language, theme: Theme) -> Self {
        Self {
            language,
            theme,
            token: None,
            additional_params: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Add one additional parameter. A repeated key replaces the earlier value.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.additional_params
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Build the outbound object: `{language, theme}`, then `token`, then
    /// `additional_params` with last-write-wins.
    pub fn to_json_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("language".into(), Value::from(self.language.code()));
        map.insert("theme".into(), Value::from(self.theme.code()));

        if let Some(token) = &self.token {
            map.insert("token".into(), Value::from(token.as_str()));
        }

        if let Some(params) = &self.additional_params {
            for (key, value) in params {
                map.insert(key.clone(), value.clone());
            }
        }

        map
    }

    /// Encode the outbound object as a JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(&Value::Object(self.to_json_map()))
            .map_err(|e| ConnectError::SerializationFailure(e.to_string()))
    }
}

/// How the `data` member of an inbound envelope is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeStrictness {
    /// Try the complete shape, then the error shape, regardless of `type`.
    /// Compatible with payloads sent by existing embedded-runtime builds.
    #[default]
    Probing,
    /// Only the shape belonging to the `type` tag is tried.
    Strict,
}

/// What `start_session` does while another session is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPolicy {
    /// The new session takes over; the old handle is superseded.
    #[default]
    Replace,
    /// The new session is refused with `SessionActive`.
    Reject,
}

/// What happens when a known tag arrives with a payload of the wrong shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeMismatchPolicy {
    /// No callback. The surface is still dismissed.
    #[default]
    Silent,
    /// Call the delegate's error callback, then dismiss.
    ReportError,
}

/// Persistent bridge settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    pub decode_strictness: DecodeStrictness,
    pub session_policy: SessionPolicy,
    pub shape_mismatch: ShapeMismatchPolicy,
    /// Name of the embedded UI module mounted by the presentation surface.
    pub module_name: String,
    /// Identifier of the bundle that carries the embedded UI and its assets.
    pub bundle_identifier: String,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            decode_strictness: DecodeStrictness::Probing,
            session_policy: SessionPolicy::Replace,
            shape_mismatch: ShapeMismatchPolicy::Silent,
            module_name: "ConnectSdkApp".into(),
            bundle_identifier: "tap.ConnectSdkFramework".into(),
        }
    }
}

impl BridgeSettings {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&data).map_err(|e| ConnectError::Settings(e.to_string()))
    }

    /// Write settings as pretty-printed JSON.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConnectError::Settings(e.to_string()))?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
