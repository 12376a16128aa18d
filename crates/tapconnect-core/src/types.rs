// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Connect event bridge.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a Connect session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Language of the embedded Connect UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

impl Language {
    /// Short code sent to the embedded runtime.
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Arabic => "ar",
        }
    }
}

/// Colour theme of the embedded Connect UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// The closed set of event tags the embedded UI may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    OnComplete,
    OnError,
    OnNoAccountFound,
    OnClose,
}

impl EventKind {
    /// Match a `type` tag. Case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "onComplete" => Some(Self::OnComplete),
            "onError" => Some(Self::OnError),
            "onNoAccountFound" => Some(Self::OnNoAccountFound),
            "onClose" => Some(Self::OnClose),
            _ => None,
        }
    }

    /// The wire tag for this kind.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::OnComplete => "onComplete",
            Self::OnError => "onError",
            Self::OnNoAccountFound => "onNoAccountFound",
            Self::OnClose => "onClose",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Payload of a successful connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletePayload {
    #[serde(rename = "authId")]
    pub auth_id: String,
    pub bi: String,
}

/// Payload of a failed connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// The `data` member of an envelope after shape probing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EventData {
    Complete(CompletePayload),
    Error(ErrorPayload),
    #[default]
    Empty,
}

/// A decoded envelope.
///
/// Built from one inbound string and consumed immediately by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectEvent {
    pub kind: EventKind,
    pub data: EventData,
}

impl ConnectEvent {
    pub fn new(kind: EventKind, data: EventData) -> Self {
        Self { kind, data }
    }
}
