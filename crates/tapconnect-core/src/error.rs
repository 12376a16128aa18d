// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the TapConnect bridge.

use thiserror::Error;

/// Message delivered to the delegate when a session is requested before the
/// embedded runtime has signalled readiness.
pub const NOT_INITIALIZED_MESSAGE: &str = "SDK not initialized";

/// Top-level error type for all bridge operations.
///
/// None of these are fatal to the host process. Envelope errors are logged and
/// dropped; session errors are surfaced to the caller (and, for
/// `NotInitialized`, to the delegate's error callback).
#[derive(Debug, Error)]
pub enum ConnectError {
    // -- Envelope errors --
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    #[error("unexpected payload for {0}")]
    ShapeMismatch(String),

    // -- Session errors --
    #[error("SDK not initialized")]
    NotInitialized,

    #[error("a Connect session is already active")]
    SessionActive,

    #[error("session has been replaced by a newer one")]
    SessionSuperseded,

    #[error("session is closed")]
    SessionClosed,

    #[error("presentation surface error: {0}")]
    Surface(String),

    // -- Configuration --
    #[error("config serialization failed: {0}")]
    SerializationFailure(String),

    #[error("invalid bridge settings: {0}")]
    Settings(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConnectError {
    /// Envelope-level errors are dropped after logging; everything else is
    /// reported to the caller.
    pub fn is_envelope_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedEnvelope(_) | Self::UnknownEventType(_) | Self::ShapeMismatch(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ConnectError>;
