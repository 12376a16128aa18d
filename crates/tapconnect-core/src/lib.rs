// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// TapConnect — Core types, configuration, and error definitions shared by the
// bridge and the demo host.

pub mod config;
pub mod error;
pub mod types;

pub use config::{BridgeSettings, ConnectConfig, DecodeStrictness, SessionPolicy, ShapeMismatchPolicy};
pub use error::ConnectError;
pub use types::*;
