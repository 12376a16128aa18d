// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! TapConnect — host-side bridge for the embedded Connect UI.
//!
//! The embedded runtime sends small JSON envelopes (`{"type": ..., "data": ...}`)
//! describing what the user did. This crate decodes them, routes each to one
//! callback on the host's [`ConnectDelegate`], and dismisses the presentation
//! surface. In the other direction it answers the runtime's pull for the
//! session configuration.
//!
//! Platform collaborators (the view container and the runtime loader) are
//! traits; desktop and CI builds use the stubs in [`stub`].

pub mod decoder;
pub mod dispatcher;
pub mod serializer;
pub mod session;
pub mod stub;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use decoder::decode_envelope;
pub use dispatcher::{DispatchOutcome, EventDispatcher};
pub use serializer::serialize_config;
pub use session::{ConnectSdk, DataSync, EventSender, SessionHandle};
pub use traits::{ConnectDelegate, HostRuntime, PresentationSurface, ReadyCallback};
