// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the bridge's collaborators.
//
// The bridge never touches a view hierarchy or a script engine directly. The
// host supplies a presentation surface and a runtime loader; the host's
// application code supplies a delegate.

use tapconnect_core::error::Result;

/// Host-side receiver of Connect notifications.
///
/// Methods are called on the UI thread, one per routed event. The bridge does
/// not wait for them or retry them.
pub trait ConnectDelegate: Send + Sync {
    /// The user finished the connection flow.
    fn did_complete(&self, auth_id: &str, bi: &str);

    /// The flow failed, or the session could not be started.
    fn did_error(&self, message: &str);

    /// No account matched the user's details.
    fn did_not_find_account(&self);

    /// The user closed the UI without completing.
    fn did_close(&self);
}

/// The visual container the embedded UI is mounted in.
pub trait PresentationSurface: Send + Sync {
    /// Mount the named module and show the container.
    fn present(&self, module_name: &str) -> Result<()>;

    /// Hide the container. Must succeed when nothing is presented.
    fn dismiss(&self) -> Result<()>;

    /// Whether the container is currently shown.
    fn is_presented(&self) -> bool;
}

/// Callback fired once by the runtime when its bundle has loaded.
pub type ReadyCallback = Box<dyn FnOnce() + Send + 'static>;

/// Loader for the embedded runtime.
pub trait HostRuntime {
    /// Human-readable platform name (e.g. "iOS 17", "Desktop (stub)").
    fn platform_name(&self) -> &str;

    /// Start loading the runtime from `bundle_identifier`. `on_ready` may be
    /// called synchronously or later from any thread.
    fn start(&self, bundle_identifier: &str, on_ready: ReadyCallback) -> Result<()>;
}
