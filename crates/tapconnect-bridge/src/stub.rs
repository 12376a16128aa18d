// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub collaborators for desktop/CI builds where no native view hierarchy or
// embedded runtime exists.
//
// The surface only tracks whether it is shown; the runtime reports readiness
// immediately unless built with `StubRuntime::deferred`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tapconnect_core::error::Result;

use crate::traits::{HostRuntime, PresentationSurface, ReadyCallback};

/// Headless presentation surface.
#[derive(Debug, Default)]
pub struct StubSurface {
    presented: AtomicBool,
}

impl StubSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresentationSurface for StubSurface {
    fn present(&self, module_name: &str) -> Result<()> {
        tracing::info!(module = module_name, "StubSurface::present");
        self.presented.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn dismiss(&self) -> Result<()> {
        if self.presented.swap(false, Ordering::SeqCst) {
            tracing::info!("StubSurface::dismiss");
        } else {
            tracing::debug!("StubSurface::dismiss with nothing presented");
        }
        Ok(())
    }

    fn is_presented(&self) -> bool {
        self.presented.load(Ordering::SeqCst)
    }
}

/// Runtime loader that has nothing to load.
#[derive(Default)]
pub struct StubRuntime {
    /// Ready callback held back by a deferred runtime until `finish_loading`.
    pending: Mutex<Option<ReadyCallback>>,
    deferred: bool,
}

impl StubRuntime {
    /// A runtime that signals readiness inside `start`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A runtime that signals readiness only when `finish_loading` is called.
    pub fn deferred() -> Self {
        Self {
            pending: Mutex::new(None),
            deferred: true,
        }
    }

    /// Fire the held ready callback, if any. Returns whether one fired.
    pub fn finish_loading(&self) -> bool {
        let callback = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match callback {
            Some(on_ready) => {
                on_ready();
                true
            }
            None => false,
        }
    }
}

impl HostRuntime for StubRuntime {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }

    fn start(&self, bundle_identifier: &str, on_ready: ReadyCallback) -> Result<()> {
        tracing::info!(bundle = bundle_identifier, "StubRuntime::start");
        if self.deferred {
            *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(on_ready);
        } else {
            on_ready();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn surface_dismiss_is_idempotent() {
        let surface = StubSurface::new();
        surface.present("ConnectSdkApp").unwrap();
        assert!(surface.is_presented());
        surface.dismiss().unwrap();
        surface.dismiss().unwrap();
        assert!(!surface.is_presented());
    }

    #[test]
    fn deferred_runtime_holds_callback() {
        let runtime = StubRuntime::deferred();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        runtime
            .start("bundle", Box::new(move || flag.store(true, Ordering::SeqCst)))
            .unwrap();

        assert!(!fired.load(Ordering::SeqCst));
        assert!(runtime.finish_loading());
        assert!(fired.load(Ordering::SeqCst));
        assert!(!runtime.finish_loading());
    }
}
