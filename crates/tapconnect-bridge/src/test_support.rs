// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recording fakes shared by the unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tapconnect_core::error::{ConnectError, Result};

use crate::traits::{ConnectDelegate, PresentationSurface};

/// One observed delegate callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Complete(String, String),
    Error(String),
    NoAccountFound,
    Close,
}

#[derive(Debug, Default)]
pub struct RecordingDelegate {
    calls: Mutex<Vec<Call>>,
}

impl RecordingDelegate {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ConnectDelegate for RecordingDelegate {
    fn did_complete(&self, auth_id: &str, bi: &str) {
        self.record(Call::Complete(auth_id.into(), bi.into()));
    }

    fn did_error(&self, message: &str) {
        self.record(Call::Error(message.into()));
    }

    fn did_not_find_account(&self) {
        self.record(Call::NoAccountFound);
    }

    fn did_close(&self) {
        self.record(Call::Close);
    }
}

/// Surface that counts how often it is actually shown and hidden.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    presented: AtomicBool,
    presents: AtomicUsize,
    dismissals: AtomicUsize,
    fail_present: AtomicBool,
}

impl RecordingSurface {
    pub fn failing() -> Self {
        let surface = Self::default();
        surface.fail_present.store(true, Ordering::SeqCst);
        surface
    }

    pub fn presents(&self) -> usize {
        self.presents.load(Ordering::SeqCst)
    }

    /// Dismissals that hid something. Calls with nothing shown are not counted.
    pub fn dismissals(&self) -> usize {
        self.dismissals.load(Ordering::SeqCst)
    }
}

impl PresentationSurface for RecordingSurface {
    fn present(&self, _module_name: &str) -> Result<()> {
        if self.fail_present.load(Ordering::SeqCst) {
            return Err(ConnectError::Surface("no window".into()));
        }
        self.presented.store(true, Ordering::SeqCst);
        self.presents.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn dismiss(&self) -> Result<()> {
        if self.presented.swap(false, Ordering::SeqCst) {
            self.dismissals.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn is_presented(&self) -> bool {
        self.presented.load(Ordering::SeqCst)
    }
}
