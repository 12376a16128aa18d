// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Delegate that reports every Connect notification to the log.

use tapconnect_bridge::ConnectDelegate;
use tracing::{info, warn};

pub struct LoggingDelegate;

impl ConnectDelegate for LoggingDelegate {
    fn did_complete(&self, auth_id: &str, bi: &str) {
        info!(auth_id, bi, "connection completed");
    }

    fn did_error(&self, message: &str) {
        warn!(message, "connection failed");
    }

    fn did_not_find_account(&self) {
        info!("no account found");
    }

    fn did_close(&self) {
        info!("user closed Connect");
    }
}
