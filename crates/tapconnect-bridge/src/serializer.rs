// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Config serializer for the runtime's data-sync pull.

use tapconnect_core::config::ConnectConfig;

/// Answer a data-sync request.
///
/// `None` means "no data": there is no active configuration, or it could not
/// be encoded. Encoding failures are logged, never raised to the host.
pub fn serialize_config(config: Option<&ConnectConfig>) -> Option<String> {
    let config = config?;
    match config.to_json_string() {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::warn!(error = %e, "data sync: returning no data");
            None
        }
    }
}
