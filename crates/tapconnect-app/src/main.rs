// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// TapConnect demo host
//
// Entry point. Initialises logging, sets up the bridge against the stub
// runtime, starts one session, and feeds it envelopes read from stdin, one
// JSON object per line. Stdin is read on its own thread, standing in for the
// embedded runtime's execution context; the session is driven on the main
// thread.

mod delegate;
mod services;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{error, info, warn};

use tapconnect_bridge::stub::{StubRuntime, StubSurface};
use tapconnect_bridge::{ConnectSdk, EventSender};
use tapconnect_core::{ConnectConfig, Language, Theme};

use delegate::LoggingDelegate;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("TapConnect demo host starting");

    let settings = services::settings::load_settings(std::env::args().nth(1).map(PathBuf::from));
    let sdk = ConnectSdk::new(settings, Arc::new(StubSurface::new()));

    let runtime = StubRuntime::new();
    if let Err(e) = sdk.setup(&runtime, Some(Box::new(|| info!("bundle loaded")))) {
        error!(error = %e, "runtime setup failed");
        return;
    }

    let config = ConnectConfig::new(Language::English, Theme::Light)
        .with_token("abc123")
        .with_param("source", serde_json::Value::from("tapconnect-demo"));

    let mut session = match sdk.start_session(config, Arc::new(LoggingDelegate)) {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "could not start Connect session");
            return;
        }
    };

    // The runtime pulls its configuration once it has mounted.
    match sdk.data_sync().request() {
        Some(json) => info!(config = %json, "runtime pulled config"),
        None => warn!("runtime pulled config but none was available"),
    }

    let (eof_tx, eof_rx) = oneshot::channel();
    spawn_runtime_reader(session.event_sender(), eof_tx);

    let outcome = tokio::select! {
        biased;
        outcome = session.run_until_dismissed() => Some(outcome),
        _ = eof_rx => None,
    };

    match outcome {
        Some(outcome) => info!(?outcome, "session finished"),
        None => {
            info!("input closed before the session finished; dismissing");
            if let Err(e) = session.dismiss() {
                error!(error = %e, "dismiss failed");
            }
        }
    }
}

/// Forward stdin lines into the session until EOF or the session closes.
fn spawn_runtime_reader(sender: EventSender, eof: oneshot::Sender<()>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "stdin read failed");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            if sender.send(line).is_err() {
                break;
            }
        }
        let _ = eof.send(());
    });
}
