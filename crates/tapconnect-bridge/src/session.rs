// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session layer — readiness gating, the single active session, and the event
// queue between the embedded runtime and the UI thread.
//
// Threading model:
//
//   runtime context ──EventSender::send──▶ unbounded queue ──▶ SessionHandle
//                                                              (UI thread)
//
// Only the `SessionHandle` calls the delegate or touches the presentation
// surface, and it is owned by the UI thread. The registry holding the active
// session id and config sits behind a mutex so `DataSync` can be asked for
// the config from whatever thread the runtime uses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::{Notify, mpsc};
use tracing::{debug, info, instrument, warn};

use tapconnect_core::config::{BridgeSettings, ConnectConfig, DecodeStrictness, SessionPolicy};
use tapconnect_core::error::{ConnectError, NOT_INITIALIZED_MESSAGE, Result};
use tapconnect_core::types::SessionId;

use crate::decoder::decode_envelope;
use crate::dispatcher::{DispatchOutcome, EventDispatcher};
use crate::serializer::serialize_config;
use crate::traits::{ConnectDelegate, HostRuntime, PresentationSurface, ReadyCallback};

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

struct ActiveSession {
    id: SessionId,
    config: ConnectConfig,
    /// Signalled once when a newer session replaces this one.
    superseded: Arc<Notify>,
}

#[derive(Default)]
struct Registry {
    active: Option<ActiveSession>,
}

impl Registry {
    fn is_current(&self, id: SessionId) -> bool {
        self.active.as_ref().is_some_and(|active| active.id == id)
    }
}

type SharedRegistry = Arc<Mutex<Registry>>;

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Answers the runtime's data-sync pulls.
///
/// Cheap to clone and safe to call from any thread. Always reads the current
/// config, never a snapshot.
#[derive(Clone)]
pub struct DataSync {
    registry: SharedRegistry,
}

impl DataSync {
    /// The active config as a JSON object string, or `None` without a session.
    pub fn request(&self) -> Option<String> {
        let registry = lock(&self.registry);
        serialize_config(registry.active.as_ref().map(|active| &active.config))
    }
}

// ---------------------------------------------------------------------------
// ConnectSdk
// ---------------------------------------------------------------------------

/// Entry point of the bridge. One per host process is typical, but nothing
/// here is global.
pub struct ConnectSdk {
    settings: BridgeSettings,
    surface: Arc<dyn PresentationSurface>,
    ready: Arc<AtomicBool>,
    setup_started: AtomicBool,
    registry: SharedRegistry,
}

impl ConnectSdk {
    pub fn new(settings: BridgeSettings, surface: Arc<dyn PresentationSurface>) -> Self {
        Self {
            settings,
            surface,
            ready: Arc::new(AtomicBool::new(false)),
            setup_started: AtomicBool::new(false),
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    /// Start the embedded runtime. Sessions are refused until it reports
    /// ready, after which `completion` runs (on the runtime's thread).
    ///
    /// A second call while setup has already started does nothing.
    #[instrument(skip_all, fields(platform = runtime.platform_name()))]
    pub fn setup(&self, runtime: &dyn HostRuntime, completion: Option<ReadyCallback>) -> Result<()> {
        if self.setup_started.swap(true, Ordering::SeqCst) {
            debug!("setup already started");
            return Ok(());
        }

        let ready = Arc::clone(&self.ready);
        let on_ready: ReadyCallback = Box::new(move || {
            ready.store(true, Ordering::SeqCst);
            info!("embedded runtime ready");
            if let Some(completion) = completion {
                completion();
            }
        });

        info!(bundle = %self.settings.bundle_identifier, "starting embedded runtime");
        if let Err(e) = runtime.start(&self.settings.bundle_identifier, on_ready) {
            self.setup_started.store(false, Ordering::SeqCst);
            return Err(e);
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Id of the session that currently owns the surface.
    pub fn active_session(&self) -> Option<SessionId> {
        lock(&self.registry).active.as_ref().map(|active| active.id)
    }

    /// A data-sync responder to hand to the runtime.
    pub fn data_sync(&self) -> DataSync {
        DataSync {
            registry: Arc::clone(&self.registry),
        }
    }

    pub fn request_data_sync(&self) -> Option<String> {
        self.data_sync().request()
    }

    /// Bind `config` and `delegate`, present the surface, and return the
    /// handle the UI thread drives the session with.
    ///
    /// Before the runtime is ready this calls `delegate.did_error` with
    /// "SDK not initialized" and presents nothing. While another session is
    /// active the configured `SessionPolicy` applies.
    #[instrument(skip_all)]
    pub fn start_session(
        &self,
        config: ConnectConfig,
        delegate: Arc<dyn ConnectDelegate>,
    ) -> Result<SessionHandle> {
        if !self.is_initialized() {
            warn!("session requested before the embedded runtime is ready");
            delegate.did_error(NOT_INITIALIZED_MESSAGE);
            return Err(ConnectError::NotInitialized);
        }

        let id = SessionId::new();
        let superseded = Arc::new(Notify::new());

        // The registry lock is released before the surface is touched: a host
        // surface may pull config through `DataSync` while it dismisses.
        let replaced = {
            let mut registry = lock(&self.registry);
            let replaced = match &registry.active {
                Some(previous) => match self.settings.session_policy {
                    SessionPolicy::Reject => {
                        warn!(active = %previous.id, "session already active; rejecting");
                        return Err(ConnectError::SessionActive);
                    }
                    SessionPolicy::Replace => {
                        info!(previous = %previous.id, "replacing active session");
                        Some(Arc::clone(&previous.superseded))
                    }
                },
                None => None,
            };
            registry.active = Some(ActiveSession {
                id,
                config,
                superseded: Arc::clone(&superseded),
            });
            replaced
        };

        if let Some(previous) = replaced {
            previous.notify_one();
            if let Err(e) = self.surface.dismiss() {
                self.release(id);
                return Err(e);
            }
        }

        if let Err(e) = self.surface.present(&self.settings.module_name) {
            self.release(id);
            return Err(e);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        info!(session = %id, module = %self.settings.module_name, "Connect session started");

        Ok(SessionHandle {
            id,
            started_at: Utc::now(),
            delegate: Some(delegate),
            surface: Arc::clone(&self.surface),
            registry: Arc::clone(&self.registry),
            dispatcher: EventDispatcher::from_settings(&self.settings),
            strictness: self.settings.decode_strictness,
            sender: EventSender { session: id, tx },
            events: rx,
            superseded,
            dismissed: false,
        })
    }

    /// Drop the registry entry for a session that failed to start.
    fn release(&self, id: SessionId) {
        let mut registry = lock(&self.registry);
        if registry.is_current(id) {
            registry.active = None;
        }
    }
}

// ---------------------------------------------------------------------------
// EventSender
// ---------------------------------------------------------------------------

/// The runtime's end of a session's event queue. `Send` and cheap to clone.
#[derive(Debug, Clone)]
pub struct EventSender {
    session: SessionId,
    tx: mpsc::UnboundedSender<String>,
}

impl EventSender {
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Queue one raw envelope. Fails with `SessionClosed` once the session
    /// has been dismissed or its handle dropped.
    pub fn send(&self, raw: impl Into<String>) -> Result<()> {
        self.tx
            .send(raw.into())
            .map_err(|_| ConnectError::SessionClosed)
    }
}

// ---------------------------------------------------------------------------
// SessionHandle
// ---------------------------------------------------------------------------

/// One presented Connect session, owned by the UI thread.
pub struct SessionHandle {
    id: SessionId,
    started_at: DateTime<Utc>,
    /// Released on dismissal; the delegate is never called afterwards.
    delegate: Option<Arc<dyn ConnectDelegate>>,
    surface: Arc<dyn PresentationSurface>,
    registry: SharedRegistry,
    dispatcher: EventDispatcher,
    strictness: DecodeStrictness,
    sender: EventSender,
    events: mpsc::UnboundedReceiver<String>,
    superseded: Arc<Notify>,
    dismissed: bool,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// A sender for the runtime's execution context.
    pub fn event_sender(&self) -> EventSender {
        self.sender.clone()
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Whether this handle still owns the surface: not dismissed and not
    /// replaced by a newer session.
    pub fn is_active(&self) -> bool {
        !self.dismissed && lock(&self.registry).is_current(self.id)
    }

    /// The config the runtime currently sees, if this session is active.
    pub fn config(&self) -> Option<ConnectConfig> {
        let registry = lock(&self.registry);
        registry
            .active
            .as_ref()
            .filter(|active| active.id == self.id)
            .map(|active| active.config.clone())
    }

    /// Replace the config that later data-sync pulls return.
    pub fn update_config(&self, config: ConnectConfig) -> Result<()> {
        self.ensure_live()?;
        let mut registry = lock(&self.registry);
        match registry.active.as_mut() {
            Some(active) if active.id == self.id => {
                active.config = config;
                debug!(session = %self.id, "config updated");
                Ok(())
            }
            _ => Err(ConnectError::SessionSuperseded),
        }
    }

    pub fn request_data_sync(&self) -> Option<String> {
        let registry = lock(&self.registry);
        let config = registry
            .active
            .as_ref()
            .filter(|active| active.id == self.id)
            .map(|active| &active.config);
        serialize_config(config)
    }

    /// Decode and route one envelope, then dismiss.
    ///
    /// Malformed envelopes and unknown tags are logged and returned as errors
    /// without a callback or a dismissal.
    #[instrument(skip(self, raw), fields(session = %self.id))]
    pub fn handle_event(&mut self, raw: &str) -> Result<DispatchOutcome> {
        self.ensure_live()?;
        debug!(envelope = raw, "event received");

        let event = decode_envelope(raw, self.strictness).inspect_err(|e| {
            warn!(error = %e, "dropping envelope");
        })?;

        let delegate = self.delegate.clone().ok_or(ConnectError::SessionClosed)?;
        let outcome = self.dispatcher.dispatch(&event, delegate.as_ref());
        self.dismiss()?;
        Ok(outcome)
    }

    /// Process everything queued so far. Returns the number of envelopes that
    /// were routed; the count is at most one since routing dismisses.
    pub fn drain(&mut self) -> usize {
        let mut routed = 0;
        while !self.dismissed {
            let Ok(raw) = self.events.try_recv() else {
                break;
            };
            match self.handle_event(&raw) {
                Ok(_) => routed += 1,
                Err(ConnectError::SessionSuperseded) => break,
                Err(e) if e.is_envelope_error() => {}
                Err(e) => warn!(error = %e, "event handling failed"),
            }
        }
        routed
    }

    /// Await envelopes until the session is dismissed or replaced.
    ///
    /// Returns `None` straight away once a newer session takes over, even if
    /// no further envelope arrives.
    pub async fn run_until_dismissed(&mut self) -> Option<DispatchOutcome> {
        while !self.dismissed {
            if !lock(&self.registry).is_current(self.id) {
                debug!(session = %self.id, "session replaced; stopping");
                return None;
            }

            let next = tokio::select! {
                biased;
                raw = self.events.recv() => raw,
                _ = self.superseded.notified() => None,
            };
            let Some(raw) = next else {
                return None;
            };

            match self.handle_event(&raw) {
                Ok(outcome) => return Some(outcome),
                Err(ConnectError::SessionSuperseded) => return None,
                Err(e) if e.is_envelope_error() => {}
                Err(e) => {
                    warn!(error = %e, "event handling failed");
                    return None;
                }
            }
        }
        None
    }

    /// Dismiss the surface and release the delegate. Safe to call repeatedly.
    ///
    /// A handle that was replaced by a newer session leaves the surface alone.
    pub fn dismiss(&mut self) -> Result<()> {
        if self.dismissed {
            debug!(session = %self.id, "already dismissed");
            return Ok(());
        }
        self.dismissed = true;
        self.delegate = None;
        self.events.close();

        let owned_surface = {
            let mut registry = lock(&self.registry);
            let current = registry.is_current(self.id);
            if current {
                registry.active = None;
            }
            current
        };

        if owned_surface {
            self.surface.dismiss()?;
            info!(session = %self.id, "Connect session dismissed");
        } else {
            debug!(session = %self.id, "superseded session closed; surface left alone");
        }
        Ok(())
    }

    fn ensure_live(&self) -> Result<()> {
        if self.dismissed {
            return Err(ConnectError::SessionClosed);
        }
        if !lock(&self.registry).is_current(self.id) {
            warn!(session = %self.id, "session has been replaced");
            return Err(ConnectError::SessionSuperseded);
        }
        Ok(())
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if let Err(e) = self.dismiss() {
            warn!(session = %self.id, error = %e, "dismiss on drop failed");
        }
    }
}
