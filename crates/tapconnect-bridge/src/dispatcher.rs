// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Event dispatcher — one decoded event to at most one delegate callback.
//
// Dismissal is not done here; the session dismisses after every decoded event,
// whatever the outcome.

use tracing::{debug, warn};

use tapconnect_core::config::{BridgeSettings, DecodeStrictness, ShapeMismatchPolicy};
use tapconnect_core::error::ConnectError;
use tapconnect_core::types::{ConnectEvent, EventData, EventKind};

use crate::traits::ConnectDelegate;

/// Result of routing one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The callback for this kind fired. In probing mode an `onError` tag with
    /// completion data reports `OnComplete`.
    Delivered(EventKind),
    /// A known tag arrived with a payload that fits no callback.
    ShapeMismatch(EventKind),
}

/// Maps decoded events to delegate callbacks.
#[derive(Debug, Clone, Copy)]
pub struct EventDispatcher {
    strictness: DecodeStrictness,
    shape_mismatch: ShapeMismatchPolicy,
}

impl EventDispatcher {
    pub fn new(strictness: DecodeStrictness, shape_mismatch: ShapeMismatchPolicy) -> Self {
        Self {
            strictness,
            shape_mismatch,
        }
    }

    pub fn from_settings(settings: &BridgeSettings) -> Self {
        Self::new(settings.decode_strictness, settings.shape_mismatch)
    }

    /// Invoke the matching callback. Never calls more than one delegate method,
    /// except that `ReportError` turns a mismatch into a single error callback.
    pub fn dispatch(&self, event: &ConnectEvent, delegate: &dyn ConnectDelegate) -> DispatchOutcome {
        let outcome = match (event.kind, &event.data) {
            (EventKind::OnNoAccountFound, _) => {
                delegate.did_not_find_account();
                DispatchOutcome::Delivered(EventKind::OnNoAccountFound)
            }
            (EventKind::OnClose, _) => {
                delegate.did_close();
                DispatchOutcome::Delivered(EventKind::OnClose)
            }
            (kind, EventData::Complete(payload)) if self.accepts_completion(kind) => {
                delegate.did_complete(&payload.auth_id, &payload.bi);
                DispatchOutcome::Delivered(EventKind::OnComplete)
            }
            (EventKind::OnError, EventData::Error(payload)) => {
                delegate.did_error(&payload.message);
                DispatchOutcome::Delivered(EventKind::OnError)
            }
            (kind, _) => {
                self.on_shape_mismatch(kind, delegate);
                DispatchOutcome::ShapeMismatch(kind)
            }
        };

        debug!(kind = %event.kind, ?outcome, "event dispatched");
        outcome
    }

    /// Whether a `tag`-tagged event carrying completion data fires the
    /// completion callback. Probing also accepts it under `onError`; error
    /// data only ever fires under `onError`.
    fn accepts_completion(&self, tag: EventKind) -> bool {
        match self.strictness {
            DecodeStrictness::Probing => {
                matches!(tag, EventKind::OnComplete | EventKind::OnError)
            }
            DecodeStrictness::Strict => tag == EventKind::OnComplete,
        }
    }

    fn on_shape_mismatch(&self, kind: EventKind, delegate: &dyn ConnectDelegate) {
        let err = ConnectError::ShapeMismatch(kind.as_tag().to_owned());
        match self.shape_mismatch {
            ShapeMismatchPolicy::Silent => {
                warn!(%kind, "payload does not fit event; no callback");
            }
            ShapeMismatchPolicy::ReportError => {
                warn!(%kind, "payload does not fit event; reporting error");
                delegate.did_error(&err.to_string());
            }
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::from_settings(&BridgeSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_envelope;
    use crate::test_support::{Call, RecordingDelegate};

    fn route(dispatcher: EventDispatcher, raw: &str) -> (DispatchOutcome, Vec<Call>) {
        let event = decode_envelope(raw, dispatcher.strictness).unwrap();
        let delegate = RecordingDelegate::default();
        let outcome = dispatcher.dispatch(&event, &delegate);
        (outcome, delegate.calls())
    }

    #[test]
    fn complete_calls_did_complete_once() {
        let (outcome, calls) = route(
            EventDispatcher::default(),
            r#"{"type":"onComplete","data":{"authId":"A","bi":"B"}}"#,
        );
        assert_eq!(outcome, DispatchOutcome::Delivered(EventKind::OnComplete));
        assert_eq!(calls, vec![Call::Complete("A".into(), "B".into())]);
    }

    #[test]
    fn error_calls_did_error_once() {
        let (_, calls) = route(
            EventDispatcher::default(),
            r#"{"type":"onError","data":{"message":"card declined"}}"#,
        );
        assert_eq!(calls, vec![Call::Error("card declined".into())]);
    }

    #[test]
    fn no_account_ignores_payload() {
        let (_, calls) = route(
            EventDispatcher::default(),
            r#"{"type":"onNoAccountFound","data":{"authId":"x","bi":"y"}}"#,
        );
        assert_eq!(calls, vec![Call::NoAccountFound]);
    }

    #[test]
    fn close_calls_did_close() {
        let (_, calls) = route(EventDispatcher::default(), r#"{"type":"onClose"}"#);
        assert_eq!(calls, vec![Call::Close]);
    }

    #[test]
    fn probing_routes_complete_data_under_error_tag_to_completion() {
        let (outcome, calls) = route(
            EventDispatcher::default(),
            r#"{"type":"onError","data":{"authId":"x","bi":"y"}}"#,
        );
        assert_eq!(outcome, DispatchOutcome::Delivered(EventKind::OnComplete));
        assert_eq!(calls, vec![Call::Complete("x".into(), "y".into())]);
    }

    #[test]
    fn error_data_under_complete_tag_fires_nothing() {
        let (outcome, calls) = route(
            EventDispatcher::default(),
            r#"{"type":"onComplete","data":{"message":"m"}}"#,
        );
        assert_eq!(outcome, DispatchOutcome::ShapeMismatch(EventKind::OnComplete));
        assert!(calls.is_empty());
    }

    #[test]
    fn missing_payload_is_silent_mismatch_by_default() {
        let (outcome, calls) = route(EventDispatcher::default(), r#"{"type":"onComplete"}"#);
        assert_eq!(outcome, DispatchOutcome::ShapeMismatch(EventKind::OnComplete));
        assert!(calls.is_empty());
    }

    #[test]
    fn report_error_policy_surfaces_mismatch() {
        let dispatcher =
            EventDispatcher::new(DecodeStrictness::Probing, ShapeMismatchPolicy::ReportError);
        let (outcome, calls) = route(dispatcher, r#"{"type":"onError","data":{"code":4}}"#);
        assert_eq!(outcome, DispatchOutcome::ShapeMismatch(EventKind::OnError));
        assert_eq!(calls, vec![Call::Error("unexpected payload for onError".into())]);
    }

    #[test]
    fn strict_mode_keeps_tag_and_payload_together() {
        let dispatcher = EventDispatcher::new(DecodeStrictness::Strict, ShapeMismatchPolicy::Silent);
        let (outcome, calls) =
            route(dispatcher, r#"{"type":"onError","data":{"authId":"x","bi":"y"}}"#);
        assert_eq!(outcome, DispatchOutcome::ShapeMismatch(EventKind::OnError));
        assert!(calls.is_empty());

        // Decoded elsewhere with probing, then handed to a strict dispatcher.
        let event = decode_envelope(
            r#"{"type":"onComplete","data":{"message":"m"}}"#,
            DecodeStrictness::Probing,
        )
        .unwrap();
        let delegate = RecordingDelegate::default();
        assert_eq!(
            dispatcher.dispatch(&event, &delegate),
            DispatchOutcome::ShapeMismatch(EventKind::OnComplete)
        );
        assert!(delegate.calls().is_empty());
    }
}
