// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Envelope decoder — inbound JSON text to a typed `ConnectEvent`.
//
// An envelope is `{"type": <tag>, "data": <payload>?}`. The tag must be one of
// the four known literals. How `data` is read depends on `DecodeStrictness`:
//
//   Probing  complete shape, then error shape, then empty; tag ignored
//   Strict   only the shape owned by the tag; anything else is empty
//
// Extra members in `data` are ignored in both modes.

use serde::de::DeserializeOwned;
use serde_json::Value;

use tapconnect_core::config::DecodeStrictness;
use tapconnect_core::error::{ConnectError, Result};
use tapconnect_core::types::{CompletePayload, ConnectEvent, ErrorPayload, EventData, EventKind};

/// Decode one envelope. Atomic: either a whole event or an error.
pub fn decode_envelope(raw: &str, strictness: DecodeStrictness) -> Result<ConnectEvent> {
    let envelope: Value =
        serde_json::from_str(raw).map_err(|e| ConnectError::MalformedEnvelope(e.to_string()))?;

    let object = envelope
        .as_object()
        .ok_or_else(|| ConnectError::MalformedEnvelope("envelope is not an object".into()))?;

    let tag = match object.get("type") {
        Some(Value::String(tag)) => tag.as_str(),
        Some(_) => {
            return Err(ConnectError::MalformedEnvelope("`type` is not a string".into()));
        }
        None => return Err(ConnectError::MalformedEnvelope("missing `type`".into())),
    };

    let kind =
        EventKind::from_tag(tag).ok_or_else(|| ConnectError::UnknownEventType(tag.to_owned()))?;

    let data = match object.get("data") {
        None | Some(Value::Null) => EventData::Empty,
        Some(payload) => match strictness {
            DecodeStrictness::Probing => probe_payload(payload),
            DecodeStrictness::Strict => strict_payload(kind, payload),
        },
    };

    Ok(ConnectEvent::new(kind, data))
}

/// Complete shape first, error shape second. The order matters: a payload
/// carrying all three fields reads as a completion.
fn probe_payload(payload: &Value) -> EventData {
    if let Some(complete) = try_shape::<CompletePayload>(payload) {
        return EventData::Complete(complete);
    }
    if let Some(error) = try_shape::<ErrorPayload>(payload) {
        return EventData::Error(error);
    }
    EventData::Empty
}

fn strict_payload(kind: EventKind, payload: &Value) -> EventData {
    match kind {
        EventKind::OnComplete => try_shape(payload)
            .map(EventData::Complete)
            .unwrap_or_default(),
        EventKind::OnError => try_shape(payload).map(EventData::Error).unwrap_or_default(),
        EventKind::OnNoAccountFound | EventKind::OnClose => EventData::Empty,
    }
}

fn try_shape<T: DeserializeOwned>(payload: &Value) -> Option<T> {
    T::deserialize(payload).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(raw: &str) -> Result<ConnectEvent> {
        decode_envelope(raw, DecodeStrictness::Probing)
    }

    fn complete(auth_id: &str, bi: &str) -> EventData {
        EventData::Complete(CompletePayload {
            auth_id: auth_id.into(),
            bi: bi.into(),
        })
    }

    #[test]
    fn decodes_complete_envelope() {
        let event = probe(r#"{"type":"onComplete","data":{"authId":"A","bi":"B"}}"#).unwrap();
        assert_eq!(event.kind, EventKind::OnComplete);
        assert_eq!(event.data, complete("A", "B"));
    }

    #[test]
    fn decodes_error_envelope() {
        let event = probe(r#"{"type":"onError","data":{"message":"declined"}}"#).unwrap();
        assert_eq!(event.kind, EventKind::OnError);
        assert_eq!(
            event.data,
            EventData::Error(ErrorPayload {
                message: "declined".into()
            })
        );
    }

    #[test]
    fn payloadless_events_decode_empty() {
        let event = probe(r#"{"type":"onClose"}"#).unwrap();
        assert_eq!(event, ConnectEvent::new(EventKind::OnClose, EventData::Empty));

        let event = probe(r#"{"type":"onNoAccountFound","data":null}"#).unwrap();
        assert_eq!(event.data, EventData::Empty);
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = probe(r#"{"type":"onClose""#).unwrap_err();
        assert!(matches!(err, ConnectError::MalformedEnvelope(_)));
    }

    #[test]
    fn missing_or_non_string_type_is_malformed() {
        for raw in [r#"{"data":{"message":"x"}}"#, r#"{"type":7}"#, r#"["onClose"]"#, "null"] {
            let err = probe(raw).unwrap_err();
            assert!(matches!(err, ConnectError::MalformedEnvelope(_)), "{raw}");
        }
    }

    #[test]
    fn unknown_tag_is_reported() {
        match probe(r#"{"type":"onFoo"}"#).unwrap_err() {
            ConnectError::UnknownEventType(tag) => assert_eq!(tag, "onFoo"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn probing_prefers_complete_shape_over_tag() {
        let event = probe(r#"{"type":"onError","data":{"authId":"x","bi":"y"}}"#).unwrap();
        assert_eq!(event.kind, EventKind::OnError);
        assert_eq!(event.data, complete("x", "y"));
    }

    #[test]
    fn probing_tries_complete_before_error() {
        let event =
            probe(r#"{"type":"onError","data":{"authId":"x","bi":"y","message":"m"}}"#).unwrap();
        assert_eq!(event.data, complete("x", "y"));
    }

    #[test]
    fn partial_complete_shape_falls_through() {
        let event = probe(r#"{"type":"onComplete","data":{"authId":"x"}}"#).unwrap();
        assert_eq!(event.data, EventData::Empty);

        let event = probe(r#"{"type":"onComplete","data":{"authId":"x","bi":5}}"#).unwrap();
        assert_eq!(event.data, EventData::Empty);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let event =
            probe(r#"{"type":"onComplete","data":{"authId":"a","bi":"b","ts":1}}"#).unwrap();
        assert_eq!(event.data, complete("a", "b"));
    }

    #[test]
    fn strict_mode_reads_shape_by_tag() {
        let raw = r#"{"type":"onError","data":{"authId":"x","bi":"y"}}"#;
        let event = decode_envelope(raw, DecodeStrictness::Strict).unwrap();
        assert_eq!(event.data, EventData::Empty);

        let raw = r#"{"type":"onClose","data":{"message":"ignored"}}"#;
        let event = decode_envelope(raw, DecodeStrictness::Strict).unwrap();
        assert_eq!(event.data, EventData::Empty);

        let raw = r#"{"type":"onComplete","data":{"authId":"x","bi":"y"}}"#;
        let event = decode_envelope(raw, DecodeStrictness::Strict).unwrap();
        assert_eq!(event.data, complete("x", "y"));
    }
}
