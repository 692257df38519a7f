//! Peer negotiation forwarding.
//!
//! The relay never inspects negotiation payloads and keeps no state for
//! them; it only rewrites the addressing so the receiver learns who sent
//! the message.

use galaxy_common::protocol::{ServerEvent, SignalDelivery, SignalRequest};
use galaxy_common::ConnId;

use crate::relay::{Outbound, Recipients};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

/// Re-address a negotiation message from `sender` to its target.
pub fn forward(sender: &ConnId, kind: SignalKind, request: SignalRequest) -> Outbound {
    let delivery = SignalDelivery {
        sender_id: sender.clone(),
        payload: request.payload,
    };
    let event = match kind {
        SignalKind::Offer => ServerEvent::Offer(delivery),
        SignalKind::Answer => ServerEvent::Answer(delivery),
        SignalKind::IceCandidate => ServerEvent::IceCandidate(delivery),
    };
    Outbound::new(Recipients::Direct(request.target_id), event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_is_forwarded_verbatim() {
        let payload = json!({"candidate": "candidate:0 1 UDP 2122252543", "sdpMLineIndex": 0});
        let out = forward(
            &ConnId::from("a"),
            SignalKind::IceCandidate,
            SignalRequest {
                target_id: ConnId::from("b"),
                payload: payload.clone(),
            },
        );
        assert_eq!(out.recipients, Recipients::Direct(ConnId::from("b")));
        assert_eq!(
            out.event,
            ServerEvent::IceCandidate(SignalDelivery {
                sender_id: ConnId::from("a"),
                payload,
            })
        );
    }

    #[test]
    fn answer_keeps_its_kind() {
        let out = forward(
            &ConnId::from("b"),
            SignalKind::Answer,
            SignalRequest {
                target_id: ConnId::from("a"),
                payload: json!({"type": "answer"}),
            },
        );
        assert_eq!(out.event.name(), "answer");
    }
}
