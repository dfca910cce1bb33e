//! Socket event types
//!
//! The backend pushes JSON text frames tagged by `for_type`; the client sends
//! one frame shape (the full chat history) to request the next assistant turn.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::ChatMessage;

/// Port the scaffolded app serves on inside the sandbox. The tunnel for this
/// port is the workspace preview URL.
pub const DEFAULT_APP_PORT: u16 = 3000;

/// Sandbox lifecycle status as reported by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SandboxStatus {
    /// Not provisioned yet
    Offline,
    /// Image/dependencies building, not reachable
    Building,
    /// Up and serving; tunnels are live
    Ready,
    /// Up, with an agent turn in flight
    Working,
}

impl SandboxStatus {
    /// True once the sandbox is reachable (tunnels are live).
    pub fn is_up(&self) -> bool {
        matches!(self, SandboxStatus::Ready | SandboxStatus::Working)
    }
}

/// Events pushed from the backend over the chat socket.
///
/// Tagged union over the `for_type` field. Tags this client does not know
/// deserialize into [`InboundEvent::Unknown`] so that new backend event types
/// degrade to an explicit no-op instead of a decode error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "for_type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Sandbox status refresh, with tunnel URLs keyed by exposed port.
    ///
    /// Status frames may also carry the sandbox file listing; when present it
    /// replaces the file tree exactly like [`InboundEvent::SandboxFileTree`].
    SandboxStatus {
        status: SandboxStatus,
        #[serde(default, deserialize_with = "tunnels_by_port")]
        tunnels: BTreeMap<u16, String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_paths: Option<Vec<String>>,
    },

    /// One streamed fragment of the in-flight assistant reply.
    ///
    /// `complete = true` marks the end of the turn; only the final chunk may
    /// carry suggested follow-up prompts.
    ChatChunk {
        content: String,
        complete: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        suggested_follow_ups: Option<Vec<String>>,
    },

    /// Wholesale replacement of the sandbox file listing.
    SandboxFileTree { paths: Vec<String> },

    /// Any `for_type` this client does not recognize. Ignored by design.
    #[serde(other)]
    Unknown,
}

/// Tunnel maps arrive with decimal string keys ("3000"). The tagged-enum
/// deserializer buffers the payload, and the buffered form does not coerce
/// string keys to integers, so the parse is explicit.
fn tunnels_by_port<'de, D>(deserializer: D) -> Result<BTreeMap<u16, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(port, url)| {
            port.parse::<u16>()
                .map(|port| (port, url))
                .map_err(|_| serde::de::Error::custom(format!("invalid tunnel port: {}", port)))
        })
        .collect()
}

impl InboundEvent {
    /// Return the event type name for logging.
    pub fn type_name(&self) -> &'static str {
        match self {
            InboundEvent::SandboxStatus { .. } => "sandbox_status",
            InboundEvent::ChatChunk { .. } => "chat_chunk",
            InboundEvent::SandboxFileTree { .. } => "sandbox_file_tree",
            InboundEvent::Unknown => "unknown",
        }
    }
}

/// Outbound frame requesting the next assistant turn.
///
/// Carries the full ordered transcript; the backend replies with a stream of
/// [`InboundEvent::ChatChunk`] frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurnRequest {
    pub chat: Vec<ChatMessage>,
}

impl TurnRequest {
    pub fn new(chat: Vec<ChatMessage>) -> Self {
        Self { chat }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    // ==================== Inbound Decode Tests ====================

    #[test]
    fn test_decode_sandbox_status_ready() {
        let frame = r#"{"for_type":"sandbox_status","status":"READY","tunnels":{"3000":"https://x.test"}}"#;
        let event: InboundEvent = serde_json::from_str(frame).unwrap();

        if let InboundEvent::SandboxStatus {
            status,
            tunnels,
            file_paths,
        } = event
        {
            assert_eq!(status, SandboxStatus::Ready);
            assert_eq!(
                tunnels.get(&DEFAULT_APP_PORT).map(String::as_str),
                Some("https://x.test")
            );
            assert!(file_paths.is_none());
        } else {
            panic!("Wrong variant");
        }
    }

    #[test]
    fn test_decode_sandbox_status_building_no_tunnels() {
        let frame = r#"{"for_type":"sandbox_status","status":"BUILDING"}"#;
        let event: InboundEvent = serde_json::from_str(frame).unwrap();

        if let InboundEvent::SandboxStatus {
            status, tunnels, ..
        } = event
        {
            assert_eq!(status, SandboxStatus::Building);
            assert!(tunnels.is_empty());
        } else {
            panic!("Wrong variant");
        }
    }

    #[test]
    fn test_decode_sandbox_status_with_file_paths() {
        let frame = r#"{"for_type":"sandbox_status","status":"READY","tunnels":{},"file_paths":["app/page.tsx","package.json"]}"#;
        let event: InboundEvent = serde_json::from_str(frame).unwrap();

        if let InboundEvent::SandboxStatus { file_paths, .. } = event {
            assert_eq!(
                file_paths,
                Some(vec!["app/page.tsx".to_string(), "package.json".to_string()])
            );
        } else {
            panic!("Wrong variant");
        }
    }

    #[test]
    fn test_decode_all_status_values() {
        for (wire, expected) in [
            ("OFFLINE", SandboxStatus::Offline),
            ("BUILDING", SandboxStatus::Building),
            ("READY", SandboxStatus::Ready),
            ("WORKING", SandboxStatus::Working),
        ] {
            let frame = format!(r#"{{"for_type":"sandbox_status","status":"{}"}}"#, wire);
            let event: InboundEvent = serde_json::from_str(&frame).unwrap();
            if let InboundEvent::SandboxStatus { status, .. } = event {
                assert_eq!(status, expected);
            } else {
                panic!("Wrong variant for {}", wire);
            }
        }
    }

    #[test]
    fn test_status_is_up() {
        assert!(SandboxStatus::Ready.is_up());
        assert!(SandboxStatus::Working.is_up());
        assert!(!SandboxStatus::Building.is_up());
        assert!(!SandboxStatus::Offline.is_up());
    }

    #[test]
    fn test_decode_chat_chunk_streaming() {
        let frame = r#"{"for_type":"chat_chunk","content":"Hello","complete":false}"#;
        let event: InboundEvent = serde_json::from_str(frame).unwrap();

        if let InboundEvent::ChatChunk {
            content,
            complete,
            suggested_follow_ups,
        } = event
        {
            assert_eq!(content, "Hello");
            assert!(!complete);
            assert!(suggested_follow_ups.is_none());
        } else {
            panic!("Wrong variant");
        }
    }

    #[test]
    fn test_decode_chat_chunk_final_with_follow_ups() {
        let frame = r#"{"for_type":"chat_chunk","content":"","complete":true,"suggested_follow_ups":["Add a navbar","Make it dark"]}"#;
        let event: InboundEvent = serde_json::from_str(frame).unwrap();

        if let InboundEvent::ChatChunk {
            complete,
            suggested_follow_ups,
            ..
        } = event
        {
            assert!(complete);
            assert_eq!(
                suggested_follow_ups,
                Some(vec!["Add a navbar".to_string(), "Make it dark".to_string()])
            );
        } else {
            panic!("Wrong variant");
        }
    }

    #[test]
    fn test_decode_sandbox_file_tree() {
        let frame = r#"{"for_type":"sandbox_file_tree","paths":["src/app.tsx","tailwind.config.ts"]}"#;
        let event: InboundEvent = serde_json::from_str(frame).unwrap();

        if let InboundEvent::SandboxFileTree { paths } = event {
            assert_eq!(paths.len(), 2);
            assert_eq!(paths[0], "src/app.tsx");
        } else {
            panic!("Wrong variant");
        }
    }

    #[test]
    fn test_decode_unknown_tag() {
        let frame = r#"{"for_type":"sandbox_metrics","cpu":0.5}"#;
        let event: InboundEvent = serde_json::from_str(frame).unwrap();
        assert_eq!(event, InboundEvent::Unknown);
    }

    #[test]
    fn test_decode_untagged_frame_is_error() {
        let frame = r#"{"status":"READY"}"#;
        assert!(serde_json::from_str::<InboundEvent>(frame).is_err());
    }

    #[test]
    fn test_tunnel_ports_parse_from_string_keys() {
        let frame = r#"{"for_type":"sandbox_status","status":"READY","tunnels":{"3000":"https://a.test","8080":"https://b.test"}}"#;
        let event: InboundEvent = serde_json::from_str(frame).unwrap();

        if let InboundEvent::SandboxStatus { tunnels, .. } = event {
            assert_eq!(tunnels.len(), 2);
            assert_eq!(tunnels.get(&8080).map(String::as_str), Some("https://b.test"));
        } else {
            panic!("Wrong variant");
        }
    }

    #[test]
    fn test_non_numeric_tunnel_key_is_error() {
        let frame = r#"{"for_type":"sandbox_status","status":"READY","tunnels":{"web":"https://a.test"}}"#;
        assert!(serde_json::from_str::<InboundEvent>(frame).is_err());
    }

    #[test]
    fn test_type_name() {
        let frame = r#"{"for_type":"chat_chunk","content":"x","complete":false}"#;
        let event: InboundEvent = serde_json::from_str(frame).unwrap();
        assert_eq!(event.type_name(), "chat_chunk");
        assert_eq!(InboundEvent::Unknown.type_name(), "unknown");
    }

    // ==================== Outbound Encode Tests ====================

    #[test]
    fn test_turn_request_wire_shape() {
        let request = TurnRequest::new(vec![
            ChatMessage::user("build me a landing page"),
            ChatMessage::assistant("Done."),
        ]);

        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"chat":[{"role":"user","content":"build me a landing page"},{"role":"assistant","content":"Done."}]}"#
        );
    }

    #[test]
    fn test_turn_request_includes_images() {
        let mut message = ChatMessage::user("match this mock");
        message.images = Some(vec!["https://img.test/mock.png".to_string()]);
        let request = TurnRequest::new(vec![message]);

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""images":["https://img.test/mock.png"]"#));
    }

    #[test]
    fn test_turn_request_roundtrip() {
        let request = TurnRequest::new(vec![ChatMessage::user("hi")]);
        let json = serde_json::to_string(&request).unwrap();
        let decoded: TurnRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, request);
        assert_eq!(decoded.chat[0].role, Role::User);
    }
}
