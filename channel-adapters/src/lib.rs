//! Platform event adapter interface (§4.G — ambient, added) and three
//! minimal reference adapters (LINE, Facebook Messenger, Instagram).
//!
//! None of this decodes a real platform webhook payload end-to-end — that
//! remains explicitly out of scope (§1 "Out of scope"). What's here is
//! enough to demonstrate the contract a real adapter must satisfy: turn a
//! platform-shaped JSON payload into a [`WebhookEvent`] and hand it to
//! [`auto_reply_core::select`].

use async_trait::async_trait;
use auto_reply_core::{ChannelType, EventKind, WebhookEvent};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Everything that can go wrong turning a raw platform payload into a
/// [`WebhookEvent`]. Distinct from [`auto_reply_core::WireError`] — that one
/// covers the domain wire shape (§6); this one covers whatever shape each
/// platform's own webhook actually sends over the wire.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("failed to parse {platform} payload: {source}")]
    Malformed {
        platform: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{platform} payload is missing a timestamp")]
    MissingTimestamp { platform: &'static str },
}

/// Contract every webhook adapter MUST satisfy to feed the core (§4.G).
///
/// Implementors must:
/// - set `story_id` iff the inbound payload carries Instagram story-reply
///   context, and otherwise leave it absent (never an empty string);
/// - provide `timestamp` as an absolute instant, never a local wall-clock;
/// - set `channel_type` consistently with the transport.
///
/// Decoding a platform payload is inherently I/O-adjacent (HTTP signature
/// verification, payload hydration), so this method is `async`; the core's
/// own `select` is not (§5).
#[async_trait]
pub trait PlatformEventAdapter: Send + Sync {
    /// The channel this adapter produces events for.
    fn channel_type(&self) -> ChannelType;

    /// Converts one raw platform payload into a [`WebhookEvent`].
    async fn to_webhook_event(&self, raw_payload: &str) -> Result<WebhookEvent, AdapterError>;
}

// --- LINE --------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LinePayload {
    #[serde(default)]
    text: Option<String>,
    timestamp_ms: i64,
}

pub struct LineAdapter;

#[async_trait]
impl PlatformEventAdapter for LineAdapter {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Line
    }

    async fn to_webhook_event(&self, raw_payload: &str) -> Result<WebhookEvent, AdapterError> {
        let parsed: LinePayload = serde_json::from_str(raw_payload).map_err(|source| {
            AdapterError::Malformed {
                platform: "LINE",
                source,
            }
        })?;

        let timestamp = DateTime::<Utc>::from_timestamp_millis(parsed.timestamp_ms)
            .ok_or(AdapterError::MissingTimestamp { platform: "LINE" })?;

        Ok(WebhookEvent {
            event_kind: EventKind::Message,
            message_text: parsed.text,
            timestamp,
            channel_type: ChannelType::Line,
            story_id: None, // LINE has no story-reply concept.
        })
    }
}

// --- Facebook Messenger --------------------------------------------------

#[derive(Debug, Deserialize)]
struct MessengerPayload {
    #[serde(default)]
    message_text: Option<String>,
    timestamp_ms: i64,
}

pub struct MessengerAdapter;

#[async_trait]
impl PlatformEventAdapter for MessengerAdapter {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Facebook
    }

    async fn to_webhook_event(&self, raw_payload: &str) -> Result<WebhookEvent, AdapterError> {
        let parsed: MessengerPayload =
            serde_json::from_str(raw_payload).map_err(|source| AdapterError::Malformed {
                platform: "Facebook Messenger",
                source,
            })?;

        let timestamp = DateTime::<Utc>::from_timestamp_millis(parsed.timestamp_ms).ok_or(
            AdapterError::MissingTimestamp {
                platform: "Facebook Messenger",
            },
        )?;

        Ok(WebhookEvent {
            event_kind: EventKind::Message,
            message_text: parsed.message_text,
            timestamp,
            channel_type: ChannelType::Facebook,
            story_id: None,
        })
    }
}

// --- Instagram -----------------------------------------------------------

#[derive(Debug, Deserialize)]
struct InstagramPayload {
    #[serde(default)]
    text: Option<String>,
    timestamp_ms: i64,
    /// Present iff this message is a reply to an Instagram story.
    #[serde(default)]
    reply_to_story_id: Option<String>,
}

pub struct InstagramAdapter;

#[async_trait]
impl PlatformEventAdapter for InstagramAdapter {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Instagram
    }

    async fn to_webhook_event(&self, raw_payload: &str) -> Result<WebhookEvent, AdapterError> {
        let parsed: InstagramPayload =
            serde_json::from_str(raw_payload).map_err(|source| AdapterError::Malformed {
                platform: "Instagram",
                source,
            })?;

        let timestamp = DateTime::<Utc>::from_timestamp_millis(parsed.timestamp_ms).ok_or(
            AdapterError::MissingTimestamp {
                platform: "Instagram",
            },
        )?;

        // Never surface an empty-string story id (§4.G) — normalize it away.
        let story_id = parsed.reply_to_story_id.filter(|s| !s.is_empty());

        Ok(WebhookEvent {
            event_kind: EventKind::Message,
            message_text: parsed.text,
            timestamp,
            channel_type: ChannelType::Instagram,
            story_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn line_adapter_produces_a_message_event_with_no_story_id() {
        let adapter = LineAdapter;
        let payload = r#"{"text": "hello", "timestamp_ms": 1704067200000}"#;
        let event = adapter.to_webhook_event(payload).await.unwrap();
        assert_eq!(event.message_text.as_deref(), Some("hello"));
        assert_eq!(event.channel_type, ChannelType::Line);
        assert_eq!(event.story_id, None);
    }

    #[tokio::test]
    async fn instagram_adapter_sets_story_id_when_present() {
        let adapter = InstagramAdapter;
        let payload =
            r#"{"text": "nice!", "timestamp_ms": 1704067200000, "reply_to_story_id": "s1"}"#;
        let event = adapter.to_webhook_event(payload).await.unwrap();
        assert_eq!(event.story_id.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn instagram_adapter_normalizes_empty_story_id_to_none() {
        let adapter = InstagramAdapter;
        let payload =
            r#"{"text": "hi", "timestamp_ms": 1704067200000, "reply_to_story_id": ""}"#;
        let event = adapter.to_webhook_event(payload).await.unwrap();
        assert_eq!(event.story_id, None);
    }

    #[tokio::test]
    async fn messenger_adapter_surfaces_malformed_payload_as_an_error() {
        let adapter = MessengerAdapter;
        let result = adapter.to_webhook_event("not json").await;
        assert!(matches!(result, Err(AdapterError::Malformed { .. })));
    }
}
