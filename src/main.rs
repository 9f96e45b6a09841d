//! Demo harness (§4.L — ambient, added): the library's analogue of the
//! teacher's bot-wiring `main.rs`. Loads a fixture file containing one
//! `ChannelAggregate` and a small stream of events, runs [`select`] over
//! each event, and logs the outcome — end-to-end usage without a live
//! LINE/FB/IG connection.
//!
//! This binary, and the fixture files under `fixtures/`, are adapter-side
//! plumbing (§6) — not part of the core library.

use std::env;
use std::fs;

use anyhow::{Context, Result};
use auto_reply_channel_adapters::{InstagramAdapter, LineAdapter, MessengerAdapter, PlatformEventAdapter};
use auto_reply_core::{select, ChannelAggregate, ChannelType, SelectionResult, WireChannelAggregate};
use tracing::info;

#[derive(serde::Deserialize)]
struct Fixture {
    aggregate: WireChannelAggregate,
    /// Raw, platform-shaped payloads (not the domain wire `WebhookEvent`
    /// shape) — exercises the adapter layer (§4.G/§4.L), not just `select`.
    events: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "fixtures/demo.json".to_string());

    info!(path = %path, "loading fixture");
    let raw = fs::read_to_string(&path).with_context(|| format!("reading fixture {path}"))?;
    let fixture: Fixture = serde_json::from_str(&raw).context("parsing fixture JSON")?;

    let aggregate: ChannelAggregate = fixture
        .aggregate
        .try_into()
        .context("converting fixture aggregate to domain types")?;

    let line = LineAdapter;
    let messenger = MessengerAdapter;
    let instagram = InstagramAdapter;

    for (i, raw_payload) in fixture.events.iter().enumerate() {
        let adapter: &dyn PlatformEventAdapter = match aggregate.channel_type {
            ChannelType::Line => &line,
            ChannelType::Facebook => &messenger,
            ChannelType::Instagram => &instagram,
        };

        let event = match adapter.to_webhook_event(raw_payload).await {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(index = i, %err, "skipping unparseable event");
                continue;
            }
        };

        match select(&aggregate, &event) {
            SelectionResult::Matched { rule_id, tier } => {
                info!(index = i, rule_id, ?tier, "matched a rule");
            }
            SelectionResult::NoMatch { reason } => {
                info!(index = i, reason, "no rule matched");
            }
        }
    }

    Ok(())
}
