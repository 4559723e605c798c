//! Redis-backed realtime broker.
//!
//! Mutations publish `EventEnvelope`s to the `room:{id}` channel; a
//! background subscriber feeds them into the in-process [`WsRegistry`],
//! which fans out to subscribed sessions. Redis pub/sub is at-least-once
//! from the subscriber's point of view (reconnects can replay), so
//! envelopes carry enough identity for idempotent application.

use std::sync::Arc;
use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tokio_stream::StreamExt;
use tracing::{error, info, warn};

use crate::domain::snapshot::{RoomSnapshot, RoundView};
use crate::error::AppError;
use crate::ws::hub::{HubEvent, WsRegistry};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    RoomChanged { room: RoomSnapshot },
    RoundAdded { round: RoundView },
}

// Publisher retry configuration (request path)
const PUBLISHER_MAX_ATTEMPTS: u32 = 3;
const PUBLISHER_INITIAL_RETRY_DELAY_MS: u64 = 50;
const PUBLISHER_MAX_RETRY_DELAY_MS: u64 = 200;

// Subscriber retry configuration (background task)
const SUBSCRIBER_INITIAL_RETRY_DELAY_SECS: u64 = 1;
const SUBSCRIBER_MAX_RETRY_DELAY_SECS: u64 = 60;

pub struct RealtimeBroker {
    registry: Arc<WsRegistry>,
    publisher: Mutex<ConnectionManager>,
}

impl RealtimeBroker {
    pub async fn connect(redis_url: &str) -> Result<Arc<Self>, AppError> {
        let client = Client::open(redis_url)
            .map_err(|err| AppError::config(format!("Invalid REDIS_URL: {err}")))?;

        let manager = ConnectionManager::new(client.clone()).await.map_err(|err| {
            AppError::config(format!(
                "Unable to initialize Redis connection manager: {err}"
            ))
        })?;

        let registry = Arc::new(WsRegistry::new());
        let broker = Arc::new(Self {
            registry: registry.clone(),
            publisher: Mutex::new(manager),
        });

        spawn_subscriber(redis_url, registry);

        Ok(broker)
    }

    pub fn registry(&self) -> Arc<WsRegistry> {
        self.registry.clone()
    }

    /// Publish the post-state snapshot of a room.
    pub async fn publish_room_changed(&self, room: &RoomSnapshot) -> Result<(), AppError> {
        let envelope = EventEnvelope::RoomChanged { room: room.clone() };
        self.publish_to_channel(format!("room:{}", room.id), envelope)
            .await
    }

    /// Publish a newly scored guess.
    pub async fn publish_round_added(&self, round: &RoundView) -> Result<(), AppError> {
        let envelope = EventEnvelope::RoundAdded {
            round: round.clone(),
        };
        self.publish_to_channel(format!("room:{}", round.room_id), envelope)
            .await
    }

    async fn publish_to_channel(
        &self,
        channel: String,
        envelope: EventEnvelope,
    ) -> Result<(), AppError> {
        let encoded = serde_json::to_string(&envelope)
            .map_err(|err| AppError::internal(format!("Failed to serialize envelope: {err}")))?;

        let mut attempt = 0u32;
        loop {
            attempt += 1;

            let publish_res = {
                let mut publisher = self.publisher.lock().await;
                publisher
                    .publish::<_, _, ()>(channel.clone(), encoded.clone())
                    .await
            };

            match publish_res {
                Ok(_) => return Ok(()),
                Err(err) => {
                    if attempt >= PUBLISHER_MAX_ATTEMPTS {
                        return Err(AppError::internal(format!(
                            "Failed to publish realtime event to Redis: {err}"
                        )));
                    }

                    let delay_ms = PUBLISHER_INITIAL_RETRY_DELAY_MS
                        .saturating_mul(2_u64.pow(attempt - 1))
                        .min(PUBLISHER_MAX_RETRY_DELAY_MS);
                    warn!(
                        error = %err,
                        attempt,
                        retry_delay_ms = delay_ms,
                        "Redis publish failed, retrying"
                    );
                    sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}

fn spawn_subscriber(redis_url: &str, registry: Arc<WsRegistry>) {
    let redis_url = redis_url.to_string();
    tokio::spawn(async move {
        run_subscription_loop_with_retry(&redis_url, registry).await;
    });
}

async fn run_subscription_loop_with_retry(redis_url: &str, registry: Arc<WsRegistry>) {
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        match run_subscription_loop(redis_url, registry.clone()).await {
            Ok(()) => {
                info!("Redis subscription loop completed normally");
                break;
            }
            Err(err) => {
                let delay_secs = SUBSCRIBER_INITIAL_RETRY_DELAY_SECS
                    .saturating_mul(2_u64.pow(attempt.min(6)))
                    .min(SUBSCRIBER_MAX_RETRY_DELAY_SECS);
                warn!(
                    error = %err,
                    attempt,
                    retry_delay_secs = delay_secs,
                    "Redis subscription failed, retrying"
                );
                sleep(Duration::from_secs(delay_secs)).await;
            }
        }
    }
}

async fn run_subscription_loop(
    redis_url: &str,
    registry: Arc<WsRegistry>,
) -> Result<(), AppError> {
    let client = Client::open(redis_url)
        .map_err(|err| AppError::config(format!("Failed to create Redis client: {err}")))?;

    let mut pubsub = client.get_async_pubsub().await.map_err(|err| {
        AppError::internal(format!("Failed to connect to Redis for subscription: {err}"))
    })?;

    info!("Subscribing to Redis pattern 'room:*'");
    pubsub.psubscribe("room:*").await.map_err(|err| {
        AppError::internal(format!(
            "Failed to subscribe to Redis channel pattern room:*: {err}"
        ))
    })?;

    info!("Redis subscription established, processing messages");

    let mut stream = pubsub.on_message();

    while let Some(msg) = stream.next().await {
        let Ok(channel) = msg.get_channel::<String>() else {
            continue;
        };
        let Ok(payload) = msg.get_payload::<String>() else {
            continue;
        };

        let Some(room_id) = parse_room_channel(&channel) else {
            warn!(channel = %channel, "Realtime payload on unexpected channel");
            continue;
        };

        match serde_json::from_str::<EventEnvelope>(&payload) {
            Ok(EventEnvelope::RoomChanged { room }) => {
                registry.broadcast(room_id, HubEvent::RoomChanged { room });
            }
            Ok(EventEnvelope::RoundAdded { round }) => {
                registry.broadcast(room_id, HubEvent::RoundAdded { round });
            }
            Err(err) => {
                error!(
                    error = %err,
                    channel = %channel,
                    "Failed to decode Redis realtime payload"
                );
            }
        }
    }

    warn!("Redis subscription stream ended, connection lost");
    Err(AppError::internal(
        "Redis subscription stream ended unexpectedly".to_string(),
    ))
}

fn parse_room_channel(channel: &str) -> Option<i64> {
    let mut parts = channel.split(':');
    let prefix = parts.next()?;
    if prefix != "room" {
        return None;
    }
    let id = parts.next()?;
    id.parse().ok()
}
