use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::extractors::player_id::PlayerId;
use crate::state::app_state::AppState;
use crate::ws::hub::{HubEvent, WsRegistry};
use crate::ws::protocol::{ClientMsg, ErrorCode, ServerMsg, Topic, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// Upgrade an HTTP request into a realtime session.
pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    player_id: PlayerId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let Some(registry) = app_state.websocket_registry() else {
        // No broker configured: realtime delivery is not available.
        return Ok(HttpResponse::ServiceUnavailable().finish());
    };

    let conn_id = Uuid::new_v4();
    let session = WsSession::new(conn_id, player_id.0, registry);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    player_id: i64,
    registry: Arc<WsRegistry>,

    /// Registered topic subscriptions: room_id -> registry token.
    subscriptions: HashMap<i64, Uuid>,

    last_heartbeat: Instant,
    hello_done: bool,
}

impl WsSession {
    fn new(conn_id: Uuid, player_id: i64, registry: Arc<WsRegistry>) -> Self {
        Self {
            conn_id,
            player_id,
            registry,
            subscriptions: HashMap::new(),
            last_heartbeat: Instant::now(),
            hello_done: false,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        let msg = ServerMsg::Error {
            code,
            message: message.into(),
        };
        Self::send_json(ctx, &msg);
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    player_id = actor.player_id,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn handle_client_msg(&mut self, msg: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        match msg {
            ClientMsg::Hello { protocol } => {
                if protocol != PROTOCOL_VERSION {
                    self.send_error_and_close(
                        ctx,
                        ErrorCode::BadProtocol,
                        format!("Unsupported protocol {protocol}, expected {PROTOCOL_VERSION}"),
                    );
                    return;
                }
                self.hello_done = true;
                Self::send_json(
                    ctx,
                    &ServerMsg::HelloAck {
                        protocol: PROTOCOL_VERSION,
                        player_id: self.player_id,
                    },
                );
            }

            ClientMsg::Subscribe { topic } if self.hello_done => {
                let Topic::Room { id } = topic;
                self.subscriptions.entry(id).or_insert_with(|| {
                    self.registry.register(id, ctx.address().recipient())
                });
                debug!(
                    conn_id = %self.conn_id,
                    room_id = id,
                    "[WS SESSION] subscribed"
                );
                Self::send_json(
                    ctx,
                    &ServerMsg::Ack {
                        message: "subscribed".to_string(),
                    },
                );
            }

            ClientMsg::Unsubscribe { topic } if self.hello_done => {
                let Topic::Room { id } = topic;
                if let Some(token) = self.subscriptions.remove(&id) {
                    self.registry.unregister(id, token);
                }
                Self::send_json(
                    ctx,
                    &ServerMsg::Ack {
                        message: "unsubscribed".to_string(),
                    },
                );
            }

            _ => {
                self.send_error_and_close(ctx, ErrorCode::BadRequest, "Hello required first");
            }
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            player_id = self.player_id,
            "[WS SESSION] connected"
        );
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        for (room_id, token) in self.subscriptions.drain() {
            self.registry.unregister(room_id, token);
        }
        info!(
            conn_id = %self.conn_id,
            player_id = self.player_id,
            "[WS SESSION] disconnected"
        );
    }
}

impl Handler<HubEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, event: HubEvent, ctx: &mut Self::Context) {
        let room_id = event.room_id();
        let msg = match event {
            HubEvent::RoomChanged { room } => ServerMsg::RoomChanged {
                topic: Topic::Room { id: room_id },
                room,
            },
            HubEvent::RoundAdded { round } => ServerMsg::RoundAdded {
                topic: Topic::Room { id: room_id },
                round,
            },
        };
        Self::send_json(ctx, &msg);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(client_msg) => self.handle_client_msg(client_msg, ctx),
                    Err(err) => {
                        self.send_error_and_close(
                            ctx,
                            ErrorCode::BadRequest,
                            format!("Malformed client message: {err}"),
                        );
                    }
                }
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(_) => {}
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.stop();
            }
        }
    }
}
