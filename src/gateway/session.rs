//! 单个 WebSocket 连接的处理循环
//!
//! 心跳、客户端帧和 outbox 推送在同一个 select 循环里处理。

use std::sync::Arc;
use std::time::Instant;

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info, warn};

use super::GatewaySettings;
use super::messages::{ClientFrame, ServerFrame};
use super::registry::{ConnectionId, ConnectionRegistry, RelayOutcome};

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    Network(Closed),
}

pub(super) struct GatewaySession {
    user_id: i32,
    conn_id: ConnectionId,
    registry: Arc<ConnectionRegistry>,
    settings: GatewaySettings,
}

impl GatewaySession {
    pub(super) fn new(
        user_id: i32,
        registry: Arc<ConnectionRegistry>,
        settings: GatewaySettings,
    ) -> Self {
        let conn_id = registry.next_connection_id();
        Self {
            user_id,
            conn_id,
            registry,
            settings,
        }
    }

    pub(super) async fn run(self, mut session: Session, mut stream: MessageStream, peer: String) {
        info!("Welcome @{} on @{}", self.conn_id, peer);

        let mut outbox = self.registry.register(self.user_id, self.conn_id);
        if outbox.is_none() {
            // 重复连接只能发，不接收推送
            warn!(
                "User {} already has a live connection, @{} will not receive messages",
                self.user_id, self.conn_id
            );
        }

        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(self.settings.heartbeat);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message).await
                }
                frame = recv_outbox(&mut outbox) => match frame {
                    Some(frame) => self.send_frame(&mut session, &frame).await.map_err(SessionError::Network),
                    None => Err(SessionError::StreamClosed),
                },
            };

            if let Err(error) = result {
                self.log_shutdown_reason(&error);
                self.registry.unregister(self.user_id, self.conn_id);
                if let Some(reason) = close_reason_for(error)
                    && let Err(e) = session.close(reason).await
                {
                    debug!("Failed to close WebSocket session @{}: {}", self.conn_id, e);
                }
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > self.settings.client_timeout {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message.map_err(SessionError::Protocol)? {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session.pong(&payload).await.map_err(SessionError::Network)
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.handle_text(session, text.as_ref()).await
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_text(&self, session: &mut Session, text: &str) -> Result<(), SessionError> {
        let frame = match serde_json::from_str::<ClientFrame>(text) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Ignoring malformed frame from @{}: {}", self.conn_id, e);
                return Ok(());
            }
        };

        match frame {
            ClientFrame::Message(msg) => {
                let recipient = msg.user_id;
                let preview = msg.message.clone();
                match self.registry.relay(self.user_id, recipient, msg.message) {
                    RelayOutcome::Delivered(target) => {
                        debug!("Sender @{} to @{} : {}", self.conn_id, target, preview);
                        self.send_frame(session, &ServerFrame::ack())
                            .await
                            .map_err(SessionError::Network)
                    }
                    RelayOutcome::Offline => {
                        debug!(
                            "Sender @{} to user {} (offline) : {}",
                            self.conn_id, recipient, preview
                        );
                        Ok(())
                    }
                    RelayOutcome::Dropped => Ok(()),
                }
            }
        }
    }

    async fn send_frame(&self, session: &mut Session, frame: &ServerFrame) -> Result<(), Closed> {
        match serde_json::to_string(frame) {
            Ok(body) => session.text(body).await,
            Err(e) => {
                warn!("Failed to serialize gateway frame: {}", e);
                Ok(())
            }
        }
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                info!("Connection @{} timed out, closing", self.conn_id);
            }
            SessionError::Protocol(e) => {
                warn!("WebSocket protocol error on @{}: {}", self.conn_id, e);
            }
            SessionError::Network(e) => {
                debug!("WebSocket send failed on @{}: {}", self.conn_id, e);
            }
            SessionError::ClientClosed(_) | SessionError::StreamClosed => {
                info!("Connection @{} closed", self.conn_id);
            }
        }
    }
}

async fn recv_outbox(outbox: &mut Option<mpsc::Receiver<ServerFrame>>) -> Option<ServerFrame> {
    match outbox.as_mut() {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn close_reason_for(error: SessionError) -> Option<Option<CloseReason>> {
    match error {
        SessionError::HeartbeatTimeout => Some(Some(CloseReason {
            code: CloseCode::Normal,
            description: Some("heartbeat timeout".to_owned()),
        })),
        SessionError::Protocol(_) => Some(Some(CloseReason {
            code: CloseCode::Protocol,
            description: Some("protocol error".to_owned()),
        })),
        SessionError::ClientClosed(reason) => Some(reason),
        SessionError::StreamClosed | SessionError::Network(_) => None,
    }
}
