//! 在线连接表：user_id -> 当前连接的发送队列
//!
//! 同一用户只保留第一个存活的连接；注销时比对连接 id，
//! 被拒绝的重复连接断开时不会把正在使用的连接删掉。

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use super::messages::{RelayedMessage, ServerFrame};

pub type ConnectionId = u64;

struct Connection {
    id: ConnectionId,
    outbox: mpsc::Sender<ServerFrame>,
}

/// relay 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// 已放入接收者连接的队列
    Delivered(ConnectionId),
    /// 接收者不在线
    Offline,
    /// 接收者队列已满，消息丢弃
    Dropped,
}

pub struct ConnectionRegistry {
    connections: DashMap<i32, Connection>,
    next_id: AtomicU64,
    outbox_capacity: usize,
}

impl ConnectionRegistry {
    pub fn new(outbox_capacity: usize) -> Self {
        Self {
            connections: DashMap::new(),
            next_id: AtomicU64::new(1),
            outbox_capacity: outbox_capacity.max(1),
        }
    }

    /// 分配连接 id（每个 socket 一个，不管是否注册成功）
    pub fn next_connection_id(&self) -> ConnectionId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// 注册连接，已有存活连接时返回 None
    pub fn register(
        &self,
        user_id: i32,
        conn_id: ConnectionId,
    ) -> Option<mpsc::Receiver<ServerFrame>> {
        let (tx, rx) = mpsc::channel(self.outbox_capacity);
        let connection = Connection {
            id: conn_id,
            outbox: tx,
        };

        match self.connections.entry(user_id) {
            Entry::Occupied(entry) if !entry.get().outbox.is_closed() => {
                debug!(
                    "User {} already connected as @{}, keeping it",
                    user_id,
                    entry.get().id
                );
                None
            }
            Entry::Occupied(mut entry) => {
                // 旧连接已经关闭但还没注销
                entry.insert(connection);
                Some(rx)
            }
            Entry::Vacant(entry) => {
                entry.insert(connection);
                Some(rx)
            }
        }
    }

    /// 注销，只有连接 id 一致时才删除
    pub fn unregister(&self, user_id: i32, conn_id: ConnectionId) -> bool {
        self.connections
            .remove_if(&user_id, |_, conn| conn.id == conn_id)
            .is_some()
    }

    /// 把消息放进接收者的发送队列
    pub fn relay(&self, from: i32, to: i32, message: String) -> RelayOutcome {
        let frame = ServerFrame::Message(RelayedMessage { from, message });

        let (conn_id, result) = match self.connections.get(&to) {
            Some(conn) => (conn.id, conn.outbox.try_send(frame)),
            None => return RelayOutcome::Offline,
        };

        match result {
            Ok(()) => RelayOutcome::Delivered(conn_id),
            Err(TrySendError::Full(_)) => {
                warn!("Outbox of user {} is full, dropping message from {}", to, from);
                RelayOutcome::Dropped
            }
            Err(TrySendError::Closed(_)) => {
                self.connections.remove_if(&to, |_, conn| conn.outbox.is_closed());
                RelayOutcome::Offline
            }
        }
    }

    pub fn is_connected(&self, user_id: i32) -> bool {
        self.connections
            .get(&user_id)
            .is_some_and(|conn| !conn.outbox.is_closed())
    }

    /// 当前注册的用户数
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
